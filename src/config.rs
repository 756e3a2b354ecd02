use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{revision, template};

pub const CONFIG_FILENAME: &str = "revstamp.toml";

const DEFAULT_TEMPLATE_FILENAME: &str = "version.template";
const DEFAULT_HEADER_FILENAME: &str = "version.h";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tool: ToolConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub command: String,
    pub args: Vec<String>,
    pub require_success: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: revision::DEFAULT_TOOL.to_string(),
            args: Vec::new(),
            require_success: true,
        }
    }
}

impl ToolConfig {
    pub fn to_tool(&self) -> revision::RevisionTool {
        self.args.iter().fold(
            revision::RevisionTool::new(&self.command).require_success(self.require_success),
            |tool, arg| tool.arg(arg),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub template: PathBuf,
    pub header: PathBuf,
    pub placeholder: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE_FILENAME),
            header: PathBuf::from(DEFAULT_HEADER_FILENAME),
            placeholder: template::PLACEHOLDER.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn template_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.template)
    }

    pub fn header_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.header)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config file ({}) has invalid fields:\n- {}", path.display(), errors.join("\n- "))]
    Invalid { path: PathBuf, errors: Vec<String> },
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILENAME)
}

/// Load `revstamp.toml` from `base_dir`, falling back to defaults when the file is absent.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(base_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    tracing::debug!(path = %path.display(), bytes = raw.len(), "loaded revstamp config");
    parse_config(&path, &raw)
}

pub fn parse_config(path: &Path, raw: &str) -> Result<Config, ConfigError> {
    let value: toml::Value = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut errors = validate_schema(&value);
    if errors.is_empty() {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        errors = validate(&config);
        if errors.is_empty() {
            return Ok(config);
        }
    }
    Err(ConfigError::Invalid {
        path: path.to_path_buf(),
        errors,
    })
}

fn validate_schema(value: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(root) = value.as_table() else {
        errors.push("config must be a table".to_string());
        return errors;
    };

    if let Some(value) = root.get("tool") {
        match value.as_table() {
            Some(table) => {
                validate_str(table, "command", "[tool].command (string)", &mut errors);
                validate_string_array(
                    table,
                    "args",
                    "[tool].args (array of strings)",
                    &mut errors,
                );
                validate_bool(
                    table,
                    "require_success",
                    "[tool].require_success (boolean)",
                    &mut errors,
                );
            }
            None => errors.push("[tool] must be a table".to_string()),
        }
    }

    if let Some(value) = root.get("paths") {
        match value.as_table() {
            Some(table) => {
                validate_str(table, "template", "[paths].template (string)", &mut errors);
                validate_str(table, "header", "[paths].header (string)", &mut errors);
                validate_str(table, "placeholder", "[paths].placeholder (string)", &mut errors);
            }
            None => errors.push("[paths] must be a table".to_string()),
        }
    }

    errors
}

fn validate_str(table: &toml::value::Table, key: &str, label: &str, errors: &mut Vec<String>) {
    if let Some(value) = table.get(key) {
        if !value.is_str() {
            errors.push(format!("invalid {label}: expected string"));
        }
    }
}

fn validate_bool(table: &toml::value::Table, key: &str, label: &str, errors: &mut Vec<String>) {
    if let Some(value) = table.get(key) {
        if !value.is_bool() {
            errors.push(format!("invalid {label}: expected boolean"));
        }
    }
}

fn validate_string_array(
    table: &toml::value::Table,
    key: &str,
    label: &str,
    errors: &mut Vec<String>,
) {
    if let Some(value) = table.get(key) {
        match value.as_array() {
            Some(values) => {
                if values.iter().any(|value| !value.is_str()) {
                    errors.push(format!("invalid {label}: expected array of strings"));
                }
            }
            None => errors.push(format!("invalid {label}: expected array of strings")),
        }
    }
}

fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    if config.tool.command.trim().is_empty() {
        errors.push("tool.command must not be empty".to_string());
    }
    if config.paths.placeholder.is_empty() {
        errors.push("paths.placeholder must not be empty".to_string());
    }
    if config.paths.template.as_os_str().is_empty() {
        errors.push("paths.template must not be empty".to_string());
    }
    if config.paths.header.as_os_str().is_empty() {
        errors.push("paths.header must not be empty".to_string());
    }
    if lexical_path(&config.paths.template) == lexical_path(&config.paths.header) {
        errors.push("paths.header must differ from paths.template".to_string());
    }
    errors
}

// `./version.h` and `version.h` name the same file.
fn lexical_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
