use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::{self, Config, ConfigError},
    header,
    revision::{self, RevisionError},
    template,
};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampReport {
    pub revision: String,
    pub template_path: PathBuf,
    pub header_path: PathBuf,
    pub substitutions: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Revision(#[from] RevisionError),
    #[error("failed to read template {}: {source}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write header {}: {source}", path.display())]
    WriteHeader {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("header {} is the template itself", path.display())]
    HeaderIsTemplate { path: PathBuf },
    #[error("failed to locate the revstamp executable: {0}")]
    InstallLocation(#[source] io::Error),
}

/// Directory holding the running executable; template and header live beside it.
pub fn default_base_dir() -> Result<PathBuf, StampError> {
    let exe = env::current_exe().map_err(StampError::InstallLocation)?;
    let exe = fs::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        StampError::InstallLocation(io::Error::new(
            io::ErrorKind::NotFound,
            "executable path has no parent directory",
        ))
    })
}

pub fn run(base_dir: &Path) -> Result<StampReport, StampError> {
    let config = config::load_config(base_dir)?;
    run_with_config(base_dir, &config)
}

/// Query the revision, render the template and write the header, in that order.
///
/// Nothing is written unless every earlier step succeeded.
pub fn run_with_config(base_dir: &Path, config: &Config) -> Result<StampReport, StampError> {
    let revision = revision::get_revision(&config.tool.to_tool())?;
    tracing::debug!(revision = %revision, "resolved revision");

    let template_path = config.paths.template_path(base_dir);
    let template_text =
        fs::read_to_string(&template_path).map_err(|source| StampError::ReadTemplate {
            path: template_path.clone(),
            source,
        })?;

    let placeholder = &config.paths.placeholder;
    let substitutions = template::count_placeholders(&template_text, placeholder);
    if substitutions == 0 {
        tracing::warn!(
            path = %template_path.display(),
            placeholder = %placeholder,
            "template has no placeholder, header will match it verbatim"
        );
    }
    let rendered = template::render_with(&template_text, placeholder, &revision);

    let header_path = config.paths.header_path(base_dir);
    if same_file(&template_path, &header_path) {
        return Err(StampError::HeaderIsTemplate { path: header_path });
    }
    header::write_header(&header_path, &rendered).map_err(|source| StampError::WriteHeader {
        path: header_path.clone(),
        source,
    })?;

    Ok(StampReport {
        revision,
        template_path,
        header_path,
        substitutions,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
