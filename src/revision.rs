use std::{
    ffi::OsString,
    io,
    process::{Command, ExitStatus, Stdio},
};

pub const DEFAULT_TOOL: &str = "svnversion";

/// The external command queried for the working-copy revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionTool {
    pub command: OsString,
    pub args: Vec<OsString>,
    /// Treat a non-zero exit status as a failure instead of using whatever
    /// the tool printed.
    pub require_success: bool,
}

impl Default for RevisionTool {
    fn default() -> Self {
        Self {
            command: OsString::from(DEFAULT_TOOL),
            args: Vec::new(),
            require_success: true,
        }
    }
}

impl RevisionTool {
    pub fn new(command: impl Into<OsString>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn require_success(mut self, require_success: bool) -> Self {
        self.require_success = require_success;
        self
    }

    fn display_name(&self) -> String {
        self.command.to_string_lossy().into_owned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("failed to run revision tool '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("revision tool '{command}' failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("revision tool '{command}' printed non UTF-8 output")]
    NonUtf8 {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Run `tool` and return its standard output with surrounding whitespace removed.
///
/// Blocks until the tool exits; there is no timeout.
pub fn get_revision(tool: &RevisionTool) -> Result<String, RevisionError> {
    let command = tool.display_name();
    tracing::debug!(command = %command, args = ?tool.args, "querying revision");

    let output = Command::new(&tool.command)
        .args(&tool.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| RevisionError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if tool.require_success {
            return Err(RevisionError::Failed {
                command,
                status: output.status,
                stderr,
            });
        }
        tracing::warn!(
            command = %command,
            status = %output.status,
            stderr = %stderr,
            "revision tool failed, using its output anyway"
        );
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|source| RevisionError::NonUtf8 { command, source })?;
    Ok(stdout.trim().to_string())
}
