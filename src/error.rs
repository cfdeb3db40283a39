use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    /// Host is missing something the launcher cannot run without.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("cannot prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session '{session}' failed: {reason}")]
    Session { session: String, reason: String },

    /// Operator cancelled the prompt (Ctrl+C or end of input).
    #[error("interrupted")]
    Interrupted,
}

impl LauncherError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
