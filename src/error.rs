use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParfindError {
    // Expression construction
    #[error("missing argument of size")]
    MissingSizeArgument,

    #[error("{0} is invalid size argument")]
    InvalidSize(String),

    #[error("{0} is invalid unit of size")]
    InvalidSizeUnit(char),

    #[error("{0} is invalid file type")]
    InvalidFileType(String),

    #[error("invalid regex pattern")]
    InvalidRegex(#[from] regex::Error),

    // Argument parsing
    #[error("{0}")]
    InvalidArgument(String),

    // Traversal
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: cannot read metadata: {kind}", path.display())]
    Metadata {
        path: PathBuf,
        kind: std::io::ErrorKind,
    },

    // Runtime
    #[error("thread pool failure")]
    ThreadPool(String),

    /// At least one traversal error was reported during the run.
    #[error("error occurred")]
    WalkFailed,
}

impl ParfindError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::Metadata { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether traversal can continue after this error.
    ///
    /// Recoverable errors (permission denied, vanished entries, unreadable
    /// metadata) are reported to the error sink and only abandon their own
    /// branch — the walk keeps going.
    ///
    /// Construction and thread-pool errors are fatal and surface before any
    /// filesystem access.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Metadata { .. })
    }

    /// Wrap an I/O error with the path it occurred at.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
