use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// All errors produced while packing a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A required input (script or template) is missing or unreadable.
    #[error("cannot read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bundle could not be written (missing directory, permissions).
    #[error("cannot write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The auxiliary asset exists but could not be copied.
    #[error("cannot copy '{}' to '{}'", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Strict mode: the template has no `main.js` script marker.
    #[error("no main.js script marker in '{}'", template.display())]
    MissingMarker { template: PathBuf },

    /// Strict mode: the bundle exceeds the configured size budget.
    #[error("bundle is {size} bytes, over the {budget} byte budget")]
    OverBudget { size: u64, budget: u64 },

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    Config { var: String, value: String },

    /// The file watcher could not be started or failed while running.
    #[error("file watcher failed")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, BundleError>;

/// Shorthand constructors.
impl BundleError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }
}
