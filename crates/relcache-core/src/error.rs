use std::path::PathBuf;

use tokio::task::JoinError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to find latest supported {tool} release (major version {major})")]
    ReleaseNotFound { tool: String, major: u64 },

    #[error("Release {tag} of {tool} has no assets")]
    NoAssets { tool: String, tag: String },

    #[error("Downloaded {name} has {received} bytes, the release lists {expected}")]
    SizeMismatch { name: String, expected: u64, received: u64 },

    #[error("NetworkError:\nurl: {url}\nerror: {error}")]
    Network { url: String, error: String },

    #[error("FilesystemError:\npath: {path}\nerror: {error}")]
    Filesystem {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Invalid tool descriptor: {0}")]
    InvalidTool(String),

    #[error("{0}")]
    Task(#[from] JoinError),
}

impl FetchError {
    pub fn network(url: impl Into<String>, error: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            error: error.to_string(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            error,
        }
    }
}
