//! Error taxonomy shared by the listing gateway, the content gateway and the mutation
//! orchestrator.

use thiserror::Error;

pub type TreeResult<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unauthenticated (run `treeward login --token ...`)")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited (status {status}): {body}")]
    RateLimited { status: u16, body: String },

    #[error("remote error (status {status}): {body}")]
    RemoteError { status: u16, body: String },

    #[error("could not resolve {0}")]
    ResolutionError(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("decode: {0}")]
    Decode(String),

    /// A multi-call operation stopped at `path`; `completed` lists what already went through.
    #[error("interrupted at {path} after {} completed item(s): {source}", completed.len())]
    Interrupted {
        path: String,
        completed: Vec<String>,
        #[source]
        source: Box<TreeError>,
    },
}

impl TreeError {
    pub fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        TreeError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Innermost error, looking through `Interrupted` wrappers.
    pub fn root_cause(&self) -> &TreeError {
        match self {
            TreeError::Interrupted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Remote HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            TreeError::RateLimited { status, .. } | TreeError::RemoteError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TreeError {
    fn from(err: reqwest::Error) -> Self {
        TreeError::Transport(err.to_string())
    }
}
