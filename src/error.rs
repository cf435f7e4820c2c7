//! Error types for indexing runs.

use std::path::PathBuf;
use thiserror::Error;

/// Error surfaced by a [`MetadataClient`](crate::client::MetadataClient) call.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from building the metadata index.
///
/// Every variant except [`IndexError::Parse`] aborts the whole run. Parse
/// failures are logged by the child materializer and the offending file is
/// skipped.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Unknown metadata type: {name}")]
    UnknownType { name: String },

    #[error("Remote call '{operation}' failed: {source}")]
    Transport {
        operation: String,
        #[source]
        source: ClientError,
    },

    #[error("Could not crawl retrieved metadata under {path}: {source}")]
    Crawl {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Crawl task failed: {0}")]
    CrawlTask(String),

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub(crate) fn transport(operation: impl Into<String>, source: ClientError) -> Self {
        IndexError::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error aborts the indexing run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IndexError::Parse { .. })
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
