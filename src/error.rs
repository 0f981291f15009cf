use std::{io, path::PathBuf, string::FromUtf8Error};
use thiserror::Error;

/// Errors raised by filesystem operations on a `FileNode`
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8 text", .path.display())]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("node has no filesystem path")]
    Detached,
}

impl NodeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NodeError::Io { path: path.into(), source }
    }

    /// The underlying I/O error kind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            NodeError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Why a write or append did not touch the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    Detached,
    Missing,
    IsDirectory,
    NotWritable,
}

/// Result of a write or append whose preconditions were checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Blocked(Blocked),
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}
