//! Error types for geodat.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for geodat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File or directory operation failed
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of an IP list is not a CIDR
    #[error("{}:{line}: {source}", .path.display())]
    InvalidCidr {
        path: PathBuf,
        line: usize,
        #[source]
        source: CidrRuleError,
    },

    /// Input file name is not valid UTF-8
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// Dat content does not match the schema
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    /// Gzip stream is corrupt
    #[error("failed to inflate gzip input: {0}")]
    Gzip(#[source] std::io::Error),

    /// Decoded entry cannot be rendered as text
    #[error("malformed entry in {country_code}: {reason}")]
    Malformed {
        country_code: String,
        reason: String,
    },

    /// Serialization failed
    #[error("failed to encode dat: {0}")]
    Encode(#[from] prost::EncodeError),
}

impl Error {
    /// Whether the error comes from non-conforming dat content.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::Gzip(_) | Error::Malformed { .. }
        )
    }

    pub(crate) fn malformed(country_code: &str, reason: impl Into<String>) -> Self {
        Error::Malformed {
            country_code: country_code.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for geodat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for CIDR rule parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CidrRuleError {
    /// Invalid CIDR notation
    #[error("invalid cidr. cidr={0}")]
    InvalidCidr(String),
}

/// Attaches the failed action and path to an I/O result.
pub(crate) trait IoContext<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
