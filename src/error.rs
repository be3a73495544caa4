/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! Error types shared by every stage of a load.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The environment file is missing, not a regular file, or unreadable.
    #[error("unable to read the environment file at {}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value on an assignment line could not be sanitized.
    #[error("malformed value for {name} on line {line}: {reason}")]
    MalformedValue {
        line: usize,
        name: String,
        reason: MalformedReason,
    },

    /// One or more required variables failed their assertions.
    #[error("one or more environment variables failed assertions: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Unquoted value with interior whitespace.
    UnquotedWhitespace,
    /// Opening quote with no matching closing quote.
    UnterminatedQuote,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::UnquotedWhitespace => {
                f.write_str("values containing spaces must be surrounded by quotes")
            }
            MalformedReason::UnterminatedQuote => f.write_str("quoted value is never closed"),
        }
    }
}

impl Error {
    pub(crate) fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Path {
            path: path.into(),
            source,
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Error::Path { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::path("/nowhere/.env", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_path());
        assert_eq!(
            err.to_string(),
            "unable to read the environment file at /nowhere/.env"
        );
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::MalformedValue {
            line: 3,
            name: "FOO".to_string(),
            reason: MalformedReason::UnquotedWhitespace,
        };
        assert!(err.is_malformed());
        assert_eq!(
            err.to_string(),
            "malformed value for FOO on line 3: values containing spaces must be surrounded by quotes"
        );
    }
}
