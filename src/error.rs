use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read error: {0}")]
    Read(#[from] io::Error),

    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: u64, reason: MalformedReason },

    #[error("cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("profiler error: {0}")]
    Profile(String),
}

/// Why a line could not be split into a station and a measurement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("missing ';' delimiter")]
    MissingDelimiter,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid UTF-8")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_cause_is_reported_once() {
        let err = Error::Open {
            path: PathBuf::from("/nonexist"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(err.to_string(), "cannot open /nonexist");
        assert_eq!(err.source().unwrap().to_string(), "no such file");
    }

    #[test]
    fn test_write_message() {
        let err = Error::Write {
            path: PathBuf::from("profile.pb"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(err.to_string(), "cannot write profile.pb");
    }
}
