// ABOUTME: Validated source-control revision (commit SHA).
// ABOUTME: Accepts abbreviated or full hex object names, SHA-1 or SHA-256.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevisionError {
    #[error("revision cannot be empty")]
    Empty,

    #[error("revision must be between 4 and 64 characters, got {0}")]
    BadLength(usize),

    #[error("invalid character in revision: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn new(value: &str) -> Result<Self, RevisionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RevisionError::Empty);
        }

        if !(4..=64).contains(&value.len()) {
            return Err(RevisionError::BadLength(value.len()));
        }

        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(RevisionError::InvalidChar(c));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
