//! Configuration errors.  The frame loop itself never fails.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("malformed s-expression: {0}")]
    Malformed(String),

    #[error("invalid :{key} ({expected})")]
    Invalid {
        key: &'static str,
        expected: &'static str,
    },

    #[error("unknown {kind} `{value}`")]
    Unknown { kind: &'static str, value: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, expected: &'static str) -> Self {
        Self::Invalid { key, expected }
    }

    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            value: value.into(),
        }
    }
}
