// src/error.rs

use std::fmt;
use thiserror::Error;

/// Which index a lookup was answered from. Carried in [`LookupError`] so a
/// failed lookup can be reported with both the key and the code family it
/// was tried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Iso2,
    Iso3,
    M49,
    M49Comtrade,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LookupKind::Iso2 => "ISO2",
            LookupKind::Iso3 => "ISO3",
            LookupKind::M49 => "M49",
            LookupKind::M49Comtrade => "Comtrade M49",
        };
        f.write_str(s)
    }
}

/// Load-time failures. Any of these aborts table construction; there is no
/// partially-built table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("reading dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no header row")]
    MissingHeader,

    #[error("unexpected header: expected {expected:?}, got {got:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("line {line}: duplicate {kind} code {code}")]
    DuplicateCode {
        line: u64,
        kind: LookupKind,
        code: String,
    },

    #[error("record `{country}`: {reason}")]
    InvariantViolation { country: String, reason: String },
}

/// A lookup that found no record. Local to the single call; the table is
/// untouched and the caller can recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no record with {kind} code `{key}`")]
    NotFound { kind: LookupKind, key: String },
}

impl LookupError {
    pub(crate) fn not_found(kind: LookupKind, key: impl Into<String>) -> Self {
        LookupError::NotFound {
            kind,
            key: key.into(),
        }
    }
}
