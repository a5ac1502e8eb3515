//! Scenario failure kinds

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaViolation;

/// Why a scenario failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    /// Connection, timeout or body read failure. Never retried.
    #[error("transport error on {operation}: {message}")]
    Transport { operation: String, message: String },

    #[error("unexpected status for {operation}: expected {expected}, got {actual}")]
    UnexpectedStatus {
        operation: String,
        expected: String,
        actual: u16,
    },

    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    #[error("field `{field}` mismatch: expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: serde_json::Value,
        actual: serde_json::Value,
    },

    #[error("{operation} took {elapsed_ms} ms, limit is {limit_ms} ms")]
    ResponseTimeExceeded {
        operation: String,
        elapsed_ms: u128,
        limit_ms: u128,
    },

    #[error("{operation} returned no JSON body")]
    MissingBody { operation: String },

    #[error("cannot decode body of {operation}: {message}")]
    Decode { operation: String, message: String },

    /// Precondition resource could not be created; the scenario did not run.
    #[error("fixture setup failed for {resource} {key}: {reason}")]
    FixtureSetup {
        resource: &'static str,
        key: String,
        reason: String,
    },

    #[error("{path}: {message}")]
    Io { path: String, message: String },
}

impl CheckError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::Transport,
            Self::UnexpectedStatus { .. } => FailureKind::UnexpectedStatus,
            Self::SchemaViolation(_) | Self::MissingBody { .. } | Self::Decode { .. } => {
                FailureKind::SchemaViolation
            }
            Self::FieldMismatch { .. } => FailureKind::FieldMismatch,
            Self::ResponseTimeExceeded { .. } => FailureKind::ResponseTime,
            Self::FixtureSetup { .. } => FailureKind::FixtureSetup,
            Self::Io { .. } => FailureKind::Io,
        }
    }
}

/// Coarse classification recorded in the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    UnexpectedStatus,
    SchemaViolation,
    FieldMismatch,
    ResponseTime,
    FixtureSetup,
    Io,
    /// The scenario panicked
    Panic,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::UnexpectedStatus => "unexpected status",
            Self::SchemaViolation => "schema violation",
            Self::FieldMismatch => "field mismatch",
            Self::ResponseTime => "response time",
            Self::FixtureSetup => "fixture setup",
            Self::Io => "io",
            Self::Panic => "panic",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
