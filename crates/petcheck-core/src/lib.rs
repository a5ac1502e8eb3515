//! petcheck-core: Core types for the Petstore functional suite
//!
//! Resource models, the response envelope, structural schema validation,
//! response assertions and the run report. Nothing in this crate performs I/O
//! against the remote API.

pub mod check;
pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod report;
pub mod schema;

pub use config::{Config, ConfigError};
pub use envelope::Envelope;
pub use error::{CheckError, FailureKind};
pub use model::{ApiResponse, Category, Order, OrderStatus, Pet, PetStatus, Tag, User};
pub use report::{
    FailureRecord, REPORT_TITLE, RunReport, ScenarioOutcome, TeardownFailure, VerdictStatus,
    format_duration,
};
pub use schema::{Schema, SchemaViolation, ViolationKind};
