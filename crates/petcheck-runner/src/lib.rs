//! petcheck-runner: Petstore client, fixtures and the scenario runner

pub mod client;
pub mod context;
pub mod fixture;
pub mod ids;
pub mod logging;
pub mod scenarios;
pub mod suite;

pub use client::{ClientError, PetstoreClient};
pub use context::{Harness, ScenarioContext};
pub use fixture::{Fixture, Resource};
pub use logging::{CaptureBuffer, Logger};
pub use scenarios::Scenario;
pub use suite::Suite;
