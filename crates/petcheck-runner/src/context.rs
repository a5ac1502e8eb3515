//! Per-run and per-scenario state

use std::cell::RefCell;
use std::time::Duration;

use petcheck_core::{CheckError, Config, Envelope, TeardownFailure, check};

use crate::client::{ClientError, PetstoreClient};
use crate::logging::{Logger, parse_level};

/// What every scenario of a run shares: the client, the logger and limits.
#[derive(Debug, Clone)]
pub struct Harness {
    pub client: PetstoreClient,
    pub logger: Logger,
    pub response_time_limit: Option<Duration>,
}

impl Harness {
    #[must_use]
    pub fn new(client: PetstoreClient, logger: Logger) -> Self {
        Self {
            client,
            logger,
            response_time_limit: None,
        }
    }

    /// Client and console logger built from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = PetstoreClient::from_config(config)?;
        let logger = Logger::console(parse_level(&config.log_level));
        Ok(Self {
            client,
            logger,
            response_time_limit: config.response_time_limit(),
        })
    }

    #[must_use]
    pub fn with_response_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.response_time_limit = limit;
        self
    }
}

/// Handed to a scenario body; collects teardown failures of its fixtures.
#[derive(Debug)]
pub struct ScenarioContext<'h> {
    harness: &'h Harness,
    scenario: String,
    teardown_failures: RefCell<Vec<TeardownFailure>>,
}

impl<'h> ScenarioContext<'h> {
    pub fn new(harness: &'h Harness, scenario: impl Into<String>) -> Self {
        Self {
            harness,
            scenario: scenario.into(),
            teardown_failures: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn client(&self) -> &'h PetstoreClient {
        &self.harness.client
    }

    #[must_use]
    pub fn logger(&self) -> &'h Logger {
        &self.harness.logger
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub(crate) fn record_teardown_failure(&self, failure: TeardownFailure) {
        self.teardown_failures.borrow_mut().push(failure);
    }

    /// Teardown failures recorded so far, leaving the list empty.
    pub fn take_teardown_failures(&self) -> Vec<TeardownFailure> {
        self.teardown_failures.take()
    }

    /// Status check that also enforces the run's response time limit.
    ///
    /// # Errors
    ///
    /// [`CheckError::UnexpectedStatus`] or [`CheckError::ResponseTimeExceeded`].
    pub fn expect_status(&self, resp: &Envelope, expected: u16) -> Result<(), CheckError> {
        check::expect_status(resp, expected)?;
        self.expect_timely(resp)?;
        tracing::info!("{} returned {expected} as expected", resp.operation());
        Ok(())
    }

    /// # Errors
    ///
    /// [`CheckError::ResponseTimeExceeded`] when a limit is configured and exceeded.
    pub fn expect_timely(&self, resp: &Envelope) -> Result<(), CheckError> {
        match self.harness.response_time_limit {
            Some(limit) => check::expect_response_time(resp, limit),
            None => Ok(()),
        }
    }
}
