//! Sequential suite runner
//!
//! Scenarios run one after another on the calling thread, each inside the
//! harness logger's scope. A panicking scenario is recorded as failed and the
//! run continues; its fixtures still tear down while unwinding.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use petcheck_core::{FailureKind, FailureRecord, RunReport, ScenarioOutcome};

use crate::context::{Harness, ScenarioContext};
use crate::scenarios::{Scenario, catalogue};

/// An ordered selection of scenarios
#[derive(Debug)]
pub struct Suite {
    scenarios: Vec<Scenario>,
}

impl Suite {
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// The full catalogue.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(catalogue())
    }

    /// Keep only scenarios whose name contains `pattern`.
    #[must_use]
    pub fn filter(mut self, pattern: &str) -> Self {
        self.scenarios.retain(|s| s.name().contains(pattern));
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Run every scenario and collect the report.
    #[must_use]
    pub fn run(&self, harness: &Harness) -> RunReport {
        let mut report = RunReport::new(harness.client.base_url());
        let started = Instant::now();

        for scenario in &self.scenarios {
            let ctx = ScenarioContext::new(harness, scenario.name());
            let outcome = harness.logger.scope(|| run_one(scenario, &ctx));
            report.outcomes.push(outcome);
            report.teardown_failures.extend(ctx.take_teardown_failures());
        }

        report.elapsed_secs = started.elapsed().as_secs_f64();
        harness.logger.scope(|| {
            tracing::info!(
                "run finished: {} passed, {} failed, {} teardown failures",
                report.passed(),
                report.failed(),
                report.teardown_failures.len()
            );
        });
        report
    }
}

fn run_one(scenario: &Scenario, ctx: &ScenarioContext<'_>) -> ScenarioOutcome {
    tracing::info!("scenario {} started", scenario.name());
    let started = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(|| scenario.run(ctx)));
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(Ok(())) => {
            tracing::info!("scenario {} passed", scenario.name());
            ScenarioOutcome::passed(scenario.name(), elapsed)
        }
        Ok(Err(err)) => {
            tracing::error!("scenario {} failed: {err}", scenario.name());
            ScenarioOutcome::failed(scenario.name(), FailureRecord::from(&err), elapsed)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("scenario {} panicked: {message}", scenario.name());
            ScenarioOutcome::failed(
                scenario.name(),
                FailureRecord {
                    kind: FailureKind::Panic,
                    message,
                },
                elapsed,
            )
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
