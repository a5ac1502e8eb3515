//! Run report: per-scenario outcomes, leaked resources, verdict
//!
//! Teardown failures never change a scenario's outcome or the exit code;
//! they are listed separately so leaked remote state can be removed by hand.

use std::fmt::Write as _;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, FailureKind};

pub const REPORT_TITLE: &str = "PetStore API Automated Test Report";

/// Why a scenario did not pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailureRecord {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&CheckError> for FailureRecord {
    fn from(err: &CheckError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioOutcome {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureRecord>,
    /// Wall time in seconds
    pub elapsed_secs: f64,
}

impl ScenarioOutcome {
    #[must_use]
    pub fn passed(name: impl Into<String>, elapsed_secs: f64) -> Self {
        Self {
            name: name.into(),
            failure: None,
            elapsed_secs,
        }
    }

    #[must_use]
    pub fn failed(name: impl Into<String>, failure: FailureRecord, elapsed_secs: f64) -> Self {
        Self {
            name: name.into(),
            failure: Some(failure),
            elapsed_secs,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.failure.is_none()
    }
}

/// A cleanup call that did not succeed; the resource may still exist remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeardownFailure {
    pub scenario: String,
    pub resource: String,
    pub key: String,
    pub reason: String,
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    pub title: String,
    pub base_url: String,
    pub outcomes: Vec<ScenarioOutcome>,
    #[serde(default)]
    pub teardown_failures: Vec<TeardownFailure>,
    pub elapsed_secs: f64,
}

impl RunReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            base_url: base_url.into(),
            outcomes: Vec::new(),
            teardown_failures: Vec::new(),
            elapsed_secs: 0.0,
        }
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_pass()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// PASS requires at least one scenario and no failures.
    #[must_use]
    pub fn status(&self) -> VerdictStatus {
        if !self.outcomes.is_empty() && self.failed() == 0 {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        }
    }

    /// 0 = pass, 1 = scenario failures, 3 = nothing ran.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.outcomes.is_empty() {
            3
        } else if self.failed() > 0 {
            1
        } else {
            0
        }
    }

    #[must_use]
    pub fn reason(&self) -> String {
        if self.outcomes.is_empty() {
            return "No scenarios were run".to_string();
        }
        if self.failed() == 0 {
            return "All scenarios passed".to_string();
        }
        let mut kinds: Vec<(FailureKind, usize)> = Vec::new();
        for failure in self.outcomes.iter().filter_map(|o| o.failure.as_ref()) {
            match kinds.iter_mut().find(|(k, _)| *k == failure.kind) {
                Some((_, n)) => *n += 1,
                None => kinds.push((failure.kind, 1)),
            }
        }
        let breakdown: Vec<String> = kinds.iter().map(|(k, n)| format!("{n} {k}")).collect();
        format!(
            "{} of {} scenarios failed ({})",
            self.failed(),
            self.outcomes.len(),
            breakdown.join(", ")
        )
    }

    /// Human-readable rendering for the terminal or a report file.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.chars().count()));
        let _ = writeln!(out, "Target: {}", self.base_url);
        let _ = writeln!(out);

        for outcome in &self.outcomes {
            let label = if outcome.is_pass() { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "{label} {} ({})",
                outcome.name,
                format_duration(outcome.elapsed_secs)
            );
            if let Some(failure) = &outcome.failure {
                let _ = writeln!(out, "     [{}] {}", failure.kind, failure.message);
            }
        }

        if !self.teardown_failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Teardown failures ({}):", self.teardown_failures.len());
            for t in &self.teardown_failures {
                let _ = writeln!(
                    out,
                    "  {} {} (from {}): {}",
                    t.resource, t.key, t.scenario, t.reason
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}: {}", self.status(), self.reason());
        let _ = writeln!(
            out,
            "  Scenarios: {} total, {} passed, {} failed",
            self.outcomes.len(),
            self.passed(),
            self.failed()
        );
        let _ = writeln!(out, "  Duration: {}", format_duration(self.elapsed_secs));
        out
    }
}

/// Milliseconds under one second, seconds otherwise, two decimals.
#[must_use]
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.2} ms", secs * 1000.0)
    } else {
        format!("{secs:.2} s")
    }
}

/// JSON Schema of the report, for consumers of `--output json`.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(RunReport);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RunReport {
        let mut report = RunReport::new("https://petstore.swagger.io/v2");
        report
            .outcomes
            .push(ScenarioOutcome::passed("pet::lifecycle", 0.23152));
        report.outcomes.push(ScenarioOutcome::failed(
            "user::duplicate_rejected",
            FailureRecord {
                kind: FailureKind::UnexpectedStatus,
                message: "unexpected status for POST /v2/user: expected 4xx, got 200".into(),
            },
            1.02,
        ));
        report.teardown_failures.push(TeardownFailure {
            scenario: "pet::update[sold]".into(),
            resource: "pet".into(),
            key: "4242".into(),
            reason: "status 500".into(),
        });
        report.elapsed_secs = 1.5;
        report
    }

    #[test]
    fn duration_under_a_second_in_ms() {
        assert_eq!(format_duration(0.23152), "231.52 ms");
        assert_eq!(format_duration(0.0), "0.00 ms");
    }

    #[test]
    fn duration_from_a_second_in_s() {
        assert_eq!(format_duration(1.0), "1.00 s");
        assert_eq!(format_duration(12.346), "12.35 s");
    }

    #[test]
    fn verdict_counts() {
        let report = sample_report();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.status(), VerdictStatus::Fail);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.reason(),
            "1 of 2 scenarios failed (1 unexpected status)"
        );
    }

    #[test]
    fn teardown_failures_do_not_fail_run() {
        let mut report = sample_report();
        report.outcomes.remove(1);
        assert_eq!(report.status(), VerdictStatus::Pass);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.teardown_failures.len(), 1);
    }

    #[test]
    fn empty_run_is_tool_error() {
        let report = RunReport::new("http://localhost");
        assert_eq!(report.status(), VerdictStatus::Fail);
        assert_eq!(report.exit_code(), 3);
        assert_eq!(report.reason(), "No scenarios were run");
    }

    #[test]
    fn terminal_rendering() {
        insta::assert_snapshot!(sample_report().to_terminal().trim_end(), @r"
        PetStore API Automated Test Report
        ==================================
        Target: https://petstore.swagger.io/v2

        PASS pet::lifecycle (231.52 ms)
        FAIL user::duplicate_rejected (1.02 s)
             [unexpected status] unexpected status for POST /v2/user: expected 4xx, got 200

        Teardown failures (1):
          pet 4242 (from pet::update[sold]): status 500

        FAIL: 1 of 2 scenarios failed (1 unexpected status)
          Scenarios: 2 total, 1 passed, 1 failed
          Duration: 1.50 s
        ");
    }

    #[test]
    fn failure_record_from_error() {
        let err = CheckError::Transport {
            operation: "GET /v2/store/inventory".into(),
            message: "connection refused".into(),
        };
        let record = FailureRecord::from(&err);
        assert_eq!(record.kind, FailureKind::Transport);
        assert!(record.message.contains("connection refused"));
    }

    #[test]
    fn json_roundtrip_keeps_title() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, REPORT_TITLE);
        assert_eq!(parsed.outcomes.len(), 2);
        assert_eq!(parsed.teardown_failures, sample_report().teardown_failures);
    }

    #[test]
    fn generated_schema_names_report() {
        let schema = generate_schema();
        let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(
            parsed.get("title").and_then(|v| v.as_str()),
            Some("RunReport")
        );
    }
}
