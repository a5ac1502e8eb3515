//! Response assertions
//!
//! No I/O. Each check inspects an [`Envelope`] and either passes or names
//! what was expected against what arrived.

use std::time::Duration;

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::CheckError;
use crate::schema::Schema;

/// Status must equal `expected`.
///
/// # Errors
///
/// [`CheckError::UnexpectedStatus`] otherwise.
pub fn expect_status(resp: &Envelope, expected: u16) -> Result<(), CheckError> {
    if resp.status == expected {
        Ok(())
    } else {
        Err(unexpected(resp, expected.to_string()))
    }
}

/// Status must be one of `allowed`.
///
/// # Errors
///
/// [`CheckError::UnexpectedStatus`] otherwise.
pub fn expect_status_in(resp: &Envelope, allowed: &[u16]) -> Result<(), CheckError> {
    if allowed.contains(&resp.status) {
        tracing::debug!("{} returned {}", resp.operation(), resp.status);
        Ok(())
    } else {
        let list: Vec<String> = allowed.iter().map(u16::to_string).collect();
        Err(unexpected(resp, format!("one of [{}]", list.join(", "))))
    }
}

/// Status must be a 4xx client error.
///
/// # Errors
///
/// [`CheckError::UnexpectedStatus`] otherwise.
pub fn expect_client_error(resp: &Envelope) -> Result<(), CheckError> {
    if (400..500).contains(&resp.status) {
        tracing::debug!("{} returned client error {}", resp.operation(), resp.status);
        Ok(())
    } else {
        Err(unexpected(resp, "4xx".to_string()))
    }
}

/// Status must show the resource is absent: 404, or a 2xx no-op.
///
/// # Errors
///
/// [`CheckError::UnexpectedStatus`] otherwise.
pub fn expect_gone(resp: &Envelope) -> Result<(), CheckError> {
    if resp.is_success() || resp.status == 404 {
        tracing::debug!("{} returned {}, resource absent", resp.operation(), resp.status);
        Ok(())
    } else {
        Err(unexpected(resp, "2xx or 404".to_string()))
    }
}

fn unexpected(resp: &Envelope, expected: String) -> CheckError {
    CheckError::UnexpectedStatus {
        operation: resp.operation(),
        expected,
        actual: resp.status,
    }
}

/// Body must be JSON matching `schema`.
///
/// # Errors
///
/// [`CheckError::MissingBody`] for empty or non-JSON bodies,
/// [`CheckError::SchemaViolation`] for the first mismatch.
pub fn expect_schema(resp: &Envelope, schema: &Schema) -> Result<(), CheckError> {
    let body = resp.body.as_ref().ok_or_else(|| CheckError::MissingBody {
        operation: resp.operation(),
    })?;
    schema.validate(body)?;
    tracing::debug!("{} body matches schema", resp.operation());
    Ok(())
}

/// Top-level body field must equal `expected` exactly.
///
/// # Errors
///
/// [`CheckError::FieldMismatch`] otherwise; a missing field reads as `null`.
pub fn expect_field(resp: &Envelope, field: &str, expected: impl Into<Value>) -> Result<(), CheckError> {
    let expected = expected.into();
    let actual = resp.field(field).cloned().unwrap_or(Value::Null);
    if actual == expected {
        tracing::debug!("{} field `{field}` is {expected}", resp.operation());
        Ok(())
    } else {
        Err(CheckError::FieldMismatch {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

/// Response must arrive within `limit`.
///
/// # Errors
///
/// [`CheckError::ResponseTimeExceeded`] otherwise.
pub fn expect_response_time(resp: &Envelope, limit: Duration) -> Result<(), CheckError> {
    if resp.elapsed < limit {
        Ok(())
    } else {
        Err(CheckError::ResponseTimeExceeded {
            operation: resp.operation(),
            elapsed_ms: resp.elapsed.as_millis(),
            limit_ms: limit.as_millis(),
        })
    }
}
