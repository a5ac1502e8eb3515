//! Uniform result of one HTTP call

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CheckError;

/// Response envelope returned by every client operation.
///
/// The client never interprets the status; assertions read it from here.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Decoded JSON body, `None` when empty or not JSON
    pub body: Option<Value>,
    /// Raw body text
    pub text: String,
    pub elapsed: Duration,
}

impl Envelope {
    /// Assemble an envelope from raw response parts, decoding the body when it is JSON.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        headers: HashMap<String, String>,
        text: String,
        elapsed: Duration,
    ) -> Self {
        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        Self {
            method: method.into(),
            url: url.into(),
            status,
            headers,
            body,
            text,
            elapsed,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `"POST /v2/pet"`: method plus URL path, without scheme, host or query.
    #[must_use]
    pub fn operation(&self) -> String {
        let without_scheme = self.url.split("://").nth(1).unwrap_or(&self.url);
        let path = without_scheme
            .find('/')
            .map_or("/", |i| &without_scheme[i..]);
        let path = path.split('?').next().unwrap_or(path);
        format!("{} {path}", self.method)
    }

    /// Top-level field of an object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(name))
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Deserialize the JSON body into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingBody`] when the body is empty or not JSON,
    /// [`CheckError::Decode`] when it does not fit `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CheckError> {
        let body = self.body.clone().ok_or_else(|| CheckError::MissingBody {
            operation: self.operation(),
        })?;
        serde_json::from_value(body).map_err(|e| CheckError::Decode {
            operation: self.operation(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pet, PetStatus};

    fn envelope(status: u16, text: &str) -> Envelope {
        Envelope::new(
            "GET",
            "https://petstore.swagger.io/v2/pet/findByStatus?status=sold",
            status,
            HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            text.to_string(),
            Duration::from_millis(12),
        )
    }

    #[test]
    fn decodes_json_body() {
        let env = envelope(200, r#"{"id": 3, "status": "sold"}"#);
        assert_eq!(env.field("id"), Some(&serde_json::json!(3)));
        assert!(env.is_success());
    }

    #[test]
    fn non_json_body_kept_as_text() {
        let env = envelope(404, "Pet not found");
        assert_eq!(env.body, None);
        assert_eq!(env.text, "Pet not found");
        assert!(!env.is_success());
    }

    #[test]
    fn empty_body_is_none() {
        assert_eq!(envelope(200, "  ").body, None);
    }

    #[test]
    fn operation_label_strips_host_and_query() {
        assert_eq!(envelope(200, "").operation(), "GET /v2/pet/findByStatus");
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(
            envelope(200, "").header("content-type"),
            Some("application/json")
        );
    }

    #[test]
    fn decode_typed_pet() {
        let env = envelope(
            200,
            r#"{"id":124,"name":"TestPet","category":{"id":2,"name":"Cats"},"status":"pending"}"#,
        );
        let pet: Pet = env.decode().unwrap();
        assert_eq!(pet.status, PetStatus::Pending);
    }

    #[test]
    fn decode_without_body_fails() {
        let err = envelope(200, "").decode::<Pet>().unwrap_err();
        assert!(matches!(err, CheckError::MissingBody { .. }));
    }
}
