//! The `{status, message, data}` wrapper every endpoint responds with.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiError, GENERIC_ERROR_MESSAGE};

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Parse a 2xx body. An empty body (e.g. `204`) counts as success.
    pub fn parse(http_status: u16, body: &str) -> Result<Self, ApiError> {
        if body.trim().is_empty() {
            return Ok(Self {
                status: Some("success".into()),
                message: None,
                data: None,
            });
        }
        let envelope: Envelope = serde_json::from_str(body)?;
        match envelope.status.as_deref() {
            None | Some("success") => Ok(envelope),
            Some(_) => Err(ApiError::Server {
                status: http_status,
                message: envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            }),
        }
    }

    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self.data {
            Some(Value::Null) | None => Err(ApiError::MissingData),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }
}

/// The message to surface for a failed response body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcarbon_core::CommissionTier;

    #[test]
    fn success_envelope_yields_data() {
        let body = r#"{"status":"success","data":[
            {"id":"T1","label":"Starter","minAmount":0,"maxAmount":50000,"order":1}
        ]}"#;
        let envelope = Envelope::parse(200, body).unwrap();
        let tiers: Vec<CommissionTier> = envelope.into_data().unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].label, "Starter");
    }

    #[test]
    fn success_with_message_keeps_message() {
        let body = r#"{"status":"success","message":"Tier created",
            "data":{"id":"T2","label":"Pro","minAmount":50000,"order":2}}"#;
        let envelope = Envelope::parse(201, body).unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Tier created"));
        let tier: CommissionTier = envelope.into_data().unwrap();
        assert_eq!(tier.max_amount, None);
    }

    #[test]
    fn non_success_status_is_server_error() {
        let body = r#"{"status":"error","message":"Tier is in use"}"#;
        let err = Envelope::parse(200, body).unwrap_err();
        let ApiError::Server { status, message } = err else {
            panic!("expected a server error, got {err:?}");
        };
        assert_eq!(status, 200);
        assert_eq!(message, "Tier is in use");
    }

    #[test]
    fn non_success_without_message_uses_fallback() {
        let err = Envelope::parse(200, r#"{"status":"fail"}"#).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn empty_body_is_success_without_data() {
        let envelope = Envelope::parse(204, "").unwrap();
        let data = envelope.into_data::<Value>();
        assert!(matches!(data, Err(ApiError::MissingData)));
    }

    #[test]
    fn null_data_is_missing() {
        let body = r#"{"status":"success","data":null}"#;
        let envelope = Envelope::parse(200, body).unwrap();
        let data = envelope.into_data::<Vec<Value>>();
        assert!(matches!(data, Err(ApiError::MissingData)));
    }

    #[test]
    fn error_message_extraction() {
        let unauthorized = r#"{"message":"Unauthorized"}"#;
        assert_eq!(error_message(unauthorized), "Unauthorized");
        let blank = r#"{"message":"  "}"#;
        assert_eq!(error_message(blank), GENERIC_ERROR_MESSAGE);
        let gateway = "<html>502 Bad Gateway</html>";
        assert_eq!(error_message(gateway), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message(""), GENERIC_ERROR_MESSAGE);
    }
}
