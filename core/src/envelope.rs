//! The `{ success, errorMsg?, errors? }` envelope every CRM response is
//! wrapped in, and the gate each response has to pass before its payload is
//! read.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Which status codes count as an answered request.
///
/// Both policies additionally require `success: true` in the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status in `200..300`.
    #[default]
    SuccessRange,
    /// Exactly `200`; `201` and friends are rejected.
    OkOnly,
}

impl StatusPolicy {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusPolicy::SuccessRange => (200..300).contains(&status),
            StatusPolicy::OkOnly => status == 200,
        }
    }
}

/// Outer object of every response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: Option<String>,
    /// Field-level error detail. Arrives as a map or a list depending on the
    /// endpoint, so it is kept untyped.
    #[serde(default)]
    pub errors: Option<Value>,
}

impl Envelope {
    /// Human-readable summary of `errorMsg` and `errors`, if there is any.
    pub fn describe(&self) -> Option<String> {
        let detail = self
            .errors
            .as_ref()
            .filter(|e| !e.is_null())
            .map(Value::to_string);
        match (self.error_msg.as_deref(), detail) {
            (Some(msg), Some(detail)) => Some(format!("{msg} {detail}")),
            (Some(msg), None) => Some(msg.to_string()),
            (None, Some(detail)) => Some(detail),
            (None, None) => None,
        }
    }
}

/// Decide whether `(status, envelope)` is a success.
pub fn check(status: u16, envelope: &Envelope, policy: StatusPolicy) -> Result<(), ApiError> {
    if !policy.accepts(status) {
        let message = if envelope.success {
            None
        } else {
            envelope.describe()
        };
        return Err(ApiError::Http { status, message });
    }
    if !envelope.success {
        return Err(ApiError::Envelope {
            status,
            body: envelope
                .describe()
                .unwrap_or_else(|| "success: false".to_string()),
        });
    }
    Ok(())
}

/// Validate a raw response and decode its payload into `T`.
///
/// `T` is decoded from the whole body, so wire structs simply name the
/// payload field they need next to the envelope fields they ignore. Both
/// passes read the body text directly, so keyed collections reach the
/// payload decoder in document order.
pub fn parse<T: DeserializeOwned>(response: &HttpResponse, policy: StatusPolicy) -> Result<T, ApiError> {
    let envelope: Envelope = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !policy.accepts(response.status) => {
            return Err(ApiError::Http {
                status: response.status,
                message: None,
            });
        }
        Err(e) => return Err(ApiError::Deserialization(e.to_string())),
    };

    match check(response.status, &envelope, policy) {
        Ok(()) => {}
        // The 200-only rule reports the whole body, not just the error fields.
        Err(ApiError::Envelope { status, .. }) if policy == StatusPolicy::OkOnly => {
            return Err(ApiError::Envelope {
                status,
                body: response.body.trim().to_string(),
            });
        }
        Err(err) => return Err(err),
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
