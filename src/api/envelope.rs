//! The `{data, errors, status}` envelope every backend endpoint answers with.
//!
//! Transport status and application status are reported independently by the
//! backend, and failed responses sometimes still carry `data: {}`.  Decoding
//! therefore goes through a loosely-typed envelope first and only turns the
//! payload into its concrete type once the response is known to be a success.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FetchError;

/// Closed set of error kinds the backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidJson,
    JsonValidationError,
    UniqueViolationError,
    RecordNotFoundError,
    CookieNotSet,
    CookieNotFound,
    UserAlreadyPresent,
    WrongPassword,
    IncorrectParameters,
    NewsSourceNotFound,
    ServerError,
    /// Any kind this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One problem reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

/// Generic response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<Payload> {
    #[serde(default)]
    pub data: Option<Payload>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    pub status: u16,
}

impl<Payload> ApiResponse<Payload> {
    /// `true` when the envelope carries a payload and nothing went wrong.
    pub fn is_success(&self) -> bool {
        is_success_status(self.status) && self.errors.is_empty() && self.data.is_some()
    }
}

impl ApiResponse<Value> {
    /// Turn a raw envelope into its typed payload.
    ///
    /// `http_status` is the transport-level status, which may disagree with
    /// the envelope's own `status` field.  Both must be 2xx, `errors` must be
    /// empty and `data` must be present; everything else is an application
    /// failure with at least one error attached.
    pub fn into_payload<T: DeserializeOwned>(self, http_status: u16) -> Result<T, FetchError> {
        let ok = is_success_status(http_status) && self.is_success();
        let status = if is_success_status(http_status) {
            self.status
        } else {
            http_status
        };

        match self.data {
            Some(data) if ok => serde_json::from_value(data).map_err(FetchError::Parse),
            _ => {
                let mut errors = self.errors;
                if errors.is_empty() {
                    errors.push(ApiError::new(
                        ErrorKind::ServerError,
                        "response carried no data",
                    ));
                }
                Err(FetchError::Application { status, errors })
            }
        }
    }
}

/// Decode a response body into its payload.
///
/// A failed response whose body is not an envelope (an empty conflict, a
/// proxy's HTML page) still reports its HTTP status as an application error.
pub fn decode<T: DeserializeOwned>(http_status: u16, body: &[u8]) -> Result<T, FetchError> {
    let envelope: ApiResponse<Value> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if !is_success_status(http_status) => {
            return Err(FetchError::Application {
                status: http_status,
                errors: vec![ApiError::new(
                    ErrorKind::ServerError,
                    format!("HTTP {http_status} without a response envelope"),
                )],
            });
        }
        Err(e) => return Err(FetchError::Parse(e)),
    };
    envelope.into_payload(http_status)
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
