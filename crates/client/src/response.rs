//! Response and error mapping.
//!
//! Turns a raw HTTP response into either a success value or an [`Error::Api`]
//! with a stable message and code. The mapping never retries and never logs;
//! both are caller concerns.
//!
//! ## Error body shapes
//!
//! Clusters of different vintages report errors differently, so the mapper
//! derives message and code from whatever shape arrives:
//!
//! | body | message | code |
//! |------|---------|------|
//! | plain string | the body | HTTP status |
//! | mapping, string `error` | `message` field, else status text | HTTP status |
//! | mapping, non-string `error` | `message` field, else status text | the `error` value |
//! | absent / unparseable | canonical status text | HTTP status |

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{Error, ErrorCode};

/// A decoded HTTP response body.
///
/// Whether a body is JSON-decoded follows the request's `parse_json` flag,
/// with a fallback: a 2xx body that was expected to be JSON but does not
/// parse is handed over as text instead of failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// A JSON-decoded body.
    Json(Value),
    /// A body passed through verbatim.
    Text(String),
}

impl ResponseValue {
    /// The body as a JSON value; text bodies become JSON strings.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// The body as text; JSON strings are unquoted, other JSON values are
    /// rendered compactly.
    pub fn into_text(self) -> String {
        match self {
            Self::Json(Value::String(s)) => s,
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Raw material of the mapper: status and body, transport already done.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

/// Maps a raw response to a success value or a normalized API error.
pub(crate) fn map_response(raw: RawResponse, parse_json: bool) -> Result<ResponseValue, Error> {
    if raw.status >= 400 {
        return Err(map_error(raw));
    }

    // An empty or 204 body resolves to an empty-string sentinel, never to an
    // absent value, so callers can assert on "something came back".
    if raw.body.is_empty() {
        return Ok(if parse_json {
            ResponseValue::Json(Value::String(String::new()))
        } else {
            ResponseValue::Text(String::new())
        });
    }

    if parse_json {
        if let Ok(value) = serde_json::from_slice::<Value>(&raw.body) {
            return Ok(ResponseValue::Json(value));
        }
    }
    Ok(ResponseValue::Text(
        String::from_utf8_lossy(&raw.body).into_owned(),
    ))
}

/// Normalizes an HTTP >= 400 response into an [`Error::Api`].
fn map_error(raw: RawResponse) -> Error {
    let status = raw.status;
    let parsed = serde_json::from_slice::<Value>(&raw.body).ok();

    let (message, code) = match parsed {
        Some(Value::String(s)) => (s, ErrorCode::Status(status)),
        Some(Value::Object(map)) => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status_text(status));
            let code = match map.get("error") {
                Some(value) if !value.is_string() => ErrorCode::Value(value.clone()),
                _ => ErrorCode::Status(status),
            };
            (message, code)
        }
        _ => {
            let text = String::from_utf8_lossy(&raw.body);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                (status_text(status), ErrorCode::Status(status))
            } else {
                (text.into_owned(), ErrorCode::Status(status))
            }
        }
    };

    Error::Api { message, code }
}

/// Canonical reason phrase for an HTTP status code.
fn status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
        .to_string()
}
