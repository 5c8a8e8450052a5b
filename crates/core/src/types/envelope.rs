//! The content API's response envelope.
//!
//! Most endpoints wrap their payload as `{"success": true, "data": ...}` and
//! report application failures as `{"success": false, "error": "..."}`, even
//! under a 2xx status. Some endpoints answer with a bare JSON value instead.
//! [`Envelope::interpret`] decides which case a decoded body is.

use serde_json::Value;

/// What a successfully decoded 2xx body means.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The payload to hand to the caller: `data` for enveloped bodies, the
    /// whole body otherwise.
    Payload(Value),
    /// `success` was `false`.
    Rejected(EnvelopeRejection),
}

/// An enveloped failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeRejection {
    /// The envelope's `error` string, when it carried one.
    pub message: Option<String>,
}

impl Envelope {
    /// Classify a decoded body.
    ///
    /// Only an object with a `success` key is treated as an envelope, and only
    /// a literal `false` counts as failure. An envelope without `data` yields
    /// `null`.
    #[must_use]
    pub fn interpret(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self::Payload(body);
        };
        match map.get("success") {
            None => Self::Payload(Value::Object(map)),
            Some(Value::Bool(false)) => Self::Rejected(EnvelopeRejection {
                message: string_field(&Value::Object(map), "error"),
            }),
            Some(_) => Self::Payload(map.remove("data").unwrap_or(Value::Null)),
        }
    }
}

/// A non-empty string field of a JSON object.
#[must_use]
pub fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
