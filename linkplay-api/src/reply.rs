//! Normalisation of `httpapi.asp` response bodies.

use serde_json::{Map, Value};

/// Loosely typed key/value payload returned by status commands
pub type StatusMap = Map<String, Value>;

/// Key used when a non-structured body is presented as a mapping
pub const RAW_KEY: &str = "raw";

/// A reply from the device that arrived with HTTP 200
///
/// Status commands answer with a JSON object; control commands usually
/// answer with a bare `OK`. Failed or timed-out requests never produce a
/// `Reply` at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Body parsed as a JSON object (an empty body is an empty object)
    Structured(StatusMap),
    /// Non-empty body that is not a JSON object
    Text(String),
}

impl Reply {
    /// Classify a response body
    pub fn from_body(body: &str) -> Self {
        if body.is_empty() {
            return Reply::Structured(StatusMap::new());
        }

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Reply::Structured(map),
            _ => Reply::Text(body.to_string()),
        }
    }

    /// True when the body parsed as a JSON object
    pub fn is_structured(&self) -> bool {
        matches!(self, Reply::Structured(_))
    }

    /// True for a structured reply with at least one key
    pub fn has_fields(&self) -> bool {
        matches!(self, Reply::Structured(map) if !map.is_empty())
    }

    /// The structured payload, if any
    pub fn as_structured(&self) -> Option<&StatusMap> {
        match self {
            Reply::Structured(map) => Some(map),
            Reply::Text(_) => None,
        }
    }

    /// Consume the reply, keeping only a structured payload
    pub fn into_structured(self) -> Option<StatusMap> {
        match self {
            Reply::Structured(map) => Some(map),
            Reply::Text(_) => None,
        }
    }

    /// Render as a mapping; text becomes `{"raw": text}`
    pub fn to_map(&self) -> StatusMap {
        match self {
            Reply::Structured(map) => map.clone(),
            Reply::Text(text) => {
                let mut map = StatusMap::new();
                map.insert(RAW_KEY.to_string(), Value::String(text.clone()));
                map
            }
        }
    }

    /// Body text as the device would have sent it
    pub fn text(&self) -> String {
        match self {
            Reply::Structured(map) => Value::Object(map.clone()).to_string(),
            Reply::Text(text) => text.clone(),
        }
    }

    /// Look up a string field of a structured reply
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.as_structured()?.get(key)?.as_str()
    }

    /// Whether a command acknowledgement reads as success
    ///
    /// This is a loose match: any body containing `ok` in any case passes,
    /// so replies such as `invalid token` or `broken` count as success too.
    pub fn is_ok(&self) -> bool {
        self.text().to_ascii_lowercase().contains("ok")
    }
}
