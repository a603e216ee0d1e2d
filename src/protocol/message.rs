//! Handshake and command message types.
//!
//! # Format
//!
//! Handshake request (client → server):
//!
//! ```json
//! { "command": "hello", "protocols": ["http://livereload.com/protocols/official-7"] }
//! ```
//!
//! Command (server → client):
//!
//! ```json
//! { "command": "reload", "path": "style.css", "liveCSS": true }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// The only protocol this client speaks.
pub const PROTOCOL_OFFICIAL_7: &str = "http://livereload.com/protocols/official-7";

/// Handshake command name.
pub const COMMAND_HELLO: &str = "hello";

/// Reload command name.
pub const COMMAND_RELOAD: &str = "reload";

// ============================================================================
// Hello
// ============================================================================

/// Handshake request sent once the socket opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hello {
    /// Always `"hello"`.
    pub command: &'static str,
    /// Supported protocol identifiers.
    pub protocols: Vec<&'static str>,
}

impl Hello {
    /// Creates the handshake request advertising [`PROTOCOL_OFFICIAL_7`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            command: COMMAND_HELLO,
            protocols: vec![PROTOCOL_OFFICIAL_7],
        }
    }

    /// Serializes the request as a compact JSON frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for Hello {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Message
// ============================================================================

/// A parsed inbound frame.
///
/// `body` holds the complete JSON object, including the `command` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Value of the `command` field when it is a non-empty string.
    pub command: Option<String>,
    /// The full decoded object.
    pub body: Map<String, Value>,
}

impl Message {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the frame is not valid JSON
    /// - [`Error::Protocol`] if the frame is not a JSON object
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(body) => {
                let command = body
                    .get("command")
                    .and_then(Value::as_str)
                    .filter(|command| !command.is_empty())
                    .map(str::to_owned);
                Ok(Self { command, body })
            }
            other => Err(Error::protocol(format!(
                "expected JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns the command name, if any.
    #[inline]
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Returns a field of the message.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Returns a string field of the message.
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// Returns the `protocols` list when present and an array.
    #[must_use]
    pub fn protocols(&self) -> Option<&Vec<Value>> {
        self.body.get("protocols").and_then(Value::as_array)
    }

    /// Returns `true` if this is a handshake reply the client can accept.
    ///
    /// The command must be `hello` and `protocols` must be a list containing
    /// [`PROTOCOL_OFFICIAL_7`].
    #[must_use]
    pub fn is_handshake_reply(&self) -> bool {
        self.command() == Some(COMMAND_HELLO)
            && self.protocols().is_some_and(|protocols| {
                protocols
                    .iter()
                    .any(|p| p.as_str() == Some(PROTOCOL_OFFICIAL_7))
            })
    }

    /// Returns the typed reload view if this is a well-formed `reload` command.
    #[must_use]
    pub fn as_reload(&self) -> Option<ReloadCommand> {
        if self.command() != Some(COMMAND_RELOAD) {
            return None;
        }
        serde_json::from_value(Value::Object(self.body.clone())).ok()
    }

    /// Consumes the message and returns the JSON object.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}

// ============================================================================
// ReloadCommand
// ============================================================================

/// Typed view of a `reload` command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReloadCommand {
    /// Changed file path as reported by the server.
    pub path: String,

    /// Whether stylesheets may be swapped without a full reload.
    #[serde(rename = "liveCSS", default = "default_true")]
    pub live_css: bool,

    /// Whether images may be swapped without a full reload.
    #[serde(rename = "liveImg", default = "default_true")]
    pub live_img: bool,

    /// Source file the change originated from, if it differs from `path`.
    #[serde(rename = "originalPath", default)]
    pub original_path: Option<String>,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Helpers
// ============================================================================

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================
