// VMS response types and the loose-JSON reader
//
// The VMS emits JSON with comments and trailing commas, so bodies are
// normalized before they reach serde_json.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Error code the VMS reports when the `sid` is unknown or expired.
pub const NO_SESSION: &str = "no session";

// ── Channel ──────────────────────────────────────────────────────────

/// A channel (camera) as listed by the `channels` method.
///
/// Only `guid` and `name` are modelled explicitly. Stream presence flags
/// (`have_mainstream`, `have_substream`, ...) and everything else land in
/// `extra` so any configured stream name can be looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub guid: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Channel {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Set a raw attribute, e.g. `with_flag("have_substream", "1")`.
    pub fn with_flag(mut self, key: &str, value: &str) -> Self {
        self.extra.insert(key.to_owned(), Value::String(value.to_owned()));
        self
    }

    /// Whether the VMS advertises the given stream (`main`, `sub`, ...).
    ///
    /// Presence is the literal string `"1"` in `have_<stream>stream`; any
    /// other value, a non-string, or a missing key means absent.
    pub fn has_stream(&self, stream: &str) -> bool {
        self.extra
            .get(&format!("have_{stream}stream"))
            .and_then(Value::as_str)
            == Some("1")
    }

    pub fn has_mainstream(&self) -> bool {
        self.has_stream("main")
    }
}

/// Payload of the `channels` method.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelList {
    pub channels: Vec<Channel>,
}

/// Payload of the `get_video` method.
#[derive(Debug, Deserialize)]
pub(crate) struct VideoToken {
    pub token: String,
}

// ── Envelope helpers ─────────────────────────────────────────────────

/// `success` is a success unless it is explicitly `0` (or `false`).
pub(crate) fn response_succeeded(body: &Value) -> bool {
    match body.get("success") {
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        Some(Value::Bool(b)) => *b,
        _ => true,
    }
}

pub(crate) fn error_code(body: &Value) -> &str {
    body.get("error_code").and_then(Value::as_str).unwrap_or("")
}

// ── Loose JSON ───────────────────────────────────────────────────────

/// Parse a VMS body that may contain `//` or `/* */` comments and
/// trailing commas.
pub fn parse_loose(body: &str) -> Result<Value, Error> {
    let cleaned = strip_trailing_commas(&strip_comments(body));
    serde_json::from_str(&cleaned).map_err(|e| Error::deserialization(e, body))
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars.iter().skip(i + 1).find(|n| !n.is_whitespace());
            if matches!(next, Some(']' | '}')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}
