use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Neutral,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    #[default]
    Short,
    Medium,
    Long,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Friendly, Tone::Neutral, Tone::Formal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Neutral => "neutral",
            Tone::Formal => "formal",
        }
    }
}

impl Length {
    pub const ALL: [Length; 3] = [Length::Short, Length::Medium, Length::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidOption {
                field: "tone",
                value: s.to_string(),
                expected: "friendly, neutral, formal",
            })
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Length::ALL
            .into_iter()
            .find(|length| length.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidOption {
                field: "length",
                value: s.to_string(),
                expected: "short, medium, long",
            })
    }
}

/// Options sent alongside the query. Keys other than `tone` and `length`
/// are forwarded to the backend as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub length: Length,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationOptions {
    pub fn new(tone: Tone, length: Length) -> Self {
        Self {
            tone,
            length,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub query: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            query: query.into(),
            options,
        }
    }
}

/// Whatever JSON the backend answered with. Only `output` has meaning for
/// display; the rest is shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationResponse(Value);

impl GenerationResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_body(self) -> Value {
        self.0
    }

    pub fn output(&self) -> Option<&str> {
        self.0.get("output").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// Number of context documents the backend reports having retrieved.
    pub fn retrieved(&self) -> Option<u64> {
        self.0.pointer("/meta/retrieved").and_then(Value::as_u64)
    }

    /// Error detail from a rejected request (e.g. a bad API key).
    pub fn detail(&self) -> Option<&str> {
        self.0.get("detail").and_then(Value::as_str)
    }

    /// Text to render: a non-empty `output` string, otherwise the compact
    /// JSON of the whole body in the order the server sent it.
    pub fn display_text(&self) -> String {
        match self.output() {
            Some(output) if !output.is_empty() => output.to_string(),
            _ => self.0.to_string(),
        }
    }
}

impl From<Value> for GenerationResponse {
    fn from(body: Value) -> Self {
        Self(body)
    }
}
