use anyhow::{Context, Result, bail};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

// ===================================================================
// Lenient field decoding
// ===================================================================
//
// The transcript comes from an external tool and is not validated. Every
// field falls back to its default when it is absent, null, or holds a
// value of the wrong type, so a single odd field never rejects the
// whole document.

/// Decode a field, falling back to `T::default()` on a type mismatch.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode an array of objects. A non-array value yields an empty list;
/// elements that are not objects, or that fail to decode, are dropped.
fn objects_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ===================================================================
// Transcript
// ===================================================================

/// The JSON document emitted by a single non-interactive assistant run.
#[derive(Debug, Deserialize)]
pub struct Transcript {
    /// Final text answer. Empty when absent or null.
    #[serde(default, deserialize_with = "or_default")]
    pub result: String,
    #[serde(default, deserialize_with = "objects_or_empty")]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "or_default")]
    pub role: String,
    /// Plain-string content (user text) decodes as no blocks.
    #[serde(default, deserialize_with = "objects_or_empty")]
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }
}

/// A single entry of `message.content[]`, discriminated by `type`.
/// Only tool invocations are kept; text, thinking and tool results collapse
/// into `Other`, as does a block whose `type` is missing or not a string.
#[derive(Debug)]
pub enum ContentBlock {
    ToolUse(ToolUseBlock),
    Other,
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.get("type").and_then(Value::as_str) != Some("tool_use") {
            return Ok(ContentBlock::Other);
        }
        serde_json::from_value(value)
            .map(ContentBlock::ToolUse)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
pub struct ToolUseBlock {
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    /// Tool-specific parameters; each tool reads only the keys it needs.
    #[serde(default, deserialize_with = "or_default")]
    pub input: Map<String, Value>,
}

impl ToolUseBlock {
    /// A string-valued input parameter, or `None` when absent or not a string.
    pub fn str_input(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(Value::as_str)
    }
}

impl Transcript {
    /// Read and decode a transcript file.
    ///
    /// Fails when the file cannot be read, is not valid JSON, or its
    /// top-level value is not an object.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).context("reading transcript")?;
        let value: Value = serde_json::from_slice(&bytes).context("parsing transcript JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            bail!("expected a JSON object at the top level, found {}", kind_of(&value));
        }
        serde_json::from_value(value).context("decoding transcript")
    }

    /// Tool-use blocks from assistant messages, in document order.
    /// Blocks inside any other role's messages are never yielded.
    pub fn assistant_tool_uses(&self) -> impl Iterator<Item = &ToolUseBlock> + '_ {
        self.messages
            .iter()
            .filter(|msg| msg.is_assistant())
            .flat_map(|msg| msg.content.iter())
            .filter_map(|block| match block {
                ContentBlock::ToolUse(tu) => Some(tu),
                ContentBlock::Other => None,
            })
    }
}
