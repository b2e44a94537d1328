//! Hook event payload as delivered on stdin by the agent tool-chain.
//!
//! Only `tool_name` is inspected; every other field is kept verbatim so it
//! can be copied into the execution log.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookPayload(Map<String, Value>);

impl HookPayload {
    /// Parse a payload. Anything other than a JSON object is rejected.
    pub fn parse(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.0.get("tool_name").and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}
