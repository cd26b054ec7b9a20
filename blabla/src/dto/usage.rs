//! Token usage and user feedback rows.
//!
//! Both use snake_case wire keys, unlike the request envelopes.

use serde_json::{json, Value};

use super::wire::{wire_deserialize, wire_serialize, FromWire, ToWire, WireObject};
use crate::error::DecodeResult;

/// Token accounting for one assistant reply.
///
/// Usage data is attached conditionally by callers, so decode it with
/// [`FromWire::from_wire_opt`]: a missing or empty source gives `None`.
/// Inside serde types, use [`deserialize_opt`](super::wire::deserialize_opt)
/// on the `Option<Usage>` field for the same rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub id: String,
    pub app_id: i64,
    /// Usage recorded before a reply message exists has no message id.
    pub message_id: Option<String>,
    pub conversation_id: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

impl ToWire for Usage {
    fn to_wire(&self) -> Value {
        json!({
            "id": self.id,
            "app_id": self.app_id,
            "message_id": self.message_id,
            "conversation_id": self.conversation_id,
            "prompt_tokens": self.prompt_tokens,
            "completion_tokens": self.completion_tokens,
            "total_tokens": self.total_tokens,
        })
    }
}

impl FromWire for Usage {
    const ENTITY: &'static str = "Usage";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            id: obj.str("id")?,
            app_id: obj.i64("app_id")?,
            message_id: obj.opt_str("message_id")?,
            conversation_id: obj.str("conversation_id")?,
            prompt_tokens: obj.i64("prompt_tokens")?,
            completion_tokens: obj.i64("completion_tokens")?,
            total_tokens: obj.i64("total_tokens")?,
        })
    }
}

/// A user's verdict on one assistant answer. Encode only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFeedbackRow {
    pub username: String,
    pub question: String,
    pub response: String,
    pub useful: i64,
    pub timestamp: String,
    pub version: i64,
    pub assistant: String,
    pub config_type: String,
}

impl ToWire for UserFeedbackRow {
    fn to_wire(&self) -> Value {
        json!({
            "username": self.username,
            "question": self.question,
            "response": self.response,
            "useful": self.useful,
            "timestamp": self.timestamp,
            "version": self.version,
            "assistant": self.assistant,
            "config_type": self.config_type,
        })
    }
}

wire_serialize!(Usage, UserFeedbackRow);
wire_deserialize!(Usage);
