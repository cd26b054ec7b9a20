//! Chat request/response DTOs.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::common::ErrorDto;
use super::wire::{
    optional_to_wire, timestamp_to_wire, wire_deserialize, wire_serialize, FromWire, ToWire,
    WireObject,
};
use crate::error::{DecodeResult, SegmentError};

/// A single message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message role (e.g. `"user"`, `"assistant"`, `"system"`).
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl ToWire for ChatMessage {
    fn to_wire(&self) -> Value {
        json!({
            "role": self.role,
            "content": self.content,
        })
    }
}

impl FromWire for ChatMessage {
    const ENTITY: &'static str = "ChatMessage";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            role: obj.str("role")?,
            content: obj.str("content")?,
        })
    }
}

/// A conversation and its messages in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConversation {
    pub id: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ToWire for ChatConversation {
    fn to_wire(&self) -> Value {
        json!({
            "id": self.id,
            "created": timestamp_to_wire(&self.created),
            "updated": timestamp_to_wire(&self.updated),
            "messages": self.messages.iter().map(ToWire::to_wire).collect::<Vec<_>>(),
        })
    }
}

impl FromWire for ChatConversation {
    const ENTITY: &'static str = "ChatConversation";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        let messages = obj
            .array("messages")?
            .iter()
            .map(ChatMessage::from_wire)
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(Self {
            id: obj.str("id")?,
            created: obj.timestamp("created")?,
            updated: obj.timestamp("updated")?,
            messages,
        })
    }
}

/// Request envelope for a chat turn.
///
/// Wire format:
/// ```json
/// { "appId": 1, "departmentId": "550e8400-...", "conversation": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPost {
    pub app_id: i64,
    pub department_id: Uuid,
    pub conversation: ChatConversation,
}

impl ToWire for ChatPost {
    fn to_wire(&self) -> Value {
        json!({
            "appId": self.app_id,
            "departmentId": self.department_id.to_string(),
            "conversation": self.conversation.to_wire(),
        })
    }
}

impl FromWire for ChatPost {
    const ENTITY: &'static str = "ChatPost";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            app_id: obj.i64("appId")?,
            department_id: obj.uuid("departmentId")?,
            conversation: obj.nested("conversation")?,
        })
    }
}

/// An assistant reply the user can rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageRated {
    pub id: String,
    pub text: String,
    /// Bounds are a caller convention; 0 means unrated.
    pub rating: i64,
}

impl ChatMessageRated {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            rating: 0,
        }
    }
}

impl ToWire for ChatMessageRated {
    fn to_wire(&self) -> Value {
        json!({
            "id": self.id,
            "text": self.text,
            "rating": self.rating,
        })
    }
}

impl FromWire for ChatMessageRated {
    const ENTITY: &'static str = "ChatMessageRated";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            id: obj.str("id")?,
            text: obj.str("text")?,
            rating: obj.opt_i64("rating")?.unwrap_or(0),
        })
    }
}

/// Response to a [`ChatPost`]. Either side of the pair may be null.
///
/// The `err` field travels under the `error` key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatResponse {
    pub message: Option<ChatMessageRated>,
    pub err: Option<ErrorDto>,
}

impl ChatResponse {
    pub fn ok(message: ChatMessageRated) -> Self {
        Self {
            message: Some(message),
            err: None,
        }
    }

    pub fn failed(err: ErrorDto) -> Self {
        Self {
            message: None,
            err: Some(err),
        }
    }
}

impl ToWire for ChatResponse {
    fn to_wire(&self) -> Value {
        json!({
            "message": optional_to_wire(self.message.as_ref()),
            "error": optional_to_wire(self.err.as_ref()),
        })
    }
}

impl FromWire for ChatResponse {
    const ENTITY: &'static str = "ChatResponse";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            message: obj.opt_nested("message")?,
            err: obj.opt_nested("error")?,
        })
    }
}

/// A piece of streamed response text.
///
/// `response_id` is assigned once, after the segment is created, when the
/// backend knows which response the text belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSegment {
    pub text: String,
    response_id: Option<String>,
}

impl ChatSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            response_id: None,
        }
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    /// Assign the response id. Fails if one is already set or `response_id`
    /// is empty, since an empty id would be left off the wire anyway.
    pub fn set_response_id(&mut self, response_id: impl Into<String>) -> Result<(), SegmentError> {
        if let Some(existing) = &self.response_id {
            return Err(SegmentError::ResponseIdAlreadySet(existing.clone()));
        }
        let response_id = response_id.into();
        if response_id.is_empty() {
            return Err(SegmentError::EmptyResponseId);
        }
        self.response_id = Some(response_id);
        Ok(())
    }
}

impl ToWire for ChatSegment {
    fn to_wire(&self) -> Value {
        let mut map = Map::new();
        map.insert("text".to_string(), Value::String(self.text.clone()));
        // Omitted rather than null when unset.
        if let Some(response_id) = &self.response_id {
            map.insert(
                "response_id".to_string(),
                Value::String(response_id.clone()),
            );
        }
        Value::Object(map)
    }
}

impl FromWire for ChatSegment {
    const ENTITY: &'static str = "ChatSegment";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            text: obj.str("text")?,
            response_id: obj
                .opt_str("response_id")?
                .filter(|response_id| !response_id.is_empty()),
        })
    }
}

wire_serialize!(
    ChatMessage,
    ChatConversation,
    ChatPost,
    ChatMessageRated,
    ChatResponse,
    ChatSegment,
);
wire_deserialize!(
    ChatMessage,
    ChatConversation,
    ChatPost,
    ChatMessageRated,
    ChatResponse,
    ChatSegment,
);
