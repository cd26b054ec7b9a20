//! The error payload shared by chat and codegen responses.

use serde_json::{json, Value};

use super::wire::{wire_deserialize, wire_serialize, FromWire, ToWire, WireObject};
use crate::error::{DecodeError, DecodeResult};

/// `type` value used when a decode failure is reported back to the client.
pub const INVALID_REQUEST_ERROR: &str = "invalid_request_error";

/// Error payload.
///
/// Wire format:
/// ```json
/// { "message": "...", "type": null, "code": null, "param": null }
/// ```
/// Only `message` is required; the other keys encode as null when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDto {
    pub message: String,
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub param: Option<String>,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            code: None,
            param: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }
}

impl From<&DecodeError> for ErrorDto {
    fn from(err: &DecodeError) -> Self {
        let dto = ErrorDto::new(err.to_string())
            .with_type(INVALID_REQUEST_ERROR)
            .with_code(err.code());
        match err.param() {
            Some(param) => dto.with_param(param),
            None => dto,
        }
    }
}

impl ToWire for ErrorDto {
    fn to_wire(&self) -> Value {
        json!({
            "message": self.message,
            "type": self.error_type,
            "code": self.code,
            "param": self.param,
        })
    }
}

impl FromWire for ErrorDto {
    const ENTITY: &'static str = "Error";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            message: obj.str("message")?,
            error_type: obj.opt_str("type")?,
            code: obj.opt_str("code")?,
            param: obj.opt_str("param")?,
        })
    }
}

wire_serialize!(ErrorDto);
wire_deserialize!(ErrorDto);
