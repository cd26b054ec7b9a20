//! Code-generation request/response DTOs.

use serde_json::{json, Value};
use uuid::Uuid;

use super::common::ErrorDto;
use super::wire::{
    optional_to_wire, wire_deserialize, wire_serialize, FromWire, ToWire, WireObject,
};
use crate::error::DecodeResult;

/// Where generated code should be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenExec {
    pub lang_name: String,
    pub lang_version: String,
}

impl CodegenExec {
    pub fn new(lang_name: impl Into<String>, lang_version: impl Into<String>) -> Self {
        Self {
            lang_name: lang_name.into(),
            lang_version: lang_version.into(),
        }
    }
}

impl ToWire for CodegenExec {
    fn to_wire(&self) -> Value {
        json!({
            "langName": self.lang_name,
            "langVersion": self.lang_version,
        })
    }
}

impl FromWire for CodegenExec {
    const ENTITY: &'static str = "CodegenExec";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            lang_name: obj.str("langName")?,
            lang_version: obj.str("langVersion")?,
        })
    }
}

/// Request body for a code-generation call.
///
/// Wire format:
/// ```json
/// {
///   "appId": 3, "departmentId": "550e8400-...",
///   "prompt": "...", "lang": "python", "purpose": "...",
///   "codegenExec": { "langName": "python", "langVersion": "3.11" }
/// }
/// ```
/// `codegenExec` may be missing or null, in which case the code is only generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenPost {
    pub app_id: i64,
    pub department_id: Uuid,
    pub prompt: String,
    pub lang: String,
    pub purpose: String,
    pub codegen_exec: Option<CodegenExec>,
}

impl ToWire for CodegenPost {
    fn to_wire(&self) -> Value {
        json!({
            "appId": self.app_id,
            "departmentId": self.department_id.to_string(),
            "prompt": self.prompt,
            "lang": self.lang,
            "purpose": self.purpose,
            "codegenExec": optional_to_wire(self.codegen_exec.as_ref()),
        })
    }
}

impl FromWire for CodegenPost {
    const ENTITY: &'static str = "CodegenPost";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            app_id: obj.i64("appId")?,
            department_id: obj.uuid("departmentId")?,
            prompt: obj.str("prompt")?,
            lang: obj.str("lang")?,
            purpose: obj.str("purpose")?,
            codegen_exec: obj.opt_nested("codegenExec")?,
        })
    }
}

/// Result of a code-generation call. `err` travels under the `error` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenResponse {
    pub generated_code: String,
    pub lang: String,
    pub exec_status: String,
    pub err: Option<ErrorDto>,
}

impl ToWire for CodegenResponse {
    fn to_wire(&self) -> Value {
        json!({
            "generatedCode": self.generated_code,
            "lang": self.lang,
            "error": optional_to_wire(self.err.as_ref()),
            "execStatus": self.exec_status,
        })
    }
}

impl FromWire for CodegenResponse {
    const ENTITY: &'static str = "CodegenResponse";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            generated_code: obj.str("generatedCode")?,
            lang: obj.str("lang")?,
            exec_status: obj.str("execStatus")?,
            err: obj.opt_nested("error")?,
        })
    }
}

wire_serialize!(CodegenExec, CodegenPost, CodegenResponse);
wire_deserialize!(CodegenExec, CodegenPost, CodegenResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use pretty_assertions::assert_eq;

    fn post_json() -> Value {
        json!({
            "appId": 3,
            "departmentId": "6f1c2a34-9b7e-4d2f-8a61-0c3e5b7d9f21",
            "prompt": "Sum the invoice totals per month",
            "lang": "python",
            "purpose": "reporting"
        })
    }

    #[test]
    fn missing_exec_decodes_as_none() {
        let post = CodegenPost::from_wire(&post_json()).unwrap();
        assert_eq!(post.codegen_exec, None);
        assert_eq!(post.app_id, 3);
    }

    #[test]
    fn null_exec_decodes_as_none() {
        let mut wire = post_json();
        wire["codegenExec"] = Value::Null;
        assert_eq!(CodegenPost::from_wire(&wire).unwrap().codegen_exec, None);
    }

    #[test]
    fn present_exec_decodes_recursively() {
        let mut wire = post_json();
        wire["codegenExec"] = json!({"langName": "py", "langVersion": "3.11"});
        let post = CodegenPost::from_wire(&wire).unwrap();
        assert_eq!(post.codegen_exec, Some(CodegenExec::new("py", "3.11")));
    }

    #[test]
    fn incomplete_exec_fails() {
        let mut wire = post_json();
        wire["codegenExec"] = json!({"langName": "py"});
        let err = CodegenPost::from_wire(&wire).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingKey {
                entity: "CodegenExec",
                key: "langVersion"
            }
        ));
    }

    #[test]
    fn post_roundtrips_with_and_without_exec() {
        let mut post = CodegenPost::from_wire(&post_json()).unwrap();
        assert_eq!(CodegenPost::from_wire(&post.to_wire()).unwrap(), post);

        post.codegen_exec = Some(CodegenExec::new("python", "3.12"));
        assert_eq!(CodegenPost::from_wire(&post.to_wire()).unwrap(), post);
    }

    #[test]
    fn response_encodes_error_key() {
        let resp = CodegenResponse {
            generated_code: "print(1)".to_string(),
            lang: "python".to_string(),
            exec_status: "skipped".to_string(),
            err: None,
        };
        let wire = resp.to_wire();
        assert_eq!(wire["error"], Value::Null);
        assert_eq!(wire["generatedCode"], json!("print(1)"));
        assert_eq!(wire["execStatus"], json!("skipped"));
        assert_eq!(CodegenResponse::from_wire(&wire).unwrap(), resp);
    }

    #[test]
    fn response_roundtrips_with_error() {
        let resp = CodegenResponse {
            generated_code: String::new(),
            lang: "python".to_string(),
            exec_status: "failed".to_string(),
            err: Some(ErrorDto::new("sandbox timeout").with_code("timeout")),
        };
        assert_eq!(CodegenResponse::from_wire(&resp.to_wire()).unwrap(), resp);
    }
}
