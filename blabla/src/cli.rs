//! Operations behind the `blabla` command line tool.
//!
//! `main.rs` only parses arguments and does terminal I/O; everything that can
//! be tested without a process lives here.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::dto::{
    ChatConversation, ChatMessage, ChatMessageRated, ChatPost, ChatResponse, ChatSegment,
    CodegenExec, CodegenPost, CodegenResponse, ErrorDto, FromWire, TempFile, TempFileHeader,
    ToWire, Usage,
};
use crate::error::{BlaBlaError, DecodeError, DecodeResult, Result};

/// Every DTO that can be decoded from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    ChatMessage,
    ChatConversation,
    ChatPost,
    Error,
    ChatMessageRated,
    ChatResponse,
    CodegenExec,
    CodegenPost,
    CodegenResponse,
    Usage,
    ChatSegment,
    TempFileHeader,
    TempFile,
}

fn normalize_as<T: FromWire + ToWire>(value: &Value) -> DecodeResult<Value> {
    T::from_wire(value).map(|entity| entity.to_wire())
}

/// Decode `value` as `kind` and return its canonical wire form.
///
/// `Usage` follows its optional-source rule, so an empty source normalizes
/// to null instead of failing.
pub fn normalize(kind: EntityKind, value: &Value) -> DecodeResult<Value> {
    match kind {
        EntityKind::ChatMessage => normalize_as::<ChatMessage>(value),
        EntityKind::ChatConversation => normalize_as::<ChatConversation>(value),
        EntityKind::ChatPost => normalize_as::<ChatPost>(value),
        EntityKind::Error => normalize_as::<ErrorDto>(value),
        EntityKind::ChatMessageRated => normalize_as::<ChatMessageRated>(value),
        EntityKind::ChatResponse => normalize_as::<ChatResponse>(value),
        EntityKind::CodegenExec => normalize_as::<CodegenExec>(value),
        EntityKind::CodegenPost => normalize_as::<CodegenPost>(value),
        EntityKind::CodegenResponse => normalize_as::<CodegenResponse>(value),
        EntityKind::Usage => Ok(Usage::from_wire_opt(Some(value))?
            .map(|usage| usage.to_wire())
            .unwrap_or(Value::Null)),
        EntityKind::ChatSegment => normalize_as::<ChatSegment>(value),
        EntityKind::TempFileHeader => normalize_as::<TempFileHeader>(value),
        EntityKind::TempFile => normalize_as::<TempFile>(value),
    }
}

/// Outcome of `blabla check`: the normalized payload, or the error payload to
/// report back.
pub fn check(kind: EntityKind, input: &str) -> std::result::Result<Value, ErrorDto> {
    let parsed = serde_json::from_str::<Value>(input).map_err(DecodeError::from);
    match parsed.and_then(|value| normalize(kind, &value)) {
        Ok(wire) => Ok(wire),
        Err(err) => {
            tracing::debug!(kind = ?kind, error = %err, "Payload failed to decode");
            Err(ErrorDto::from(&err))
        }
    }
}

/// Read a payload from `path`, or stdin when `path` is `None`, refusing
/// anything over `limit` bytes.
pub fn read_input(path: Option<&Path>, limit: usize) -> Result<String> {
    let mut buf = String::new();
    let take = (limit as u64).saturating_add(1);
    match path {
        Some(path) => {
            fs::File::open(path)?.take(take).read_to_string(&mut buf)?;
        }
        None => {
            std::io::stdin().lock().take(take).read_to_string(&mut buf)?;
        }
    }
    if buf.len() > limit {
        return Err(BlaBlaError::InputTooLarge {
            size: buf.len(),
            limit,
        });
    }
    Ok(buf)
}

/// Build an upload payload from a file on disk.
pub fn pack(path: &Path) -> Result<TempFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(name = %name, length = bytes.len(), "Packed file");
    Ok(TempFile::from_bytes(name, &bytes))
}

/// Decode an upload payload, verify it against its header and write the
/// bytes to `out`. Returns the header of the written file.
pub fn unpack(input: &str, out: &Path) -> Result<TempFileHeader> {
    let file = TempFile::from_json_str(input)?;
    let bytes = file.verify()?;
    fs::write(out, &bytes)?;
    tracing::info!(
        name = %file.header().name,
        length = bytes.len(),
        out = %out.display(),
        "Unpacked file"
    );
    Ok(file.into_header())
}

/// Header view of an upload payload, for `unpack --header-only`.
pub fn header_of(input: &str) -> Result<Value> {
    let file = TempFile::from_json_str(input)?;
    Ok(file.header_wire())
}

pub fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
