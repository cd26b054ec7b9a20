//! Data transfer objects exchanged with the assistant backend.
//!
//! Every type here encodes to its JSON wire form with [`ToWire`] and, except
//! for [`UserFeedbackRow`], decodes with [`FromWire`]. Each type also
//! implements `serde::Serialize` (and `Deserialize` when decodable) through
//! the same codec, so it can be embedded in other serde types.

pub mod chat;
pub mod codegen;
pub mod common;
pub mod files;
pub mod usage;
pub mod wire;

// Re-export all public types for convenient access via `dto::*`.
pub use chat::*;
pub use codegen::*;
pub use common::*;
pub use files::*;
pub use usage::*;
pub use wire::{FromWire, ToWire, WireObject};
