pub mod cli;
pub mod config;
pub mod dto;
pub mod error;
pub mod setup;

pub use error::{BlaBlaError, DecodeError, Result};
