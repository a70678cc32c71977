//! Core types for the track resolution engine
//!
//! This crate defines the vocabulary shared by the storage and engine layers:
//! - Identifier newtypes ([`ids`])
//! - The canonical error type ([`error`])
//! - Argument values attached to track rows ([`value`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod value;

pub use error::{Result, TrackError};
pub use ids::{ProcessHandle, SequenceId, StringId, ThreadHandle, TrackRowId, TrackUuid};
pub use value::ArgValue;
