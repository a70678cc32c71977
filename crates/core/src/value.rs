//! Argument values attached to track rows.
//!
//! Provenance and other per-row metadata are stored as typed key/value
//! arguments. Text values hold a [`StringId`] rather than an owned string so
//! the argument store stays compact and comparisons stay cheap.

use serde::{Deserialize, Serialize};

use crate::ids::StringId;

/// A single argument value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// 64-bit signed integer
    Integer(i64),
    /// Interned string
    Text(StringId),
    /// Boolean
    Bool(bool),
    /// 64-bit IEEE-754 floating point
    Real(f64),
}

impl ArgValue {
    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Integer(_) => "Integer",
            ArgValue::Text(_) => "Text",
            ArgValue::Bool(_) => "Bool",
            ArgValue::Real(_) => "Real",
        }
    }

    /// Try to get as i64
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as an interned string handle
    pub fn as_text(&self) -> Option<StringId> {
        match self {
            ArgValue::Text(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ArgValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Integer(v)
    }
}

impl From<StringId> for ArgValue {
    fn from(id: StringId) -> Self {
        ArgValue::Text(id)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<f64> for ArgValue {
    fn from(r: f64) -> Self {
        ArgValue::Real(r)
    }
}
