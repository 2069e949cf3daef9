//! Flag values.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("Invalid number regex")
});

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+$").expect("Invalid hex regex"));

/// The value of a parsed flag.
///
/// Serializes untagged, so `--port 8080 --name x --verbose` renders as
/// `{"port": 8080.0, "name": "x", "verbose": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag (`--verbose`, `--no-color`).
    Bool(bool),
    /// A numeric value (`--port 8080`, `-n5`).
    Number(f64),
    /// Any other value.
    String(String),
    /// A flag given more than once.
    List(Vec<Value>),
}

impl Value {
    /// Converts a raw token, turning numeric-looking text into a number.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if NUMBER.is_match(token) {
            if let Ok(n) = token.parse::<f64>() {
                return Self::Number(n);
            }
        }
        if HEX.is_match(token) {
            if let Ok(n) = i64::from_str_radix(&token[2..], 16) {
                #[allow(clippy::cast_precision_loss)]
                return Self::Number(n as f64);
            }
        }
        Self::String(token.to_string())
    }

    /// Returns `true` if the token would be read as a number.
    #[must_use]
    pub fn is_numeric(token: &str) -> bool {
        NUMBER.is_match(token) || HEX.is_match(token)
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the accumulated values of a repeated flag.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Whether the value counts as "set" for boolean-style checks.
    ///
    /// `false`, `0`, the empty string and an empty list are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(values) => !values.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
