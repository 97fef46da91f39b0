//! Scalar payload and source position types shared by nodes and errors.
//!
//! These types live apart from the node catalogue so that the error module can
//! refer to positions without depending on the tree structure.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Value
// ============================================================================

/// Literal payload carried by a node.
///
/// Constants carry their literal value; variable references carry their symbol
/// name as a [`Value::Str`]; operator children carry the operator spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

// ============================================================================
// Position
// ============================================================================

/// A source range attached to a node for diagnostics.
///
/// Lines and columns are as reported by the translator that produced the
/// node. Positions order by first line, first column, last line, last column,
/// with the URL as a final tie-breaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub first_line: u32,
    pub first_col: u32,
    pub last_line: u32,
    pub last_col: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Position {
    /// Create a position without a URL.
    pub fn new(first_line: u32, first_col: u32, last_line: u32, last_col: u32) -> Self {
        Position {
            first_line,
            first_col,
            last_line,
            last_col,
            url: None,
        }
    }

    /// Attach the URL of the source file.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first_line
            .cmp(&other.first_line)
            .then(self.first_col.cmp(&other.first_col))
            .then(self.last_line.cmp(&other.last_line))
            .then(self.last_col.cmp(&other.last_col))
            .then_with(|| self.url.cmp(&other.url))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] -> [{}:{}]",
            self.first_line, self.first_col, self.last_line, self.last_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = Position::new(3, 4, 5, 10);
        assert_eq!(pos.to_string(), "[3:4] -> [5:10]");
    }

    #[test]
    fn test_position_ordering() {
        let a = Position::new(1, 5, 1, 9);
        let b = Position::new(1, 7, 1, 8);
        let c = Position::new(2, 0, 2, 1);
        let mut positions = vec![c.clone(), b.clone(), a.clone()];
        positions.sort();
        assert_eq!(positions, vec![a, b, c]);
    }

    #[test]
    fn test_position_url_participates_in_equality() {
        let a = Position::new(1, 1, 1, 2).with_url("file:///a.js");
        let b = Position::new(1, 1, 1, 2).with_url("file:///b.js");
        assert_ne!(a, b);
        assert_eq!(a, Position::new(1, 1, 1, 2).with_url("file:///a.js"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::from(1), Value::from("a")]).unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
    }
}
