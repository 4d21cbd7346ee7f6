use serde::{Deserialize, Serialize};
use std::fmt;

/// A play code the grammar could not match.
///
/// This is data, not a fault: the event keeps it for display and the game
/// carries on without reducing that play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// The original play code
    pub input: String,
    /// 1-based column of the furthest point the grammar reached
    pub column: usize,
    /// Expectations active at that column, in the order the grammar tried them
    pub expected: Vec<String>,
}

impl ParseFailure {
    pub fn new(input: &str, column: usize, expected: Vec<String>) -> Self {
        Self {
            input: input.to_string(),
            column,
            expected,
        }
    }

    /// The input with a caret under the failing column, for inline display.
    pub fn pointer(&self) -> String {
        format!("{}\n{}^", self.input, " ".repeat(self.column.saturating_sub(1)))
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cannot parse `{}` at column {}: expected {}",
            self.input,
            self.column,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for ParseFailure {}
