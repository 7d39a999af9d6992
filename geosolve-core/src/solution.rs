use serde::{Deserialize, Serialize};
use std::fmt;
use crate::intent::Intent;

/// The answer to a query: a single value, or the list of solutions of an equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Solution {
    Single(String),
    List(Vec<String>),
}

impl fmt::Display for Solution {
    /// Lists are shown in bracketed, quoted form, e.g. `['2.0', '3.0']`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "{}", value),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", value)?;
                }
                write!(f, "]")
            },
        }
    }
}

/// The outcome of a successful query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionResult {
    /// The raw query. Absent for trigonometric constants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// The operation that produced this result.
    #[serde(rename = "type")]
    pub intent: Intent,

    /// The answer.
    pub solution: Solution,

    /// Human-readable explanation, in order.
    pub steps: Vec<String>,
}

impl SolutionResult {
    /// Formats the result as a numbered list of steps followed by the final answer.
    ///
    /// Empty steps are skipped, but still count towards the numbering.
    pub fn textbook(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            let step = step.trim();
            if !step.is_empty() {
                out.push_str(&format!("{}. {}\n", i + 1, step));
            }
        }
        out.push_str(&format!("\nFinal Answer: {}", self.solution));
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn result(solution: Solution, steps: &[&str]) -> SolutionResult {
        SolutionResult {
            query: Some("solve x^2 - 5x + 6".to_string()),
            intent: Intent::Solve,
            solution,
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn list_display() {
        let list = Solution::List(vec!["2.0".to_string(), "3.0".to_string()]);
        assert_eq!(list.to_string(), "['2.0', '3.0']");
        assert_eq!(Solution::List(Vec::new()).to_string(), "[]");
        assert_eq!(Solution::Single("x**2/2".to_string()).to_string(), "x**2/2");
    }

    #[test]
    fn textbook_layout() {
        let result = result(
            Solution::List(vec!["2.0".to_string(), "3.0".to_string()]),
            &["Original equation: x^2 - 5x + 6", "", "  Solutions: ['2.0', '3.0'] "],
        );
        assert_eq!(
            result.textbook(),
            "1. Original equation: x^2 - 5x + 6\n3. Solutions: ['2.0', '3.0']\n\nFinal Answer: ['2.0', '3.0']",
        );
    }

    #[test]
    fn textbook_without_steps() {
        let result = result(Solution::Single("5".to_string()), &[]);
        assert_eq!(result.textbook(), "\nFinal Answer: 5");
    }
}
