//! Keyword-based selection of the operation a query asks for.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The operation a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Solve an equation for the variable.
    #[serde(rename = "equation")]
    Solve,

    /// Find an antiderivative.
    #[serde(rename = "integration")]
    Integrate,

    /// Find a derivative.
    #[serde(rename = "differentiation")]
    Differentiate,

    /// Factor an expression.
    #[serde(rename = "factorization")]
    Factor,

    /// Look up a trigonometric function of a constant angle in degrees, such as `sin45`.
    #[serde(rename = "Trigonometric Function")]
    TrigConstant,

    /// Evaluate or simplify an expression. The default when no keyword matches.
    #[serde(rename = "simplification")]
    Simplify,
}

impl Intent {
    /// The result type reported for this intent.
    pub fn result_type(self) -> &'static str {
        match self {
            Self::Solve => "equation",
            Self::Integrate => "integration",
            Self::Differentiate => "differentiation",
            Self::Factor => "factorization",
            Self::TrigConstant => "Trigonometric Function",
            Self::Simplify => "simplification",
        }
    }

    /// The literal keywords removed from the query to leave the residual expression, in the order
    /// they are removed.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Solve => &["solve", "Solve"],
            Self::Integrate => &["integrate", "Integrate", "∫"],
            Self::Differentiate => &[
                "differentiate", "Differentiate", "diff", "Diff", "derivative", "Derivative", "d/dx",
            ],
            Self::Factor => &["factor", "Factor"],
            Self::TrigConstant | Self::Simplify => &[],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result_type())
    }
}

/// A rule that selects an intent. The arguments are the raw query and its lowercase form.
type Rule = (fn(&str, &str) -> bool, Intent);

/// The classification rules, in priority order. The first rule that matches wins.
const RULES: [Rule; 5] = [
    (|raw, lower| lower.contains("solve") || raw.contains('='), Intent::Solve),
    (|raw, lower| lower.contains("integrate") || raw.contains('∫'), Intent::Integrate),
    (
        |_, lower| ["differentiate", "diff", "derivative", "d/dx"].iter().any(|k| lower.contains(k)),
        Intent::Differentiate,
    ),
    (|_, lower| lower.contains("factor"), Intent::Factor),
    (|_, lower| ["sin", "cos", "tan"].iter().any(|k| lower.contains(k)), Intent::TrigConstant),
];

/// The intent of a query and the text left after removing the keyword that signaled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The selected intent.
    pub intent: Intent,

    /// The query with the intent's keywords removed, trimmed.
    pub residual: String,
}

/// Classifies a raw query by substring tests against fixed keywords, in priority order:
///
/// 1. `solve`, or any `=`: [`Intent::Solve`]
/// 2. `integrate` or `∫`: [`Intent::Integrate`]
/// 3. `differentiate`, `diff`, `derivative` or `d/dx`: [`Intent::Differentiate`]
/// 4. `factor`: [`Intent::Factor`]
/// 5. `sin`, `cos` or `tan`: [`Intent::TrigConstant`]
/// 6. anything else: [`Intent::Simplify`]
///
/// Keywords are matched case-insensitively anywhere in the query.
pub fn classify(query: &str) -> Classification {
    let query = query.trim();
    let lower = query.to_lowercase();
    let intent = RULES
        .iter()
        .find(|(matches, _)| matches(query, &lower))
        .map_or(Intent::Simplify, |(_, intent)| *intent);

    let residual = intent
        .keywords()
        .iter()
        .fold(query.to_string(), |text, keyword| text.replace(keyword, ""))
        .trim()
        .to_string();

    debug!(query, %intent, residual = %residual, "classified query");
    Classification { intent, residual }
}
