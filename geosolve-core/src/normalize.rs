//! Rewrites loosely formatted math text into the strict grammar accepted by the algebra parser.
//!
//! Normalization is a total function: it never fails. Text it cannot make sense of is passed
//! through, and the parser reports the problem.

use std::fmt;
use tracing::debug;

/// Function names recognized by the normalizer. A name immediately followed by a number is an
/// angle literal in degrees, and a name followed by whitespace gets an opening parenthesis.
pub const FUNCTIONS: [&str; 13] = [
    "sin", "cos", "tan", "log", "exp", "sqrt", "abs", "asin", "acos", "atan", "sinh", "cosh", "tanh",
];

/// Functions whose argument is opened with a parenthesis by the plot normalizer.
const PLOT_FUNCTIONS: [&str; 3] = ["sin", "cos", "tan"];

/// The conversion function wrapped around angle literals.
const RADIANS: &str = "radians";

/// Text that has been rewritten by [`normalize`] or [`normalize_for_plot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedExpression(String);

impl NormalizedExpression {
    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the expression, returning the normalized text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns true if the character at `i` does not continue a word.
fn word_start(chars: &[char], i: usize) -> bool {
    i == 0 || !chars[i - 1].is_alphabetic()
}

/// Returns the longest function name in `names` that starts a word at `i`.
fn function_at<'a>(chars: &[char], i: usize, names: &[&'a str]) -> Option<&'a str> {
    if !word_start(chars, i) {
        return None;
    }
    names
        .iter()
        .copied()
        .filter(|name| {
            chars
                .get(i..i + name.len())
                .map_or(false, |window| window.iter().copied().eq(name.chars()))
        })
        .max_by_key(|name| name.len())
}

/// Returns the end of the numeric literal (`45` or `45.5`) starting at `start`, or `start` if
/// there is none.
fn numeric_literal_end(chars: &[char], start: usize) -> usize {
    let digits_end = |from: usize| {
        (from..chars.len())
            .find(|&j| !chars[j].is_ascii_digit())
            .unwrap_or(chars.len())
    };

    let end = digits_end(start);
    if end == start {
        return start;
    }
    if chars.get(end) == Some(&'.') {
        let frac_end = digits_end(end + 1);
        if frac_end > end + 1 {
            return frac_end;
        }
    }
    end
}

/// Rewrites `sin45` to `sin(radians(45))`, for every name in [`FUNCTIONS`].
fn rewrite_angle_literals(expr: &str) -> String {
    let chars = expr.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < chars.len() {
        if let Some(name) = function_at(&chars, i, &FUNCTIONS) {
            let start = i + name.len();
            let end = numeric_literal_end(&chars, start);
            if end > start {
                let literal = chars[start..end].iter().collect::<String>();
                out.push_str(&format!("{}({}({}))", name, RADIANS, literal));
                i = end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Replaces the whitespace after a function name with an opening parenthesis, unless the
/// argument already starts with `(` or `[`: `sin 45` becomes `sin(45`.
///
/// The parenthesis is not closed here. The parser closes parentheses left open at the end of the
/// input.
fn open_function_calls(expr: &str, names: &[&str]) -> String {
    let chars = expr.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < chars.len() {
        if let Some(name) = function_at(&chars, i, names) {
            let after = i + name.len();
            let arg_start = (after..chars.len())
                .find(|&j| !chars[j].is_whitespace())
                .unwrap_or(chars.len());
            if arg_start > after && !matches!(chars.get(arg_start), Some('(' | '[')) {
                out.push_str(name);
                out.push('(');
                i = arg_start;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Returns true if the run of letters at the end of `chars` is a function name.
fn ends_with_function_name(chars: &[char]) -> bool {
    let start = chars
        .iter()
        .rposition(|c| !c.is_alphabetic())
        .map_or(0, |p| p + 1);
    let word = chars[start..].iter().collect::<String>();
    FUNCTIONS.contains(&word.as_str()) || word == RADIANS
}

/// Inserts `*` between a digit or `)` followed by a letter or `(`, a letter followed by `(`, and
/// a `)` followed by a digit. A function name followed by `(` is a call and is left alone.
fn insert_implicit_multiplication(expr: &str) -> String {
    let chars = expr.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(expr.len() * 2);
    for (i, &curr) in chars.iter().enumerate() {
        out.push(curr);
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };

        let insert = ((curr.is_ascii_digit() || curr == ')') && (next.is_alphabetic() || next == '('))
            || (curr.is_alphabetic() && next == '(' && !ends_with_function_name(&chars[..=i]))
            || (curr == ')' && next.is_ascii_digit());
        if insert {
            out.push('*');
        }
    }
    out
}

/// Normalizes raw query text for the algebra parser:
///
/// 1. trims surrounding whitespace
/// 2. replaces `^` with `**`
/// 3. rewrites angle literals such as `sin45` to `sin(radians(45))`
/// 4. opens a parenthesis after a function name followed by whitespace (`sin x` to `sin(x`)
/// 5. inserts implicit multiplication (`3x` to `3*x`, `2(x+1)` to `2*(x+1)`)
/// 6. collapses runs of whitespace to a single space
///
/// Applying it to its own output changes nothing.
pub fn normalize(raw: &str) -> NormalizedExpression {
    let expr = raw.trim().replace('^', "**");
    let expr = rewrite_angle_literals(&expr);
    let expr = open_function_calls(&expr, &FUNCTIONS);
    let expr = insert_implicit_multiplication(&expr);
    let expr = expr.split_whitespace().collect::<Vec<_>>().join(" ");
    debug!(raw, normalized = %expr, "normalized expression");
    NormalizedExpression(expr)
}

/// Normalizes an expression to plot. Only the function-call spacing fix (for `sin`, `cos` and
/// `tan`) and implicit multiplication are applied; `^` and angle literals are left as written.
pub fn normalize_for_plot(raw: &str) -> NormalizedExpression {
    let expr = open_function_calls(raw.trim(), &PLOT_FUNCTIONS);
    let expr = insert_implicit_multiplication(&expr);
    debug!(raw, normalized = %expr, "normalized plot expression");
    NormalizedExpression(expr)
}
