//! Exact and approximate values of `sin`, `cos` and `tan` at constant angles in degrees, with an
//! explanation of how each value is found.

use geosolve_compute::fmt::{fixed6, python_float};
use once_cell::sync::Lazy;
use std::{collections::HashMap, fmt};
use crate::{intent::Intent, solution::{Solution, SolutionResult}};

/// Below this magnitude, `cos(θ)` is treated as zero and `tan(θ)` is undefined.
const COS_EPSILON: f64 = 1e-10;

/// The solution reported for `tan(θ)` when `cos(θ) = 0`.
pub const UNDEFINED: &str = "UNDEFINED";

/// A trigonometric function that can be looked up at a constant angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
}

impl TrigFunction {
    /// Every function, in the order they are searched for in a query.
    pub const ALL: [TrigFunction; 3] = [Self::Sin, Self::Cos, Self::Tan];

    /// The name of the function.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
        }
    }
}

impl fmt::Display for TrigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Closed-form values at whole-degree angles.
static EXACT_VALUES: Lazy<HashMap<(TrigFunction, u32), &'static str>> = Lazy::new(|| {
    use TrigFunction::*;
    let sin = [
        (0, "0"), (30, "1/2"), (45, "√(2)/2"), (60, "√(3)/2"), (90, "1"),
        (120, "√(3)/2"), (135, "√(2)/2"), (150, "1/2"), (180, "0"),
    ];
    let cos = [
        (0, "1"), (30, "√(3)/2"), (45, "√(2)/2"), (60, "1/2"), (90, "0"),
        (120, "-1/2"), (135, "-√(2)/2"), (150, "-√(3)/2"), (180, "-1"),
    ];
    let tan = [
        (0, "0"), (30, "1/√(3)"), (45, "1"), (60, "√(3)"),
        (120, "-√(3)"), (135, "-1"), (150, "-1/√(3)"), (180, "0"),
    ];

    [(Sin, &sin[..]), (Cos, &cos[..]), (Tan, &tan[..])]
        .into_iter()
        .flat_map(|(func, values)| values.iter().map(move |(angle, value)| ((func, *angle), *value)))
        .collect()
});

/// Returns the closed-form value of `func` at `angle` degrees, if the angle is a whole number in
/// the table.
fn exact_value(func: TrigFunction, angle: f64) -> Option<&'static str> {
    if angle.fract() != 0.0 || !(0.0..=180.0).contains(&angle) {
        return None;
    }
    EXACT_VALUES.get(&(func, angle as u32)).copied()
}

/// Finds the first angle literal following a trigonometric function name in the query, such as
/// `45` in `sin45`, `sin 45` or `sin(45)`.
///
/// Functions are tried in the order `sin`, `cos`, `tan`; for each, the first occurrence that is
/// followed by a number wins.
pub fn extract_angle(query: &str) -> Option<(TrigFunction, String)> {
    let lower = query.to_lowercase();
    let chars = lower.chars().collect::<Vec<_>>();

    TrigFunction::ALL.into_iter().find_map(|func| {
        let name = func.name().chars().collect::<Vec<_>>();
        (0..chars.len())
            .filter(|&i| chars[i..].starts_with(&name))
            .find_map(|i| angle_after(&chars, i + name.len()))
            .map(|angle| (func, angle))
    })
}

/// Reads `\s*\(?\s*` followed by a number, starting at `i`.
fn angle_after(chars: &[char], mut i: usize) -> Option<String> {
    let skip_whitespace = |mut i: usize| {
        while chars.get(i).map_or(false, |c| c.is_whitespace()) {
            i += 1;
        }
        i
    };

    i = skip_whitespace(i);
    if chars.get(i) == Some(&'(') {
        i = skip_whitespace(i + 1);
    }

    let digits_end = |from: usize| {
        (from..chars.len())
            .find(|&j| !chars[j].is_ascii_digit())
            .unwrap_or(chars.len())
    };
    let mut end = digits_end(i);
    if end == i {
        return None;
    }
    if chars.get(end) == Some(&'.') && digits_end(end + 1) > end + 1 {
        end = digits_end(end + 1);
    }
    Some(chars[i..end].iter().collect())
}

/// Evaluates `func` at a constant angle in degrees, explaining each step. Returns [`None`] if the
/// angle is not a number.
///
/// Angles with a closed form in the table report it as the solution; others report the value to
/// six decimal places. `tan` at an angle where `cos` is zero is [`UNDEFINED`].
pub fn evaluate_trig_constant(func: TrigFunction, angle: &str) -> Option<SolutionResult> {
    let degrees = angle.trim().parse::<f64>().ok()?;
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let shown = format!("{}°", python_float(degrees));
    let exact = exact_value(func, degrees);

    let (solution, mut steps) = match func {
        TrigFunction::Sin | TrigFunction::Cos => {
            let value = if func == TrigFunction::Sin { sin } else { cos };
            let steps = vec![
                format!("Finding {}({})", func, shown),
                format!("{}({}) = {}", func, shown, fixed6(value)),
            ];
            (exact.map_or_else(|| fixed6(value), str::to_string), steps)
        },
        TrigFunction::Tan if cos.abs() <= COS_EPSILON => {
            let steps = vec![
                "Finding tan(θ) using the formula:".to_string(),
                "tan(θ) = sin(θ) / cos(θ)".to_string(),
                format!("sin({}) = {}", shown, fixed6(sin)),
                format!("cos({}) ≈ 0", shown),
                "Division by zero is NOT DEFINED".to_string(),
                "tan(θ) is UNDEFINED when cos(θ) = 0".to_string(),
                "Note: tan(constant) is not defined here, so it is NOT differentiable".to_string(),
            ];
            return Some(trig_result(UNDEFINED.to_string(), steps));
        },
        TrigFunction::Tan => {
            let tan = sin / cos;
            let steps = vec![
                "Finding tan(θ) using the formula:".to_string(),
                "tan(θ) = sin(θ) / cos(θ)".to_string(),
                format!("sin({}) = {}", shown, fixed6(sin)),
                format!("cos({}) = {}", shown, fixed6(cos)),
                format!("tan({}) = {} / {}", shown, fixed6(sin), fixed6(cos)),
                format!("tan({}) = {}", shown, fixed6(tan)),
            ];
            (exact.map_or_else(|| fixed6(tan), str::to_string), steps)
        },
    };

    if let Some(exact) = exact {
        steps.push(format!("Exact value: {}({}) = {}", func, shown, exact));
    }
    steps.push(format!(
        "Note: {}(constant) is a fixed number with no variable, so it is NOT differentiable",
        func,
    ));
    Some(trig_result(solution, steps))
}

fn trig_result(solution: String, steps: Vec<String>) -> SolutionResult {
    SolutionResult {
        query: None,
        intent: Intent::TrigConstant,
        solution: Solution::Single(solution),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn solution(func: TrigFunction, angle: &str) -> String {
        evaluate_trig_constant(func, angle).unwrap().solution.to_string()
    }

    #[test]
    fn exact_values() {
        assert_eq!(solution(TrigFunction::Sin, "30"), "1/2");
        assert_eq!(solution(TrigFunction::Cos, "45"), "√(2)/2");
        assert_eq!(solution(TrigFunction::Cos, "60"), "1/2");
        assert_eq!(solution(TrigFunction::Cos, "120"), "-1/2");
        assert_eq!(solution(TrigFunction::Tan, "45"), "1");
        assert_eq!(solution(TrigFunction::Tan, "30"), "1/√(3)");
        assert_eq!(solution(TrigFunction::Sin, "180"), "0");
    }

    #[test]
    fn approximate_values() {
        assert_eq!(solution(TrigFunction::Sin, "47"), "0.731354");
        assert_eq!(solution(TrigFunction::Sin, "30.5"), "0.507538");
        assert_eq!(solution(TrigFunction::Tan, "10"), "0.176327");
        assert_eq!(solution(TrigFunction::Cos, "200"), "-0.939693");
    }

    #[test]
    fn undefined_tangent() {
        let result = evaluate_trig_constant(TrigFunction::Tan, "90").unwrap();
        assert_eq!(result.solution, Solution::Single("UNDEFINED".to_string()));
        assert_eq!(result.steps, [
            "Finding tan(θ) using the formula:",
            "tan(θ) = sin(θ) / cos(θ)",
            "sin(90.0°) = 1.000000",
            "cos(90.0°) ≈ 0",
            "Division by zero is NOT DEFINED",
            "tan(θ) is UNDEFINED when cos(θ) = 0",
            "Note: tan(constant) is not defined here, so it is NOT differentiable",
        ]);
        assert_eq!(solution(TrigFunction::Tan, "270"), "UNDEFINED");
    }

    #[test]
    fn sine_steps() {
        let result = evaluate_trig_constant(TrigFunction::Sin, "45").unwrap();
        assert_eq!(result.intent, Intent::TrigConstant);
        assert_eq!(result.query, None);
        assert_eq!(result.steps, [
            "Finding sin(45.0°)",
            "sin(45.0°) = 0.707107",
            "Exact value: sin(45.0°) = √(2)/2",
            "Note: sin(constant) is a fixed number with no variable, so it is NOT differentiable",
        ]);
    }

    #[test]
    fn unparsable_angle() {
        assert_eq!(evaluate_trig_constant(TrigFunction::Sin, "abc"), None);
    }

    #[test]
    fn angle_extraction() {
        assert_eq!(extract_angle("sin45"), Some((TrigFunction::Sin, "45".to_string())));
        assert_eq!(extract_angle("What is COS (60)?"), Some((TrigFunction::Cos, "60".to_string())));
        assert_eq!(extract_angle("tan 30.5"), Some((TrigFunction::Tan, "30.5".to_string())));
        assert_eq!(extract_angle("sin x + cos30"), Some((TrigFunction::Cos, "30".to_string())));
        assert_eq!(extract_angle("sin(x)"), None);
        assert_eq!(extract_angle("sinh(2)"), None);
    }
}
