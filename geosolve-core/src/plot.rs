//! Sampling of an expression over a range, for graphing.

use geosolve_compute::numerical::{Eval, Namespace, TrigMode, Value};
use geosolve_parser::{
    parser::{ast::Expr, Parser},
    tokenizer::mentions_name,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;
use crate::{error::Error, normalize::normalize_for_plot};

/// The variable sampled over the range.
const VARIABLE: &str = "x";

/// Options that control how an expression is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    /// The number of evenly spaced samples to take across the range, including both endpoints.
    pub samples: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self { samples: 500 }
    }
}

/// Points to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// The result of evaluating an expression for a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotResult {
    /// The points to plot.
    #[serde(flatten)]
    pub samples: Samples,

    /// The value of the expression, if it does not depend on `x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_value: Option<f64>,

    /// The normalized expression.
    pub expression: String,

    /// How angles are interpreted.
    pub mode: TrigMode,

    /// The label of the x axis.
    pub x_label: String,

    /// The title of the plot.
    pub title: String,
}

/// Returns `count` evenly spaced values from `from` to `to`, inclusive.
fn linspace(from: f64, to: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { to } else { from + step * i as f64 })
                .collect()
        },
    }
}

/// Evaluates `input` for plotting, with the default [`PlotOptions`].
///
/// `from` defaults to `0`. If `to` is missing or zero, it defaults to one full turn: `360` in
/// degrees mode and `2π` in radians mode.
pub fn evaluate_for_plot(
    input: &str,
    from: Option<f64>,
    to: Option<f64>,
    mode: TrigMode,
) -> Result<PlotResult, Error> {
    evaluate_for_plot_with(input, from, to, mode, &PlotOptions::default())
}

/// Evaluates `input` for plotting.
///
/// If the expression does not mention `x`, it is evaluated once, with `sin`, `cos` and `tan`
/// taking their argument in the given mode, and the result is a flat line over `[0, 1]`.
/// Otherwise it is sampled across the range. In degrees mode, the range is given in degrees and
/// converted to radians before the expression sees it.
pub fn evaluate_for_plot_with(
    input: &str,
    from: Option<f64>,
    to: Option<f64>,
    mode: TrigMode,
    options: &PlotOptions,
) -> Result<PlotResult, Error> {
    if input.trim().is_empty() {
        return Err(Error::EmptyExpression);
    }

    let from = from.unwrap_or(0.0);
    let to = match to {
        Some(to) if to != 0.0 => to,
        _ => match mode {
            TrigMode::Degrees => 360.0,
            TrigMode::Radians => TAU,
        },
    };

    let expression = normalize_for_plot(input).into_string();
    let plot_error = |error| Error::Plot { input: expression.clone(), error };
    let ast = Parser::new(&expression)
        .try_parse_full::<Expr>()
        .map_err(plot_error)?;

    if !mentions_name(&expression, VARIABLE) {
        let value = ast
            .eval(&Namespace::default().with_trig_mode(mode))
            .map_err(plot_error)?;
        let value = value.get(0);
        debug!(%expression, value, "evaluated constant plot");
        return Ok(PlotResult {
            samples: Samples { x: vec![0.0, 1.0], y: vec![value, value] },
            single_value: Some(value),
            title: format!("Graph of {}", expression),
            expression,
            mode,
            x_label: "Range".to_string(),
        });
    }

    let x = linspace(from, to, options.samples);
    let angles = match mode {
        TrigMode::Degrees => x.iter().map(|d| d.to_radians()).collect(),
        TrigMode::Radians => x.clone(),
    };
    let ns = Namespace::default().with_var(VARIABLE, Value::Vector(angles));
    let value = ast.eval(&ns).map_err(plot_error)?;
    let y = (0..x.len()).map(|i| value.get(i)).collect::<Vec<_>>();
    debug!(%expression, from, to, samples = x.len(), "sampled plot");

    Ok(PlotResult {
        samples: Samples { x, y },
        single_value: None,
        title: format!("Graph of {} ({} Mode)", expression, mode),
        expression,
        mode,
        x_label: format!("x ({})", mode),
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn evenly_spaced() {
        assert_eq!(linspace(0.0, 1.0, 5), [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), [2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn constant_expression() {
        let result = evaluate_for_plot("5", None, None, TrigMode::Degrees).unwrap();
        assert_eq!(result.samples, Samples { x: vec![0.0, 1.0], y: vec![5.0, 5.0] });
        assert_eq!(result.single_value, Some(5.0));
        assert_eq!(result.x_label, "Range");
        assert_eq!(result.title, "Graph of 5");
    }

    #[test]
    fn constant_trig_uses_mode() {
        let result = evaluate_for_plot("sin(90)", None, None, TrigMode::Degrees).unwrap();
        assert_float_absolute_eq!(result.single_value.unwrap(), 1.0);

        let result = evaluate_for_plot("cos(pi)", None, None, TrigMode::Radians).unwrap();
        assert_float_absolute_eq!(result.single_value.unwrap(), -1.0);
    }

    #[test]
    fn sampled_in_degrees() {
        let result = evaluate_for_plot("sin x", None, None, TrigMode::Degrees).unwrap();
        assert_eq!(result.expression, "sin(x");
        assert_eq!(result.samples.x.len(), 500);
        assert_eq!(result.samples.x[0], 0.0);
        assert_eq!(result.samples.x[499], 360.0);
        assert_float_absolute_eq!(result.samples.y[0], 0.0);
        assert_float_absolute_eq!(result.samples.y[499], 0.0, 1e-9);
        assert!(result.samples.y.iter().all(|y| (-1.0..=1.0).contains(y)));
        assert_eq!(result.single_value, None);
        assert_eq!(result.x_label, "x (Degrees)");
        assert_eq!(result.title, "Graph of sin(x (Degrees Mode)");
    }

    #[test]
    fn sampled_in_radians() {
        let options = PlotOptions { samples: 3 };
        let result = evaluate_for_plot_with("2x + 1", Some(-1.0), Some(1.0), TrigMode::Radians, &options)
            .unwrap();
        assert_eq!(result.samples, Samples { x: vec![-1.0, 0.0, 1.0], y: vec![-1.0, 1.0, 3.0] });
        assert_eq!(result.x_label, "x (Radians)");
        assert_eq!(result.title, "Graph of 2*x + 1 (Radians Mode)");
    }

    #[test]
    fn default_range() {
        let result = evaluate_for_plot("x", None, Some(0.0), TrigMode::Radians).unwrap();
        assert_float_absolute_eq!(*result.samples.x.last().unwrap(), TAU);
    }

    #[test]
    fn errors() {
        assert!(matches!(evaluate_for_plot("  ", None, None, TrigMode::Degrees), Err(Error::EmptyExpression)));

        let err = evaluate_for_plot("x +", None, None, TrigMode::Degrees).unwrap_err();
        assert!(err.message().starts_with("Invalid expression: "));

        let err = evaluate_for_plot("log(x) + 1", Some(-1.0), Some(1.0), TrigMode::Radians).unwrap_err();
        assert!(err.message().starts_with("Invalid expression: "));
    }
}
