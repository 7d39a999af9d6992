//! Dispatches a classified query to the operation it asks for, and explains each step.

use geosolve_compute::{
    engine::{AlgebraEngine, EngineExpr, SymbolicEngine},
    fmt::{complex_float, python_float},
    numerical::{Eval, Namespace},
};
use geosolve_error::Error as SourceError;
use geosolve_parser::{
    parser::{ast::Expr, Parser},
    tokenizer::mentions_name,
};
use tracing::{info, warn};
use crate::{
    error::Error,
    intent::{classify, Intent},
    normalize::normalize,
    solution::{Solution, SolutionResult},
    trig::{evaluate_trig_constant, extract_angle},
};

/// Options that control how queries are answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOptions {
    /// The variable to solve, integrate and differentiate with respect to.
    pub variable: String,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { variable: "x".to_string() }
    }
}

/// Answers free-text math queries with an [`AlgebraEngine`].
///
/// ```
/// use geosolve_core::{Solution, Solver};
///
/// let result = Solver::new().solve_query("solve x^2 - 5x + 6 = 0").unwrap();
/// assert_eq!(result.solution, Solution::List(vec!["2.0".to_string(), "3.0".to_string()]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver<E = SymbolicEngine> {
    engine: E,
    options: SolverOptions,
}

impl Solver {
    /// Creates a solver backed by the built-in [`SymbolicEngine`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: AlgebraEngine> Solver<E> {
    /// Creates a solver backed by the given engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine, options: SolverOptions::default() }
    }

    /// Replaces the options of this solver.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// The options of this solver.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Classifies the query, runs the operation it asks for, and returns the answer with an
    /// explanation.
    pub fn solve_query(&self, query: &str) -> Result<SolutionResult, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let classification = classify(query);
        info!(query, intent = %classification.intent, "dispatching query");

        let (solution, steps) = match classification.intent {
            Intent::Solve => self.solve_equation(&classification.residual)?,
            Intent::Integrate => self.integrate(&classification.residual)?,
            Intent::Differentiate => self.differentiate(&classification.residual)?,
            Intent::Factor => self.factor(&classification.residual)?,
            Intent::TrigConstant => {
                if let Some(result) = extract_angle(query)
                    .and_then(|(func, angle)| evaluate_trig_constant(func, &angle))
                {
                    return Ok(result);
                }
                warn!(query, "no constant angle found, simplifying instead");
                self.simplify(query)?
            },
            Intent::Simplify => self.simplify(query)?,
        };

        let intent = match classification.intent {
            Intent::TrigConstant => Intent::Simplify,
            intent => intent,
        };
        Ok(SolutionResult {
            query: Some(query.to_string()),
            intent,
            solution,
            steps,
        })
    }

    /// Normalizes and parses the residual of a query, reporting failure as an error of the given
    /// operation.
    fn parse_residual(&self, intent: Intent, residual: &str) -> Result<(String, E::Expr), Error> {
        let cleaned = normalize(residual).into_string();
        match self.engine.parse(&cleaned) {
            Ok(expr) => Ok((cleaned, expr)),
            Err(error) => Err(Error::Operation { intent, input: cleaned, error }),
        }
    }

    fn solve_equation(&self, residual: &str) -> Result<(Solution, Vec<String>), Error> {
        let var = &self.options.variable;
        let cleaned = normalize(residual).into_string();
        let operation_error = |error| Error::Operation {
            intent: Intent::Solve,
            input: cleaned.clone(),
            error,
        };

        let equation = match cleaned.split_once('=') {
            Some((lhs, rhs)) => {
                let lhs_expr = self.engine.parse(lhs).map_err(operation_error)?;
                let rhs_expr = self.engine
                    .parse(rhs)
                    .map_err(|error| operation_error(error.shifted(lhs.len() + 1)))?;
                self.engine.difference(&lhs_expr, &rhs_expr)
            },
            None => self.engine.parse(&cleaned).map_err(operation_error)?,
        };

        let roots = self.engine.solve(&equation, var).map_err(operation_error)?;
        let roots = roots
            .iter()
            .map(|root| {
                // numeric roots are shown as floats, complex ones with both parts evaluated
                let value = root.is_numeric().then(|| {
                    root.eval_float()
                        .map(python_float)
                        .or_else(|| root.eval_complex().map(|(re, im)| complex_float(re, im)))
                });
                value.flatten().unwrap_or_else(|| root.to_string())
            })
            .collect::<Vec<_>>();
        let solution = Solution::List(roots);

        let steps = vec![
            format!("Original equation: {}", residual),
            format!("Cleaned form: {}", cleaned),
            format!("Parsed: {} = 0", equation),
            format!("Solutions: {}", solution),
        ];
        Ok((solution, steps))
    }

    fn integrate(&self, residual: &str) -> Result<(Solution, Vec<String>), Error> {
        let var = &self.options.variable;
        let (cleaned, expr) = self.parse_residual(Intent::Integrate, residual)?;
        let result = self.engine
            .integrate(&expr, var)
            .map_err(|error| Error::Operation { intent: Intent::Integrate, input: cleaned.clone(), error })?;

        let steps = vec![
            format!("Original: {}", residual),
            format!("Cleaned: {}", cleaned),
            format!("Parsed: {}", expr),
            format!("Integrating with respect to {}", var),
            format!("Result: {} + C", result),
        ];
        Ok((Solution::Single(result.to_string()), steps))
    }

    fn differentiate(&self, residual: &str) -> Result<(Solution, Vec<String>), Error> {
        let var = &self.options.variable;
        let (cleaned, expr) = self.parse_residual(Intent::Differentiate, residual)?;
        let result = self.engine
            .differentiate(&expr, var)
            .map_err(|error| Error::Operation { intent: Intent::Differentiate, input: cleaned.clone(), error })?;

        let steps = vec![
            format!("Original: {}", residual),
            format!("Cleaned: {}", cleaned),
            format!("Parsed: {}", expr),
            format!("Differentiating with respect to {}", var),
            format!("Result: {}", result),
        ];
        Ok((Solution::Single(result.to_string()), steps))
    }

    fn factor(&self, residual: &str) -> Result<(Solution, Vec<String>), Error> {
        let (cleaned, expr) = self.parse_residual(Intent::Factor, residual)?;
        let result = self.engine
            .factor(&expr)
            .map_err(|error| Error::Operation { intent: Intent::Factor, input: cleaned.clone(), error })?;

        let steps = vec![
            format!("Original: {}", residual),
            format!("Cleaned: {}", cleaned),
            format!("Parsed: {}", expr),
            format!("Factored: {}", result),
        ];
        Ok((Solution::Single(result.to_string()), steps))
    }

    /// Evaluates a constant expression numerically, returning [`None`] if it does not evaluate to
    /// a single number.
    fn evaluate_numeric(&self, cleaned: &str) -> Option<f64> {
        let result = Parser::new(cleaned)
            .try_parse_full::<Expr>()
            .and_then(|expr| expr.eval(&Namespace::default()));
        match result {
            Ok(value) => value.as_scalar(),
            Err(error) => {
                warn!(input = cleaned, error = %error, "numeric evaluation failed");
                None
            },
        }
    }

    /// Evaluates the query numerically if it has no variable, or simplifies it symbolically
    /// otherwise. If the normalized text cannot be parsed, the raw query is interpreted with a
    /// more forgiving grammar as a last resort.
    fn simplify(&self, query: &str) -> Result<(Solution, Vec<String>), Error> {
        let cleaned = normalize(query).into_string();

        if !mentions_name(&cleaned, &self.options.variable) {
            if let Some(value) = self.evaluate_numeric(&cleaned) {
                let value = python_float(value);
                let steps = vec![
                    format!("Original: {}", query),
                    format!("Cleaned: {}", cleaned),
                    format!("Numerical Result: {}", value),
                ];
                return Ok((Solution::Single(value), steps));
            }
        }

        let symbolic = self.engine
            .parse(&cleaned)
            .and_then(|expr| self.engine.simplify(&expr));
        let error: SourceError = match symbolic {
            Ok(simplified) => {
                let steps = vec![
                    format!("Original: {}", query),
                    format!("Cleaned: {}", cleaned),
                    format!("Simplified: {}", simplified),
                ];
                return Ok((Solution::Single(simplified.to_string()), steps));
            },
            Err(error) => error,
        };
        warn!(input = %cleaned, error = %error, "symbolic simplification failed, interpreting raw query");

        match self.engine.interpret(query) {
            Ok(result) => {
                let steps = vec![
                    format!("Input: {}", query),
                    format!("Result: {}", result),
                ];
                Ok((Solution::Single(result.to_string()), steps))
            },
            Err(_) => Err(Error::Operation { intent: Intent::Simplify, input: cleaned, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn solve(query: &str) -> SolutionResult {
        Solver::new().solve_query(query).unwrap()
    }

    fn solution(query: &str) -> String {
        solve(query).solution.to_string()
    }

    fn list(values: &[&str]) -> Solution {
        Solution::List(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_query() {
        assert!(matches!(Solver::new().solve_query("   "), Err(Error::EmptyQuery)));
    }

    #[test]
    fn equation_with_and_without_equals() {
        assert_eq!(solve("solve x^2 - 5x + 6 = 0").solution, list(&["2.0", "3.0"]));
        assert_eq!(solve("x^2 - 5x + 6").solution, Solution::Single("x**2 - 5*x + 6".to_string()));
        assert_eq!(solve("solve x^2 - 5x + 6").solution, list(&["2.0", "3.0"]));
        assert_eq!(solve("2x + 1 = 5").solution, list(&["2.0"]));
        assert_eq!(solve("solve 2x = 1").solution, list(&["0.5"]));
    }

    #[test]
    fn equation_steps() {
        let result = solve("solve x^2 - 4 = 0");
        assert_eq!(result.query.as_deref(), Some("solve x^2 - 4 = 0"));
        assert_eq!(result.intent, Intent::Solve);
        assert_eq!(result.steps, [
            "Original equation: x^2 - 4 = 0",
            "Cleaned form: x**2 - 4 = 0",
            "Parsed: x**2 - 4 = 0",
            "Solutions: ['-2.0', '2.0']",
        ]);
    }

    #[test]
    fn irrational_and_complex_roots() {
        assert_eq!(
            solve("solve x^2 = 2").solution,
            list(&["-1.4142135623730951", "1.4142135623730951"]),
        );
        assert_eq!(solve("solve x^2 + 1 = 0").solution, list(&["-1.0*I", "1.0*I"]));
        assert_eq!(
            solve("solve x^2 + 2x + 3 = 0").solution,
            list(&["-1.0 - 1.4142135623730951*I", "-1.0 + 1.4142135623730951*I"]),
        );

        let result = solve("solve x^2 + x + 1 = 0");
        assert_eq!(result.steps[3], "Solutions: ['-0.5 - 0.8660254037844386*I', '-0.5 + 0.8660254037844386*I']");
    }

    #[test]
    fn equation_errors() {
        let err = Solver::new().solve_query("solve x^2 = 2 +").unwrap_err();
        assert!(err.message().starts_with("Error solving equation: "));
        let (input, source) = err.source_error().unwrap();
        assert_eq!(input, "x**2 = 2 +");
        assert!(source.spans.iter().all(|span| span.start >= "x**2 =".len()));

        let err = Solver::new().solve_query("solve sin(x) = x^2").unwrap_err();
        assert!(err.message().starts_with("Error solving equation: cannot solve this equation"));
    }

    #[test]
    fn integration() {
        let result = solve("integrate x");
        assert_eq!(result.solution, Solution::Single("x**2/2".to_string()));
        assert_eq!(result.intent, Intent::Integrate);
        assert_eq!(result.steps, [
            "Original: x",
            "Cleaned: x",
            "Parsed: x",
            "Integrating with respect to x",
            "Result: x**2/2 + C",
        ]);
        assert_eq!(solution("∫ 3x^2"), "x**3");
        assert_eq!(solution("integrate cos x"), "sin(x)");
    }

    #[test]
    fn differentiation() {
        assert_eq!(solution("differentiate x^3"), "3*x**2");
        assert_eq!(solution("d/dx sin(2x)"), "2*cos(2*x)");
        let result = solve("derivative x^2");
        assert_eq!(result.intent, Intent::Differentiate);
        assert_eq!(result.steps[3], "Differentiating with respect to x");
        assert_eq!(result.steps[4], "Result: 2*x");
    }

    #[test]
    fn factorization() {
        let result = solve("factor x^2 - 9");
        assert_eq!(result.solution, Solution::Single("(x - 3)*(x + 3)".to_string()));
        assert_eq!(result.intent, Intent::Factor);
        assert_eq!(result.steps.last().map(String::as_str), Some("Factored: (x - 3)*(x + 3)"));
    }

    #[test]
    fn operation_errors() {
        let err = Solver::new().solve_query("integrate x +").unwrap_err();
        assert!(err.message().starts_with("Error integrating: "));
        let err = Solver::new().solve_query("differentiate x /").unwrap_err();
        assert!(err.message().starts_with("Error differentiating: "));
        let err = Solver::new().solve_query("factor )").unwrap_err();
        assert!(err.message().starts_with("Error factoring: "));
    }

    #[test]
    fn trig_constants() {
        let result = solve("sin45");
        assert_eq!(result.intent, Intent::TrigConstant);
        assert_eq!(result.query, None);
        assert_eq!(result.solution, Solution::Single("√(2)/2".to_string()));
        assert_eq!(solution("what is tan(90)"), "UNDEFINED");
    }

    #[test]
    fn trig_without_constant_angle() {
        let result = solve("sin(x)^2 + cos(x)^2");
        assert_eq!(result.intent, Intent::Simplify);
        assert_eq!(result.solution, Solution::Single("1".to_string()));
    }

    #[test]
    fn numeric_simplification() {
        let result = solve("2 + 3*4");
        assert_eq!(result.solution, Solution::Single("14.0".to_string()));
        assert_eq!(result.steps, ["Original: 2 + 3*4", "Cleaned: 2 + 3*4", "Numerical Result: 14.0"]);
        assert_eq!(solution("sqrt(16)"), "4.0");
        assert_eq!(solution("2^10"), "1024.0");
    }

    #[test]
    fn symbolic_simplification() {
        let result = solve("x + x");
        assert_eq!(result.solution, Solution::Single("2*x".to_string()));
        assert_eq!(result.steps, ["Original: x + x", "Cleaned: x + x", "Simplified: 2*x"]);
    }

    #[test]
    fn simplification_error() {
        let err = Solver::new().solve_query("x + * 2").unwrap_err();
        assert!(err.message().starts_with("Could not parse expression: "));
    }

    #[test]
    fn division_by_zero() {
        for query in ["1/0", "x/0", "0**-1", "2 + 3/(x - x)"] {
            let err = Solver::new().solve_query(query).unwrap_err();
            assert_eq!(err.message(), "Could not parse expression: division by zero", "{}", query);
        }

        let err = Solver::new().solve_query("differentiate 1/0").unwrap_err();
        assert_eq!(err.message(), "Error differentiating: division by zero");
        let err = Solver::new().solve_query("integrate x/0").unwrap_err();
        assert_eq!(err.message(), "Error integrating: division by zero");
        let err = Solver::new().solve_query("solve x/0 = 1").unwrap_err();
        assert_eq!(err.message(), "Error solving equation: division by zero");
    }

    #[test]
    fn oversized_powers_stay_symbolic() {
        let result = solve("x + 3**(999999999/1000000000)");
        assert_eq!(result.solution, Solution::Single("x + 3**(999999999/1000000000)".to_string()));
        assert!(Solver::new().solve_query("((3**4096)**4096)**4096").is_ok());
    }

    #[test]
    fn deeply_nested_input() {
        let query = format!("{}x{}", "(".repeat(2000), ")".repeat(2000));
        let err = Solver::new().solve_query(&query).unwrap_err();
        assert_eq!(err.message(), "Could not parse expression: expression is too deeply nested");
    }

    #[test]
    fn custom_variable() {
        let solver = Solver::new().with_options(SolverOptions { variable: "t".to_string() });
        let result = solver.solve_query("solve t^2 - 1 = 0").unwrap();
        assert_eq!(result.solution, list(&["-1.0", "1.0"]));
        let result = solver.solve_query("integrate t").unwrap();
        assert_eq!(result.solution, Solution::Single("t**2/2".to_string()));
        assert_eq!(result.steps[3], "Integrating with respect to t");
    }
}
