use geosolve_compute::numerical::TrigMode;
use geosolve_core::{evaluate_for_plot, evaluate_geometry, ErrorResponse, Solution, Solver};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn equation_response() {
    let result = Solver::new().solve_query("solve x^2 - 5x + 6").unwrap();
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({
        "query": "solve x^2 - 5x + 6",
        "type": "equation",
        "solution": ["2.0", "3.0"],
        "steps": [
            "Original equation: x^2 - 5x + 6",
            "Cleaned form: x**2 - 5*x + 6",
            "Parsed: x**2 - 5*x + 6 = 0",
            "Solutions: ['2.0', '3.0']",
        ],
    }));
}

#[test]
fn integration_constant_only_in_steps() {
    let result = Solver::new().solve_query("integrate x").unwrap();
    assert_eq!(result.solution, Solution::Single("x**2/2".to_string()));
    assert!(result.steps.iter().any(|step| step.ends_with("+ C")));
    assert!(result.textbook().ends_with("Final Answer: x**2/2"));
}

#[test]
fn trig_response_has_no_query() {
    let result = Solver::new().solve_query("cos60").unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["type"], "Trigonometric Function");
    assert_eq!(value["solution"], "1/2");
    assert!(value.get("query").is_none());
}

#[test]
fn error_response() {
    let err = Solver::new().solve_query("solve x^^").unwrap_err();
    let response = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
    let message = response["error"].as_str().unwrap();
    assert!(message.starts_with("Error solving equation: "));

    let err = Solver::new().solve_query("").unwrap_err();
    assert_eq!(
        serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
        json!({ "error": "No query provided" }),
    );
}

#[test]
fn plot_response() {
    let result = evaluate_for_plot("x^2", Some(0.0), Some(2.0), TrigMode::Radians);
    // `^` is not rewritten for plots
    assert!(result.is_err());

    let result = evaluate_for_plot("x**2", Some(0.0), Some(2.0), TrigMode::Radians).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["mode"], "radians");
    assert_eq!(value["x"].as_array().unwrap().len(), 500);
    assert_eq!(value["y"][499], 4.0);
    assert!(value.get("single_value").is_none());

    let result = evaluate_for_plot("7", None, None, TrigMode::Degrees).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["single_value"], 7.0);
    assert_eq!(value["x"], json!([0.0, 1.0]));
}

#[test]
fn geometry_response() {
    let result = evaluate_geometry("circle 7").unwrap();
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({
        "shape": "circle",
        "properties": {
            "radius": 7.0,
            "area": 153.94,
            "circumference": 43.98,
            "diameter": 14.0,
        },
    }));

    let err = evaluate_geometry("triangle 5").unwrap_err();
    assert_eq!(
        serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
        json!({ "error": "Triangle requires 3 side lengths" }),
    );
}

#[test]
fn division_by_zero_is_an_error() {
    for query in ["1/0", "x/0"] {
        let err = Solver::new().solve_query(query).unwrap_err();
        assert_eq!(
            serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
            json!({ "error": "Could not parse expression: division by zero" }),
        );
    }
}
