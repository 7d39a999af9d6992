//! Measurements of triangles and circles from short commands such as `triangle 3 4 5` or
//! `circle 7`.

use geosolve_compute::fmt::python_float;
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt};
use tracing::debug;
use crate::error::Error;

/// Why a geometry command could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The command names neither a triangle nor a circle.
    UnknownCommand,

    /// A triangle was given fewer than three side lengths.
    MissingSides,

    /// A circle was given no radius.
    MissingRadius,

    /// A measurement is not a number.
    InvalidNumber(String),

    /// The side lengths do not satisfy the triangle inequality.
    TriangleInequality,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => {
                write!(f, "Unknown geometry command. Use \"triangle 3 4 5\" or \"circle 7\"")
            },
            Self::MissingSides => write!(f, "Triangle requires 3 side lengths"),
            Self::MissingRadius => write!(f, "Circle requires a radius"),
            Self::InvalidNumber(word) => write!(f, "could not convert string to float: '{}'", word),
            Self::TriangleInequality => {
                write!(f, "Invalid triangle: sides do not satisfy triangle inequality")
            },
        }
    }
}

impl std::error::Error for GeometryError {}

/// Properties of a triangle given by its three side lengths `a`, `b` and `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// The side lengths, as given.
    pub sides: [f64; 3],

    /// The area, by Heron's formula.
    pub area: f64,

    pub perimeter: f64,

    /// The angles in degrees opposite `a`, `b` and `c`.
    pub angles: [f64; 3],
}

/// Properties of a circle given by its radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f64,
    pub area: f64,
    pub circumference: f64,
    pub diameter: f64,
}

/// The measured shape. Derived values are rounded to two decimal places.
///
/// Serializes as `{"shape": "triangle", "properties": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "properties", rename_all = "lowercase")]
pub enum GeometryResult {
    Triangle(Triangle),
    Circle(Circle),
}

impl GeometryResult {
    /// A one-line description of the shape, such as `Triangle: sides = 3.0, 4.0, 5.0`.
    pub fn title(&self) -> String {
        match self {
            Self::Triangle(triangle) => {
                let [a, b, c] = triangle.sides.map(python_float);
                format!("Triangle: sides = {}, {}, {}", a, b, c)
            },
            Self::Circle(circle) => format!("Circle: radius = {}", python_float(circle.radius)),
        }
    }
}

/// Rounds to two decimal places.
fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Reads the measurements that follow the shape name.
fn measurements(command: &str, shape: &str) -> Vec<String> {
    command.replace(shape, "").split_whitespace().map(str::to_string).collect()
}

fn parse_number(word: &str) -> Result<f64, GeometryError> {
    word.parse::<f64>().map_err(|_| GeometryError::InvalidNumber(word.to_string()))
}

/// Computes the area, perimeter and angles of a triangle.
pub fn triangle(a: f64, b: f64, c: f64) -> Result<Triangle, GeometryError> {
    if !(a + b > c && b + c > a && a + c > b) {
        return Err(GeometryError::TriangleInequality);
    }

    let s = (a + b + c) / 2.0;
    let area = (s * (s - a) * (s - b) * (s - c)).sqrt();

    // law of cosines
    let angle = |opposite: f64, x: f64, y: f64| {
        ((x * x + y * y - opposite * opposite) / (2.0 * x * y)).clamp(-1.0, 1.0).acos().to_degrees()
    };
    let angle_a = angle(a, b, c);
    let angle_b = angle(b, a, c);
    let angle_c = 180.0 - angle_a - angle_b;

    debug!(a, b, c, area, "measured triangle");
    Ok(Triangle {
        sides: [a, b, c],
        area: round2(area),
        perimeter: round2(a + b + c),
        angles: [angle_a, angle_b, angle_c].map(round2),
    })
}

/// Computes the area, circumference and diameter of a circle.
pub fn circle(radius: f64) -> Circle {
    debug!(radius, "measured circle");
    Circle {
        radius,
        area: round2(PI * radius * radius),
        circumference: round2(2.0 * PI * radius),
        diameter: round2(2.0 * radius),
    }
}

/// Evaluates a geometry command. The command is case-insensitive and names the shape followed
/// by its measurements: three side lengths for a triangle, a radius for a circle. Measurements
/// beyond those are ignored.
pub fn evaluate_geometry(command: &str) -> Result<GeometryResult, Error> {
    let command = command.trim().to_lowercase();

    let result = if command.contains("triangle") {
        let words = measurements(&command, "triangle");
        let [a, b, c, ..] = words.as_slice() else {
            return Err(GeometryError::MissingSides.into());
        };
        GeometryResult::Triangle(triangle(parse_number(a)?, parse_number(b)?, parse_number(c)?)?)
    } else if command.contains("circle") {
        let words = measurements(&command, "circle");
        let Some(radius) = words.first() else {
            return Err(GeometryError::MissingRadius.into());
        };
        GeometryResult::Circle(circle(parse_number(radius)?))
    } else {
        return Err(GeometryError::UnknownCommand.into());
    };
    Ok(result)
}
