use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The trigonometric mode of a namespace. This affects how the arguments of `sin`, `cos` and
/// `tan` are interpreted, and how plot sample ranges are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrigMode {
    /// Use radians.
    #[default]
    Radians,

    /// Use degrees.
    Degrees,
}

impl TrigMode {
    /// Converts an angle given in this mode to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Radians => angle,
            Self::Degrees => angle.to_radians(),
        }
    }
}

impl fmt::Display for TrigMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Radians => write!(f, "Radians"),
            Self::Degrees => write!(f, "Degrees"),
        }
    }
}

/// The given string is not the name of a trigonometric mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrigModeError(pub String);

impl fmt::Display for ParseTrigModeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown angle mode `{}`; expected `deg` or `rad`", self.0)
    }
}

impl std::error::Error for ParseTrigModeError {}

impl FromStr for TrigMode {
    type Err = ParseTrigModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            _ => Err(ParseTrigModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("deg".parse(), Ok(TrigMode::Degrees));
        assert_eq!("Radians".parse(), Ok(TrigMode::Radians));
        assert!("grad".parse::<TrigMode>().is_err());
    }

    #[test]
    fn converts_degrees() {
        assert_float_absolute_eq!(TrigMode::Degrees.to_radians(180.0), std::f64::consts::PI);
        assert_float_absolute_eq!(TrigMode::Radians.to_radians(1.5), 1.5);
    }
}
