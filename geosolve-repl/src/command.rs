use geosolve_compute::numerical::TrigMode;
use crate::error::Error;

/// A line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A free-text math query.
    Query(String),

    /// `plot <expr> [from to]`: sample an expression over a range.
    Plot {
        expr: String,
        from: Option<f64>,
        to: Option<f64>,
    },

    /// `mode <deg|rad>`: change how plots interpret angles.
    Mode(TrigMode),

    /// `triangle a b c`, `circle r`, or `geometry <command>`: measure a shape.
    Geometry(String),
}

impl Command {
    /// Parses a line of input. Anything that is not a `plot`, `mode` or geometry command is a
    /// query.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match head {
            "mode" => Ok(Self::Mode(rest.parse()?)),
            "plot" if rest.is_empty() => Err(Error::Usage("usage: plot <expr> [from to]".to_string())),
            "plot" => Ok(parse_plot(rest)),
            "triangle" | "circle" => Ok(Self::Geometry(line.to_string())),
            "geometry" => Ok(Self::Geometry(rest.to_string())),
            _ => Ok(Self::Query(line.to_string())),
        }
    }
}

/// Splits a trailing `from to` pair of numbers off the expression to plot, if there is one.
fn parse_plot(rest: &str) -> Command {
    let words = rest.split_whitespace().collect::<Vec<_>>();
    if let [expr @ .., from, to] = words.as_slice() {
        if let (false, Ok(from), Ok(to)) = (expr.is_empty(), from.parse::<f64>(), to.parse::<f64>()) {
            return Command::Plot { expr: expr.join(" "), from: Some(from), to: Some(to) };
        }
    }
    Command::Plot { expr: rest.to_string(), from: None, to: None }
}
