mod command;
mod error;

use command::Command;
use error::Error;
use geosolve_compute::{fmt::python_float, numerical::TrigMode};
use geosolve_core::{evaluate_for_plot, evaluate_geometry, GeometryResult, PlotResult, Solver};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// The environment variable that controls log output, e.g. `GEOSOLVE_LOG=debug`.
const LOG_ENV: &str = "GEOSOLVE_LOG";

const USAGE: &str = "usage: geosolve [--json] [--mode deg|rad] [FILE]";

/// Command line options.
#[derive(Debug, Default)]
struct Args {
    /// Print results as JSON instead of numbered steps.
    json: bool,

    /// How plots interpret angles. Defaults to degrees.
    mode: Option<TrigMode>,

    /// File to read queries from, one per line.
    file: Option<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, Error> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--mode" => {
                    let mode = args.next().ok_or_else(|| Error::Usage(USAGE.to_string()))?;
                    parsed.mode = Some(mode.parse()?);
                },
                "-h" | "--help" => return Err(Error::Usage(USAGE.to_string())),
                flag if flag.starts_with('-') => {
                    return Err(Error::Usage(format!("unknown option `{}`\n{}", flag, USAGE)));
                },
                _ if parsed.file.is_none() => parsed.file = Some(arg),
                _ => return Err(Error::Usage(USAGE.to_string())),
            }
        }
        Ok(parsed)
    }
}

/// State carried between lines of input.
struct Session {
    solver: Solver,
    json: bool,
    mode: TrigMode,
}

impl Session {
    /// Runs a single line of input, returning the text to print.
    fn run(&mut self, line: &str) -> Result<Option<String>, Error> {
        match Command::parse(line)? {
            Command::Query(query) => {
                let result = self.solver.solve_query(&query)?;
                Ok(Some(if self.json {
                    to_json(&result)
                } else {
                    result.textbook()
                }))
            },
            Command::Plot { expr, from, to } => {
                let result = evaluate_for_plot(&expr, from, to, self.mode)?;
                Ok(Some(if self.json {
                    to_json(&result)
                } else {
                    format_plot(&result)
                }))
            },
            Command::Geometry(command) => {
                let result = evaluate_geometry(&command)?;
                Ok(Some(if self.json {
                    to_json(&result)
                } else {
                    format_geometry(&result)
                }))
            },
            Command::Mode(mode) => {
                debug!(%mode, "changed plot mode");
                self.mode = mode;
                Ok(None)
            },
        }
    }

    /// Runs a line of input and prints the outcome.
    fn read_eval(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match self.run(line) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => (),
            Err(err) if self.json => println!("{}", to_json(&err.to_response())),
            Err(err) => err.report_to_stderr(),
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| format!("{{\"error\":\"{}\"}}", err))
}

/// Formats plot samples as a two-column table under the plot title.
fn format_plot(result: &PlotResult) -> String {
    let mut out = format!("{}\n", result.title);
    if let Some(value) = result.single_value {
        out.push_str(&format!("= {}", python_float(value)));
        return out;
    }
    out.push_str(&format!("{}\ty", result.x_label));
    for (x, y) in result.samples.x.iter().zip(&result.samples.y) {
        out.push_str(&format!("\n{}\t{}", python_float(*x), python_float(*y)));
    }
    out
}

/// Formats the measurements of a shape, one per line, under its title.
fn format_geometry(result: &GeometryResult) -> String {
    let rows = match result {
        GeometryResult::Triangle(triangle) => vec![
            ("Area", python_float(triangle.area)),
            ("Perimeter", python_float(triangle.perimeter)),
            ("Angles", triangle.angles.map(python_float).join(", ")),
        ],
        GeometryResult::Circle(circle) => vec![
            ("Area", python_float(circle.area)),
            ("Circumference", python_float(circle.circumference)),
            ("Diameter", python_float(circle.diameter)),
        ],
    };
    let mut out = result.title();
    for (name, value) in rows {
        out.push_str(&format!("\n{}: {}", name, value));
    }
    out
}

/// Runs every line of the input as a separate query.
fn execute(input: &str, session: &mut Session) {
    for line in input.lines() {
        session.read_eval(line);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            err.report_to_stderr();
            std::process::exit(2);
        },
    };
    let mut session = Session {
        solver: Solver::new(),
        json: args.json,
        mode: args.mode.unwrap_or(TrigMode::Degrees),
    };

    if let Some(filename) = args.file {
        // run queries from a file
        match fs::read_to_string(&filename) {
            Ok(input) => execute(&input, &mut session),
            Err(err) => {
                Error::from(err).report_to_stderr();
                std::process::exit(1);
            },
        }
    } else if !io::stdin().is_terminal() {
        // read queries from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            Error::from(err).report_to_stderr();
            std::process::exit(1);
        }
        execute(&input, &mut session);
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            session.read_eval(&input);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn session(json: bool) -> Session {
        Session { solver: Solver::new(), json, mode: TrigMode::Degrees }
    }

    #[test]
    fn args() {
        let args = Args::parse(["--json", "--mode", "rad", "queries.txt"].map(String::from).into_iter()).unwrap();
        assert!(args.json);
        assert_eq!(args.mode, Some(TrigMode::Radians));
        assert_eq!(args.file.as_deref(), Some("queries.txt"));

        assert!(Args::parse(["--verbose"].map(String::from).into_iter()).is_err());
        assert!(Args::parse(["--mode"].map(String::from).into_iter()).is_err());
    }

    #[test]
    fn textbook_output() {
        let output = session(false).run("differentiate x^2").unwrap().unwrap();
        assert_eq!(output, [
            "1. Original: x^2",
            "2. Cleaned: x**2",
            "3. Parsed: x**2",
            "4. Differentiating with respect to x",
            "5. Result: 2*x",
            "",
            "Final Answer: 2*x",
        ].join("\n"));
    }

    #[test]
    fn json_output() {
        let output = session(true).run("factor x^2 - 1").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["type"], "factorization");
        assert_eq!(value["solution"], "(x - 1)*(x + 1)");
    }

    #[test]
    fn mode_changes_plots() {
        let mut session = session(false);
        assert_eq!(session.run("mode rad").unwrap(), None);
        let output = session.run("plot cos(pi)").unwrap().unwrap();
        assert_eq!(output, "Graph of cos(pi)\n= -1.0");
    }

    #[test]
    fn plot_table() {
        let output = session(false).run("plot 2x 0 1").unwrap().unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Graph of 2*x (Degrees Mode)");
        assert_eq!(lines[1], "x (Degrees)\ty");
        assert_eq!(lines[2], "0.0\t0.0");
        assert_eq!(lines.len(), 502);
    }

    #[test]
    fn geometry_output() {
        let output = session(false).run("triangle 3 4 5").unwrap().unwrap();
        assert_eq!(output, [
            "Triangle: sides = 3.0, 4.0, 5.0",
            "Area: 6.0",
            "Perimeter: 12.0",
            "Angles: 36.87, 53.13, 90.0",
        ].join("\n"));

        let output = session(true).run("circle 1").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["shape"], "circle");
        assert_eq!(value["properties"]["circumference"], 6.28);

        let err = session(false).run("triangle 1 1 5").unwrap_err();
        assert_eq!(err.to_string(), "Invalid triangle: sides do not satisfy triangle inequality");
    }

    #[test]
    fn errors_are_returned() {
        assert!(matches!(session(false).run("solve x +"), Err(Error::Query(_))));
    }
}
