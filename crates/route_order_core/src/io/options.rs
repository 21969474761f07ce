use std::{env, path::Path};

use log::LevelFilter;
use route_order_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result,
    constants::{
        DEFAULT_EXHAUSTIVE_MAX_STOPS, DEFAULT_HELD_KARP_MAX_STOPS, DEFAULT_MAX_STOPS,
        EXHAUSTIVE_HARD_LIMIT, HELD_KARP_HARD_LIMIT,
    },
};

/// Solver thresholds plus the command-line surface around them.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Trips with at most this many stops are solved by exhaustive search.
    #[cli(long = "exhaustive-max-stops")]
    pub exhaustive_max_stops: usize,
    /// Trips with at most this many stops (and above the exhaustive cutoff) use Held-Karp.
    #[cli(long = "held-karp-max-stops")]
    pub held_karp_max_stops: usize,
    /// Larger trips are rejected as infeasible.
    #[cli(long = "max-stops")]
    pub max_stops: usize,
    /// Force one solver instead of choosing by size.
    #[cli(long = "strategy", parse_with = "StrategyChoice::parse")]
    pub strategy: StrategyChoice,
    /// Objective hint. Every mode currently minimizes travel time.
    #[cli(long = "mode", parse_with = "OptimizationMode::parse")]
    pub mode: OptimizationMode,
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    #[cli(flag = "log-timestamp")]
    pub log_timestamp: bool,
    /// Log file path. Empty or `-` means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Problem file path. Empty or `-` means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Result file path. Empty or `-` means stdout.
    #[cli(long = "output")]
    pub output: String,
    /// Indent the JSON result.
    #[cli(flag = "pretty")]
    pub pretty: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "strategy")]
pub enum StrategyChoice {
    Auto,
    Exhaustive,
    #[cli(alias = "dp")]
    HeldKarp,
    #[cli(alias = "heuristic")]
    TwoOpt,
}

/// What the caller would like minimized.
///
/// `Cheapest` and `Balanced` are accepted for interface compatibility; the
/// solvers optimize duration for every mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "mode")]
pub enum OptimizationMode {
    Fastest,
    Cheapest,
    Balanced,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            exhaustive_max_stops: DEFAULT_EXHAUSTIVE_MAX_STOPS,
            held_karp_max_stops: DEFAULT_HELD_KARP_MAX_STOPS,
            max_stops: DEFAULT_MAX_STOPS,
            strategy: StrategyChoice::Auto,
            mode: OptimizationMode::Fastest,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
            pretty: false,
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        let options = Self::parse_from_iter(env::args().skip(1))?;
        options.validate()?;
        Ok(options)
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    /// Rejects thresholds that would let an exact solver blow up.
    pub fn validate(&self) -> Result<()> {
        if self.exhaustive_max_stops > EXHAUSTIVE_HARD_LIMIT {
            return Err(Error::invalid_input(format!(
                "exhaustive-max-stops must be <= {EXHAUSTIVE_HARD_LIMIT}, got {}",
                self.exhaustive_max_stops
            )));
        }
        if self.held_karp_max_stops > HELD_KARP_HARD_LIMIT {
            return Err(Error::invalid_input(format!(
                "held-karp-max-stops must be <= {HELD_KARP_HARD_LIMIT}, got {}",
                self.held_karp_max_stops
            )));
        }
        if self.max_stops == 0 {
            return Err(Error::invalid_input("max-stops must be > 0"));
        }
        Ok(())
    }

    pub fn usage() -> String {
        format!(
            "\
Usage:
  route-order [options] [--input problem.json]
  route-order [options] < problem.json

Options:
  --exhaustive-max-stops <usize>   (default {DEFAULT_EXHAUSTIVE_MAX_STOPS}, max {EXHAUSTIVE_HARD_LIMIT})
  --held-karp-max-stops <usize>    (default {DEFAULT_HELD_KARP_MAX_STOPS}, max {HELD_KARP_HARD_LIMIT})
  --max-stops <usize>              (default {DEFAULT_MAX_STOPS})
  --strategy <{}>
  --mode <{}>
  --log-level <{}>
  --log-format <{}>
  --log-timestamp[=<bool>]
  --no-log-timestamp
  --log-output <path>
  --input <path>
  --output <path>
  --pretty[=<bool>]
  --help

Problem file:
  {{\"matrix\": [[{{\"duration\": s, \"distance\": m, \"cost\": {{\"min\": x, \"max\": y}}}}, ...], ...],
   \"start\": 0, \"end\": null, \"stops\": [\"id\", ...]}}

Examples:
  route-order --input trip.json --pretty
  route-order --strategy=two-opt --log-level=info < trip.json
  route-order --exhaustive-max-stops 8 --held-karp-max-stops 14 --output order.json < trip.json
",
            StrategyChoice::EXPECTED,
            OptimizationMode::EXPECTED,
            LogLevel::EXPECTED,
            LogFormat::EXPECTED,
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        path_or_stdio(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        path_or_stdio(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        path_or_stdio(&self.output)
    }
}

fn path_or_stdio(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}
