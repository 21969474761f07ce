//! Visiting order for a trip's stops from a directed travel-cost matrix.
//! Small trips are solved exactly (exhaustive search, then Held-Karp); larger
//! ones use nearest-neighbor construction improved by 2-opt.

mod algo;
pub mod constants;
mod error;
mod io;
pub mod logging;
mod matrix;
mod metrics;
mod route;
mod solver;

pub(crate) use io::options;

pub use error::{Error, Result};
pub use io::input::SolverInput;
pub use io::options::{LogFormat, LogLevel, OptimizationMode, SolverOptions, StrategyChoice};
pub use io::output::SolverOutput;
pub use matrix::{CostMatrix, CostRange, Problem, TravelCost};
pub use metrics::{OptimizationResult, reduce_route};
pub use route::{EndConstraint, Route};
pub use solver::{SolveReport, Strategy, optimize, optimize_with, solve};
