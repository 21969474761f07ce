use route_order_derive::CliValue;

use crate::{
    Error, Result, SolverOptions,
    algo::{exhaustive, held_karp, nearest_neighbor, two_opt},
    constants::{EXHAUSTIVE_HARD_LIMIT, HELD_KARP_HARD_LIMIT},
    matrix::{CostMatrix, Problem},
    metrics::{self, OptimizationResult},
    options::{OptimizationMode, StrategyChoice},
    route::Route,
};

/// The solver that produced a route.
#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "strategy")]
pub enum Strategy {
    /// Every ordering; exact.
    Exhaustive,
    /// Subset dynamic programming; exact.
    HeldKarp,
    /// Nearest-neighbor construction plus 2-opt; no optimality guarantee.
    TwoOpt,
}

impl Strategy {
    /// The size-based choice made when no strategy is forced.
    pub fn select(n: usize, options: &SolverOptions) -> Self {
        if n <= options.exhaustive_max_stops {
            Self::Exhaustive
        } else if n <= options.held_karp_max_stops {
            Self::HeldKarp
        } else {
            Self::TwoOpt
        }
    }

    /// Honours a forced strategy, refusing exact solvers past their hard limit.
    pub fn resolve(n: usize, options: &SolverOptions) -> Result<Self> {
        let strategy = match options.strategy {
            StrategyChoice::Auto => Self::select(n, options),
            StrategyChoice::Exhaustive => Self::Exhaustive,
            StrategyChoice::HeldKarp => Self::HeldKarp,
            StrategyChoice::TwoOpt => Self::TwoOpt,
        };
        if let Some(limit) = strategy.hard_limit()
            && n > limit
        {
            return Err(Error::infeasible_size(n, limit, strategy));
        }
        Ok(strategy)
    }

    pub fn hard_limit(self) -> Option<usize> {
        match self {
            Self::Exhaustive => Some(EXHAUSTIVE_HARD_LIMIT),
            Self::HeldKarp => Some(HELD_KARP_HARD_LIMIT),
            Self::TwoOpt => None,
        }
    }

    pub fn is_exact(self) -> bool {
        self.hard_limit().is_some()
    }

    fn run(self, problem: &Problem) -> Route {
        match self {
            Self::Exhaustive => exhaustive::solve(problem),
            Self::HeldKarp => held_karp::solve(problem),
            Self::TwoOpt => two_opt::improve(problem, nearest_neighbor::construct(problem)),
        }
    }
}

/// A result together with the strategy that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    strategy: Strategy,
    result: OptimizationResult,
}

impl SolveReport {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn result(&self) -> &OptimizationResult {
        &self.result
    }

    pub fn into_result(self) -> OptimizationResult {
        self.result
    }
}

/// Orders the stops of `matrix` with the default thresholds.
///
/// `end = None` and `end = Some(start)` both return to the start; any other
/// `end` is visited last.
pub fn optimize(
    matrix: &CostMatrix,
    start: usize,
    end: Option<usize>,
) -> Result<OptimizationResult> {
    optimize_with(matrix, start, end, &SolverOptions::default())
}

pub fn optimize_with(
    matrix: &CostMatrix,
    start: usize,
    end: Option<usize>,
    options: &SolverOptions,
) -> Result<OptimizationResult> {
    solve(matrix, start, end, options).map(SolveReport::into_result)
}

/// Validates the request, dispatches to one strategy and reduces the route.
#[route_order_derive::timer("solver")]
pub fn solve(
    matrix: &CostMatrix,
    start: usize,
    end: Option<usize>,
    options: &SolverOptions,
) -> Result<SolveReport> {
    options.validate()?;
    let problem = Problem::new(matrix, start, end)?;
    let n = problem.n();

    if n > options.max_stops {
        return Err(Error::infeasible_size(
            n,
            options.max_stops,
            Strategy::select(n, options),
        ));
    }
    let strategy = Strategy::resolve(n, options)?;

    if options.mode != OptimizationMode::Fastest {
        log::info!(
            "solver: mode={} is not differentiated, optimizing duration",
            options.mode
        );
    }
    log::info!(
        "solver: start n={n} start={start} end={} strategy={strategy}",
        problem.end()
    );

    let route = strategy.run(&problem);
    log::debug!("solver: route {route}");
    route.check(n, start, problem.end())?;

    Ok(SolveReport {
        strategy,
        result: metrics::reduce_route(matrix, route),
    })
}
