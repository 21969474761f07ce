use serde::Serialize;

use crate::{
    constants::SECONDS_PER_MINUTE,
    matrix::{CostMatrix, CostRange},
    route::Route,
};

/// Final answer handed back to the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    ordered_stops: Vec<usize>,
    total_duration: u64,
    total_distance: f64,
    total_cost: CostRange,
}

impl OptimizationResult {
    pub fn ordered_stops(&self) -> &[usize] {
        &self.ordered_stops
    }

    /// Whole minutes, rounded to nearest.
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    /// Meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn total_cost(&self) -> CostRange {
        self.total_cost
    }
}

/// Folds every leg of `route` into trip totals.
#[route_order_derive::timer]
pub fn reduce_route(matrix: &CostMatrix, route: Route) -> OptimizationResult {
    let (seconds, distance, cost) = route.stops().windows(2).fold(
        (0.0, 0.0, CostRange::ZERO),
        |(seconds, distance, mut cost), leg| {
            let edge = matrix.edge(leg[0], leg[1]);
            cost += edge.cost_or_zero();
            (seconds + edge.duration, distance + edge.distance, cost)
        },
    );

    let minutes = (seconds / SECONDS_PER_MINUTE).round() as u64;
    log::info!(
        "metrics: stops={} duration_s={seconds:.0} duration_min={minutes} distance_m={distance:.0} cost_min={:.2} cost_max={:.2}",
        route.len(),
        cost.min,
        cost.max
    );

    OptimizationResult {
        ordered_stops: route.into_stops(),
        total_duration: minutes,
        total_distance: distance,
        total_cost: cost,
    }
}
