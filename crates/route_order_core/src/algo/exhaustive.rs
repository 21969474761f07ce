use rayon::prelude::*;

use crate::{matrix::Problem, route::Route};

struct Candidate {
    order: Vec<usize>,
    duration: f64,
    evaluated: usize,
}

/// Tries every ordering of the free stops and keeps the fastest.
///
/// Orderings are visited lexicographically; each first stop is a separate
/// branch evaluated in parallel, and branches are reduced in order so the
/// first-found minimum wins ties exactly as a sequential scan would.
#[route_order_derive::timer("exhaustive")]
pub(crate) fn solve(problem: &Problem) -> Route {
    let free = problem.free_stops();
    if free.len() < 2 {
        return problem.close_route(free);
    }

    let branches: Vec<Candidate> = (0..free.len())
        .into_par_iter()
        .map(|first| best_in_branch(problem, &free, first))
        .collect();

    let evaluated: usize = branches.iter().map(|c| c.evaluated).sum();
    let Some(best) = branches
        .into_iter()
        .min_by(|a, b| a.duration.total_cmp(&b.duration))
    else {
        return problem.close_route(free);
    };

    log::debug!(
        "exhaustive: complete free={} permutations={evaluated} best_s={:.0}",
        free.len(),
        best.duration
    );
    problem.close_route(best.order)
}

fn best_in_branch(problem: &Problem, free: &[usize], first: usize) -> Candidate {
    let mut order = Vec::with_capacity(free.len());
    order.push(free[first]);
    order.extend(
        free.iter()
            .enumerate()
            .filter(|(idx, _)| *idx != first)
            .map(|(_, &stop)| stop),
    );

    let mut best = Candidate {
        duration: problem.path_duration(&order),
        order: order.clone(),
        evaluated: 1,
    };

    while next_permutation(&mut order[1..]) {
        best.evaluated += 1;
        let duration = problem.path_duration(&order);
        if duration < best.duration {
            best.duration = duration;
            best.order.copy_from_slice(&order);
        }
    }

    best
}

/// Rearranges `items` into the next lexicographic permutation.
/// Returns `false` (leaving `items` untouched) once the last one is reached.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&v| v > items[pivot]) else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::{next_permutation, solve};
    use crate::{
        algo::test_support::{random_matrix, sorted},
        matrix::{CostMatrix, Problem},
    };

    #[test]
    fn next_permutation_walks_lexicographic_order() {
        let mut items = vec![1, 2, 3];
        let mut seen = vec![items.clone()];
        while next_permutation(&mut items) {
            seen.push(items.clone());
        }

        assert_eq!(
            seen,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
        assert_eq!(items, vec![3, 2, 1]);
    }

    #[test]
    fn next_permutation_handles_trivial_slices() {
        let mut empty: Vec<usize> = Vec::new();
        let mut single = vec![4];
        assert!(!next_permutation(&mut empty));
        assert!(!next_permutation(&mut single));
    }

    #[test]
    fn finds_ring_tour() {
        let far = 180.0;
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 60.0, far, 60.0],
            vec![60.0, 0.0, 60.0, far],
            vec![far, 60.0, 0.0, 60.0],
            vec![60.0, far, 60.0, 0.0],
        ]);
        let problem = Problem::new(&matrix, 0, None).expect("valid");

        // 0-1-2-3-0 and 0-3-2-1-0 tie; lexicographic order finds the first.
        assert_eq!(solve(&problem).stops(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn prefers_detour_over_expensive_direct_edge() {
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 5.0, 20.0],
            vec![5.0, 0.0, 5.0],
            vec![20.0, 5.0, 0.0],
        ]);
        let problem = Problem::new(&matrix, 0, Some(2)).expect("valid");

        assert_eq!(solve(&problem).stops(), &[0, 1, 2]);
    }

    #[test]
    fn matches_brute_force_minimum_on_random_asymmetric_matrix() {
        let matrix = random_matrix(6, 11);
        let problem = Problem::new(&matrix, 0, None).expect("valid");
        let route = solve(&problem);
        let stops = route.stops();
        let found = problem.path_duration(&stops[1..stops.len() - 1]);

        let mut order = vec![1, 2, 3, 4, 5];
        let mut best = problem.path_duration(&order);
        while next_permutation(&mut order) {
            best = best.min(problem.path_duration(&order));
        }

        assert_eq!(found, best);
        assert_eq!(sorted(stops[..6].to_vec()), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn honours_non_zero_start() {
        let matrix = random_matrix(5, 3);
        let problem = Problem::new(&matrix, 3, Some(1)).expect("valid");
        let route = solve(&problem);

        assert_eq!(route.stops().first(), Some(&3));
        assert_eq!(route.stops().last(), Some(&1));
        assert_eq!(route.len(), 5);
    }
}
