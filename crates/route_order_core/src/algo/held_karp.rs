use crate::{matrix::Problem, route::Route};

const NO_PARENT: u8 = u8::MAX;

/// Dense `(subset, last)` tables of the Held-Karp recurrence.
///
/// Bit `i` of a subset mask stands for `free[i]`. `cost[mask][last]` is the
/// fastest way to leave the start, visit exactly `mask` and stand on `last`;
/// `parent` holds the free-stop position visited just before `last`.
struct Tables {
    width: usize,
    cost: Vec<f64>,
    parent: Vec<u8>,
}

impl Tables {
    fn new(width: usize) -> Self {
        let cells = (1_usize << width) * width;
        Self {
            width,
            cost: vec![f64::INFINITY; cells],
            parent: vec![NO_PARENT; cells],
        }
    }

    #[inline]
    fn at(&self, mask: usize, last: usize) -> usize {
        mask * self.width + last
    }
}

/// Exact solve by dynamic programming over visited subsets.
#[route_order_derive::timer("held_karp")]
pub(crate) fn solve(problem: &Problem) -> Route {
    let free = problem.free_stops();
    let width = free.len();
    if width == 0 {
        return problem.close_route(free);
    }

    let start = problem.start();
    let close = problem.closing_index();
    let full = (1_usize << width) - 1;
    let mut tables = Tables::new(width);

    for (c, &stop) in free.iter().enumerate() {
        let idx = tables.at(1 << c, c);
        tables.cost[idx] = problem.duration(start, stop);
    }

    // Every proper subset of `mask` is numerically smaller, so it is filled
    // before `mask` is read.
    for mask in 1..=full {
        if mask.count_ones() < 2 {
            continue;
        }
        for c in 0..width {
            let bit = 1 << c;
            if mask & bit == 0 {
                continue;
            }
            let prev_mask = mask ^ bit;
            let mut best = f64::INFINITY;
            let mut best_parent = NO_PARENT;
            for p in 0..width {
                if prev_mask & (1 << p) == 0 {
                    continue;
                }
                let candidate =
                    tables.cost[tables.at(prev_mask, p)] + problem.duration(free[p], free[c]);
                // The first predecessor is always taken so that sums which
                // overflow to infinity still leave a complete parent chain.
                if best_parent == NO_PARENT || candidate < best {
                    best = candidate;
                    best_parent = p as u8;
                }
            }
            let idx = tables.at(mask, c);
            tables.cost[idx] = best;
            tables.parent[idx] = best_parent;
        }
    }

    let (last, best) = free
        .iter()
        .enumerate()
        .map(|(c, &stop)| {
            let total = tables.cost[tables.at(full, c)] + problem.duration(stop, close);
            (c, total)
        })
        .fold((0, f64::INFINITY), |acc, (c, total)| {
            if c == 0 || total < acc.1 {
                (c, total)
            } else {
                acc
            }
        });

    let order = reconstruct(&tables, &free, full, last);
    log::debug!(
        "held_karp: complete free={width} states={} best_s={best:.0}",
        tables.cost.len()
    );
    problem.close_route(order)
}

fn reconstruct(tables: &Tables, free: &[usize], full: usize, last: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(free.len());
    let mut mask = full;
    let mut current = last;
    loop {
        order.push(free[current]);
        let parent = tables.parent[tables.at(mask, current)];
        mask ^= 1 << current;
        if parent == NO_PARENT {
            break;
        }
        current = usize::from(parent);
    }
    debug_assert_eq!(mask, 0, "predecessor chain must cover every free stop");
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::solve;
    use crate::{
        algo::{
            exhaustive,
            test_support::{random_matrix, sorted},
        },
        matrix::{CostMatrix, Problem},
    };

    #[test]
    fn agrees_with_exhaustive_search_on_random_instances() {
        for n in 2..=7 {
            for seed in 0..6 {
                let matrix = random_matrix(n, seed * 31 + n as u64);
                for end in [None, Some(0), Some(n - 1)] {
                    let problem = Problem::new(&matrix, 0, end).expect("valid");
                    let dp = solve(&problem);
                    let brute = exhaustive::solve(&problem);

                    let dp_stops = dp.stops();
                    let brute_stops = brute.stops();
                    assert_eq!(
                        problem.path_duration(&dp_stops[1..dp_stops.len() - 1]),
                        problem.path_duration(&brute_stops[1..brute_stops.len() - 1]),
                        "n={n} seed={seed} end={end:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn visits_every_stop_once_on_medium_instance() {
        let matrix = random_matrix(10, 99);
        let problem = Problem::new(&matrix, 0, None).expect("valid");
        let route = solve(&problem);

        assert_eq!(route.len(), 11);
        assert_eq!(route.stops()[10], 0);
        assert_eq!(sorted(route.stops()[..10].to_vec()), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn single_free_stop_and_no_free_stops() {
        let matrix = CostMatrix::from_durations(&[vec![0.0, 4.0], vec![6.0, 0.0]]);
        let closed = Problem::new(&matrix, 0, None).expect("valid");
        let open = Problem::new(&matrix, 0, Some(1)).expect("valid");

        assert_eq!(solve(&closed).stops(), &[0, 1, 0]);
        assert_eq!(solve(&open).stops(), &[0, 1]);
    }

    #[test]
    fn overflowing_durations_still_yield_a_full_route() {
        let matrix = CostMatrix::from_durations(&vec![vec![1e308; 9]; 9]);
        for end in [None, Some(8)] {
            let problem = Problem::new(&matrix, 0, end).expect("valid");
            let route = solve(&problem);

            route
                .check(9, 0, problem.end())
                .expect("every stop visited once");
        }
    }

    #[test]
    fn respects_direction_of_asymmetric_costs() {
        // Clockwise is cheap, counter-clockwise is expensive.
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 1.0, 50.0, 50.0],
            vec![50.0, 0.0, 1.0, 50.0],
            vec![50.0, 50.0, 0.0, 1.0],
            vec![1.0, 50.0, 50.0, 0.0],
        ]);
        let problem = Problem::new(&matrix, 0, None).expect("valid");

        assert_eq!(solve(&problem).stops(), &[0, 1, 2, 3, 0]);
    }
}
