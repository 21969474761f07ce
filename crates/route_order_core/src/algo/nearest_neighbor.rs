use crate::{matrix::Problem, route::Route};

/// Greedy construction: always drive to the closest unvisited stop.
///
/// A distinct fixed end is never a candidate; it is appended last. Ties go to
/// the lowest stop index.
pub(crate) fn construct(problem: &Problem) -> Route {
    let mut remaining = problem.free_stops();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = problem.start();

    while !remaining.is_empty() {
        let (pos, _) = remaining.iter().enumerate().fold(
            (0, f64::INFINITY),
            |best, (pos, &stop)| {
                let duration = problem.duration(current, stop);
                if duration < best.1 {
                    (pos, duration)
                } else {
                    best
                }
            },
        );
        current = remaining.remove(pos);
        order.push(current);
    }

    problem.close_route(order)
}

#[cfg(test)]
mod tests {
    use super::construct;
    use crate::matrix::{CostMatrix, Problem};

    #[test]
    fn follows_closest_stop_each_step() {
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 9.0, 2.0, 5.0],
            vec![9.0, 0.0, 4.0, 1.0],
            vec![2.0, 4.0, 0.0, 3.0],
            vec![5.0, 1.0, 3.0, 0.0],
        ]);
        let problem = Problem::new(&matrix, 0, None).expect("valid");

        assert_eq!(construct(&problem).stops(), &[0, 2, 3, 1, 0]);
    }

    #[test]
    fn reserves_fixed_end_for_last() {
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 1.0, 8.0],
            vec![1.0, 0.0, 8.0],
            vec![8.0, 8.0, 0.0],
        ]);
        let problem = Problem::new(&matrix, 2, Some(1)).expect("valid");

        assert_eq!(construct(&problem).stops(), &[2, 0, 1]);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let matrix = CostMatrix::from_durations(&vec![vec![7.0; 4]; 4]);
        let problem = Problem::new(&matrix, 0, None).expect("valid");

        assert_eq!(construct(&problem).stops(), &[0, 1, 2, 3, 0]);
    }
}
