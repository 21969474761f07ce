use crate::{
    constants::{MIN_ROUTE_LEN_FOR_2OPT, TWO_OPT_IMPROVEMENT_EPSILON},
    matrix::Problem,
    route::Route,
};

/// Cumulative route durations used to cost a reversal in constant time.
///
/// `forward[k]` is the duration of `stops[0..=k]` as driven; `backward[k]` is
/// the duration of the same prefix driven in reverse, edge by edge.
struct PrefixDurations {
    forward: Vec<f64>,
    backward: Vec<f64>,
}

impl PrefixDurations {
    fn new(len: usize) -> Self {
        Self {
            forward: vec![0.0; len],
            backward: vec![0.0; len],
        }
    }

    fn refresh(&mut self, problem: &Problem, stops: &[usize]) {
        for k in 1..stops.len() {
            let (a, b) = (stops[k - 1], stops[k]);
            self.forward[k] = self.forward[k - 1] + problem.duration(a, b);
            self.backward[k] = self.backward[k - 1] + problem.duration(b, a);
        }
    }

    /// Seconds saved by reversing `stops[i..=j]`; positive means faster.
    fn reversal_gain(&self, problem: &Problem, stops: &[usize], i: usize, j: usize) -> f64 {
        let (before, first, last, after) = (stops[i - 1], stops[i], stops[j], stops[j + 1]);
        let current = problem.duration(before, first)
            + (self.forward[j] - self.forward[i])
            + problem.duration(last, after);
        let reversed = problem.duration(before, last)
            + (self.backward[j] - self.backward[i])
            + problem.duration(first, after);
        current - reversed
    }
}

/// First-improvement 2-opt over the interior of `route`.
///
/// The first and last positions never move. After every accepted reversal the
/// scan restarts from the top; it stops once a full pass finds nothing.
#[route_order_derive::timer("two_opt")]
pub(crate) fn improve(problem: &Problem, route: Route) -> Route {
    let mut stops = route.into_stops();
    let len = stops.len();
    if len < MIN_ROUTE_LEN_FOR_2OPT {
        log::debug!("two_opt: skip len={len} reason=insufficient_size");
        return Route::new(stops);
    }

    let mut prefix = PrefixDurations::new(len);
    let mut swaps = 0usize;

    'scan: loop {
        prefix.refresh(problem, &stops);
        for i in 1..len - 2 {
            for j in (i + 1)..len - 1 {
                if prefix.reversal_gain(problem, &stops, i, j) > TWO_OPT_IMPROVEMENT_EPSILON {
                    stops[i..=j].reverse();
                    swaps += 1;
                    continue 'scan;
                }
            }
        }
        break;
    }

    log::debug!(
        "two_opt: complete len={len} swaps={swaps} duration_s={:.0}",
        prefix.forward[len - 1]
    );
    Route::new(stops)
}
