//! Size thresholds and numeric tolerances.

/// Largest trip solved by enumerating every permutation.
pub const DEFAULT_EXHAUSTIVE_MAX_STOPS: usize = 7;
/// Largest trip solved with the subset dynamic program.
pub const DEFAULT_HELD_KARP_MAX_STOPS: usize = 10;
/// Trips above this size are rejected before any solver runs.
pub const DEFAULT_MAX_STOPS: usize = 5_000;

/// Upper bound for a configured or forced exhaustive search (11! orderings).
pub const EXHAUSTIVE_HARD_LIMIT: usize = 12;
/// Upper bound for a configured or forced Held-Karp run; the table holds
/// `(n - 1) * 2^(n - 1)` entries.
pub const HELD_KARP_HARD_LIMIT: usize = 20;

pub(crate) const SECONDS_PER_MINUTE: f64 = 60.0;
/// Seconds a 2-opt reversal must save before it is accepted.
pub(crate) const TWO_OPT_IMPROVEMENT_EPSILON: f64 = 1e-6;
/// start, two movable stops, closing stop
pub(crate) const MIN_ROUTE_LEN_FOR_2OPT: usize = 4;
