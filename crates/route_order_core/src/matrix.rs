use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, route::EndConstraint, route::Route};

const ERR_EMPTY_MATRIX: &str = "matrix must contain at least one stop";

/// Lower and upper bound of a monetary travel cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    pub const ZERO: Self = Self { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl AddAssign for CostRange {
    fn add_assign(&mut self, rhs: Self) {
        self.min += rhs.min;
        self.max += rhs.max;
    }
}

/// One directed matrix cell: seconds, meters and an optional cost range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelCost {
    pub duration: f64,
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostRange>,
}

impl TravelCost {
    pub fn new(duration: f64, distance: f64) -> Self {
        Self {
            duration,
            distance,
            cost: None,
        }
    }

    pub fn with_cost(mut self, min: f64, max: f64) -> Self {
        self.cost = Some(CostRange::new(min, max));
        self
    }

    /// Missing cost information counts as free travel.
    pub fn cost_or_zero(&self) -> CostRange {
        self.cost.unwrap_or(CostRange::ZERO)
    }

    fn problem(&self) -> Option<&'static str> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Some("duration must be finite and non-negative");
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Some("distance must be finite and non-negative");
        }
        if self.cost.is_some_and(|cost| !cost.is_finite()) {
            return Some("cost bounds must be finite");
        }
        None
    }
}

/// Directed travel costs between stops `0..n`, row `from`, column `to`.
///
/// Rows are kept as given so that ragged input can be reported instead of
/// silently reshaped; [`CostMatrix::validate`] is the gate every solve passes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostMatrix {
    rows: Vec<Vec<TravelCost>>,
}

impl CostMatrix {
    pub fn new(rows: Vec<Vec<TravelCost>>) -> Self {
        Self { rows }
    }

    /// Builds a matrix from durations in seconds, with zero distance and no cost.
    pub fn from_durations(durations: &[Vec<f64>]) -> Self {
        Self::new(
            durations
                .iter()
                .map(|row| row.iter().map(|&d| TravelCost::new(d, 0.0)).collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The diagonal is zero cost regardless of what the caller stored.
    pub fn edge(&self, from: usize, to: usize) -> TravelCost {
        if from == to {
            return TravelCost::default();
        }
        self.rows[from][to]
    }

    #[inline]
    pub fn duration(&self, from: usize, to: usize) -> f64 {
        if from == to {
            return 0.0;
        }
        self.rows[from][to].duration
    }

    /// Checks shape, indices and cell values. Off-diagonal cells only.
    pub fn validate(&self, start: usize, end: Option<usize>) -> Result<()> {
        if self.is_empty() {
            return Err(Error::invalid_input(ERR_EMPTY_MATRIX));
        }
        let n = self.len();

        if let Some((row_idx, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(Error::invalid_input(format!(
                "matrix is not square: row {row_idx} has {} columns, expected {n}",
                row.len()
            )));
        }

        if start >= n {
            return Err(Error::invalid_input(format!(
                "start index {start} is out of range for {n} stops"
            )));
        }
        if let Some(end) = end
            && end >= n
        {
            return Err(Error::invalid_input(format!(
                "end index {end} is out of range for {n} stops"
            )));
        }

        for (from, row) in self.rows.iter().enumerate() {
            for (to, cell) in row.iter().enumerate() {
                if from == to {
                    continue;
                }
                if let Some(problem) = cell.problem() {
                    return Err(Error::invalid_input(format!(
                        "matrix cell [{from}][{to}]: {problem}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A validated solve request: the matrix plus resolved start and end.
#[derive(Clone, Copy, Debug)]
pub struct Problem<'a> {
    matrix: &'a CostMatrix,
    start: usize,
    end: EndConstraint,
}

impl<'a> Problem<'a> {
    pub fn new(matrix: &'a CostMatrix, start: usize, end: Option<usize>) -> Result<Self> {
        matrix.validate(start, end)?;
        Ok(Self {
            matrix,
            start,
            end: EndConstraint::from_index(start, end),
        })
    }

    pub fn n(&self) -> usize {
        self.matrix.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> EndConstraint {
        self.end
    }

    pub fn matrix(&self) -> &'a CostMatrix {
        self.matrix
    }

    pub(crate) fn closing_index(&self) -> usize {
        self.end.closing_index(self.start)
    }

    #[inline]
    pub(crate) fn duration(&self, from: usize, to: usize) -> f64 {
        self.matrix.duration(from, to)
    }

    /// Stops a solver may reorder, ascending: everything except the start and
    /// a distinct fixed end.
    pub(crate) fn free_stops(&self) -> Vec<usize> {
        let fixed_end = self.end.fixed_end();
        (0..self.n())
            .filter(|&idx| idx != self.start && Some(idx) != fixed_end)
            .collect()
    }

    /// Duration of `start -> order... -> closing stop`.
    pub(crate) fn path_duration(&self, order: &[usize]) -> f64 {
        let close = self.closing_index();
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) => {
                self.duration(self.start, first)
                    + order
                        .windows(2)
                        .map(|w| self.duration(w[0], w[1]))
                        .sum::<f64>()
                    + self.duration(last, close)
            }
            _ => self.duration(self.start, close),
        }
    }

    /// Wraps an ordering of the free stops with the fixed start and closing stop.
    pub(crate) fn close_route(&self, order: Vec<usize>) -> Route {
        let mut stops = Vec::with_capacity(order.len() + 2);
        stops.push(self.start);
        stops.extend(order);
        stops.push(self.closing_index());
        Route::new(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::{CostMatrix, CostRange, Problem, TravelCost};
    use crate::{Error, route::EndConstraint};

    fn uniform(n: usize, duration: f64) -> CostMatrix {
        CostMatrix::from_durations(&vec![vec![duration; n]; n])
    }

    #[test]
    fn validate_rejects_empty_matrix() {
        let err = CostMatrix::default()
            .validate(0, None)
            .expect_err("empty matrix should fail");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("at least one stop"));
    }

    #[test]
    fn validate_rejects_non_square_matrix() {
        let matrix = CostMatrix::from_durations(&vec![vec![1.0; 4]; 3]);
        let err = matrix.validate(0, None).expect_err("3x4 should fail");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("not square"));
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let matrix = CostMatrix::from_durations(&[vec![0.0, 1.0], vec![1.0]]);
        let err = matrix.validate(0, None).expect_err("ragged should fail");
        assert!(err.to_string().contains("row 1 has 1 columns"));
    }

    #[test]
    fn validate_rejects_out_of_range_indices() {
        let matrix = uniform(3, 1.0);
        let start_err = matrix.validate(3, None).expect_err("start out of range");
        let end_err = matrix.validate(0, Some(7)).expect_err("end out of range");

        assert!(start_err.to_string().contains("start index 3"));
        assert!(end_err.to_string().contains("end index 7"));
    }

    #[test]
    fn validate_rejects_bad_cells_but_ignores_diagonal() {
        let mut rows = vec![vec![TravelCost::new(1.0, 1.0); 2]; 2];
        rows[0][0] = TravelCost::new(f64::NAN, -1.0);
        assert!(CostMatrix::new(rows.clone()).validate(0, None).is_ok());

        rows[1][0] = TravelCost::new(-5.0, 1.0);
        let err = CostMatrix::new(rows.clone())
            .validate(0, None)
            .expect_err("negative duration");
        assert!(err.to_string().contains("[1][0]"));

        rows[1][0] = TravelCost::new(5.0, 1.0).with_cost(f64::INFINITY, 1.0);
        let err = CostMatrix::new(rows)
            .validate(0, None)
            .expect_err("infinite cost");
        assert!(err.to_string().contains("cost bounds"));
    }

    #[test]
    fn diagonal_reads_as_zero() {
        let matrix = uniform(2, 9.0);
        assert_eq!(matrix.duration(1, 1), 0.0);
        assert_eq!(matrix.edge(0, 0), TravelCost::default());
        assert_eq!(matrix.duration(0, 1), 9.0);
    }

    #[test]
    fn missing_cost_is_zero_range() {
        assert_eq!(TravelCost::new(1.0, 1.0).cost_or_zero(), CostRange::ZERO);
        assert_eq!(
            TravelCost::new(1.0, 1.0).with_cost(2.0, 3.0).cost_or_zero(),
            CostRange::new(2.0, 3.0)
        );
    }

    #[test]
    fn free_stops_exclude_start_and_distinct_end() {
        let matrix = uniform(5, 1.0);
        let closed = Problem::new(&matrix, 2, None).expect("valid");
        let explicit = Problem::new(&matrix, 2, Some(2)).expect("valid");
        let open = Problem::new(&matrix, 2, Some(4)).expect("valid");

        assert_eq!(closed.free_stops(), vec![0, 1, 3, 4]);
        assert_eq!(explicit.free_stops(), vec![0, 1, 3, 4]);
        assert_eq!(open.free_stops(), vec![0, 1, 3]);
        assert_eq!(closed.end(), EndConstraint::ReturnToStart);
        assert_eq!(explicit.end(), EndConstraint::EndAtStart);
        assert_eq!(open.end(), EndConstraint::EndAt(4));
    }

    #[test]
    fn path_duration_includes_start_and_closing_edges() {
        let matrix = CostMatrix::from_durations(&[
            vec![0.0, 1.0, 10.0],
            vec![2.0, 0.0, 3.0],
            vec![4.0, 5.0, 0.0],
        ]);
        let closed = Problem::new(&matrix, 0, None).expect("valid");
        let open = Problem::new(&matrix, 0, Some(2)).expect("valid");

        assert_eq!(closed.path_duration(&[1, 2]), 1.0 + 3.0 + 4.0);
        assert_eq!(open.path_duration(&[1]), 1.0 + 3.0);
        assert_eq!(open.path_duration(&[]), 10.0);
    }

    #[test]
    fn deserializes_cells_with_and_without_cost() {
        let matrix: CostMatrix = serde_json::from_str(
            r#"[[{"duration":0,"distance":0},{"duration":60,"distance":500,"cost":{"min":1,"max":2}}],
                [{"duration":30,"distance":400},{"duration":0,"distance":0}]]"#,
        )
        .expect("parse matrix");

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.edge(0, 1).cost, Some(CostRange::new(1.0, 2.0)));
        assert_eq!(matrix.edge(1, 0).cost, None);
    }
}
