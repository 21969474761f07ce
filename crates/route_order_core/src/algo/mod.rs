pub(crate) mod exhaustive;
pub(crate) mod held_karp;
pub(crate) mod nearest_neighbor;
pub(crate) mod two_opt;

#[cfg(test)]
pub(crate) mod test_support {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::matrix::CostMatrix;

    /// Asymmetric matrix of whole-second durations, so sums are exact in f64.
    pub(crate) fn random_matrix(n: usize, seed: u64) -> CostMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let durations: Vec<Vec<f64>> = (0..n)
            .map(|from| {
                (0..n)
                    .map(|to| {
                        if from == to {
                            0.0
                        } else {
                            f64::from(rng.gen_range(30_u32..3_600))
                        }
                    })
                    .collect()
            })
            .collect();
        CostMatrix::from_durations(&durations)
    }

    pub(crate) fn sorted(mut values: Vec<usize>) -> Vec<usize> {
        values.sort_unstable();
        values
    }
}
