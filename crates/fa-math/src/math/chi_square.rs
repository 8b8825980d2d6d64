//! Chi-square test of independence for 2×2 contingency tables.
//!
//! The statistic follows Pearson's definition with optional Yates continuity
//! correction (each observed cell moves toward its expected count by at most
//! 0.5). Tail probabilities come from the regularized upper incomplete gamma:
//! `P(X > x) = Q(k/2, x/2)` for `X ~ χ²(k)`.

use serde::{Deserialize, Serialize};

use super::gamma::gamma_q;

/// Survival function of the chi-square distribution with `dof` degrees of freedom.
pub fn chi_square_sf(x: f64, dof: f64) -> f64 {
    if x.is_nan() || dof.is_nan() || dof <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    gamma_q(dof / 2.0, x / 2.0)
}

/// Observed counts laid out as `[[row0_col0, row0_col1], [row1_col0, row1_col1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub observed: [[f64; 2]; 2],
}

/// Outcome of a chi-square independence test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: u32,
}

impl ContingencyTable {
    pub fn new(observed: [[f64; 2]; 2]) -> Self {
        Self { observed }
    }

    /// Grand total of all four cells.
    pub fn total(&self) -> f64 {
        self.observed.iter().flatten().sum()
    }

    fn row_sums(&self) -> [f64; 2] {
        [
            self.observed[0][0] + self.observed[0][1],
            self.observed[1][0] + self.observed[1][1],
        ]
    }

    fn col_sums(&self) -> [f64; 2] {
        [
            self.observed[0][0] + self.observed[1][0],
            self.observed[0][1] + self.observed[1][1],
        ]
    }

    /// Expected counts under independence: `row_sum * col_sum / total`.
    ///
    /// Returns None when the table is empty.
    pub fn expected(&self) -> Option<[[f64; 2]; 2]> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let rows = self.row_sums();
        let cols = self.col_sums();
        let mut out = [[0.0; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = rows[i] * cols[j] / total;
            }
        }
        Some(out)
    }

    /// Run the independence test.
    ///
    /// Returns None when any expected count is zero (an entire row or column
    /// of the table is empty), where the statistic is undefined.
    pub fn chi_square(&self, yates_correction: bool) -> Option<ChiSquareTest> {
        let expected = self.expected()?;
        if expected.iter().flatten().any(|&e| e <= 0.0) {
            return None;
        }

        let mut statistic = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                let mut observed = self.observed[i][j];
                let exp = expected[i][j];
                if yates_correction {
                    let diff = exp - observed;
                    observed += diff.signum() * diff.abs().min(0.5);
                }
                statistic += (observed - exp).powi(2) / exp;
            }
        }

        Some(ChiSquareTest {
            statistic,
            p_value: chi_square_sf(statistic, 1.0),
            dof: 1,
        })
    }
}
