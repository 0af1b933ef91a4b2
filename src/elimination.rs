//! Gauss-Jordan elimination with an auditable step log.
//!
//! The elimination routines never touch their input: they clone the matrix
//! once at entry and apply all row operations to that private working copy.
//! When step recording is requested, every applied row operation is appended
//! to the log together with an owned snapshot of the matrix taken right
//! after the operation, so a presentation layer can replay the derivation.
//!
//! Pivots are selected by position: the first row at or below the cursor
//! with a non-zero entry in the current column wins. There is no
//! magnitude-based pivoting since the arithmetic is exact.

use smallvec::SmallVec;

use crate::{
    matrix::{Matrix, MatrixError},
    rational::Rational,
};

/// The ordered pivot columns found during an elimination.
pub type PivotColumns = SmallVec<[u32; 8]>;

/// One entry of the elimination log: a human-readable description of the
/// row operation (1-based row indices) and the matrix state right after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub description: String,
    pub snapshot: Matrix,
}

/// The result of a reduction to row-echelon form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduction {
    /// The matrix in reduced row-echelon form.
    pub matrix: Matrix,
    /// The pivot columns, in the order the pivots were placed.
    pub pivot_columns: PivotColumns,
    /// The ordered step log; empty when recording was not requested.
    pub steps: Vec<Step>,
}

impl Matrix {
    /// Reduce the matrix to reduced row-echelon form with Gauss-Jordan
    /// elimination, optionally recording every row operation.
    pub fn rref(&self, record_steps: bool) -> Reduction {
        let mut m = self.clone();
        let mut pivot_columns = PivotColumns::new();
        let mut steps = vec![];

        let mut r = 0;
        let mut lead = 0;
        while r < m.nrows && lead < m.ncols {
            // select the first row at or below `r` with a non-zero entry
            let Some(i) = (r..m.nrows).find(|&i| !m[(i, lead)].is_zero()) else {
                lead += 1;
                continue;
            };

            if i != r {
                m.swap_rows(r, i);
                if record_steps {
                    steps.push(Step {
                        description: format!("swap row {} and row {}", r + 1, i + 1),
                        snapshot: m.clone(),
                    });
                }
            }

            let pivot = m[(r, lead)].clone();
            if !pivot.is_one() {
                let inv = pivot.inv().expect("pivot is non-zero");
                m.scale_row(r, &inv);
                if record_steps {
                    steps.push(Step {
                        description: format!("scale row {} by {}", r + 1, inv),
                        snapshot: m.clone(),
                    });
                }
            }

            for k in 0..m.nrows {
                if k == r || m[(k, lead)].is_zero() {
                    continue;
                }
                let factor = m[(k, lead)].clone();
                m.sub_scaled_row(k, r, &factor);
                if record_steps {
                    steps.push(Step {
                        description: format!(
                            "row {} ← row {} − {} × row {}",
                            k + 1,
                            k + 1,
                            factor,
                            r + 1
                        ),
                        snapshot: m.clone(),
                    });
                }
            }

            pivot_columns.push(lead);
            r += 1;
            lead += 1;
        }

        Reduction {
            matrix: m,
            pivot_columns,
            steps,
        }
    }

    /// Compute the determinant by triangularization: forward elimination
    /// only, with a sign flip per row swap. Fails with `NotSquare` for
    /// non-square input.
    pub fn det(&self) -> Result<Rational, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let mut m = self.clone();
        let mut negate = false;
        for i in 0..m.nrows {
            let Some(p) = (i..m.nrows).find(|&p| !m[(p, i)].is_zero()) else {
                // a fully zero pivot column
                return Ok(Rational::zero());
            };
            if p != i {
                m.swap_rows(i, p);
                negate = !negate;
            }

            let pivot = m[(i, i)].clone();
            for r in i + 1..m.nrows {
                if m[(r, i)].is_zero() {
                    continue;
                }
                let factor = m[(r, i)].div(&pivot).expect("pivot is non-zero");
                m.sub_scaled_row(r, i, &factor);
            }
        }

        let mut det = if negate {
            -Rational::one()
        } else {
            Rational::one()
        };
        for i in 0..m.nrows {
            det = &det * &m[(i, i)];
        }

        Ok(det)
    }

    /// The rank: the number of non-zero rows of the reduced row-echelon form.
    pub fn rank(&self) -> usize {
        self.rref(false)
            .matrix
            .row_iter()
            .filter(|row| row.iter().any(|e| !e.is_zero()))
            .count()
    }

    /// Compute the inverse of a square matrix through the reduction of the
    /// augmented matrix `[A | I]`. Fails with `Singular` when the left block
    /// does not reduce to the identity exactly.
    pub fn inverse(&self) -> Result<Matrix, MatrixError> {
        Ok(self.invert(false)?.0)
    }

    /// Same as [inverse](Matrix::inverse), but also returns the step log of
    /// the augmented reduction.
    pub fn inverse_with_steps(&self) -> Result<(Matrix, Vec<Step>), MatrixError> {
        self.invert(true)
    }

    fn invert(&self, record_steps: bool) -> Result<(Matrix, Vec<Step>), MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let n = self.nrows;
        let aug = self
            .augment(&Matrix::identity(n))
            .expect("row counts match");
        let red = aug.rref(record_steps);

        for i in 0..n {
            for j in 0..n {
                let e = &red.matrix[(i, j)];
                let is_expected = if i == j { e.is_one() } else { e.is_zero() };
                if !is_expected {
                    return Err(MatrixError::Singular);
                }
            }
        }

        Ok((red.matrix.columns_from(n), red.steps))
    }

    /// Compute the adjugate as `det(A) * A^-1`. The determinant-zero case is
    /// rejected with `SingularAdjugate`: the adjugate of a singular matrix
    /// exists but needs cofactor expansion, which this routine does not do.
    pub fn adjugate(&self) -> Result<Matrix, MatrixError> {
        let d = self.det()?;
        if d.is_zero() {
            return Err(MatrixError::SingularAdjugate);
        }
        Ok(self.inverse()?.mul_scalar(&d))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        matrix::{Matrix, MatrixError},
        rational::Rational,
    };

    fn from_integers(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::from_nested_vec(
            rows.into_iter()
                .map(|r| r.into_iter().map(|e| e.into()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rref_canonical_form() {
        let a = from_integers(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
        let red = a.rref(false);

        assert_eq!(
            red.matrix,
            from_integers(vec![vec![1, 0, -1], vec![0, 1, 2], vec![0, 0, 0]])
        );
        assert_eq!(red.pivot_columns.as_slice(), &[0, 1]);
        assert!(red.steps.is_empty());

        // a fully zero column is skipped by the column cursor
        let b = from_integers(vec![vec![0, 1], vec![0, 2]]);
        let red = b.rref(false);
        assert_eq!(red.matrix, from_integers(vec![vec![0, 1], vec![0, 0]]));
        assert_eq!(red.pivot_columns.as_slice(), &[1]);
    }

    #[test]
    fn rref_is_idempotent() {
        for a in [
            from_integers(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]),
            from_integers(vec![vec![0, 0], vec![0, 0]]),
            from_integers(vec![vec![2, 4], vec![1, 3], vec![5, 7]]),
        ] {
            let once = a.rref(false).matrix;
            assert_eq!(once.rref(false).matrix, once);
        }
    }

    #[test]
    fn rref_step_log() {
        let a = from_integers(vec![vec![0, 2], vec![1, 3]]);
        let red = a.rref(true);

        assert_eq!(red.matrix, Matrix::identity(2));
        assert_eq!(red.pivot_columns.as_slice(), &[0, 1]);

        let descriptions: Vec<&str> =
            red.steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "swap row 1 and row 2",
                "scale row 2 by 1/2",
                "row 1 ← row 1 − 3 × row 2",
            ]
        );

        assert_eq!(
            red.steps[0].snapshot,
            from_integers(vec![vec![1, 3], vec![0, 2]])
        );
        assert_eq!(
            red.steps[1].snapshot,
            from_integers(vec![vec![1, 3], vec![0, 1]])
        );
        assert_eq!(red.steps[2].snapshot, Matrix::identity(2));

        // recording does not change the outcome
        let unrecorded = a.rref(false);
        assert_eq!(unrecorded.matrix, red.matrix);
        assert_eq!(unrecorded.pivot_columns, red.pivot_columns);
    }

    #[test]
    fn determinant() {
        for n in 1..6 {
            assert_eq!(Matrix::identity(n).det().unwrap(), Rational::one());
        }

        let a = from_integers(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(a.det().unwrap(), (-2).into());

        // swap parity
        let p = from_integers(vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(p.det().unwrap(), (-1).into());

        let zero_row = from_integers(vec![vec![1, 2], vec![0, 0]]);
        assert_eq!(zero_row.det().unwrap(), Rational::zero());

        let dependent = from_integers(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(dependent.det().unwrap(), Rational::zero());

        let rect = from_integers(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(rect.det(), Err(MatrixError::NotSquare));
    }

    #[test]
    fn rank_invariants() {
        let a = from_integers(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
        assert_eq!(a.rank(), 2);

        // permuting rows keeps the rank
        let permuted = from_integers(vec![vec![7, 8, 9], vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(permuted.rank(), a.rank());

        // scaling a row by a non-zero rational keeps the rank
        let mut scaled = a.clone();
        scaled.scale_row(1, &(-7, 3).into());
        assert_eq!(scaled.rank(), a.rank());

        assert_eq!(Matrix::identity(4).rank(), 4);
        assert_eq!(from_integers(vec![vec![0, 0], vec![0, 0]]).rank(), 0);
    }

    #[test]
    fn inverse() {
        let a = from_integers(vec![vec![1, 2], vec![3, 4]]);
        let inv = a.inverse().unwrap();
        assert_eq!(
            inv,
            Matrix::from_nested_vec(vec![
                vec![(-2).into(), 1.into()],
                vec![(3, 2).into(), (-1, 2).into()],
            ])
            .unwrap()
        );
        assert_eq!(&a * &inv, Matrix::identity(2));
        assert_eq!(&inv * &a, Matrix::identity(2));

        let singular = from_integers(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(singular.inverse(), Err(MatrixError::Singular));
        assert!(singular.det().unwrap().is_zero());

        let rect = from_integers(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(rect.inverse(), Err(MatrixError::NotSquare));

        let (inv2, steps) = a.inverse_with_steps().unwrap();
        assert_eq!(inv2, inv);
        assert!(!steps.is_empty());
        // snapshots carry the full augmented matrix
        assert_eq!(steps[0].snapshot.ncols(), 4);
    }

    #[test]
    fn adjugate() {
        let a = from_integers(vec![vec![1, 2], vec![3, 4]]);
        let adj = a.adjugate().unwrap();
        assert_eq!(adj, from_integers(vec![vec![4, -2], vec![-3, 1]]));

        // A * adj(A) = det(A) * I
        let d = a.det().unwrap();
        assert_eq!(&a * &adj, Matrix::identity(2).mul_scalar(&d));

        let singular = from_integers(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(singular.adjugate(), Err(MatrixError::SingularAdjugate));
    }
}
