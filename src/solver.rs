//! Linear-system solving with solution-set classification.
//!
//! `A x = B` is solved by reducing the augmented matrix `[A | B]` to reduced
//! row-echelon form with step recording. The result is classified as exactly
//! one of: inconsistent (a contradictory row), infinite (free variables
//! remain) or unique. For an infinite solution set with a single right-hand
//! column, the solution can be parameterized over fresh parameters, one per
//! free column.

use smartstring::{LazyCompact, SmartString};

use crate::{
    elimination::{PivotColumns, Step},
    matrix::{Matrix, MatrixError},
    rational::Rational,
};

/// The classification of the solution set of a linear system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolutionKind {
    /// Exactly one solution; the matrix holds one column per right-hand column.
    Unique(Matrix),
    /// No solution: some row reduced to `0 = c` with `c` non-zero.
    Inconsistent,
    /// Free variables remain, so there are infinitely many solutions.
    Infinite,
}

/// The outcome of solving `A x = B`, with the full derivation attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearSolution {
    pub kind: SolutionKind,
    /// The reduced row-echelon form of the augmented matrix `[A | B]`.
    pub rref: Matrix,
    pub pivot_columns: PivotColumns,
    /// The ordered row operations that produced `rref`.
    pub steps: Vec<Step>,
    pub(crate) lhs_columns: u32,
    pub(crate) rhs_columns: u32,
}

/// The expression of a single solution variable in terms of the free
/// parameters: `constant + Σ coefficient · parameter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableExpression {
    pub constant: Rational,
    /// Pairs of (parameter index, coefficient), in parameter order.
    pub terms: Vec<(usize, Rational)>,
}

/// A parameterization of an infinite solution set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameterization {
    /// Fresh parameter names (`t1`, `t2`, ...), one per free column.
    pub parameters: Vec<SmartString<LazyCompact>>,
    /// The non-pivot columns of `A`, in ascending order.
    pub free_columns: Vec<u32>,
    /// One expression per variable, in column order of `A`.
    pub variables: Vec<VariableExpression>,
}

impl Matrix {
    /// Solve `A x = B` for `x`, where `A` is `self`. Fails with
    /// `DimensionMismatch` unless the row counts agree. Classification never
    /// fails: contradictory and underdetermined systems are reported through
    /// [SolutionKind].
    pub fn solve(&self, b: &Matrix) -> Result<LinearSolution, MatrixError> {
        let aug = self.augment(b)?;
        let red = aug.rref(true);
        let m = red.matrix;
        let lhs = self.ncols;

        // a row that is zero on the left but not on the right is contradictory
        let inconsistent = (0..m.nrows).any(|r| {
            (0..lhs).all(|c| m[(r, c)].is_zero()) && (lhs..m.ncols).any(|c| !m[(r, c)].is_zero())
        });

        let kind = if inconsistent {
            SolutionKind::Inconsistent
        } else if (red.pivot_columns.len() as u32) < lhs {
            SolutionKind::Infinite
        } else {
            SolutionKind::Unique(m.columns_from(lhs))
        };

        Ok(LinearSolution {
            kind,
            rref: m,
            pivot_columns: red.pivot_columns,
            steps: red.steps,
            lhs_columns: lhs,
            rhs_columns: b.ncols,
        })
    }
}

impl LinearSolution {
    /// The number of columns of `A`; the columns of `rref` to its right
    /// belong to the right-hand side.
    pub fn lhs_columns(&self) -> usize {
        self.lhs_columns as usize
    }

    /// Parameterize an infinite solution set: each free column gets a fresh
    /// parameter, pivot variables become the right-hand constant minus the
    /// free-column contributions of their row, and free variables are
    /// themselves. Returns `None` unless the kind is `Infinite` and the
    /// right-hand side has exactly one column.
    pub fn parameterize(&self) -> Option<Parameterization> {
        if self.kind != SolutionKind::Infinite || self.rhs_columns != 1 {
            return None;
        }

        let lhs = self.lhs_columns;
        let free_columns: Vec<u32> = (0..lhs)
            .filter(|c| !self.pivot_columns.contains(c))
            .collect();
        let parameters: Vec<SmartString<LazyCompact>> = (1..=free_columns.len())
            .map(|i| format!("t{}", i).into())
            .collect();

        let mut variables = vec![
            VariableExpression {
                constant: Rational::zero(),
                terms: vec![],
            };
            lhs as usize
        ];
        for (i, &c) in free_columns.iter().enumerate() {
            variables[c as usize].terms.push((i, Rational::one()));
        }

        for r in 0..self.rref.nrows() as u32 {
            // the leading entry of a non-zero row is its pivot
            let Some(pivot_col) = (0..lhs).find(|&c| !self.rref[(r, c)].is_zero()) else {
                continue;
            };

            let mut expr = VariableExpression {
                constant: self.rref[(r, lhs)].clone(),
                terms: vec![],
            };
            for (i, &fc) in free_columns.iter().enumerate() {
                let coefficient = &self.rref[(r, fc)];
                if !coefficient.is_zero() {
                    expr.terms.push((i, -coefficient));
                }
            }
            variables[pivot_col as usize] = expr;
        }

        Some(Parameterization {
            parameters,
            free_columns,
            variables,
        })
    }
}
