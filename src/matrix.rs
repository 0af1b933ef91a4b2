//! Dense matrices over the rationals.
//!
//! Operations never mutate their input: each one works on a fresh copy and
//! hands the result back to the caller. Fallible variants return
//! [MatrixError]; the operator impls panic on a dimension mismatch, in the
//! same way scalar overflow panics, for use where the shapes are known to be
//! compatible.

use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
    slice::Chunks,
};

use crate::rational::{Rational, RationalError};

/// Errors that can occur when performing matrix operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// The operand shapes are incompatible for the requested operation.
    DimensionMismatch,
    /// A square-matrix-only operation was invoked on a non-square matrix.
    NotSquare,
    /// The matrix has no inverse.
    Singular,
    /// The adjugate of a singular matrix is not supported by the
    /// inverse-based algorithm used here.
    SingularAdjugate,
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::DimensionMismatch => {
                write!(f, "The shapes of the matrices are not compatible")
            }
            MatrixError::NotSquare => write!(f, "The matrix is not square"),
            MatrixError::Singular => write!(f, "The matrix is singular"),
            MatrixError::SingularAdjugate => write!(
                f,
                "The matrix is singular; the adjugate exists but requires cofactor expansion"
            ),
        }
    }
}

impl std::error::Error for MatrixError {}

/// A dense matrix with rational entries, stored in row-major order.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix {
    pub(crate) data: Vec<Rational>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
}

impl Matrix {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    /// Both counts must be at least one.
    pub fn new(nrows: u32, ncols: u32) -> Matrix {
        debug_assert!(nrows >= 1 && ncols >= 1);
        Matrix {
            data: vec![Rational::zero(); nrows as usize * ncols as usize],
            nrows,
            ncols,
        }
    }

    /// Create the `nrows`x`nrows` matrix with ones on the main diagonal and
    /// zeroes elsewhere. `nrows` must be at least one.
    pub fn identity(nrows: u32) -> Matrix {
        debug_assert!(nrows >= 1);
        Matrix {
            data: (0..nrows as usize * nrows as usize)
                .map(|i| {
                    if i % nrows as usize == i / nrows as usize {
                        Rational::one()
                    } else {
                        Rational::zero()
                    }
                })
                .collect(),
            nrows,
            ncols: nrows,
        }
    }

    /// Convert a linear row-major representation of a matrix to a `Matrix`.
    pub fn from_linear(data: Vec<Rational>, nrows: u32, ncols: u32) -> Result<Matrix, MatrixError> {
        if nrows == 0 || ncols == 0 || data.len() != nrows as usize * ncols as usize {
            return Err(MatrixError::DimensionMismatch);
        }
        Ok(Matrix { data, nrows, ncols })
    }

    /// Create a new matrix from a non-empty rectangular nested vector.
    pub fn from_nested_vec(matrix: Vec<Vec<Rational>>) -> Result<Matrix, MatrixError> {
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);
        if cols == 0 {
            return Err(MatrixError::DimensionMismatch);
        }

        let mut data = Vec::with_capacity(matrix.len() * cols);
        for row in matrix {
            if row.len() != cols {
                return Err(MatrixError::DimensionMismatch);
            }
            data.extend(row);
        }

        Ok(Matrix {
            nrows: (data.len() / cols) as u32,
            ncols: cols as u32,
            data,
        })
    }

    /// Parse a matrix from text: rows are separated by newlines or `;`,
    /// entries by whitespace or commas. Each entry is an integer, decimal or
    /// fraction literal. Blank rows are skipped.
    pub fn parse(text: &str) -> Result<Matrix, RationalError> {
        let mut rows: Vec<Vec<Rational>> = vec![];
        for line in text.split(|c: char| c == '\n' || c == ';') {
            let entries = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .map(str::parse)
                .collect::<Result<Vec<Rational>, _>>()?;
            if !entries.is_empty() {
                rows.push(entries);
            }
        }

        if rows.is_empty() {
            return Err(RationalError::Parse("the matrix is empty".into()));
        }
        let cols = rows[0].len();
        if rows.iter().any(|r| r.len() != cols) {
            return Err(RationalError::Parse(
                "the rows have unequal lengths".into(),
            ));
        }

        let nrows = rows.len() as u32;
        Ok(Matrix {
            data: rows.into_iter().flatten().collect(),
            nrows,
            ncols: cols as u32,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, Rational> {
        self.data.chunks(self.ncols as usize)
    }

    /// Element-wise sum. Fails with `DimensionMismatch` unless both operands
    /// have identical dimensions.
    pub fn checked_add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(MatrixError::DimensionMismatch);
        }

        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Element-wise difference. Fails with `DimensionMismatch` unless both
    /// operands have identical dimensions.
    pub fn checked_sub(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(MatrixError::DimensionMismatch);
        }

        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Matrix product. Fails with `DimensionMismatch` unless the left column
    /// count equals the right row count. Every output cell is accumulated
    /// left to right, which fixes a deterministic evaluation order.
    pub fn checked_mul(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.ncols != rhs.nrows {
            return Err(MatrixError::DimensionMismatch);
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols);
        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut sum = Rational::zero();
                for k in 0..self.ncols {
                    sum = &sum + &(&self[(i, k)] * &rhs[(k, j)]);
                }
                m[(i, j)] = sum;
            }
        }

        Ok(m)
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix {
        let mut m = Matrix::new(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                m[(j, i)] = self[(i, j)].clone();
            }
        }
        m
    }

    /// Multiply the scalar `e` into each entry of the matrix.
    pub fn mul_scalar(&self, e: &Rational) -> Matrix {
        Matrix {
            data: self.data.iter().map(|ee| ee * e).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Horizontal concatenation `[self | right]`. Fails with
    /// `DimensionMismatch` unless the row counts match.
    pub fn augment(&self, right: &Matrix) -> Result<Matrix, MatrixError> {
        if self.nrows != right.nrows {
            return Err(MatrixError::DimensionMismatch);
        }

        let ncols = self.ncols + right.ncols;
        let mut data = Vec::with_capacity(self.nrows as usize * ncols as usize);
        for r in 0..self.nrows {
            data.extend_from_slice(&self[r]);
            data.extend_from_slice(&right[r]);
        }

        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols,
        })
    }

    /// Raise a square matrix to an integer power with square-and-multiply.
    /// `n == 0` yields the identity; a negative `n` inverts first and
    /// propagates `Singular` when no inverse exists.
    pub fn pow(&self, n: i64) -> Result<Matrix, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let mut base = if n < 0 { self.inverse()? } else { self.clone() };
        let mut result = Matrix::identity(self.nrows);
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }

        Ok(result)
    }

    /// Copy out the columns from `from` onward.
    pub(crate) fn columns_from(&self, from: u32) -> Matrix {
        debug_assert!(from < self.ncols);
        let ncols = self.ncols - from;
        let mut data = Vec::with_capacity(self.nrows as usize * ncols as usize);
        for r in 0..self.nrows {
            data.extend_from_slice(&self[r][from as usize..]);
        }
        Matrix {
            data,
            nrows: self.nrows,
            ncols,
        }
    }

    pub(crate) fn swap_rows(&mut self, a: u32, b: u32) {
        for c in 0..self.ncols {
            self.data.swap(
                (a * self.ncols + c) as usize,
                (b * self.ncols + c) as usize,
            );
        }
    }

    /// Multiply row `r` by the factor `e`.
    pub(crate) fn scale_row(&mut self, r: u32, e: &Rational) {
        for c in 0..self.ncols {
            let v = &self[(r, c)] * e;
            self[(r, c)] = v;
        }
    }

    /// Subtract `factor` times row `source` from row `target`.
    pub(crate) fn sub_scaled_row(&mut self, target: u32, source: u32, factor: &Rational) {
        for c in 0..self.ncols {
            let v = &self[(target, c)] - &(factor * &self[(source, c)]);
            self[(target, c)] = v;
        }
    }
}

impl Index<u32> for Matrix {
    type Output = [Rational];

    /// Get the `index`th row of the matrix.
    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        &self.data[(index * self.ncols) as usize..((index + 1) * self.ncols) as usize]
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = Rational;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut Rational {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl Add<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Add two matrices. Panics on a dimension mismatch.
    fn add(self, rhs: &Matrix) -> Matrix {
        match self.checked_add(rhs) {
            Ok(m) => m,
            Err(_) => panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            ),
        }
    }
}

impl Sub<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Subtract two matrices. Panics on a dimension mismatch.
    fn sub(self, rhs: &Matrix) -> Matrix {
        match self.checked_sub(rhs) {
            Ok(m) => m,
            Err(_) => panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            ),
        }
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Multiply two matrices. Panics on a dimension mismatch.
    fn mul(self, rhs: &Matrix) -> Matrix {
        match self.checked_mul(rhs) {
            Ok(m) => m,
            Err(_) => panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            ),
        }
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Matrix {
        for e in &mut self.data {
            *e = -&*e;
        }
        self
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", e)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
