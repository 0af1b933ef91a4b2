//! Ratmat is an exact linear-algebra engine over arbitrary-precision
//! rational numbers.
//!
//! It performs matrix sums, products, transposes, determinants, ranks,
//! inverses, adjugates, integer powers, reductions to row-echelon form and
//! linear-system solving, all in exact arithmetic. Elimination can record
//! the elementary row operations it applies, together with a snapshot of
//! the matrix after each one, so a caller can render the derivation step
//! by step.
//!
//! For example:
//!
//! ```
//! use ratmat::{matrix::Matrix, solver::SolutionKind};
//!
//! fn main() {
//!     let a = Matrix::parse("1 2; 3 4").unwrap();
//!     let b = Matrix::parse("5; 6").unwrap();
//!
//!     let sol = a.solve(&b).unwrap();
//!     if let SolutionKind::Unique(x) = &sol.kind {
//!         println!("x = {}", x);
//!         for step in &sol.steps {
//!             println!("{}:\n{}", step.description, step.snapshot);
//!         }
//!     }
//! }
//! ```

pub mod elimination;
pub mod matrix;
pub mod rational;
pub mod solver;
pub mod utils;
