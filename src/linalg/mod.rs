//! Dense generalized self-adjoint eigenvalue problems over any [`Real`].
//!
//! `A·v = λ·B·v` with `B` positive definite is reduced to the standard
//! problem `C = L⁻¹·A·L⁻ᵀ` through the Cholesky factor `B = L·Lᵀ`, and `C`
//! is diagonalized with cyclic Jacobi. Only lower triangles are read.

use ndarray::Array2;
use rand::Rng;

use crate::error::LinalgError;
use crate::numeric::{compare, Real};

mod cholesky;
mod jacobi;
pub mod lapack;

pub use cholesky::{cholesky_lower, solve_lower};
pub use jacobi::symmetric_eigenvalues;

/// `n × n` matrix of values uniform in `[-1, 1]`, drawn as f64 in row-major
/// order and lifted exactly into `T`.
pub fn random_matrix<T: Real, R: Rng>(n: usize, rng: &mut R, ctx: T::Context) -> Array2<T> {
    Array2::from_shape_fn((n, n), |_| T::from_f64(rng.gen_range(-1.0..=1.0), ctx))
}

/// `R·Rᵀ + n·I`, symmetric positive definite for any square `r`.
pub fn positive_definite_from<T: Real>(r: &Array2<T>, ctx: T::Context) -> Array2<T> {
    let n = r.nrows();
    let shift = T::from_f64(n as f64, ctx);
    let mut out = Array2::from_elem((n, n), T::zero(ctx));
    for i in 0..n {
        for j in 0..=i {
            let mut acc = if i == j { shift.clone() } else { T::zero(ctx) };
            for k in 0..r.ncols() {
                acc = acc.add_ref(&r[[i, k]].mul_ref(&r[[j, k]]));
            }
            out[[i, j]] = acc.clone();
            out[[j, i]] = acc;
        }
    }
    out
}

fn check_pencil<T>(lhs: &Array2<T>, rhs: &Array2<T>) -> Result<usize, LinalgError> {
    for m in [lhs, rhs] {
        if m.nrows() != m.ncols() {
            return Err(LinalgError::NotSquare { rows: m.nrows(), cols: m.ncols() });
        }
    }
    if lhs.nrows() != rhs.nrows() {
        return Err(LinalgError::DimensionMismatch { lhs: lhs.nrows(), rhs: rhs.nrows() });
    }
    if lhs.is_empty() {
        return Err(LinalgError::Empty);
    }
    Ok(lhs.nrows())
}

/// Eigenvalues of the pencil `(lhs, rhs)` in ascending order.
pub fn generalized_eigenvalues<T: Real>(
    lhs: &Array2<T>,
    rhs: &Array2<T>,
    ctx: T::Context,
) -> Result<Vec<T>, LinalgError> {
    let n = check_pencil(lhs, rhs)?;
    let l = cholesky_lower(rhs, ctx)?;

    let mut a = lhs.clone();
    for i in 0..n {
        for j in 0..i {
            a[[j, i]] = a[[i, j]].clone();
        }
    }

    // C = L⁻¹·(L⁻¹·A)ᵀ, since A is symmetric
    let y = solve_lower(&l, &a, ctx);
    let c = solve_lower(&l, &y.t().to_owned(), ctx);

    let mut eig = symmetric_eigenvalues(&c, ctx);
    eig.sort_by(compare);
    Ok(eig)
}
