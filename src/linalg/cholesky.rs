use ndarray::Array2;

use crate::error::LinalgError;
use crate::numeric::Real;

/// Cholesky-Banachiewicz factorization `B = L·Lᵀ` reading only the lower
/// triangle of `b`.
pub fn cholesky_lower<T: Real>(b: &Array2<T>, ctx: T::Context) -> Result<Array2<T>, LinalgError> {
    let n = b.nrows();
    let mut l = Array2::from_elem((n, n), T::zero(ctx));

    for i in 0..n {
        let mut sum_sq = T::zero(ctx);
        for k in 0..i {
            sum_sq = sum_sq.add_ref(&l[[i, k]].mul_ref(&l[[i, k]]));
        }

        let diag = b[[i, i]].sub_ref(&sum_sq);
        if !diag.is_positive() {
            return Err(LinalgError::NotPositiveDefinite { pivot: i });
        }
        l[[i, i]] = diag.sqrt_val();

        for j in (i + 1)..n {
            let mut sum_prod = T::zero(ctx);
            for k in 0..i {
                sum_prod = sum_prod.add_ref(&l[[j, k]].mul_ref(&l[[i, k]]));
            }
            l[[j, i]] = b[[j, i]].sub_ref(&sum_prod).div_ref(&l[[i, i]]);
        }
    }

    Ok(l)
}

/// Solves `L·X = M` by forward substitution for lower-triangular `l`.
pub fn solve_lower<T: Real>(l: &Array2<T>, m: &Array2<T>, ctx: T::Context) -> Array2<T> {
    let n = l.nrows();
    let cols = m.ncols();
    let mut x = Array2::from_elem((n, cols), T::zero(ctx));

    for j in 0..cols {
        for i in 0..n {
            let mut acc = m[[i, j]].clone();
            for k in 0..i {
                acc = acc.sub_ref(&l[[i, k]].mul_ref(&x[[k, j]]));
            }
            x[[i, j]] = acc.div_ref(&l[[i, i]]);
        }
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{assert_close, CloseEnough};
    use ndarray::array;

    #[test]
    fn cholesky_works() {
        let b = array![[4.0, 0.0, 0.0], [2.0, 5.0, 0.0], [-2.0, 1.0, 6.0]];
        let l = cholesky_lower(&b, ()).unwrap();
        let expected = array![[2.0, 0.0, 0.0], [1.0, 2.0, 0.0], [-1.0, 1.0, 2.0]];
        assert_close!(l.as_slice().unwrap(), expected.as_slice().unwrap(), 1e-12);
    }

    #[test]
    fn cholesky_rejects_indefinite() {
        let b = array![[1.0, 0.0], [2.0, 1.0]];
        match cholesky_lower(&b, ()) {
            Err(LinalgError::NotPositiveDefinite { pivot }) => assert_eq!(pivot, 1),
            other => panic!("unexpected {:?}", other),
        }
        let nan = array![[f64::NAN]];
        assert!(cholesky_lower(&nan, ()).is_err());
    }

    #[test]
    fn solve_lower_works() {
        let l = array![[2.0, 0.0], [1.0, 4.0]];
        let m = array![[2.0, 4.0], [9.0, 6.0]];
        let x = solve_lower(&l, &m, ());
        assert_close!(x.as_slice().unwrap(), [1.0, 2.0, 2.0, 1.0].as_slice(), 1e-12);
    }
}
