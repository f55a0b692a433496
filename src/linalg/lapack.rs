use ndarray::Array2;
use ndarray_linalg::{EighInto, UPLO};

use crate::error::LinalgError;

/// Ascending eigenvalues of the pencil `(lhs, rhs)` through `dsygv`.
pub fn generalized_eigenvalues(lhs: &Array2<f64>, rhs: &Array2<f64>) -> Result<Vec<f64>, LinalgError> {
    super::check_pencil(lhs, rhs)?;
    let (eig, _) = (lhs.to_owned(), rhs.to_owned()).eigh_into(UPLO::Lower)?;
    Ok(eig.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{assert_close, CloseEnough};
    use ndarray::array;

    #[test]
    fn lapack_works() {
        // upper triangles are ignored
        let a = array![[2.0, 9.0], [1.0, 2.0]];
        let b = array![[1.0, -5.0], [0.0, 1.0]];
        let eig = generalized_eigenvalues(&a, &b).unwrap();
        assert_close!(eig, vec![1.0, 3.0], 1e-12);
    }

    #[test]
    fn lapack_checks_shapes() {
        let a = Array2::<f64>::eye(2);
        let b = Array2::<f64>::eye(3);
        assert!(matches!(
            generalized_eigenvalues(&a, &b),
            Err(LinalgError::DimensionMismatch { lhs: 2, rhs: 3 })
        ));
    }
}
