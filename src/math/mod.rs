use crate::numeric::Real;

pub mod objective;

pub trait ScientificNotation {
    fn to_scientific_notation(&self, prec: usize) -> String;
}

/// Exact rendering with `prec` digits after the point; NaN and infinities
/// print the way f64 does.
impl<T> ScientificNotation for T
where
    T: Real,
{
    fn to_scientific_notation(&self, prec: usize) -> String {
        match self.to_dyadic() {
            Some(d) => d.to_scientific(prec),
            None => format!("{}", self.approx_f64()),
        }
    }
}

pub trait CloseEnough {
    fn close_enough(&self, other: &Self, tol: f64) -> bool;
}

impl CloseEnough for f64 {
    fn close_enough(&self, other: &Self, tol: f64) -> bool {
        let diff = (*self - *other).abs();
        diff < tol
    }
}

impl<T> CloseEnough for [T]
where T: CloseEnough {
    fn close_enough(&self, other: &Self, tol: f64) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a.close_enough(b, tol))
    }
}

#[allow(unused_macros)]
macro_rules! assert_close {
    ($a:expr, $b:expr, $tol:expr) => {
        if !($a.close_enough(&$b, $tol)) {
            panic!("assertion failed: `(left == right)` \
                (left: `{:?}`, right: `{:?}`, tolerance: `{:?}`)",
                $a, $b, $tol);
        }
    };
    // Variation where tol is defaulted to 1e-5
    ($a:expr, $b:expr) => {
        assert_close!($a, $b, 1e-5);
    };
}

#[allow(unused_imports)]
pub(crate) use assert_close;
