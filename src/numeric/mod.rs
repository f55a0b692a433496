use std::cmp::Ordering;
use std::fmt::Debug;

pub mod decimal;
pub mod double_double;
pub mod mpfr;
pub mod quad_double;

pub use decimal::Dyadic;
pub use quad_double::QuadDouble;

/// Arithmetic needed by the generalized eigenvalue solver.
///
/// Values are built from an explicit [`Real::Context`] (the working
/// precision for arbitrary-precision types, `()` for fixed-width ones), so
/// no computation depends on process-wide numeric state.
pub trait Real: Clone + Debug {
    /// Construction parameters shared by every value of one computation.
    type Context: Copy + Debug;

    fn from_f64(value: f64, ctx: Self::Context) -> Self;

    fn zero(ctx: Self::Context) -> Self {
        Self::from_f64(0.0, ctx)
    }

    fn one(ctx: Self::Context) -> Self {
        Self::from_f64(1.0, ctx)
    }

    fn add_ref(&self, rhs: &Self) -> Self;
    fn sub_ref(&self, rhs: &Self) -> Self;
    fn mul_ref(&self, rhs: &Self) -> Self;
    fn div_ref(&self, rhs: &Self) -> Self;
    fn neg_val(&self) -> Self;
    fn sqrt_val(&self) -> Self;

    fn abs_val(&self) -> Self {
        if self.is_negative() {
            self.neg_val()
        } else {
            self.clone()
        }
    }

    /// Strictly greater than zero. False for NaN.
    fn is_positive(&self) -> bool;
    /// Strictly less than zero. False for NaN.
    fn is_negative(&self) -> bool;
    fn is_finite_val(&self) -> bool;

    /// Nearest f64, used for tolerances and reporting only.
    fn approx_f64(&self) -> f64;

    /// Relative spacing of the representation at the given context.
    fn unit_roundoff(ctx: Self::Context) -> f64;

    /// Exact value as a dyadic rational, `None` for NaN and infinities.
    fn to_dyadic(&self) -> Option<Dyadic>;
}

/// Total order on finite values through the sign of the exact difference.
///
/// Values that compare unordered (NaN) are treated as equal.
pub fn compare<T: Real>(lhs: &T, rhs: &T) -> Ordering {
    let diff = lhs.sub_ref(rhs);
    if diff.is_negative() {
        Ordering::Less
    } else if diff.is_positive() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Real for f64 {
    type Context = ();

    fn from_f64(value: f64, _: ()) -> Self {
        value
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        self / rhs
    }

    fn neg_val(&self) -> Self {
        -self
    }

    fn sqrt_val(&self) -> Self {
        f64::sqrt(*self)
    }

    fn is_positive(&self) -> bool {
        *self > 0.0
    }

    fn is_negative(&self) -> bool {
        *self < 0.0
    }

    fn is_finite_val(&self) -> bool {
        f64::is_finite(*self)
    }

    fn approx_f64(&self) -> f64 {
        *self
    }

    fn unit_roundoff(_: ()) -> f64 {
        f64::EPSILON
    }

    fn to_dyadic(&self) -> Option<Dyadic> {
        Dyadic::from_f64(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_works() {
        assert_eq!(compare(&1.0, &2.0), Ordering::Less);
        assert_eq!(compare(&-1.0, &-2.0), Ordering::Greater);
        assert_eq!(compare(&0.5, &0.5), Ordering::Equal);
        assert_eq!(compare(&f64::NAN, &0.5), Ordering::Equal);
    }

    #[test]
    fn abs_val_works() {
        assert_eq!((-3.5f64).abs_val(), 3.5);
        assert_eq!(2.0f64.abs_val(), 2.0);
    }
}
