use twofloat::TwoFloat;

use super::{Dyadic, Real};

impl Real for TwoFloat {
    type Context = ();

    fn from_f64(value: f64, _: ()) -> Self {
        TwoFloat::from(value)
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        *self + *rhs
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        *self - *rhs
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        *self / *rhs
    }

    fn neg_val(&self) -> Self {
        -*self
    }

    fn sqrt_val(&self) -> Self {
        let hi = self.hi();
        if hi == 0.0 {
            return TwoFloat::from(0.0);
        }
        if hi < 0.0 || !hi.is_finite() {
            return TwoFloat::from(hi.sqrt());
        }

        // two Newton steps from the f64 root cover the 106-bit significand
        let mut x = TwoFloat::from(hi.sqrt());
        for _ in 0..2 {
            let residual = *self - x * x;
            x = x + residual / (x + x);
        }
        x
    }

    fn is_positive(&self) -> bool {
        self.hi() > 0.0
    }

    fn is_negative(&self) -> bool {
        self.hi() < 0.0
    }

    fn is_finite_val(&self) -> bool {
        self.hi().is_finite() && self.lo().is_finite()
    }

    fn approx_f64(&self) -> f64 {
        self.hi()
    }

    fn unit_roundoff(_: ()) -> f64 {
        2f64.powi(-104)
    }

    fn to_dyadic(&self) -> Option<Dyadic> {
        Dyadic::sum(&[self.hi(), self.lo()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ScientificNotation;

    fn dd(v: f64) -> TwoFloat {
        <TwoFloat as Real>::from_f64(v, ())
    }

    #[test]
    fn third_works() {
        let third = dd(1.0).div_ref(&dd(3.0));
        assert!(third.lo() != 0.0);
        assert!(third.to_scientific_notation(28).starts_with(&format!("3.{}", "3".repeat(28))));
    }

    #[test]
    fn sqrt_works() {
        let root = dd(2.0).sqrt_val();
        assert!(root.to_scientific_notation(31).starts_with("1.41421356237309504880168872420"));
        assert!(dd(-4.0).sqrt_val().approx_f64().is_nan());
        assert_eq!(dd(0.0).sqrt_val().hi(), 0.0);
    }

    #[test]
    fn sign_works() {
        assert!(dd(-1e-300).is_negative());
        assert!(dd(2.0).is_positive());
        assert!(!dd(0.0).is_positive() && !dd(0.0).is_negative());
    }
}
