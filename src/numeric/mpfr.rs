use std::cmp::Ordering;

use rug::Float;

use super::{Dyadic, Real};

/// Working precision used when none is configured.
pub const DEFAULT_BITS: u32 = 128;

impl Real for Float {
    type Context = u32;

    fn from_f64(value: f64, bits: u32) -> Self {
        Float::with_val(bits, value)
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        Float::with_val(self.prec(), self + rhs)
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        Float::with_val(self.prec(), self - rhs)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        Float::with_val(self.prec(), self * rhs)
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        Float::with_val(self.prec(), self / rhs)
    }

    fn neg_val(&self) -> Self {
        Float::with_val(self.prec(), -self)
    }

    fn sqrt_val(&self) -> Self {
        Float::with_val(self.prec(), self.sqrt_ref())
    }

    fn is_positive(&self) -> bool {
        self.cmp0() == Some(Ordering::Greater)
    }

    fn is_negative(&self) -> bool {
        self.cmp0() == Some(Ordering::Less)
    }

    fn is_finite_val(&self) -> bool {
        Float::is_finite(self)
    }

    fn approx_f64(&self) -> f64 {
        Float::to_f64(self)
    }

    fn unit_roundoff(bits: u32) -> f64 {
        2f64.powi(1 - bits as i32)
    }

    fn to_dyadic(&self) -> Option<Dyadic> {
        let (mantissa, exp) = self.to_integer_exp()?;
        Some(Dyadic::new(mantissa, exp as i64))
    }
}
