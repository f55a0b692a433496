//! Quad-double arithmetic: a value is the unevaluated sum of four
//! non-overlapping f64 components, largest first, giving roughly 212
//! significant bits.
//!
//! Every operation first forms the exact result as a floating-point
//! expansion (Shewchuk's error-free transformations), then compresses it
//! and keeps the four leading components.

use super::{Dyadic, Real};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadDouble([f64; 4]);

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Requires `|a| >= |b|` (or `a == 0`).
#[inline]
fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (s, b - (s - a))
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    (p, a.mul_add(b, -p))
}

/// Adds `term` to a non-overlapping expansion kept in increasing magnitude.
fn grow(expansion: &mut Vec<f64>, term: f64) {
    let mut q = term;
    let mut next = Vec::with_capacity(expansion.len() + 1);
    for &e in expansion.iter() {
        let (s, err) = two_sum(q, e);
        q = s;
        if err != 0.0 {
            next.push(err);
        }
    }
    if q != 0.0 || next.is_empty() {
        next.push(q);
    }
    *expansion = next;
}

/// Shewchuk's COMPRESS: the largest output component approximates the
/// whole sum to within its own rounding error.
fn compress(e: &[f64]) -> Vec<f64> {
    let m = e.len();
    if m == 0 {
        return Vec::new();
    }

    let mut g = vec![0.0; m];
    let mut bottom = m - 1;
    let mut q = e[m - 1];
    for i in (0..m - 1).rev() {
        let (sum, err) = fast_two_sum(q, e[i]);
        if err != 0.0 {
            g[bottom] = sum;
            bottom -= 1;
            q = err;
        } else {
            q = sum;
        }
    }
    g[bottom] = q;

    let mut h = Vec::with_capacity(m);
    for &gi in &g[bottom + 1..] {
        let (sum, err) = fast_two_sum(gi, q);
        if err != 0.0 {
            h.push(err);
        }
        q = sum;
    }
    h.push(q);
    h
}

impl QuadDouble {
    pub const ZERO: QuadDouble = QuadDouble([0.0; 4]);

    pub fn components(&self) -> [f64; 4] {
        self.0
    }

    /// Rounds the exact sum of `terms` to a quad-double.
    fn from_terms(terms: &[f64]) -> QuadDouble {
        let mut expansion = Vec::with_capacity(terms.len());
        for &t in terms {
            if t != 0.0 {
                grow(&mut expansion, t);
            }
        }

        let compressed = compress(&expansion);
        let mut c = [0.0; 4];
        for (slot, &v) in c.iter_mut().zip(compressed.iter().rev()) {
            *slot = v;
        }
        QuadDouble(c)
    }

    fn lead(&self) -> f64 {
        self.0[0]
    }

    fn add(&self, rhs: &QuadDouble) -> QuadDouble {
        if !self.lead().is_finite() || !rhs.lead().is_finite() {
            return QuadDouble::from(self.lead() + rhs.lead());
        }
        let [a0, a1, a2, a3] = self.0;
        let [b0, b1, b2, b3] = rhs.0;
        QuadDouble::from_terms(&[a3, b3, a2, b2, a1, b1, a0, b0])
    }

    fn neg(&self) -> QuadDouble {
        let [a0, a1, a2, a3] = self.0;
        QuadDouble([-a0, -a1, -a2, -a3])
    }

    fn mul_f64(&self, rhs: f64) -> QuadDouble {
        if !self.lead().is_finite() || !rhs.is_finite() {
            return QuadDouble::from(self.lead() * rhs);
        }
        let mut terms = [0.0; 8];
        for (i, &a) in self.0.iter().enumerate() {
            let (p, err) = two_prod(a, rhs);
            terms[2 * i] = p;
            terms[2 * i + 1] = err;
        }
        QuadDouble::from_terms(&terms)
    }

    fn mul(&self, rhs: &QuadDouble) -> QuadDouble {
        if !self.lead().is_finite() || !rhs.lead().is_finite() {
            return QuadDouble::from(self.lead() * rhs.lead());
        }
        let a = &self.0;
        let b = &rhs.0;

        // pairs with i + j <= 3 exactly, i + j == 4 rounded; the rest is
        // below the precision of the result
        let mut terms = Vec::with_capacity(23);
        for i in 0..4 {
            for j in 0..4 - i {
                let (p, err) = two_prod(a[i], b[j]);
                terms.push(p);
                terms.push(err);
            }
        }
        terms.push(a[1] * b[3]);
        terms.push(a[2] * b[2]);
        terms.push(a[3] * b[1]);

        QuadDouble::from_terms(&terms)
    }

    fn div(&self, rhs: &QuadDouble) -> QuadDouble {
        let b0 = rhs.lead();
        if b0 == 0.0 || !b0.is_finite() || !self.lead().is_finite() {
            return QuadDouble::from(self.lead() / b0);
        }

        // long division, one f64 digit of quotient at a time
        let mut quotient = [0.0; 5];
        let mut rem = *self;
        for q in quotient.iter_mut() {
            *q = rem.lead() / b0;
            rem = rem.add(&rhs.mul_f64(*q).neg());
        }
        QuadDouble::from_terms(&quotient)
    }

    fn sqrt(&self) -> QuadDouble {
        let a0 = self.lead();
        if a0 == 0.0 {
            return QuadDouble::ZERO;
        }
        if a0 < 0.0 || !a0.is_finite() {
            return QuadDouble::from(a0.sqrt());
        }

        // Newton on x² = a: each step doubles the correct bits (53, 106, 212)
        let mut x = QuadDouble::from(a0.sqrt());
        for _ in 0..3 {
            let residual = self.add(&x.mul(&x).neg());
            x = x.add(&residual.div(&x.mul_f64(2.0)));
        }
        x
    }
}

impl From<f64> for QuadDouble {
    fn from(value: f64) -> Self {
        QuadDouble([value, 0.0, 0.0, 0.0])
    }
}

impl Real for QuadDouble {
    type Context = ();

    fn from_f64(value: f64, _: ()) -> Self {
        QuadDouble::from(value)
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        self.add(rhs)
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        self.mul(rhs)
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        self.div(rhs)
    }

    fn neg_val(&self) -> Self {
        self.neg()
    }

    fn sqrt_val(&self) -> Self {
        self.sqrt()
    }

    fn is_positive(&self) -> bool {
        self.lead() > 0.0
    }

    fn is_negative(&self) -> bool {
        self.lead() < 0.0
    }

    fn is_finite_val(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    fn approx_f64(&self) -> f64 {
        self.lead()
    }

    fn unit_roundoff(_: ()) -> f64 {
        2f64.powi(-209)
    }

    fn to_dyadic(&self) -> Option<Dyadic> {
        Dyadic::sum(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ScientificNotation;

    const SQRT_2: &str = "1.41421356237309504880168872420969807856967187537694";

    fn qd(v: f64) -> QuadDouble {
        QuadDouble::from(v)
    }

    #[test]
    fn add_is_exact_below_f64_precision() {
        let tiny = 2f64.powi(-150);
        let sum = qd(1.0).add_ref(&qd(tiny));
        assert_eq!(sum.components()[0], 1.0);
        assert_eq!(sum.components()[1], tiny);
        assert_eq!(sum.sub_ref(&qd(1.0)), qd(tiny));
    }

    #[test]
    fn third_times_three_works() {
        let third = qd(1.0).div_ref(&qd(3.0));
        let back = third.mul_ref(&qd(3.0)).sub_ref(&qd(1.0));
        assert!(back.approx_f64().abs() < 1e-62);
        assert!(third.to_scientific_notation(60).starts_with(&format!("3.{}", "3".repeat(58))));
    }

    #[test]
    fn sqrt_works() {
        let root = qd(2.0).sqrt_val();
        assert!(root.to_scientific_notation(58).starts_with(SQRT_2));
        let residual = root.mul_ref(&root).sub_ref(&qd(2.0));
        assert!(residual.approx_f64().abs() < 1e-61);
    }

    #[test]
    fn special_values_works() {
        assert_eq!(qd(0.0).sqrt_val(), QuadDouble::ZERO);
        assert!(qd(-1.0).sqrt_val().approx_f64().is_nan());
        assert!(!qd(1.0).div_ref(&qd(0.0)).is_finite_val());
        assert!(qd(-2.0).is_negative());
        assert!(!qd(0.0).is_positive());
    }

    #[test]
    fn compress_works() {
        let e = [2f64.powi(-60), 1.0, 2f64.powi(60)];
        let h = compress(&e);
        assert_eq!(h.last(), Some(&2f64.powi(60)));
        let total = Dyadic::sum(&h).unwrap();
        assert_eq!(total, Dyadic::sum(&e).unwrap());
    }
}
