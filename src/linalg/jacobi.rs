use ndarray::Array2;
use tracing::{debug, warn};

use crate::numeric::Real;

const MAX_SWEEPS: usize = 60;

/// Jacobi rotation parameters (cosine and sine of rotation angle).
///
/// ```text
/// θ = (a_qq - a_pp) / (2 a_pq)
/// t = sign(θ) / (|θ| + sqrt(1 + θ²))
/// c = 1 / sqrt(1 + t²)
/// s = t c
/// ```
struct Rotation<T> {
    c: T,
    s: T,
}

impl<T: Real> Rotation<T> {
    fn compute(a_pp: &T, a_qq: &T, a_pq: &T, ctx: T::Context) -> Self {
        let one = T::one(ctx);
        let two = T::from_f64(2.0, ctx);

        let theta = a_qq.sub_ref(a_pp).div_ref(&two.mul_ref(a_pq));
        let hyp = one.add_ref(&theta.mul_ref(&theta)).sqrt_val();
        let mut t = one.div_ref(&theta.abs_val().add_ref(&hyp));
        if theta.is_negative() {
            t = t.neg_val();
        }

        let c = one.div_ref(&one.add_ref(&t.mul_ref(&t)).sqrt_val());
        let s = t.mul_ref(&c);
        Rotation { c, s }
    }

    /// `A ← Jᵀ·A·J` on the full symmetric matrix, then clears `(p, q)`.
    fn apply(&self, a: &mut Array2<T>, p: usize, q: usize, ctx: T::Context) {
        let n = a.nrows();
        for k in 0..n {
            let akp = a[[k, p]].clone();
            let akq = a[[k, q]].clone();
            a[[k, p]] = self.c.mul_ref(&akp).sub_ref(&self.s.mul_ref(&akq));
            a[[k, q]] = self.s.mul_ref(&akp).add_ref(&self.c.mul_ref(&akq));
        }
        for k in 0..n {
            let apk = a[[p, k]].clone();
            let aqk = a[[q, k]].clone();
            a[[p, k]] = self.c.mul_ref(&apk).sub_ref(&self.s.mul_ref(&aqk));
            a[[q, k]] = self.s.mul_ref(&apk).add_ref(&self.c.mul_ref(&aqk));
        }
        a[[p, q]] = T::zero(ctx);
        a[[q, p]] = T::zero(ctx);
    }
}

fn max_off_diagonal<T: Real>(a: &Array2<T>) -> f64 {
    let n = a.nrows();
    let mut max = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            max = max.max(a[[i, j]].abs_val().approx_f64());
        }
    }
    max
}

/// Eigenvalues of a symmetric matrix, in diagonal order (unsorted).
///
/// Only the lower triangle of `a` is read.
pub fn symmetric_eigenvalues<T: Real>(a: &Array2<T>, ctx: T::Context) -> Vec<T> {
    let n = a.nrows();
    let mut work = a.clone();
    for i in 0..n {
        for j in 0..i {
            work[[j, i]] = work[[i, j]].clone();
        }
    }

    let norm = work.iter().map(|v| v.approx_f64().powi(2)).sum::<f64>().sqrt();
    let tol = 4.0 * n as f64 * T::unit_roundoff(ctx) * norm;

    let mut converged = n < 2;
    for sweep in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        if max_off_diagonal(&work) <= tol {
            debug!(sweep, "jacobi converged");
            converged = true;
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if work[[p, q]].abs_val().approx_f64() <= tol {
                    continue;
                }
                let rot = Rotation::compute(&work[[p, p]], &work[[q, q]], &work[[p, q]], ctx);
                rot.apply(&mut work, p, q, ctx);
            }
        }
    }

    if !converged && max_off_diagonal(&work) > tol {
        warn!(n, sweeps = MAX_SWEEPS, "jacobi did not reach tolerance");
    }

    (0..n).map(|i| work[[i, i]].clone()).collect()
}
