use tracing::{debug, trace};

/// Reflection, expansion, contraction and shrink coefficients
const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Relative size of the initial simplex along non-zero coordinates
    pub initial_step: f64,
    /// Initial step along coordinates that start at zero
    pub zero_step: f64,
    /// Absolute spread of the simplex values at convergence
    pub ftol: f64,
    /// Absolute spread of the simplex vertices at convergence
    pub xtol: f64,
    /// Defaults to `200 · dimension`
    pub max_iterations: Option<usize>,
}

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead {
            initial_step: 0.05,
            zero_step: 0.00025,
            ftol: 1e-10,
            xtol: 1e-4,
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

/// `a + t·(b - a)` component-wise.
fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(a, b)| a + t * (b - a)).collect()
}

impl NelderMead {
    /// Minimizes `f` starting from `x0`. The first error returned by `f`
    /// aborts the search.
    pub fn minimize<F, E>(&self, x0: &[f64], mut f: F) -> Result<Minimum, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = x0.len();
        let max_iterations = self.max_iterations.unwrap_or(200 * n.max(1));
        let mut evaluations = 0;
        let mut eval = |x: &[f64]| {
            evaluations += 1;
            f(x)
        };

        let mut simplex = vec![x0.to_vec()];
        for k in 0..n {
            let mut vertex = x0.to_vec();
            vertex[k] = if vertex[k] != 0.0 {
                (1.0 + self.initial_step) * vertex[k]
            } else {
                self.zero_step
            };
            simplex.push(vertex);
        }
        let mut values = simplex.iter().map(|x| eval(x)).collect::<Result<Vec<_>, E>>()?;
        order(&mut simplex, &mut values);

        let mut iterations = 1;
        let mut converged = false;
        while iterations < max_iterations {
            if self.has_converged(&simplex, &values) {
                converged = true;
                break;
            }

            // centroid of all but the worst vertex
            let mut centroid = vec![0.0; n];
            for vertex in &simplex[..n] {
                for (c, v) in centroid.iter_mut().zip(vertex) {
                    *c += v / n as f64;
                }
            }
            let worst = simplex[n].clone();

            let reflected = lerp(&centroid, &worst, -RHO);
            let f_reflected = eval(&reflected)?;

            let mut shrink = false;
            if f_reflected < values[0] {
                let expanded = lerp(&centroid, &worst, -RHO * CHI);
                let f_expanded = eval(&expanded)?;
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
            } else if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
            } else if f_reflected < values[n] {
                let contracted = lerp(&centroid, &worst, -PSI * RHO);
                let f_contracted = eval(&contracted)?;
                if f_contracted <= f_reflected {
                    simplex[n] = contracted;
                    values[n] = f_contracted;
                } else {
                    shrink = true;
                }
            } else {
                let contracted = lerp(&centroid, &worst, PSI);
                let f_contracted = eval(&contracted)?;
                if f_contracted < values[n] {
                    simplex[n] = contracted;
                    values[n] = f_contracted;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let best = simplex[0].clone();
                for j in 1..=n {
                    simplex[j] = lerp(&best, &simplex[j], SIGMA);
                    values[j] = eval(&simplex[j])?;
                }
            }

            order(&mut simplex, &mut values);
            trace!(iterations, best = values[0], "simplex step");
            iterations += 1;
        }

        if !converged {
            converged = self.has_converged(&simplex, &values);
        }
        debug!(iterations, evaluations, converged, value = values[0], "nelder-mead finished");

        Ok(Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            evaluations,
            converged,
        })
    }

    fn has_converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = &simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(best).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let f_spread = values[1..].iter().map(|v| (v - values[0]).abs()).fold(0.0, f64::max);
        x_spread <= self.xtol && f_spread <= self.ftol
    }
}

/// Sorts the vertices by value, best first.
fn order(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut pairs: Vec<_> = simplex.drain(..).zip(values.drain(..)).collect();
    pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (vertex, value) in pairs {
        simplex.push(vertex);
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::objective::{Objective, Paraboloid};
    use std::convert::Infallible;

    #[test]
    fn paraboloid_works() {
        let f = Paraboloid::default();
        let min = NelderMead::default()
            .minimize(&[2.0, 2.0], |p| Ok::<_, Infallible>(f.evaluate(p[0], p[1])))
            .unwrap();
        assert!(min.converged);
        assert!(min.point.iter().all(|v| v.abs() < 1e-3), "{:?}", min.point);
        assert!((min.value - 3.0).abs() < 1e-8);
        assert!(min.evaluations > min.iterations);
    }

    #[test]
    fn shifted_quadratic_works() {
        let min = NelderMead::default()
            .minimize(&[0.0, 0.0, 0.0], |p| {
                Ok::<_, Infallible>((p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2) + 2.0 * (p[2] - 0.5).powi(2))
            })
            .unwrap();
        assert!(min.converged);
        assert!((min.point[0] - 1.0).abs() < 1e-3);
        assert!((min.point[1] + 2.0).abs() < 1e-3);
        assert!((min.point[2] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn rosenbrock_works() {
        let solver = NelderMead { max_iterations: Some(5000), ..NelderMead::default() };
        let min = solver
            .minimize(&[-1.2, 1.0], |p| {
                Ok::<_, Infallible>(100.0 * (p[1] - p[0] * p[0]).powi(2) + (1.0 - p[0]).powi(2))
            })
            .unwrap();
        assert!(min.converged);
        assert!((min.point[0] - 1.0).abs() < 1e-2);
        assert!((min.point[1] - 1.0).abs() < 1e-2);
    }

    #[test]
    fn iteration_limit_works() {
        let solver = NelderMead { max_iterations: Some(3), ..NelderMead::default() };
        let min = solver.minimize(&[5.0], |p| Ok::<_, Infallible>(p[0] * p[0])).unwrap();
        assert!(!min.converged);
        assert_eq!(min.iterations, 3);
    }

    #[test]
    fn objective_errors_propagate() {
        let mut calls = 0;
        let result = NelderMead::default().minimize(&[1.0, 1.0], |p| {
            calls += 1;
            if calls > 5 {
                Err("server gone")
            } else {
                Ok(p[0] + p[1])
            }
        });
        assert_eq!(result.unwrap_err(), "server gone");
        assert_eq!(calls, 6);
    }
}
