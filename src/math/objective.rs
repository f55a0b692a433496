use std::fmt::{self, Display};

/// A function of two variables served by the evaluation loop.
pub trait Objective {
    fn evaluate(&self, x: f64, y: f64) -> f64;
}

impl<F> Objective for F
where
    F: Fn(f64, f64) -> f64,
{
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// `f(x, y) = x² + y² + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paraboloid {
    pub offset: f64,
}

impl Paraboloid {
    pub fn new(offset: f64) -> Self {
        Paraboloid { offset }
    }
}

impl Default for Paraboloid {
    fn default() -> Self {
        Paraboloid::new(3.0)
    }
}

impl Objective for Paraboloid {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        // summed left to right: (x² + y²) + offset
        x * x + y * y + self.offset
    }
}

impl Display for Paraboloid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.offset < 0.0 {
            write!(f, "f(x, y) = x² + y² - {}", -self.offset)
        } else {
            write!(f, "f(x, y) = x² + y² + {}", self.offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paraboloid_works() {
        let f = Paraboloid::default();
        assert_eq!(f.evaluate(0.0, 0.0), 3.0);
        assert_eq!(f.evaluate(1.0, 2.0), 8.0);
        assert_eq!(f.evaluate(-3.0, 4.0), 28.0);
    }

    #[test]
    fn rounding_follows_summation_order() {
        let f = Paraboloid::default();
        let (x, y) = (0.37f64, 0.026f64);
        assert_eq!(f.evaluate(x, y), (x * x + y * y) + 3.0);
        assert_eq!(format!("{:.16}", f.evaluate(x, y)), "3.1375760000000001");
    }

    #[test]
    fn non_finite_inputs_work() {
        let f = Paraboloid::default();
        assert_eq!(f.evaluate(f64::INFINITY, 0.0), f64::INFINITY);
        assert_eq!(f.evaluate(0.0, f64::NEG_INFINITY), f64::INFINITY);
        assert!(f.evaluate(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn display_works() {
        assert_eq!(Paraboloid::default().to_string(), "f(x, y) = x² + y² + 3");
        assert_eq!(Paraboloid::new(-0.5).to_string(), "f(x, y) = x² + y² - 0.5");
    }

    #[test]
    fn closure_objective_works() {
        let f = |x: f64, y: f64| x * y;
        assert_eq!(f.evaluate(2.0, 3.5), 7.0);
    }
}
