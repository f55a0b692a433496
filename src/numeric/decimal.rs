use std::cmp::Ordering;
use std::f64::consts::LOG10_2;

use rug::Integer;

/// An exact rational `mantissa · 2^exponent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dyadic {
    mantissa: Integer,
    exponent: i64,
}

/// Splits a finite f64 into an integer significand and a binary exponent.
fn decompose(value: f64) -> (Integer, i64) {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    let (significand, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    let significand = Integer::from(significand);
    if negative {
        (-significand, exponent)
    } else {
        (significand, exponent)
    }
}

fn pow10(power: u32) -> Integer {
    Integer::from(Integer::u_pow_u(10, power))
}

impl Dyadic {
    pub fn new(mantissa: Integer, exponent: i64) -> Dyadic {
        Dyadic { mantissa, exponent }
    }

    pub fn from_f64(value: f64) -> Option<Dyadic> {
        Dyadic::sum(&[value])
    }

    /// Exact sum of f64 components, as stored by double-double and
    /// quad-double values.
    pub fn sum(parts: &[f64]) -> Option<Dyadic> {
        if parts.iter().any(|p| !p.is_finite()) {
            return None;
        }

        let terms: Vec<(Integer, i64)> = parts.iter().map(|&p| decompose(p)).collect();
        let base = terms.iter().map(|(_, e)| *e).min().unwrap_or(0);

        let total = terms
            .into_iter()
            .fold(Integer::new(), |acc, (m, e)| acc + (m << ((e - base) as u32)));

        Some(Dyadic::new(total, base))
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.cmp0() == Ordering::Equal
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.cmp0() == Ordering::Less
    }

    /// Renders `d.ddd…e<exp>` with exactly `digits` digits after the point,
    /// rounding half to even. Matches `format!("{:.digits$e}", x)` for f64.
    pub fn to_scientific(&self, digits: usize) -> String {
        let sign = if self.is_negative() { "-" } else { "" };

        if self.is_zero() {
            return if digits == 0 {
                format!("{}0e0", sign)
            } else {
                format!("{}0.{}e0", sign, "0".repeat(digits))
            };
        }

        let magnitude = Integer::from(self.mantissa.abs_ref());
        // value lies in [2^(bits-1), 2^bits)
        let bits = magnitude.significant_bits() as i64 + self.exponent;

        let (numer, denom) = if self.exponent >= 0 {
            (magnitude << (self.exponent as u32), Integer::from(1))
        } else {
            (magnitude, Integer::from(1) << ((-self.exponent) as u32))
        };

        let lower = pow10(digits as u32);
        let upper = lower.clone() * 10u32;

        let mut exp10 = ((bits - 1) as f64 * LOG10_2).floor() as i64;
        let scaled = loop {
            let scaled = scale_rounded(&numer, &denom, digits as i64 - exp10);
            if scaled >= upper {
                exp10 += 1;
            } else if scaled < lower {
                exp10 -= 1;
            } else {
                break scaled;
            }
        };

        let text = scaled.to_string();
        let (lead, rest) = text.split_at(1);
        if rest.is_empty() {
            format!("{}{}e{}", sign, lead, exp10)
        } else {
            format!("{}{}.{}e{}", sign, lead, rest, exp10)
        }
    }
}

/// `round(numer / denom · 10^power)`, ties to even.
fn scale_rounded(numer: &Integer, denom: &Integer, power: i64) -> Integer {
    let (n, d) = if power >= 0 {
        (Integer::from(numer * &pow10(power as u32)), denom.clone())
    } else {
        (numer.clone(), Integer::from(denom * &pow10((-power) as u32)))
    };

    let (quotient, remainder) = n.div_rem(d.clone());
    let twice_rem = remainder << 1u32;

    let round_up = match twice_rem.cmp(&d) {
        Ordering::Greater => true,
        Ordering::Equal => quotient.is_odd(),
        Ordering::Less => false,
    };

    if round_up {
        quotient + 1u32
    } else {
        quotient
    }
}
