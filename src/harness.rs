use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rug::Float;
use tracing::{info, info_span, warn};
use twofloat::TwoFloat;

use crate::config::{HarnessConfig, PrecisionProfile, Representation, RhsConditioning};
use crate::error::HarnessError;
use crate::linalg::{self, lapack, positive_definite_from, random_matrix};
use crate::math::ScientificNotation;
use crate::numeric::{QuadDouble, Real};

const LABEL_WIDTH: usize = 14;

/// First eigenvalue of one regime.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenvalueResult {
    pub label: String,
    /// Scientific notation with the regime's display digits
    pub text: String,
    pub approx: f64,
}

#[derive(Debug)]
pub struct RegimeReport {
    pub profile: PrecisionProfile,
    pub outcome: Result<EigenvalueResult, HarnessError>,
}

impl RegimeReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Harness { config }
    }

    /// Runs every configured regime for an `n × n` pencil. A failing regime
    /// is reported and does not stop the ones after it.
    pub fn run(&self, n: usize) -> Result<Vec<RegimeReport>, HarnessError> {
        if n == 0 {
            return Err(HarnessError::ZeroDimension);
        }

        let reports = self
            .config
            .regimes
            .iter()
            .map(|profile| {
                let span = info_span!("regime", label = %profile.label(), n);
                let _guard = span.enter();

                let outcome = self.run_regime(profile, n);
                match &outcome {
                    Ok(result) => info!(value = %result.text, "first eigenvalue"),
                    Err(e) => warn!(error = %e, "regime failed"),
                }
                RegimeReport { profile: *profile, outcome }
            })
            .collect();
        Ok(reports)
    }

    fn run_regime(&self, profile: &PrecisionProfile, n: usize) -> Result<EigenvalueResult, HarnessError> {
        match profile.representation {
            Representation::Double => {
                let (lhs, rhs) = self.pencil::<f64>(n, ());
                let eigenvalues = lapack::generalized_eigenvalues(&lhs, &rhs)?;
                first(profile, eigenvalues)
            }
            Representation::DoubleDouble => self.solve::<TwoFloat>(profile, n, ()),
            Representation::QuadDouble => self.solve::<QuadDouble>(profile, n, ()),
            Representation::Mpfr { bits } => self.solve::<Float>(profile, n, bits),
        }
    }

    fn solve<T: Real>(
        &self,
        profile: &PrecisionProfile,
        n: usize,
        ctx: T::Context,
    ) -> Result<EigenvalueResult, HarnessError> {
        let (lhs, rhs) = self.pencil::<T>(n, ctx);
        let eigenvalues = linalg::generalized_eigenvalues(&lhs, &rhs, ctx)?;
        first(profile, eigenvalues)
    }

    /// Both matrices from their own freshly seeded generator.
    fn pencil<T: Real>(&self, n: usize, ctx: T::Context) -> (Array2<T>, Array2<T>) {
        let lhs = random_matrix(n, &mut StdRng::seed_from_u64(self.config.lhs_seed), ctx);
        let rhs = random_matrix(n, &mut StdRng::seed_from_u64(self.config.rhs_seed), ctx);
        let rhs = match self.config.rhs_conditioning {
            RhsConditioning::Raw => rhs,
            RhsConditioning::PositiveDefinite => positive_definite_from(&rhs, ctx),
        };
        (lhs, rhs)
    }
}

fn first<T: Real>(profile: &PrecisionProfile, eigenvalues: Vec<T>) -> Result<EigenvalueResult, HarnessError> {
    let value = eigenvalues.into_iter().next().ok_or(HarnessError::NoEigenvalues)?;
    if !value.is_finite_val() {
        return Err(HarnessError::NonFinite { regime: profile.label() });
    }
    Ok(EigenvalueResult {
        label: profile.label(),
        text: value.to_scientific_notation(profile.display_digits),
        approx: value.approx_f64(),
    })
}

/// One line per regime, optionally prefixed by its label. A failed regime
/// prints its error when labeled and `NaN` otherwise.
pub fn render(reports: &[RegimeReport], labeled: bool) -> String {
    let mut out = String::new();
    for report in reports {
        let line = match (&report.outcome, labeled) {
            (Ok(result), true) => format!("{:<width$} {}", result.label, result.text, width = LABEL_WIDTH),
            (Ok(result), false) => result.text.clone(),
            (Err(e), true) => format!("{:<width$} error: {}", report.profile.label(), e, width = LABEL_WIDTH),
            (Err(_), false) => "NaN".to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
