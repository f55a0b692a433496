use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::numeric::mpfr::DEFAULT_BITS;

/// Numeric representation a regime computes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Representation {
    /// Hardware f64 through LAPACK
    Double,
    DoubleDouble,
    QuadDouble,
    /// MPFR with the given working precision in bits
    Mpfr { bits: u32 },
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Representation::Double => write!(f, "double"),
            Representation::DoubleDouble => write!(f, "double-double"),
            Representation::QuadDouble => write!(f, "quad-double"),
            Representation::Mpfr { bits } => write!(f, "mpfr-{}", bits),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionProfile {
    pub representation: Representation,
    /// Digits printed after the decimal point
    pub display_digits: usize,
}

impl PrecisionProfile {
    pub fn new(representation: Representation, display_digits: usize) -> Self {
        PrecisionProfile { representation, display_digits }
    }

    pub fn label(&self) -> String {
        self.representation.to_string()
    }
}

/// How the right-hand matrix is prepared before solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RhsConditioning {
    /// Use the random matrix as drawn
    Raw,
    /// Replace `R` by `R·Rᵀ + N·I`
    #[default]
    PositiveDefinite,
}

/// What the evaluation server does with a request it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Answer with an `error:` line
    #[default]
    Reply,
    /// Answer nothing
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub lhs_seed: u64,
    pub rhs_seed: u64,
    pub rhs_conditioning: RhsConditioning,
    pub regimes: Vec<PrecisionProfile>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            lhs_seed: 42,
            rhs_seed: 26,
            rhs_conditioning: RhsConditioning::PositiveDefinite,
            regimes: vec![
                PrecisionProfile::new(Representation::DoubleDouble, 32),
                PrecisionProfile::new(Representation::QuadDouble, 64),
                PrecisionProfile::new(Representation::Mpfr { bits: DEFAULT_BITS }, 32),
            ],
        }
    }
}

impl HarnessConfig {
    /// Reads and validates a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: HarnessConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regimes.is_empty() {
            return Err(ConfigError::Invalid("no precision regimes configured".to_string()));
        }
        if self.lhs_seed == self.rhs_seed {
            return Err(ConfigError::Invalid(format!(
                "lhs_seed and rhs_seed must differ (both {})",
                self.lhs_seed
            )));
        }
        for profile in &self.regimes {
            if let Representation::Mpfr { bits } = profile.representation {
                if bits < 2 {
                    return Err(ConfigError::Invalid(format!("MPFR precision of {} bits is too small", bits)));
                }
            }
            if profile.display_digits == 0 {
                return Err(ConfigError::Invalid(format!(
                    "regime {} must display at least one digit",
                    profile.label()
                )));
            }
        }
        Ok(())
    }

    /// Sets the working precision of every MPFR regime.
    pub fn with_mpfr_bits(mut self, bits: u32) -> Self {
        for profile in &mut self.regimes {
            if let Representation::Mpfr { bits: b } = &mut profile.representation {
                *b = bits;
            }
        }
        self
    }

    /// Appends the f64 LAPACK regime unless it is already present.
    pub fn with_baseline(mut self) -> Self {
        if !self.regimes.iter().any(|p| p.representation == Representation::Double) {
            self.regimes.push(PrecisionProfile::new(Representation::Double, 16));
        }
        self
    }
}
