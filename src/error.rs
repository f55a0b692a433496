use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the dense solvers in [`crate::linalg`].
#[derive(Error, Debug)]
pub enum LinalgError {
    /// Zero-sized input
    #[error("Matrix is empty")]
    Empty,

    /// Input is not square
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// The two matrices of a pencil differ in size
    #[error("Dimension mismatch: {lhs} vs {rhs}")]
    DimensionMismatch {
        /// Left-hand dimension
        lhs: usize,
        /// Right-hand dimension
        rhs: usize,
    },

    /// Cholesky met a pivot that is not strictly positive
    #[error("Right-hand matrix is not positive definite (pivot {pivot})")]
    NotPositiveDefinite {
        /// Row of the failing pivot
        pivot: usize,
    },

    /// Failure reported by LAPACK
    #[error("LAPACK failure: {0}")]
    Lapack(#[from] ndarray_linalg::error::LinalgError),
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Matrix dimension must be positive")]
    ZeroDimension,

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    #[error("Solver produced a non-finite eigenvalue in regime {regime}")]
    NonFinite { regime: String },

    #[error("Solver returned no eigenvalues")]
    NoEigenvalues,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Input the evaluation server could not use. Recoverable.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("input ended after a lone number '{token}'")]
    Incomplete { token: String },

    #[error("invalid number '{token}': {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("request is not valid UTF-8")]
    Encoding,

    #[error("line longer than {limit} bytes")]
    TooLong { limit: usize },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to start evaluation server: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Evaluation server closed its output")]
    Closed,

    #[error("Evaluation server rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response from evaluation server: {0:?}")]
    InvalidResponse(String),
}
