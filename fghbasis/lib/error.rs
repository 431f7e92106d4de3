//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::io;
use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when grid parameters cannot describe an equally spaced grid of at
/// least two points.
#[derive(Debug, Error)]
pub enum GridError {
    /// Fewer than two grid points.
    #[error("grids must have at least 2 points; got {0}")]
    TooFewPoints(usize),

    /// Non-positive or non-finite step size.
    #[error("grid step must be finite and greater than 0; got {0}")]
    BadStep(f64),

    /// Non-positive or non-finite mass.
    #[error("mass must be finite and greater than 0; got {0}")]
    BadMass(f64),

    /// An `r_list` descriptor whose range is empty or inverted.
    #[error("invalid r_list: r_min = {r_min}, r_max = {r_max}, r_step = {r_step}")]
    BadRList { r_min: f64, r_max: f64, r_step: f64 },
}

impl GridError {
    pub(crate) fn check_points(n: usize) -> Result<(), Self> {
        (n >= 2).then_some(()).ok_or(Self::TooFewPoints(n))
    }

    pub(crate) fn check_step(step: f64) -> Result<(), Self> {
        (step.is_finite() && step > 0.0).then_some(()).ok_or(Self::BadStep(step))
    }

    pub(crate) fn check_mass(mass: f64) -> Result<(), Self> {
        (mass.is_finite() && mass > 0.0).then_some(()).ok_or(Self::BadMass(mass))
    }
}

/// Returned from the Hamiltonian builders in [`fgh`][crate::fgh].
#[derive(Debug, Error)]
pub enum FghError {
    /// [`GridError`]
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// Returned when the output matrix does not have the shape implied by the
    /// potential.
    #[error("output matrix must have shape {expected:?}; got {got:?}")]
    Shape { expected: (usize, usize), got: (usize, usize) },

    /// Returned when a per-point coupling matrix is not square.
    #[error("coupling matrices must be square; got {0:?}")]
    NonSquare((usize, usize)),

    /// Returned when a per-point coupling matrix is not symmetric.
    #[error("coupling matrix at grid point {point} is not symmetric in states ({p}, {q})")]
    Asymmetric { point: usize, p: usize, q: usize },
}

/// Returned from operations on basis files in [`store`][crate::store].
#[derive(Debug, Error)]
pub enum BasisError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Returned when an entry is requested beyond the end of the store.
    #[error("basis index {index} out of range for store of {count} entries")]
    IndexOutOfRange { index: usize, count: usize },

    /// Returned when the leading sentinel does not identify a basis file.
    #[error("not a basis file: bad magic {0:#010x}")]
    BadMagic(u32),

    /// Returned when the header declares a layout this reader doesn't know.
    #[error("unsupported basis file version {0}")]
    UnsupportedVersion(u8),

    /// Returned when record shapes are inconsistent with each other or with
    /// the size of the file.
    #[error("corrupt basis data: {0}")]
    Corrupt(String),

    /// Returned when a writer is handed an eigenvector whose length differs
    /// from the entries already written.
    #[error("all eigenvectors in a basis file must have length {expected}; got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

impl BasisError {
    pub(crate) fn check_index(index: usize, count: usize) -> Result<(), Self> {
        (index < count).then_some(()).ok_or(Self::IndexOutOfRange { index, count })
    }
}

/// Returned from the solving functions in [`solve`][crate::solve].
#[derive(Debug, Error)]
pub enum SolveError {
    /// [`FghError`]
    #[error("hamiltonian error: {0}")]
    Fgh(#[from] FghError),

    /// [`GridError`]
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// Failure reported by the external diagonalizer.
    #[error("diagonalization failed: {0}")]
    Diagonalize(String),

    /// Returned when the diagonalizer hands back arrays of the wrong shape.
    #[error("diagonalizer returned {evals} eigenvalues and {evecs:?} eigenvectors for a matrix of size {size}")]
    BadEigensystem { size: usize, evals: usize, evecs: (usize, usize) },
}

/// Returned when loading a job description.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON.
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// [`GridError`]
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}
