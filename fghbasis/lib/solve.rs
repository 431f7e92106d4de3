//! Bound states from the FGH Hamiltonian.
//!
//! Diagonalization is left to an external linear-algebra library behind the
//! [`Diagonalizer`] trait. Any closure of the right signature works; a
//! LAPACK-backed implementation, [`Lapack`], is available with the `lapack`
//! feature.

use std::cmp;
use ndarray as nd;
use tracing::debug;
use crate::{
    Arr1,
    Arr3,
    basis::{ BasisEntry, QuantumNumbers },
    error::{ LengthError, SolveError },
    fgh::{ fgh, fgh_coupled },
    grid::{ Grid, RList },
};

pub type SolveResult<T> = Result<T, SolveError>;

/// A dense symmetric eigensolver.
pub trait Diagonalizer {
    /// Return the eigenvalues of the real symmetric matrix `H` along with its
    /// eigenvectors as the columns of a matrix, in matching order.
    fn eigh(&self, H: nd::Array2<f64>)
        -> SolveResult<(nd::Array1<f64>, nd::Array2<f64>)>;
}

impl<F> Diagonalizer for F
where F: Fn(nd::Array2<f64>) -> SolveResult<(nd::Array1<f64>, nd::Array2<f64>)>
{
    fn eigh(&self, H: nd::Array2<f64>)
        -> SolveResult<(nd::Array1<f64>, nd::Array2<f64>)>
    {
        self(H)
    }
}

/// Diagonalizer backed by LAPACK through `ndarray-linalg`.
#[cfg(feature = "lapack")]
#[derive(Copy, Clone, Debug, Default)]
pub struct Lapack;

#[cfg(feature = "lapack")]
impl Diagonalizer for Lapack {
    fn eigh(&self, H: nd::Array2<f64>)
        -> SolveResult<(nd::Array1<f64>, nd::Array2<f64>)>
    {
        use ndarray_linalg::{ EighInto, UPLO };
        H.eigh_into(UPLO::Lower)
            .map_err(|err| SolveError::Diagonalize(err.to_string()))
    }
}

/// A single eigenpair of the Hamiltonian.
///
/// For coupled surfaces, the wavefunction holds the amplitude on each state in
/// turn (state-major, like the Hamiltonian's rows).
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Energy
    pub e: f64,
    /// Wavefunction
    pub wf: nd::Array1<f64>,
}

impl Solution {
    /// Compare two `Solution`s by their energy.
    pub fn cmp_energy(&self, other: &Self) -> Option<cmp::Ordering> {
        self.e.partial_cmp(&other.e)
    }

    /// Apply a scaling factor to the implicit length dimension associated with
    /// the wavefunction and energy.
    ///
    /// This performs the following:
    /// ```text
    /// wf → √a * wf
    /// e  → e / a²
    /// ```
    pub fn rescale(&mut self, a: f64) {
        self.e /= a.powi(2);
        self.wf *= a.sqrt();
    }

    /// Like [`Self::rescale`], but create a copy of `self` with the specified
    /// scaling factor.
    pub fn rescaled(&self, a: f64) -> Self {
        let mut new = self.clone();
        new.rescale(a);
        new
    }
}

// diagonalize and unpack into energy-sorted solutions
fn diagonalize<D>(H: nd::Array2<f64>, diag: &D) -> SolveResult<Vec<Solution>>
where D: Diagonalizer + ?Sized
{
    let size = H.nrows();
    let (evals, evecs) = diag.eigh(H)?;
    if evals.len() > size || evecs.dim() != (size, evals.len()) {
        return Err(SolveError::BadEigensystem {
            size,
            evals: evals.len(),
            evecs: evecs.dim(),
        });
    }
    let mut sols: Vec<Solution>
        = evals.into_iter().zip(evecs.columns())
        .map(|(e, v)| Solution { e, wf: v.to_owned() })
        .collect();
    sols.sort_by(|l, r| l.e.total_cmp(&r.e));
    debug!(size, count = sols.len(), "diagonalized hamiltonian");
    Ok(sols)
}

/// Compute the spectrum of a single potential curve.
///
/// Returned solutions are sorted by increasing energy.
pub fn solve_fgh<S, D>(mass: f64, step: f64, V: &Arr1<S>, diag: &D)
    -> SolveResult<Vec<Solution>>
where
    S: nd::Data<Elem = f64>,
    D: Diagonalizer + ?Sized,
{
    diagonalize(fgh(mass, step, V)?, diag)
}

/// Compute the spectrum of several coupled potential curves.
///
/// `V` has shape `(N, states, states)`; see
/// [`fgh_coupled_into`][crate::fgh::fgh_coupled_into]. Returned solutions are
/// sorted by increasing energy.
pub fn solve_fgh_coupled<S, D>(mass: f64, step: f64, V: &Arr3<S>, diag: &D)
    -> SolveResult<Vec<Solution>>
where
    S: nd::Data<Elem = f64>,
    D: Diagonalizer + ?Sized,
{
    diagonalize(fgh_coupled(mass, step, V)?, diag)
}

/// Convert the lowest `levels` solutions into basis entries.
///
/// Every entry gets `quantum` with `v` replaced by its level index and a
/// `norm` that normalizes it on `r_list`.
pub fn into_entries(
    solutions: &[Solution],
    r_list: RList,
    quantum: QuantumNumbers,
    levels: usize,
) -> Vec<BasisEntry> {
    solutions.iter().take(levels).enumerate()
        .map(|(v, sol)| {
            let quantum = QuantumNumbers { v: v as u32, ..quantum };
            let mut entry = BasisEntry::new(quantum, r_list, sol.e, sol.wf.clone());
            entry.normalize();
            entry
        })
        .collect()
}

/// Simple record to keep track of coordinate and potential arrays.
///
/// Arrays borrowed from this type are guaranteed to have the same length and to
/// be sampled on the grid described by an [`RList`].
#[derive(Clone, Debug)]
pub struct System {
    // grid descriptor
    r_list: RList,
    // validated grid
    grid: Grid,
    // coordinate array
    r: nd::Array1<f64>,
    // potential array
    V: nd::Array1<f64>,
}

impl System {
    /// Create a new `System`, sampling the potential on the grid.
    pub fn new_fn<F>(r_list: RList, V: F) -> SolveResult<Self>
    where F: FnMut(f64) -> f64
    {
        let grid = r_list.grid()?;
        let r = r_list.points();
        let V = r.mapv(V);
        Ok(Self { r_list, grid, r, V })
    }

    /// Create a new `System` from a bare potential array.
    pub fn new_array(r_list: RList, V: nd::Array1<f64>) -> SolveResult<Self> {
        let grid = r_list.grid()?;
        let r = r_list.points();
        LengthError::check(&r, &V)
            .map_err(|err| SolveError::Fgh(err.into()))?;
        Ok(Self { r_list, grid, r, V })
    }

    /// Get a reference to the coordinate array.
    pub fn get_r(&self) -> &nd::Array1<f64> { &self.r }

    /// Get a reference to the potential array.
    pub fn get_V(&self) -> &nd::Array1<f64> { &self.V }

    /// Get the grid descriptor.
    pub fn get_r_list(&self) -> RList { self.r_list }

    /// Get the length of the coordinate and potential arrays.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.grid.point_count() }

    /// Thin interface to [`solve_fgh`].
    pub fn solve<D>(&self, mass: f64, diag: &D) -> SolveResult<Vec<Solution>>
    where D: Diagonalizer + ?Sized
    {
        solve_fgh(mass, self.grid.step(), &self.V, diag)
    }
}
