//! Stored vibrational/rotational eigenpairs.

use std::cmp;
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{ grid::RList, utils::wf_norm };

/// Identifying quantum numbers of a basis entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumNumbers {
    /// Total angular momentum.
    pub J: u32,
    /// Vibrational quantum number.
    pub v: u32,
    /// Channel index.
    pub n: u32,
    /// Rotational quantum number.
    pub j: u32,
    /// Orbital angular momentum.
    pub l: u32,
    /// Parity.
    pub p: i32,
    /// Component label.
    pub c: u32,
    /// Spin multiplicity.
    pub spin_mult: u8,
}

/// A single eigenpair with its quantum numbers and the grid its eigenvector is
/// sampled on.
///
/// Values read through [`Self::value`] are scaled by `norm`; the raw
/// eigenvector is kept as produced by the diagonalizer.
#[derive(Clone, Debug, PartialEq)]
pub struct BasisEntry {
    pub quantum: QuantumNumbers,
    /// Multiplicative scale applied to the eigenvector on access.
    pub norm: f64,
    pub r_list: RList,
    pub eigenval: f64,
    pub eigenvec: nd::Array1<f64>,
}

impl BasisEntry {
    /// Create a new entry with unit `norm`.
    pub fn new(
        quantum: QuantumNumbers,
        r_list: RList,
        eigenval: f64,
        eigenvec: nd::Array1<f64>,
    ) -> Self {
        Self { quantum, norm: 1.0, r_list, eigenval, eigenvec }
    }

    /// Set `norm`, consuming `self`.
    pub fn with_norm(mut self, norm: f64) -> Self {
        self.norm = norm;
        self
    }

    /// Set `norm` to the factor that normalizes the eigenvector on its grid.
    ///
    /// An eigenvector spanning several coupled states (a whole multiple of the
    /// `r_list` point count) is normalized over all states together, each
    /// state's block integrated separately.
    ///
    /// *Panics if the eigenvector has length less than 2*.
    pub fn normalize(&mut self) {
        let npoints = self.r_list.point_count();
        let dr = self.r_list.r_step;
        let blocked = npoints >= 2 && self.len() > npoints && self.len() % npoints == 0;
        let nrm
            = if blocked {
                self.eigenvec.exact_chunks(npoints).into_iter()
                    .map(|block| wf_norm(dr, &block).powi(2))
                    .sum::<f64>()
                    .sqrt()
            } else {
                wf_norm(dr, &self.eigenvec)
            };
        if nrm == 0.0 {
            tracing::warn!(quantum = ?self.quantum, "eigenvector has zero norm");
        }
        self.norm = nrm.recip();
    }

    /// Number of samples in the eigenvector.
    pub fn len(&self) -> usize { self.eigenvec.len() }

    /// Return `true` if the eigenvector is empty.
    pub fn is_empty(&self) -> bool { self.eigenvec.is_empty() }

    /// Scaled eigenvector value `norm * eigenvec[k]`.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn value(&self, k: usize) -> f64 { self.norm * self.eigenvec[k] }

    /// Return the full scaled eigenvector.
    pub fn scaled(&self) -> nd::Array1<f64> { self.norm * &self.eigenvec }

    /// Iterate over scaled eigenvector values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.eigenvec.iter().map(move |x| self.norm * x)
    }

    /// Compare two entries by their eigenvalue.
    pub fn cmp_energy(&self, other: &Self) -> Option<cmp::Ordering> {
        self.eigenval.partial_cmp(&other.eigenval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> BasisEntry {
        let quantum = QuantumNumbers { J: 1, v: 2, p: -1, spin_mult: 3, ..Default::default() };
        BasisEntry::new(quantum, RList::new(0.0, 2.0, 0.5), -0.25, nd::array![0.0, 1.0, 2.0, 1.0, 0.0])
    }

    #[test]
    fn default_norm_is_unity() {
        let e = entry();
        assert_eq!(e.norm, 1.0);
        assert_eq!(e.value(2), 2.0);
        assert_eq!(e.len(), 5);
    }

    #[test]
    fn scaled_access() {
        let e = entry().with_norm(0.5);
        assert_eq!(e.value(1), 0.5);
        assert_eq!(e.scaled(), nd::array![0.0, 0.5, 1.0, 0.5, 0.0]);
        assert_eq!(e.values().collect::<Vec<_>>(), vec![0.0, 0.5, 1.0, 0.5, 0.0]);
        // raw vector untouched
        assert_eq!(e.eigenvec[1], 1.0);
    }

    #[test]
    fn normalize_sets_norm_only() {
        let mut e = entry();
        e.normalize();
        let q = e.scaled();
        assert!((wf_norm(0.5, &q) - 1.0).abs() < 1e-12);
        assert_eq!(e.eigenvec, nd::array![0.0, 1.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn normalize_coupled_blocks() {
        // two states on a 3-point grid
        let mut e = BasisEntry::new(
            QuantumNumbers::default(),
            RList::new(0.0, 1.0, 0.5),
            0.0,
            nd::array![1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        );
        e.normalize();
        // ∫ 1² + ∫ 2² over a length-1 interval = 5
        assert!((e.norm - 5.0_f64.sqrt().recip()).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn value_out_of_range() {
        entry().value(5);
    }
}
