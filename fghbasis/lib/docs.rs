//! Theoretical background.
//!
//! # Contents
//! - [Fourier grid Hamiltonian](#fourier-grid-hamiltonian)
//! - [Coupled surfaces](#coupled-surfaces)
//! - [Units](#units)
//! - [Normalization](#normalization)
//! - [Basis files](#basis-files)
//!
//! # Fourier grid Hamiltonian
//! Bound states of nuclear motion along a single coordinate *r* satisfy the
//! one-dimensional time-independent Schrödinger equation
//! ```text
//!     ∂²
//! - κ --- ψ(r) + V(r) ψ(r) = E ψ(r)
//!     ∂r²
//! ```
//! with the kinetic coefficient *κ* fixed by the mass parameter.
//! Rather than approximating the second derivative by finite differences, the
//! Fourier grid Hamiltonian (FGH)[^1] expands *ψ* in the plane waves supported
//! by an equally spaced grid,
//! ```text
//! r[n] = r₀ + n δr, n ∊ {0, ..., N - 1}
//! L = (N - 1) δr
//! ```
//! and evaluates the kinetic-energy operator exactly in that basis before
//! transforming back to the grid. The resulting discrete variable
//! representation (DVR)[^2] has kinetic matrix elements in closed form,
//! ```text
//!              π²
//! f = ---------------
//!       mass * L²
//!
//!           N² + 2
//! T[n, n] = ------ f
//!             6
//!
//!                Δ       f
//! T[n, m] = (-1)  ----------- ,   Δ = (n + 1) - (m + 1)
//!                 sin²(Δπ/N)
//! ```
//! while the potential is diagonal, *V*\[*n*, *m*\] = *δ*<sub>*nm*</sub>
//! *V*(*r*\[*n*\]). The Hamiltonian *H* = *T* + *V* is a dense, real,
//! symmetric *N*×*N* matrix whose eigenvalues are the energies of the bound
//! states supported by the grid and whose eigenvectors are the wavefunctions
//! sampled at the grid points.
//!
//! Because every element is a closed-form function of the index difference,
//! there is no truncation error in the kinetic operator; the accuracy of the
//! spectrum is limited only by the grid range and density. For large *N* and
//! |Δ| close to *N*, sin(Δπ/*N*) becomes small and the corresponding elements
//! large; double precision is used throughout and no clamping is applied.
//!
//! The sign factor and the sine both depend on the *signed* difference Δ. An
//! off-by-one in the index convention or a dropped sign still yields a
//! symmetric, diagonalizable matrix, just not the right one.
//!
//! # Coupled surfaces
//! For *S* electronic states sharing the nuclear grid, the potential at each
//! grid point becomes an *S*×*S* symmetric matrix *V*\[*n*\]\[*p*, *q*\]. The
//! Hamiltonian acts on the product space and is laid out in blocks, one per
//! pair of states, with row/column index *p* *N* + *n*:
//! ```text
//!       ⎡ T + V₀₀   V₀₁     ⋯ ⎤
//! H  =  ⎢ V₁₀     T + V₁₁   ⋯ ⎥
//!       ⎣   ⋮        ⋮      ⋱ ⎦
//! ```
//! where *T* is the single-surface kinetic matrix and each *V*<sub>*pq*</sub>
//! is diagonal in the grid index. Kinetic energy never couples different
//! states, and electronic coupling is local in *r*, so elements with both
//! *p* ≠ *q* and *n* ≠ *m* vanish.
//!
//! # Units
//! The builders take no stance on units: energies come out in whatever units
//! make `π² / (mass * L²)` an energy. The conversions in
//! [`units`][crate::units] cover the usual case of atomic units with masses
//! given in unified atomic mass units and energies reported in wavenumbers.
//!
//! # Normalization
//! Eigenvectors returned by a diagonalizer are normalized as plain vectors,
//! not as functions on the grid. Each stored entry carries a `norm` factor
//! applied on access, chosen so that
//! ```text
//! ∫ |norm * ψ(r)|² dr = 1
//! ```
//! with the integral evaluated by composite Simpson quadrature over the grid
//! (see [`utils::simpson`][crate::utils::simpson]). The raw eigenvector is
//! stored untouched.
//!
//! # Basis files
//! Entries are persisted in a compact binary format described in
//! [`store`][crate::store]. Every record in a file has the same size, so
//! [`BasisStore::get`][crate::store::BasisStore::get] seeks straight to
//! `header + index * stride` and decodes a single record. A file whose size
//! is not a whole number of records, or whose records disagree on eigenvector
//! length, is reported as corrupt rather than partially decoded.
//!
//! [^1]: C. C. Marston and G. G. Balint-Kurti, "The Fourier grid Hamiltonian
//! method for bound state eigenvalues and eigenfunctions." J. Chem. Phys.
//! **91** 3571 (1989).
//!
//! [^2]: D. T. Colbert and W. H. Miller, "A novel discrete variable
//! representation for quantum mechanical reactive scattering via the S-matrix
//! Kohn method." J. Chem. Phys. **96** 1982 (1992).
