#![allow(non_snake_case)]

//! Provides the Fourier grid Hamiltonian (FGH) / discrete variable
//! representation (DVR) matrix builders for one-dimensional nuclear motion on
//! one or several coupled electronic surfaces, together with a persistent,
//! randomly accessible store for the vibrational/rotational eigenbasis they
//! produce.
//!
//! Data flows through the crate as:
//! ```text
//! potential grid
//!   → fgh::{fgh, fgh_coupled}
//!   → dense Hamiltonian
//!   → solve::Diagonalizer (external)
//!   → solve::Solution
//!   → basis::BasisEntry
//!   → store::BasisWriter / store::BasisStore
//! ```
//!
//! Diagonalization itself is delegated to an external linear-algebra library;
//! a LAPACK-backed [`Diagonalizer`][solve::Diagonalizer] is available with the
//! `lapack` feature.
//!
//! See [`docs`] for theoretical background and the on-disk format.

pub mod error;
pub mod grid;
pub mod fgh;
pub mod utils;
pub mod basis;
pub mod store;
pub mod solve;
pub mod config;
pub mod units;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
pub type Arr3<S> = ndarray::ArrayBase<S, ndarray::Ix3>;
