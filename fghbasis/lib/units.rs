#![allow(non_upper_case_globals)]

//! Physical constants and conversions to and from atomic units.
//!
//! Concrete physical constants are taken from NIST.

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// unified atomic mass unit (kg)
pub const mu: f64 = 1.66053906660e-27;
//              +/- 0.00000000050e-27

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// Hartree energy (J)
pub const Eh: f64 = 4.3597447222071e-18;
//              +/- 0.0000000000085e-18

/// Convert a mass in unified atomic mass units to electron masses.
pub fn amu_to_au(m: f64) -> f64 { m * mu / me }

/// Reduced mass of two bodies, both in the same units.
pub fn reduced_mass(m1: f64, m2: f64) -> f64 { m1 * m2 / (m1 + m2) }

/// Convert an energy in Hartree to wavenumbers (cm^-1).
pub fn hartree_to_wavenumber(e: f64) -> f64 { e * Eh / (h * c) / 100.0 }

/// Convert a length in Ångström to Bohr radii.
pub fn angstrom_to_bohr(x: f64) -> f64 { x * 1e-10 / a0 }
