//! Fourier grid Hamiltonian builders.
//!
//! For an equally spaced grid of *N* points spanning a length
//! *L* = (*N* - 1) *δr*, the kinetic-energy operator has the closed-form
//! matrix elements
//! ```text
//!           π²
//! f = ------------
//!      mass * L²
//!
//! T[n, n] = f (N² + 2) / 6
//!
//!                 Δ       f
//! T[n, m] = (-1)  * ----------- ,   Δ = (n + 1) - (m + 1)
//!                   sin²(Δπ/N)
//! ```
//! which involve no finite-difference truncation. The potential enters only on
//! the diagonal (or, for coupled surfaces, on the diagonal in the grid index).
//!
//! See [`docs`][crate::docs#fourier-grid-hamiltonian] for background.

use std::f64::consts::PI;
use ndarray as nd;
use tracing::{ debug, warn };
use crate::{
    Arr1,
    Arr2,
    Arr3,
    error::{ FghError, GridError },
    grid::Grid,
};

pub type FghResult<T> = Result<T, FghError>;

/// The common prefactor `π² / (mass * L²)` of every kinetic matrix element.
pub fn kinetic_factor(grid: &Grid, mass: f64) -> f64 {
    PI.powi(2) / (mass * grid.length().powi(2))
}

// diagonal kinetic element for an `n`-point grid
fn kinetic_diag(n: usize, factor: f64) -> f64 {
    let n = n as f64;
    factor * (n * n + 2.0) / 6.0
}

// off-diagonal kinetic element between (0-based) grid points `n` and `m`
//
// the index difference is taken between 1-based indices; it's the same as the
// 0-based difference but kept explicit since the sign convention hinges on it
//
// sin(Δπ/N) can be tiny for large N and |Δ| close to N; no clamping is applied
fn kinetic_offdiag(n: usize, m: usize, npoints: usize, factor: f64) -> f64 {
    let delta: i64 = (n as i64 + 1) - (m as i64 + 1);
    let s = (delta as f64 * PI / npoints as f64).sin();
    let sign = if delta.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
    sign * factor / s.powi(2)
}

fn check_inputs(mass: f64, step: f64, npoints: usize) -> FghResult<Grid> {
    GridError::check_mass(mass)?;
    Ok(Grid::new(npoints, step)?)
}

fn check_shape<T>(expected: usize, result: &Arr2<T>) -> FghResult<()>
where T: nd::Data
{
    let got = result.dim();
    (got == (expected, expected)).then_some(())
        .ok_or(FghError::Shape { expected: (expected, expected), got })
}

/// Compute the single-surface FGH Hamiltonian into a pre-sized `N × N` output
/// matrix.
///
/// `V` holds one energy per grid point. Every element of `result` is
/// overwritten. Returns [`FghError::Shape`] if `result` is not `N × N` and a
/// [`GridError`] if `N < 2` or `mass`/`step` are not positive.
pub fn fgh_into<S, T>(
    mass: f64,
    step: f64,
    V: &Arr1<S>,
    result: &mut Arr2<T>,
) -> FghResult<()>
where
    S: nd::Data<Elem = f64>,
    T: nd::DataMut<Elem = f64>,
{
    let npoints = V.len();
    let grid = check_inputs(mass, step, npoints)?;
    check_shape(npoints, result)?;
    if V.iter().any(|v| !v.is_finite()) {
        warn!("fgh: potential contains non-finite values");
    }
    debug!(npoints, mass, step, "assembling single-surface hamiltonian");

    let factor = kinetic_factor(&grid, mass);
    let tdiag = kinetic_diag(npoints, factor);
    for n in 0..npoints {
        result[[n, n]] = tdiag + V[n];
        for m in n + 1..npoints {
            let t = kinetic_offdiag(n, m, npoints, factor);
            result[[n, m]] = t;
            result[[m, n]] = t;
        }
    }
    Ok(())
}

/// Compute the single-surface FGH Hamiltonian.
///
/// ```
/// use ndarray as nd;
/// use fghbasis::fgh::fgh;
///
/// let h = fgh(1.0, 1.0, &nd::array![0.0, 0.0]).unwrap();
/// let factor = std::f64::consts::PI.powi(2);
/// assert!((h[[0, 1]] + factor).abs() < 1e-12);
/// assert_eq!(h[[0, 1]], h[[1, 0]]);
/// ```
pub fn fgh<S>(mass: f64, step: f64, V: &Arr1<S>) -> FghResult<nd::Array2<f64>>
where S: nd::Data<Elem = f64>
{
    let n = V.len();
    let mut H: nd::Array2<f64> = nd::Array2::zeros((n, n));
    fgh_into(mass, step, V, &mut H)?;
    Ok(H)
}

// check that a coupled potential is a stack of equally sized, symmetric
// matrices and return the number of states
fn check_coupled<S>(V: &Arr3<S>) -> FghResult<usize>
where S: nd::Data<Elem = f64>
{
    let (_, rows, cols) = V.dim();
    if rows != cols { return Err(FghError::NonSquare((rows, cols))); }
    for (point, Vn) in V.outer_iter().enumerate() {
        for p in 0..rows {
            for q in p + 1..rows {
                if Vn[[p, q]] != Vn[[q, p]] {
                    return Err(FghError::Asymmetric { point, p, q });
                }
            }
        }
    }
    Ok(rows)
}

/// Compute the FGH Hamiltonian for several electronic states coupled on a
/// shared grid into a pre-sized `(states·N) × (states·N)` output matrix.
///
/// `V` has shape `(N, states, states)`; `V[[n, p, q]]` couples states `p` and
/// `q` at grid point `n` and must be symmetric in `p` and `q`. Rows and columns
/// of `result` are state-major: index `p * N + n` refers to state `p` at grid
/// point `n`.
///
/// - same state, same point: kinetic diagonal plus `V[[n, p, p]]`
/// - same state, different points: kinetic off-diagonal
/// - different states, same point: `V[[n, p, q]]`
/// - different states, different points: zero
pub fn fgh_coupled_into<S, T>(
    mass: f64,
    step: f64,
    V: &Arr3<S>,
    result: &mut Arr2<T>,
) -> FghResult<()>
where
    S: nd::Data<Elem = f64>,
    T: nd::DataMut<Elem = f64>,
{
    let npoints = V.len_of(nd::Axis(0));
    let grid = check_inputs(mass, step, npoints)?;
    let states = check_coupled(V)?;
    let size = states * npoints;
    check_shape(size, result)?;
    if V.iter().any(|v| !v.is_finite()) {
        warn!("fgh_coupled: potential contains non-finite values");
    }
    debug!(npoints, states, mass, step, "assembling coupled hamiltonian");

    let factor = kinetic_factor(&grid, mass);
    let tdiag = kinetic_diag(npoints, factor);
    result.fill(0.0);
    for p in 0..states {
        for n in 0..npoints {
            let i = p * npoints + n;
            for q in p..states {
                for m in 0..npoints {
                    let j = q * npoints + m;
                    if j < i { continue; }
                    let h = match (p == q, n == m) {
                        (true, true) => tdiag + V[[n, p, p]],
                        (true, false) => kinetic_offdiag(n, m, npoints, factor),
                        (false, true) => V[[n, p, q]],
                        (false, false) => continue,
                    };
                    result[[i, j]] = h;
                    result[[j, i]] = h;
                }
            }
        }
    }
    Ok(())
}

/// Compute the FGH Hamiltonian for several coupled electronic states.
///
/// See [`fgh_coupled_into`] for layout conventions.
pub fn fgh_coupled<S>(mass: f64, step: f64, V: &Arr3<S>)
    -> FghResult<nd::Array2<f64>>
where S: nd::Data<Elem = f64>
{
    let (npoints, states, _) = V.dim();
    let size = states * npoints;
    let mut H: nd::Array2<f64> = nd::Array2::zeros((size, size));
    fgh_coupled_into(mass, step, V, &mut H)?;
    Ok(H)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_symmetric(H: &nd::Array2<f64>) -> bool {
        let (n, _) = H.dim();
        (0..n).all(|i| (0..n).all(|j| H[[i, j]] == H[[j, i]]))
    }

    #[test]
    fn free_particle_structure() {
        for &(n, mass, step) in &[(2, 1.0, 1.0), (7, 2.5, 0.1), (64, 1836.0, 0.02)] {
            let V: nd::Array1<f64> = nd::Array1::zeros(n);
            let H = fgh(mass, step, &V).unwrap();
            assert!(is_symmetric(&H));
            let grid = Grid::new(n, step).unwrap();
            let factor = kinetic_factor(&grid, mass);
            let expected = factor * ((n * n) as f64 + 2.0) / 6.0;
            assert!(H.diag().iter().all(|&h| h == expected));
        }
    }

    #[test]
    fn two_point_offdiag() {
        let H = fgh(1.0, 1.0, &nd::array![0.0, 0.0]).unwrap();
        let factor = PI.powi(2);
        assert!((H[[0, 1]] + factor).abs() < 1e-12);
        assert!((H[[0, 0]] - factor).abs() < 1e-12);
    }

    #[test]
    fn four_point_closed_form() {
        let H = fgh(1.0, 1.0, &nd::array![0.0, 0.0, 0.0, 0.0]).unwrap();
        let f = PI.powi(2) / 9.0;
        let expected = nd::array![
            [3.0 * f, -2.0 * f, f, -2.0 * f],
            [-2.0 * f, 3.0 * f, -2.0 * f, f],
            [f, -2.0 * f, 3.0 * f, -2.0 * f],
            [-2.0 * f, f, -2.0 * f, 3.0 * f],
        ];
        H.iter().zip(&expected)
            .for_each(|(h, e)| assert!((h - e).abs() < 1e-12, "{h} != {e}"));
    }

    #[test]
    fn potential_on_diagonal_only() {
        let V = nd::array![1.0, -2.0, 0.5];
        let H0 = fgh(1.0, 0.5, &nd::Array1::zeros(3)).unwrap();
        let H = fgh(1.0, 0.5, &V).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let dv = if i == j { V[i] } else { 0.0 };
                assert_eq!(H[[i, j]], H0[[i, j]] + dv);
            }
        }
    }

    #[test]
    fn wrong_output_shape() {
        let V: nd::Array1<f64> = nd::Array1::zeros(4);
        let mut H: nd::Array2<f64> = nd::Array2::zeros((4, 3));
        let res = fgh_into(1.0, 1.0, &V, &mut H);
        assert!(matches!(res, Err(FghError::Shape { expected: (4, 4), got: (4, 3) })));
    }

    #[test]
    fn bad_inputs() {
        let V1 = nd::array![0.0];
        assert!(matches!(
            fgh(1.0, 1.0, &V1),
            Err(FghError::Grid(GridError::TooFewPoints(1))),
        ));
        let V = nd::array![0.0, 0.0];
        assert!(matches!(fgh(0.0, 1.0, &V), Err(FghError::Grid(GridError::BadMass(_)))));
        assert!(matches!(fgh(1.0, -1.0, &V), Err(FghError::Grid(GridError::BadStep(_)))));
    }

    #[test]
    fn coupled_single_state_matches() {
        let V = nd::array![0.3, -1.0, 0.2, 4.0, 1.5];
        let H = fgh(3.0, 0.25, &V).unwrap();
        let V3 = V.clone().into_shape((5, 1, 1)).unwrap();
        let Hc = fgh_coupled(3.0, 0.25, &V3).unwrap();
        assert_eq!(H, Hc);
    }

    #[test]
    fn coupled_block_structure() {
        let n = 6;
        let states = 3;
        let mut V: nd::Array3<f64> = nd::Array3::zeros((n, states, states));
        for k in 0..n {
            for p in 0..states {
                for q in p..states {
                    let v = (k + 1) as f64 * 0.1 + (p * states + q) as f64;
                    V[[k, p, q]] = v;
                    V[[k, q, p]] = v;
                }
            }
        }
        let H = fgh_coupled(1.5, 0.2, &V).unwrap();
        assert_eq!(H.dim(), (n * states, n * states));
        assert!(is_symmetric(&H));

        let diag_block = fgh(1.5, 0.2, &V.slice(nd::s![.., 1, 1])).unwrap();
        for p in 0..states {
            for q in 0..states {
                let block = H.slice(nd::s![p * n..(p + 1) * n, q * n..(q + 1) * n]);
                for i in 0..n {
                    for j in 0..n {
                        match (p == q, i == j) {
                            (false, false) => assert_eq!(block[[i, j]], 0.0),
                            (false, true) => assert_eq!(block[[i, j]], V[[i, p, q]]),
                            (true, false) => assert_eq!(block[[i, j]], diag_block[[i, j]]),
                            (true, true) => {},
                        }
                    }
                }
            }
        }
        let p = 1;
        for i in 0..n {
            assert_eq!(H[[p * n + i, p * n + i]], diag_block[[i, i]]);
        }
    }

    #[test]
    fn coupled_asymmetric_rejected() {
        let mut V: nd::Array3<f64> = nd::Array3::zeros((4, 2, 2));
        V[[2, 0, 1]] = 1.0;
        V[[2, 1, 0]] = 1.5;
        assert!(matches!(
            fgh_coupled(1.0, 1.0, &V),
            Err(FghError::Asymmetric { point: 2, p: 0, q: 1 }),
        ));
    }

    #[test]
    fn coupled_wrong_output_shape() {
        let V: nd::Array3<f64> = nd::Array3::zeros((4, 2, 2));
        let mut H: nd::Array2<f64> = nd::Array2::zeros((4, 4));
        assert!(matches!(
            fgh_coupled_into(1.0, 1.0, &V, &mut H),
            Err(FghError::Shape { expected: (8, 8), .. }),
        ));
    }

    #[test]
    fn coupled_overwrites_stale_output() {
        let V: nd::Array3<f64> = nd::Array3::zeros((3, 2, 2));
        let mut H: nd::Array2<f64> = nd::Array2::from_elem((6, 6), 9.0);
        fgh_coupled_into(1.0, 1.0, &V, &mut H).unwrap();
        assert_eq!(H[[0, 4]], 0.0);
        assert_eq!(H[[3, 0]], 0.0);
    }
}
