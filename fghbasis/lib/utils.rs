//! Grid quadrature and wavefunction measures.

use ndarray::{ self as nd, Ix1 };
use num_traits::Float;
use crate::error::LengthError;

fn lit<A: Float>(x: f64) -> A { A::from(x).unwrap_or_else(A::nan) }

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let n: usize = y.len();
    let two: A = lit(2.0);
    let inner = y.iter().skip(1).take(n - 2).fold(A::zero(), |acc, yk| acc + *yk);
    (dx / two) * (y[0] + two * inner + y[n - 1])
}

/// Integrate using the composite Simpson rule.
///
/// When the number of intervals is odd, the last three intervals are covered by
/// Simpson's 3/8 rule instead; two-point arrays fall back to the trapezoidal
/// rule.
///
/// *Panics if `y` has length less than 2*.
///
/// ```
/// use ndarray as nd;
/// use fghbasis::utils::simpson;
///
/// let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 11);
/// let y = x.mapv(|xk| xk.powi(3));
/// assert!((simpson(&y, 0.1) - 0.25).abs() < 1e-12);
/// ```
pub fn simpson<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let n: usize = y.len();
    if n == 2 { return trapz(y, dx); }
    let intervals = n - 1;
    // points [0, m] are handled by the 1/3 rule
    let m = if intervals % 2 == 0 { n - 1 } else { n - 4 };
    let mut acc = A::zero();
    if m > 0 {
        let (two, four): (A, A) = (lit(2.0), lit(4.0));
        let inner
            = y.iter().enumerate().skip(1).take(m - 1)
            .fold(A::zero(), |acc, (k, yk)| {
                acc + if k % 2 == 1 { four * *yk } else { two * *yk }
            });
        acc = acc + dx / lit(3.0) * (y[0] + inner + y[m]);
    }
    if m < n - 1 {
        let three: A = lit(3.0);
        acc = acc + three * dx / lit(8.0) * (
            y[m] + three * y[m + 1] + three * y[m + 2] + y[m + 3]
        );
    }
    acc
}

/// Calculate the L2 norm of a wavefunction sampled on a grid with spacing `dx`,
/// i.e. the square root of the Simpson integral of its square.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S, A>(dx: A, q: &nd::ArrayBase<S, Ix1>) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    simpson(&q.mapv(|qk| qk * qk), dx).sqrt()
}

/// Calculate the expectation value of `1 / r²` for a wavefunction sampled on
/// the equally spaced radial grid `r`.
///
/// The wavefunction need not be normalized. Grid points at `r = 0` make the
/// result infinite.
///
/// *Panics if the arrays have length less than 2*.
pub fn centrifugal_term<S, T, A>(
    r: &nd::ArrayBase<S, Ix1>,
    q: &nd::ArrayBase<T, Ix1>,
) -> Result<A, LengthError>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Float,
{
    LengthError::check(r, q)?;
    let dx = r[1] - r[0];
    let q2: nd::Array1<A> = q.mapv(|qk| qk * qk);
    let weighted: nd::Array1<A>
        = q2.iter().zip(r).map(|(q2k, rk)| *q2k / (*rk * *rk)).collect();
    Ok(simpson(&weighted, dx) / simpson(&q2, dx))
}
