//! BLAS Level 1: Vector-vector operations.
//!
//! Kernels are generic over [`Scalar`] and take already-validated `usize`
//! lengths and `isize` increments; the prefixed CBLAS entry points in
//! [`crate::cblas`] check their arguments and call into these. Unit-stride
//! calls take a contiguous slice path, other increments go through
//! [`Strided`] addressing (negative increments walk the buffer backwards).

use lamina_core::addressing::Strided;
use lamina_core::scalar::{RealScalar, Scalar};
use num_traits::{Float, One, Zero};

// ============================================================================
// ASUM: sum of magnitudes
// ============================================================================

/// `sum(|re(x_i)| + |im(x_i)|)`; plain `sum(|x_i|)` for real data.
pub fn asum<T: Scalar>(n: usize, x: &[T], incx: isize) -> T::Real {
    let sx = Strided::new(n, incx);
    let mut sum = T::Real::zero();
    if sx.is_unit() {
        for v in &x[..n] {
            sum += v.abs1();
        }
    } else {
        for i in 0..n {
            sum += x[sx.at(i)].abs1();
        }
    }
    sum
}

// ============================================================================
// NRM2: Euclidean norm
// ============================================================================

/// `sqrt(sum |x_i|^2)` without intermediate overflow or underflow.
///
/// Scale-and-sum: `scale` tracks the largest component magnitude seen so far
/// and `ssq` the sum of squares relative to it, so `||x|| = scale * sqrt(ssq)`.
/// When a larger component arrives the accumulator is rescaled. Complex values
/// contribute their real and imaginary parts as separate components.
pub fn nrm2<T: Scalar>(n: usize, x: &[T], incx: isize) -> T::Real {
    let sx = Strided::new(n, incx);
    let mut scale = T::Real::zero();
    let mut ssq = T::Real::one();
    for i in 0..n {
        let v = x[sx.at(i)];
        accumulate_ssq(v.re(), &mut scale, &mut ssq);
        if T::IS_COMPLEX {
            accumulate_ssq(v.im(), &mut scale, &mut ssq);
        }
    }
    scale * ssq.sqrt()
}

#[inline(always)]
fn accumulate_ssq<R: RealScalar>(v: R, scale: &mut R, ssq: &mut R) {
    if v != R::zero() {
        let a = v.abs();
        if *scale < a {
            let r = *scale / a;
            *ssq = R::one() + *ssq * r * r;
            *scale = a;
        } else {
            let r = a / *scale;
            *ssq += r * r;
        }
    }
}

// ============================================================================
// DOT: inner products
// ============================================================================

/// Unconjugated inner product `sum x_i * y_i` (`dot` for real data).
pub fn dotu<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> T {
    dot_impl(n, x, incx, y, incy, false)
}

/// Conjugated inner product `sum conj(x_i) * y_i`.
pub fn dotc<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> T {
    dot_impl(n, x, incx, y, incy, true)
}

#[inline]
fn dot_impl<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize, conj: bool) -> T {
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    let mut acc = T::zero();
    if sx.is_unit() && sy.is_unit() {
        for (a, b) in x[..n].iter().zip(&y[..n]) {
            acc += a.conj_if(conj) * *b;
        }
    } else {
        for i in 0..n {
            acc += x[sx.at(i)].conj_if(conj) * y[sy.at(i)];
        }
    }
    acc
}

// ============================================================================
// AXPY: y = alpha * x + y
// ============================================================================

/// `y := alpha * x + y`. Nothing is read or written when `alpha == 0`.
pub fn axpy<T: Scalar>(n: usize, alpha: T, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    if n == 0 || alpha == T::zero() {
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    if sx.is_unit() && sy.is_unit() {
        for (yi, xi) in y[..n].iter_mut().zip(&x[..n]) {
            *yi += alpha * *xi;
        }
    } else {
        for i in 0..n {
            y[sy.at(i)] += alpha * x[sx.at(i)];
        }
    }
}

// ============================================================================
// SCAL: x = alpha * x
// ============================================================================

/// `x := alpha * x`.
pub fn scal<T: Scalar>(n: usize, alpha: T, x: &mut [T], incx: isize) {
    let sx = Strided::new(n, incx);
    if sx.is_unit() {
        for v in &mut x[..n] {
            *v *= alpha;
        }
    } else {
        for i in 0..n {
            x[sx.at(i)] *= alpha;
        }
    }
}

/// `x := alpha * x` with a real factor (`csscal`, `zdscal`).
pub fn scal_real<T: Scalar>(n: usize, alpha: T::Real, x: &mut [T], incx: isize) {
    let sx = Strided::new(n, incx);
    for i in 0..n {
        let k = sx.at(i);
        x[k] = x[k].scale_real(alpha);
    }
}

// ============================================================================
// COPY / SWAP
// ============================================================================

/// `y := x`.
pub fn copy<T: Scalar>(n: usize, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    if sx.is_unit() && sy.is_unit() {
        y[..n].copy_from_slice(&x[..n]);
    } else {
        for i in 0..n {
            y[sy.at(i)] = x[sx.at(i)];
        }
    }
}

/// `x <-> y`.
pub fn swap<T: Scalar>(n: usize, x: &mut [T], incx: isize, y: &mut [T], incy: isize) {
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    if sx.is_unit() && sy.is_unit() {
        x[..n].swap_with_slice(&mut y[..n]);
    } else {
        for i in 0..n {
            std::mem::swap(&mut x[sx.at(i)], &mut y[sy.at(i)]);
        }
    }
}

// ============================================================================
// IAMAX / IAMIN: extremum index
// ============================================================================

/// 0-based index of the first element with the largest `|re| + |im|`.
/// Returns 0 for `n == 0`.
pub fn iamax<T: Scalar>(n: usize, x: &[T], incx: isize) -> usize {
    extremum_index(n, x, incx, |cand, best| cand > best)
}

/// 0-based index of the first element with the smallest `|re| + |im|`.
/// Returns 0 for `n == 0`.
pub fn iamin<T: Scalar>(n: usize, x: &[T], incx: isize) -> usize {
    extremum_index(n, x, incx, |cand, best| cand < best)
}

#[inline]
fn extremum_index<T: Scalar>(
    n: usize,
    x: &[T],
    incx: isize,
    better: impl Fn(T::Real, T::Real) -> bool,
) -> usize {
    if n == 0 {
        return 0;
    }
    let sx = Strided::new(n, incx);
    let mut best_idx = 0;
    let mut best = x[sx.at(0)].abs1();
    for i in 1..n {
        let v = x[sx.at(i)].abs1();
        // Strict comparison: ties keep the earlier index.
        if better(v, best) {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

// ============================================================================
// ROT / ROTG: Givens plane rotations
// ============================================================================

/// Apply a plane rotation with real `c`, `s`:
/// `x_i := c*x_i + s*y_i`, `y_i := c*y_i - s*x_i`.
pub fn rot<T: Scalar>(
    n: usize,
    x: &mut [T],
    incx: isize,
    y: &mut [T],
    incy: isize,
    c: T::Real,
    s: T::Real,
) {
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let (kx, ky) = (sx.at(i), sy.at(i));
        let (xi, yi) = (x[kx], y[ky]);
        x[kx] = xi.scale_real(c) + yi.scale_real(s);
        y[ky] = yi.scale_real(c) - xi.scale_real(s);
    }
}

/// Result of constructing a real Givens rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation<R> {
    pub c: R,
    pub s: R,
    /// Rotated first component.
    pub r: R,
    /// Reconstruction value: `c` and `s` can be recovered from `z` alone.
    pub z: R,
}

/// Construct a real Givens rotation zeroing `b`:
/// `[c s; -s c] * [a; b] = [r; 0]`.
///
/// Scaled by `|a| + |b|` before squaring so neither overflow nor underflow
/// occurs; `r` carries the sign of the larger-magnitude input.
pub fn rotg<R: RealScalar>(a: R, b: R) -> Rotation<R> {
    let (abs_a, abs_b) = (a.abs(), b.abs());
    let roe = if abs_a > abs_b { a } else { b };
    let scale = abs_a + abs_b;
    if scale == R::zero() {
        return Rotation {
            c: R::one(),
            s: R::zero(),
            r: R::zero(),
            z: R::zero(),
        };
    }
    let (sa, sb) = (a / scale, b / scale);
    let mut r = scale * (sa * sa + sb * sb).sqrt();
    if roe < R::zero() {
        r = -r;
    }
    let c = a / r;
    let s = b / r;
    let z = if abs_a > abs_b {
        s
    } else if c != R::zero() {
        R::one() / c
    } else {
        R::one()
    };
    Rotation { c, s, r, z }
}

/// Construct a complex Givens rotation: real `c`, complex `s` and `r` with
/// `[c s; -conj(s) c] * [a; b] = [r; 0]`. The phase of `r` follows `a`.
pub fn rotg_complex<T: Scalar>(a: T, b: T) -> (T::Real, T, T) {
    let zero = T::Real::zero();
    let one = T::Real::one();
    let abs_a = a.modulus();
    if abs_a == zero {
        return (zero, T::one(), b);
    }
    let abs_b = b.modulus();
    let scale = abs_a + abs_b;
    let (ra, rb) = (abs_a / scale, abs_b / scale);
    let norm = scale * (ra * ra + rb * rb).sqrt();
    let alpha = a.scale_real(one / abs_a);
    let c = abs_a / norm;
    let s = (alpha * b.conj()).scale_real(one / norm);
    (c, s, alpha.scale_real(norm))
}

// ============================================================================
// ROTM / ROTMG: modified (fast) Givens rotations
// ============================================================================

/// Apply the modified rotation `H` encoded in `param`:
///
/// | `param[0]` | `H`                              |
/// |------------|----------------------------------|
/// | `-2`       | identity                         |
/// | `-1`       | `[p1 p3; p2 p4]`                 |
/// | `0`        | `[1 p3; p2 1]`                   |
/// | `1`        | `[p1 1; -1 p4]`                  |
pub fn rotm<R: RealScalar>(
    n: usize,
    x: &mut [R],
    incx: isize,
    y: &mut [R],
    incy: isize,
    param: &[R; 5],
) {
    let flag = param[0];
    let two = R::one() + R::one();
    if n == 0 || flag == -two {
        return;
    }
    let (h11, h21, h12, h22) = if flag < R::zero() {
        (param[1], param[2], param[3], param[4])
    } else if flag == R::zero() {
        (R::one(), param[2], param[3], R::one())
    } else {
        (param[1], -R::one(), R::one(), param[4])
    };
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let (kx, ky) = (sx.at(i), sy.at(i));
        let (w, z) = (x[kx], y[ky]);
        x[kx] = w * h11 + z * h12;
        y[ky] = w * h21 + z * h22;
    }
}

/// Construct the modified rotation that zeroes the second component of
/// `(sqrt(d1)*x1, sqrt(d2)*y1)`. Updates `d1`, `d2`, `x1` in place and
/// returns the 5-element parameter vector consumed by [`rotm`].
///
/// Scale factors are kept inside `[1/gam^2, gam^2]` with `gam = 4096`.
pub fn rotmg<R: RealScalar>(d1: &mut R, d2: &mut R, x1: &mut R, y1: R) -> [R; 5] {
    let zero = R::zero();
    let one = R::one();
    let gam = (one + one).powi(12);
    let gamsq = gam * gam;
    let rgamsq = one / gamsq;

    let mut flag;
    let (mut h11, mut h12, mut h21, mut h22) = (zero, zero, zero, zero);

    if *d1 < zero {
        flag = -one;
        *d1 = zero;
        *d2 = zero;
        *x1 = zero;
    } else {
        let p2 = *d2 * y1;
        if p2 == zero {
            let mut param = [zero; 5];
            param[0] = -(one + one);
            return param;
        }
        let p1 = *d1 * *x1;
        let q2 = p2 * y1;
        let q1 = p1 * *x1;

        if q1.abs() > q2.abs() {
            h21 = -y1 / *x1;
            h12 = p2 / p1;
            let u = one - h12 * h21;
            if u > zero {
                flag = zero;
                *d1 = *d1 / u;
                *d2 = *d2 / u;
                *x1 = *x1 * u;
            } else {
                flag = -one;
                h11 = zero;
                h12 = zero;
                h21 = zero;
                h22 = zero;
                *d1 = zero;
                *d2 = zero;
                *x1 = zero;
            }
        } else if q2 < zero {
            flag = -one;
            h11 = zero;
            h12 = zero;
            h21 = zero;
            h22 = zero;
            *d1 = zero;
            *d2 = zero;
            *x1 = zero;
        } else {
            flag = one;
            h11 = p1 / p2;
            h22 = *x1 / y1;
            let u = one + h11 * h22;
            let tmp = *d2 / u;
            *d2 = *d1 / u;
            *d1 = tmp;
            *x1 = y1 * u;
        }

        // Rescale so d1, d2 stay in range; H becomes fully explicit.
        if *d1 != zero {
            while *d1 <= rgamsq || *d1 >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if *d1 <= rgamsq {
                    *d1 = *d1 * gamsq;
                    *x1 = *x1 / gam;
                    h11 = h11 / gam;
                    h12 = h12 / gam;
                } else {
                    *d1 = *d1 / gamsq;
                    *x1 = *x1 * gam;
                    h11 = h11 * gam;
                    h12 = h12 * gam;
                }
            }
        }
        if *d2 != zero {
            while d2.abs() <= rgamsq || d2.abs() >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if d2.abs() <= rgamsq {
                    *d2 = *d2 * gamsq;
                    h21 = h21 / gam;
                    h22 = h22 / gam;
                } else {
                    *d2 = *d2 / gamsq;
                    h21 = h21 * gam;
                    h22 = h22 * gam;
                }
            }
        }
    }

    let mut param = [zero; 5];
    param[0] = flag;
    if flag < zero {
        param[1] = h11;
        param[2] = h21;
        param[3] = h12;
        param[4] = h22;
    } else if flag == zero {
        param[2] = h21;
        param[3] = h12;
    } else {
        param[1] = h11;
        param[4] = h22;
    }
    param
}

/// Fill in the implicit entries of `H` and mark it fully explicit.
#[inline]
fn make_explicit<R: RealScalar>(flag: &mut R, h11: &mut R, h12: &mut R, h21: &mut R, h22: &mut R) {
    if *flag == R::zero() {
        *h11 = R::one();
        *h22 = R::one();
    } else if *flag > R::zero() {
        *h21 = -R::one();
        *h12 = R::one();
    }
    *flag = -R::one();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lamina_core::scalar::{c32, c64};

    #[test]
    fn test_ddot() {
        let x = vec![1.0f64, 2.0, 3.0];
        let y = vec![4.0f64, 5.0, 6.0];
        assert_eq!(dotu(3, &x, 1, &y, 1), 32.0);
    }

    #[test]
    fn test_sdot_strided() {
        let x = vec![1.0f32, 0.0, 2.0, 0.0, 3.0];
        let y = vec![4.0f32, 0.0, 5.0, 0.0, 6.0];
        assert_eq!(dotu(3, &x, 2, &y, 2), 32.0);
    }

    #[test]
    fn test_dot_negative_increment_reverses() {
        // x read backwards: [3, 2, 1]
        let x = vec![1.0f64, 2.0, 3.0];
        let y = vec![1.0f64, 10.0, 100.0];
        assert_eq!(dotu(3, &x, -1, &y, 1), 3.0 + 20.0 + 100.0);
    }

    #[test]
    fn test_zdotc_conjugates_first_operand() {
        let x = vec![c64::new(1.0, 2.0), c64::new(0.0, 1.0)];
        let y = vec![c64::new(3.0, -1.0), c64::new(2.0, 0.0)];
        // conj(1+2i)(3-i) + conj(i)*2 = (1-2i)(3-i) - 2i = 1 - 7i - 2i
        assert_eq!(dotc(2, &x, 1, &y, 1), c64::new(1.0, -9.0));
        // (1+2i)(3-i) + 2i = 5 + 5i + 2i
        assert_eq!(dotu(2, &x, 1, &y, 1), c64::new(5.0, 7.0));
    }

    #[test]
    fn test_axpy() {
        let x = vec![1.0f32, 2.0, 3.0, 4.0];
        let mut y = vec![10.0f32, 20.0, 30.0, 40.0];
        axpy(4, 2.0, &x, 1, &mut y, 1);
        assert_eq!(y, vec![12.0, 24.0, 36.0, 48.0]);
    }

    #[test]
    fn test_axpy_strided() {
        let x = vec![1.0f32, 0.0, 2.0, 0.0, 3.0];
        let mut y = vec![10.0f32, 0.0, 20.0, 0.0, 30.0];
        axpy(3, 2.0, &x, 2, &mut y, 2);
        assert_eq!(y, vec![12.0, 0.0, 24.0, 0.0, 36.0]);
    }

    #[test]
    fn test_axpy_zero_alpha_leaves_y_bitwise() {
        let x = vec![f64::NAN, f64::INFINITY];
        let mut y = vec![-0.0f64, 1.5];
        axpy(2, 0.0, &x, 1, &mut y, 1);
        assert_eq!(y[0].to_bits(), (-0.0f64).to_bits());
        assert_eq!(y[1], 1.5);
    }

    #[test]
    fn test_scal_and_scal_real() {
        let mut x = vec![1.0f32, 0.0, 2.0, 0.0, 3.0];
        scal(3, 3.0, &mut x, 2);
        assert_eq!(x, vec![3.0, 0.0, 6.0, 0.0, 9.0]);

        let mut z = vec![c32::new(1.0, -1.0), c32::new(2.0, 4.0)];
        scal_real(2, 0.5, &mut z, 1);
        assert_eq!(z, vec![c32::new(0.5, -0.5), c32::new(1.0, 2.0)]);
        scal(1, c32::new(0.0, 1.0), &mut z, 1);
        assert_eq!(z[0], c32::new(0.5, 0.5));
    }

    #[test]
    fn test_nrm2_and_asum() {
        let x = vec![1.0f64, 2.0, 3.0];
        assert_relative_eq!(nrm2(3, &x, 1), 14f64.sqrt(), max_relative = 1e-15);
        assert_eq!(asum(3, &x, 1), 6.0);
        let x = vec![3.0f32, 0.0, 4.0];
        assert_relative_eq!(nrm2(2, &x, 2), 5.0);
    }

    #[test]
    fn test_nrm2_survives_extreme_exponents() {
        let big = vec![1e300f64, 1e300, 1e300, 1e300];
        assert_relative_eq!(nrm2(4, &big, 1), 2e300, max_relative = 1e-14);
        let tiny = vec![1e-300f64, 1e-300, 1e-300, 1e-300];
        assert_relative_eq!(nrm2(4, &tiny, 1), 2e-300, max_relative = 1e-14);
        assert_eq!(nrm2::<f64>(0, &[], 1), 0.0);
    }

    #[test]
    fn test_complex_nrm2_and_asum() {
        let z = vec![c64::new(3.0, 4.0), c64::new(0.0, -12.0)];
        assert_relative_eq!(nrm2(2, &z, 1), 13.0, max_relative = 1e-15);
        assert_eq!(asum(2, &z, 1), 19.0);
    }

    #[test]
    fn test_iamax_first_occurrence_wins() {
        let x = vec![1.0f32, -5.0, 3.0, 5.0];
        assert_eq!(iamax(4, &x, 1), 1);
        assert_eq!(iamin(4, &x, 1), 0);
        let z = vec![c64::new(1.0, 1.0), c64::new(-2.0, 0.0), c64::new(0.5, 0.5)];
        assert_eq!(iamax(3, &z, 1), 0);
        assert_eq!(iamin(3, &z, 1), 2);
        assert_eq!(iamax::<f64>(0, &[], 1), 0);
    }

    #[test]
    fn test_copy_and_swap() {
        let x = vec![1.0f32, 2.0, 3.0];
        let mut y = vec![0.0f32; 3];
        copy(3, &x, 1, &mut y, 1);
        assert_eq!(y, vec![1.0, 2.0, 3.0]);

        let mut a = vec![1.0f64, 2.0, 3.0];
        let mut b = vec![4.0f64, 0.0, 5.0, 0.0, 6.0];
        swap(3, &mut a, 1, &mut b, 2);
        assert_eq!(a, vec![4.0, 5.0, 6.0]);
        assert_eq!(b, vec![1.0, 0.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn test_rotg_zeroes_second_component() {
        let g = rotg(3.0f64, 4.0);
        assert_relative_eq!(g.r, 5.0);
        assert_relative_eq!(g.c, 0.6);
        assert_relative_eq!(g.s, 0.8);
        // |b| >= |a| and c != 0: z = 1/c
        assert_relative_eq!(g.z, 1.0 / 0.6);
        assert_relative_eq!(-g.s * 3.0 + g.c * 4.0, 0.0, epsilon = 1e-15);

        let g = rotg(-4.0f64, 3.0);
        assert_relative_eq!(g.r, -5.0);
        assert_relative_eq!(g.z, g.s);

        let g = rotg(0.0f32, 0.0);
        assert_eq!((g.c, g.s, g.r, g.z), (1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotg_complex() {
        let a = c64::new(3.0, 0.0);
        let b = c64::new(0.0, 4.0);
        let (c, s, r) = rotg_complex(a, b);
        assert_relative_eq!(c, 0.6);
        assert_relative_eq!(r.re, 5.0);
        assert_relative_eq!(r.im, 0.0);
        // second row of the rotation annihilates b
        let zero = -Scalar::conj(s) * a + b.scale_real(c);
        assert!(zero.norm() < 1e-15);

        let (c, s, r) = rotg_complex(c64::new(0.0, 0.0), b);
        assert_eq!((c, s, r), (0.0, c64::new(1.0, 0.0), b));
    }

    #[test]
    fn test_rotg_complex_single_precision() {
        let a = c32::new(0.0, 3.0);
        let b = c32::new(4.0, 0.0);
        let (c, s, r) = rotg_complex::<c32>(a, b);
        assert_relative_eq!(c, 0.6, max_relative = 1e-6);
        // r keeps the phase of a: 5i
        assert_relative_eq!(r.re, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.im, 5.0, max_relative = 1e-6);
        let first = a.scale_real(c) + s * b;
        assert!((first - r).norm() < 1e-5);
        let second = -Scalar::conj(s) * a + b.scale_real(c);
        assert!(second.norm() < 1e-5);
        assert_relative_eq!(nrm2::<c32>(1, &[r], 1), 5.0, max_relative = 1e-6);
    }

    #[test]
    fn test_rot_applies_rotation() {
        let mut x = vec![1.0f64, 2.0];
        let mut y = vec![3.0f64, 4.0];
        rot(2, &mut x, 1, &mut y, 1, 0.0, 1.0);
        assert_eq!(x, vec![3.0, 4.0]);
        assert_eq!(y, vec![-1.0, -2.0]);
    }

    #[test]
    fn test_rotmg_then_rotm_zeroes_y() {
        for &(d1, d2, x1, y1) in &[
            (2.0f64, 3.0, 1.0, 4.0),
            (5.0, 1.0, 3.0, 0.5),
            (1e-9, 1.0, 1.0, 1.0),
        ] {
            let (mut dd1, mut dd2, mut xx1) = (d1, d2, x1);
            let param = rotmg(&mut dd1, &mut dd2, &mut xx1, y1);
            let mut x = vec![x1];
            let mut y = vec![y1];
            rotm(1, &mut x, 1, &mut y, 1, &param);
            assert!(y[0].abs() < 1e-12, "param {param:?} left y = {}", y[0]);
            assert_relative_eq!(x[0], xx1, max_relative = 1e-12);
            // The weighted norm is preserved: d1*x1^2 + d2*y1^2
            assert_relative_eq!(
                dd1 * xx1 * xx1,
                d1 * x1 * x1 + d2 * y1 * y1,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_rotmg_flags() {
        let (mut d1, mut d2, mut x1) = (1.0f64, 0.0, 2.0);
        assert_eq!(rotmg(&mut d1, &mut d2, &mut x1, 3.0)[0], -2.0);
        let (mut d1, mut d2, mut x1) = (-1.0f64, 1.0, 2.0);
        let p = rotmg(&mut d1, &mut d2, &mut x1, 3.0);
        assert_eq!(p[0], -1.0);
        assert_eq!((d1, d2, x1), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotm_identity_flag_is_noop() {
        let mut x = vec![1.0f32, 2.0];
        let mut y = vec![3.0f32, 4.0];
        rotm(2, &mut x, 1, &mut y, 1, &[-2.0, 9.0, 9.0, 9.0, 9.0]);
        assert_eq!((x, y), (vec![1.0, 2.0], vec![3.0, 4.0]));
    }
}
