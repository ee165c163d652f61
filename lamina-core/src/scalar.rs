//! The four numeric domains: `f32`, `f64`, `c32`, `c64`.
//!
//! Kernels are written once against [`Scalar`] and instantiated for each
//! domain. Complex values use `num_complex::Complex`, a `repr(C)` pair of
//! explicit real/imaginary fields, so interleaved `[re, im, ...]` buffers
//! from foreign callers convert at the boundary without copying.

use num_complex::Complex;
use num_traits::{Float, One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{BlasError, Result};

/// Single-precision complex.
#[allow(non_camel_case_types)]
pub type c32 = Complex<f32>;
/// Double-precision complex.
#[allow(non_camel_case_types)]
pub type c64 = Complex<f64>;

/// Arithmetic every BLAS kernel needs from its element type.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// Underlying real type (`Self` for real domains).
    type Real: RealScalar;

    /// `true` for `c32`/`c64`.
    const IS_COMPLEX: bool;

    /// CBLAS routine prefix (`s`, `d`, `c`, `z`).
    const PREFIX: char;

    /// Register tile rows of the GEMM microkernel.
    const MR: usize;
    /// Register tile columns of the GEMM microkernel.
    const NR: usize;
    /// Rows of A packed per L2 block.
    const MC: usize;
    /// Depth of a packed panel (fits L1 together with one B micro-panel).
    const KC: usize;
    /// Columns of B packed per L3 block.
    const NC: usize;

    fn conj(self) -> Self;
    fn re(self) -> Self::Real;
    fn im(self) -> Self::Real;
    fn from_real(re: Self::Real) -> Self;

    /// `|re| + |im|`, the magnitude used by `asum` and `iamax`.
    fn abs1(self) -> Self::Real;

    /// Euclidean magnitude, computed without intermediate overflow.
    fn modulus(self) -> Self::Real;

    /// Multiply by a real factor.
    fn scale_real(self, r: Self::Real) -> Self;

    #[inline(always)]
    fn conj_if(self, conj: bool) -> Self {
        if conj {
            self.conj()
        } else {
            self
        }
    }

    /// Drop the imaginary part. Hermitian diagonals are kept real with this.
    #[inline(always)]
    fn real_part(self) -> Self {
        Self::from_real(self.re())
    }
}

/// `f32` and `f64`.
pub trait RealScalar: Scalar<Real = Self> + Float {}

macro_rules! impl_real_scalar {
    ($t:ty, $prefix:literal, $mr:literal, $nr:literal, $mc:literal, $kc:literal, $nc:literal) => {
        impl Scalar for $t {
            type Real = $t;
            const IS_COMPLEX: bool = false;
            const PREFIX: char = $prefix;
            const MR: usize = $mr;
            const NR: usize = $nr;
            const MC: usize = $mc;
            const KC: usize = $kc;
            const NC: usize = $nc;

            #[inline(always)]
            fn conj(self) -> Self {
                self
            }
            #[inline(always)]
            fn re(self) -> Self {
                self
            }
            #[inline(always)]
            fn im(self) -> Self {
                0.0
            }
            #[inline(always)]
            fn from_real(re: Self) -> Self {
                re
            }
            #[inline(always)]
            fn abs1(self) -> Self {
                self.abs()
            }
            #[inline(always)]
            fn modulus(self) -> Self {
                self.abs()
            }
            #[inline(always)]
            fn scale_real(self, r: Self) -> Self {
                self * r
            }
        }

        impl RealScalar for $t {}
    };
}

macro_rules! impl_complex_scalar {
    ($r:ty, $prefix:literal, $mr:literal, $nr:literal, $mc:literal, $kc:literal, $nc:literal) => {
        impl Scalar for Complex<$r> {
            type Real = $r;
            const IS_COMPLEX: bool = true;
            const PREFIX: char = $prefix;
            const MR: usize = $mr;
            const NR: usize = $nr;
            const MC: usize = $mc;
            const KC: usize = $kc;
            const NC: usize = $nc;

            #[inline(always)]
            fn conj(self) -> Self {
                Complex::new(self.re, -self.im)
            }
            #[inline(always)]
            fn re(self) -> $r {
                self.re
            }
            #[inline(always)]
            fn im(self) -> $r {
                self.im
            }
            #[inline(always)]
            fn from_real(re: $r) -> Self {
                Complex::new(re, 0.0)
            }
            #[inline(always)]
            fn abs1(self) -> $r {
                self.re.abs() + self.im.abs()
            }
            #[inline(always)]
            fn modulus(self) -> $r {
                self.re.hypot(self.im)
            }
            #[inline(always)]
            fn scale_real(self, r: $r) -> Self {
                Complex::new(self.re * r, self.im * r)
            }
        }
    };
}

// 6x16 / 6x8 register tiles for real data, 4x4 for complex (each element is
// two lanes wide).
impl_real_scalar!(f32, 's', 6, 16, 128, 256, 4096);
impl_real_scalar!(f64, 'd', 6, 8, 96, 256, 2048);
impl_complex_scalar!(f32, 'c', 4, 4, 96, 192, 2048);
impl_complex_scalar!(f64, 'z', 4, 4, 64, 128, 1024);

// ============================================================================
// Interleaved complex buffers
// ============================================================================

/// View an interleaved `[re, im, re, im, ...]` buffer as complex values.
pub fn as_complex<R: RealScalar + bytemuck::Pod>(buf: &[R]) -> Result<&[Complex<R>]>
where
    Complex<R>: bytemuck::Pod,
{
    if buf.len() % 2 != 0 {
        return Err(BlasError::OddInterleavedLength(buf.len()));
    }
    Ok(bytemuck::cast_slice(buf))
}

/// Mutable variant of [`as_complex`].
pub fn as_complex_mut<R: RealScalar + bytemuck::Pod>(buf: &mut [R]) -> Result<&mut [Complex<R>]>
where
    Complex<R>: bytemuck::Pod,
{
    if buf.len() % 2 != 0 {
        return Err(BlasError::OddInterleavedLength(buf.len()));
    }
    Ok(bytemuck::cast_slice_mut(buf))
}
