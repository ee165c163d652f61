//! Domain-prefixed entry points with CBLAS argument conventions.
//!
//! Every function takes `i32` dimensions, increments and leading dimensions
//! like `cblas.h` does, validates them first to last, and only then calls
//! the generic kernel. The first bad argument comes back as
//! [`BlasError::IllegalArgument`](lamina_core::BlasError) carrying the
//! routine name (`cblas_dgemm`, ...) and the 1-based position of the
//! argument in the function's parameter list; no output has been touched.
//! A buffer is checked right after the last leading dimension or increment
//! its required length depends on, so the scan stays first to last except
//! where a buffer precedes its own `ld`/`inc`.
//!
//! Complex scalars are `num_complex::Complex` values. Callers holding
//! interleaved `[re, im, ...]` storage convert with
//! [`as_complex`](lamina_core::scalar::as_complex) first.

use lamina_core::addressing::{band_len, dense_len, packed_len};
use lamina_core::error::Result;
use lamina_core::layout::{Diag, Layout, Side, Transpose, Uplo};
use lamina_core::scalar::{c32, c64, Scalar};

use crate::validate::Check;
use crate::{level1, level2, level3};

/// `(n, x, incx, y, incy)` checks shared by the two-vector Level 1 routines.
/// `pos` lists the positions of `n, x, incx, y, incy`.
fn check_pair(
    chk: &Check,
    pos: [usize; 5],
    n: i32,
    xlen: usize,
    incx: i32,
    ylen: usize,
    incy: i32,
) -> Result<(usize, isize, isize)> {
    let n = chk.dim(pos[0], n)?;
    let incx = chk.inc(pos[2], incx)?;
    chk.vector(pos[1], xlen, n, incx)?;
    let incy = chk.inc(pos[4], incy)?;
    chk.vector(pos[3], ylen, n, incy)?;
    Ok((n, incx, incy))
}

/// Triangular routines take op(A) in {A, A^T, A^H}.
#[inline]
fn triangular_trans(trans: Transpose) -> bool {
    trans != Transpose::ConjNoTrans
}

/// `syrk`/`syr2k`: ConjTrans only means Trans when there is nothing to
/// conjugate.
#[inline]
fn symmetric_update_trans<T: Scalar>(trans: Transpose) -> bool {
    match trans {
        Transpose::NoTrans | Transpose::Trans => true,
        Transpose::ConjTrans => !T::IS_COMPLEX,
        Transpose::ConjNoTrans => false,
    }
}

#[inline]
fn hermitian_update_trans(trans: Transpose) -> bool {
    matches!(trans, Transpose::NoTrans | Transpose::ConjTrans)
}

macro_rules! routine {
    ($name:ident) => {
        concat!("cblas_", stringify!($name))
    };
}

// ============================================================================
// Level 1
// ============================================================================

macro_rules! asum_nrm2 {
    ($($asum:ident, $nrm2:ident: $t:ty => $r:ty;)*) => {$(
        /// Sum of `|re| + |im|` over `x`.
        pub fn $asum(n: i32, x: &[$t], incx: i32) -> Result<$r> {
            let chk = Check::new(routine!($asum));
            let n = chk.dim(1, n)?;
            let incx = chk.inc(3, incx)?;
            chk.vector(2, x.len(), n, incx)?;
            Ok(level1::asum(n, x, incx))
        }

        /// Euclidean norm of `x`.
        pub fn $nrm2(n: i32, x: &[$t], incx: i32) -> Result<$r> {
            let chk = Check::new(routine!($nrm2));
            let n = chk.dim(1, n)?;
            let incx = chk.inc(3, incx)?;
            chk.vector(2, x.len(), n, incx)?;
            Ok(level1::nrm2(n, x, incx))
        }
    )*};
}

asum_nrm2! {
    sasum, snrm2: f32 => f32;
    dasum, dnrm2: f64 => f64;
    scasum, scnrm2: c32 => f32;
    dzasum, dznrm2: c64 => f64;
}

macro_rules! axpy_copy_swap {
    ($($axpy:ident, $copy:ident, $swap:ident: $t:ty;)*) => {$(
        /// `y := alpha * x + y`.
        pub fn $axpy(n: i32, alpha: $t, x: &[$t], incx: i32, y: &mut [$t], incy: i32) -> Result<()> {
            let chk = Check::new(routine!($axpy));
            let (n, incx, incy) = check_pair(&chk, [1, 3, 4, 5, 6], n, x.len(), incx, y.len(), incy)?;
            level1::axpy(n, alpha, x, incx, y, incy);
            Ok(())
        }

        /// `y := x`.
        pub fn $copy(n: i32, x: &[$t], incx: i32, y: &mut [$t], incy: i32) -> Result<()> {
            let chk = Check::new(routine!($copy));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            level1::copy(n, x, incx, y, incy);
            Ok(())
        }

        /// Exchange `x` and `y`.
        pub fn $swap(n: i32, x: &mut [$t], incx: i32, y: &mut [$t], incy: i32) -> Result<()> {
            let chk = Check::new(routine!($swap));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            level1::swap(n, x, incx, y, incy);
            Ok(())
        }
    )*};
}

axpy_copy_swap! {
    saxpy, scopy, sswap: f32;
    daxpy, dcopy, dswap: f64;
    caxpy, ccopy, cswap: c32;
    zaxpy, zcopy, zswap: c64;
}

macro_rules! dot {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(n: i32, x: &[$t], incx: i32, y: &[$t], incy: i32) -> Result<$t> {
            let chk = Check::new(routine!($name));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            Ok(level1::$kernel(n, x, incx, y, incy))
        }
    )*};
}

dot! {
    sdot: f32 => dotu;
    ddot: f64 => dotu;
    cdotu: c32 => dotu;
    zdotu: c64 => dotu;
    cdotc: c32 => dotc;
    zdotc: c64 => dotc;
}

macro_rules! dot_sub {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        /// Subroutine form: the product is written through `dot`.
        pub fn $name(n: i32, x: &[$t], incx: i32, y: &[$t], incy: i32, dot: &mut $t) -> Result<()> {
            let chk = Check::new(routine!($name));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            *dot = level1::$kernel(n, x, incx, y, incy);
            Ok(())
        }
    )*};
}

dot_sub! {
    cdotu_sub: c32 => dotu;
    zdotu_sub: c64 => dotu;
    cdotc_sub: c32 => dotc;
    zdotc_sub: c64 => dotc;
}

macro_rules! scal {
    ($($name:ident: $alpha:ty, $t:ty => $kernel:ident;)*) => {$(
        /// `x := alpha * x`.
        pub fn $name(n: i32, alpha: $alpha, x: &mut [$t], incx: i32) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(1, n)?;
            let incx = chk.inc(4, incx)?;
            chk.vector(3, x.len(), n, incx)?;
            level1::$kernel(n, alpha, x, incx);
            Ok(())
        }
    )*};
}

scal! {
    sscal: f32, f32 => scal;
    dscal: f64, f64 => scal;
    cscal: c32, c32 => scal;
    zscal: c64, c64 => scal;
    csscal: f32, c32 => scal_real;
    zdscal: f64, c64 => scal_real;
}

macro_rules! rot {
    ($($name:ident: $t:ty, $r:ty;)*) => {$(
        /// Apply the plane rotation `(c, s)` to the pairs `(x_i, y_i)`.
        pub fn $name(n: i32, x: &mut [$t], incx: i32, y: &mut [$t], incy: i32, c: $r, s: $r) -> Result<()> {
            let chk = Check::new(routine!($name));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            level1::rot(n, x, incx, y, incy, c, s);
            Ok(())
        }
    )*};
}

rot! {
    srot: f32, f32;
    drot: f64, f64;
    csrot: c32, f32;
    zdrot: c64, f64;
}

macro_rules! rotg_real {
    ($($name:ident: $t:ty;)*) => {$(
        /// Construct a Givens rotation. On return `a` holds `r` and `b` the
        /// reconstruction value `z`.
        pub fn $name(a: &mut $t, b: &mut $t, c: &mut $t, s: &mut $t) {
            let g = level1::rotg(*a, *b);
            *a = g.r;
            *b = g.z;
            *c = g.c;
            *s = g.s;
        }
    )*};
}

rotg_real! {
    srotg: f32;
    drotg: f64;
}

macro_rules! rotg_complex {
    ($($name:ident: $t:ty, $r:ty;)*) => {$(
        /// Construct a complex Givens rotation; `a` is overwritten with `r`.
        pub fn $name(a: &mut $t, b: $t, c: &mut $r, s: &mut $t) {
            let (cv, sv, r) = level1::rotg_complex(*a, b);
            *a = r;
            *c = cv;
            *s = sv;
        }
    )*};
}

rotg_complex! {
    crotg: c32, f32;
    zrotg: c64, f64;
}

macro_rules! rotm {
    ($($rotm:ident, $rotmg:ident: $t:ty;)*) => {$(
        /// Apply the modified rotation encoded in `param`.
        pub fn $rotm(n: i32, x: &mut [$t], incx: i32, y: &mut [$t], incy: i32, param: &[$t; 5]) -> Result<()> {
            let chk = Check::new(routine!($rotm));
            let (n, incx, incy) = check_pair(&chk, [1, 2, 3, 4, 5], n, x.len(), incx, y.len(), incy)?;
            level1::rotm(n, x, incx, y, incy, param);
            Ok(())
        }

        /// Construct a modified rotation; `d1`, `d2`, `b1` are updated in place.
        pub fn $rotmg(d1: &mut $t, d2: &mut $t, b1: &mut $t, b2: $t, param: &mut [$t; 5]) {
            *param = level1::rotmg(d1, d2, b1, b2);
        }
    )*};
}

rotm! {
    srotm, srotmg: f32;
    drotm, drotmg: f64;
}

macro_rules! extremum_index {
    ($($max:ident, $min:ident: $t:ty;)*) => {$(
        /// 0-based index of the first element with the largest magnitude.
        pub fn $max(n: i32, x: &[$t], incx: i32) -> Result<usize> {
            let chk = Check::new(routine!($max));
            let n = chk.dim(1, n)?;
            let incx = chk.inc(3, incx)?;
            chk.vector(2, x.len(), n, incx)?;
            Ok(level1::iamax(n, x, incx))
        }

        /// 0-based index of the first element with the smallest magnitude.
        pub fn $min(n: i32, x: &[$t], incx: i32) -> Result<usize> {
            let chk = Check::new(routine!($min));
            let n = chk.dim(1, n)?;
            let incx = chk.inc(3, incx)?;
            chk.vector(2, x.len(), n, incx)?;
            Ok(level1::iamin(n, x, incx))
        }
    )*};
}

extremum_index! {
    isamax, isamin: f32;
    idamax, idamin: f64;
    icamax, icamin: c32;
    izamax, izamin: c64;
}

// ============================================================================
// Level 2
// ============================================================================

macro_rules! gemv {
    ($($name:ident: $t:ty;)*) => {$(
        /// `y := alpha * op(A) * x + beta * y`.
        pub fn $name(
            layout: Layout,
            trans: Transpose,
            m: i32,
            n: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            x: &[$t],
            incx: i32,
            beta: $t,
            y: &mut [$t],
            incy: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let m = chk.dim(3, m)?;
            let n = chk.dim(4, n)?;
            let lda = chk.ld(7, lda, layout.leading_dim(m, n))?;
            chk.buffer(6, a.len(), dense_len(layout, m, n, lda))?;
            let (ylen, xlen) = trans.op_shape(m, n);
            let incx = chk.inc(9, incx)?;
            chk.vector(8, x.len(), xlen, incx)?;
            let incy = chk.inc(12, incy)?;
            chk.vector(11, y.len(), ylen, incy)?;
            level2::gemv(layout, trans, m, n, alpha, a, lda, x, incx, beta, y, incy);
            Ok(())
        }
    )*};
}

gemv! {
    sgemv: f32;
    dgemv: f64;
    cgemv: c32;
    zgemv: c64;
}

macro_rules! gbmv {
    ($($name:ident: $t:ty;)*) => {$(
        /// Band `y := alpha * op(A) * x + beta * y`.
        pub fn $name(
            layout: Layout,
            trans: Transpose,
            m: i32,
            n: i32,
            kl: i32,
            ku: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            x: &[$t],
            incx: i32,
            beta: $t,
            y: &mut [$t],
            incy: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let m = chk.dim(3, m)?;
            let n = chk.dim(4, n)?;
            let kl = chk.dim(5, kl)?;
            let ku = chk.dim(6, ku)?;
            let lda = chk.ld(9, lda, kl + ku + 1)?;
            chk.buffer(8, a.len(), band_len(layout, m, n, kl, ku, lda))?;
            let (ylen, xlen) = trans.op_shape(m, n);
            let incx = chk.inc(11, incx)?;
            chk.vector(10, x.len(), xlen, incx)?;
            let incy = chk.inc(14, incy)?;
            chk.vector(13, y.len(), ylen, incy)?;
            level2::gbmv(layout, trans, m, n, kl, ku, alpha, a, lda, x, incx, beta, y, incy);
            Ok(())
        }
    )*};
}

gbmv! {
    sgbmv: f32;
    dgbmv: f64;
    cgbmv: c32;
    zgbmv: c64;
}

macro_rules! triangular_full {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            trans: Transpose,
            diag: Diag,
            n: i32,
            a: &[$t],
            lda: i32,
            x: &mut [$t],
            incx: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(3, triangular_trans(trans))?;
            let n = chk.dim(5, n)?;
            let lda = chk.ld(7, lda, n)?;
            chk.buffer(6, a.len(), dense_len(layout, n, n, lda))?;
            let incx = chk.inc(9, incx)?;
            chk.vector(8, x.len(), n, incx)?;
            level2::$kernel(layout, uplo, trans, diag, n, a, lda, x, incx);
            Ok(())
        }
    )*};
}

triangular_full! {
    strmv: f32 => trmv;
    dtrmv: f64 => trmv;
    ctrmv: c32 => trmv;
    ztrmv: c64 => trmv;
    strsv: f32 => trsv;
    dtrsv: f64 => trsv;
    ctrsv: c32 => trsv;
    ztrsv: c64 => trsv;
}

macro_rules! triangular_band {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            trans: Transpose,
            diag: Diag,
            n: i32,
            k: i32,
            a: &[$t],
            lda: i32,
            x: &mut [$t],
            incx: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(3, triangular_trans(trans))?;
            let n = chk.dim(5, n)?;
            let k = chk.dim(6, k)?;
            let lda = chk.ld(8, lda, k + 1)?;
            chk.buffer(7, a.len(), band_len(layout, n, n, k, 0, lda))?;
            let incx = chk.inc(10, incx)?;
            chk.vector(9, x.len(), n, incx)?;
            level2::$kernel(layout, uplo, trans, diag, n, k, a, lda, x, incx);
            Ok(())
        }
    )*};
}

triangular_band! {
    stbmv: f32 => tbmv;
    dtbmv: f64 => tbmv;
    ctbmv: c32 => tbmv;
    ztbmv: c64 => tbmv;
    stbsv: f32 => tbsv;
    dtbsv: f64 => tbsv;
    ctbsv: c32 => tbsv;
    ztbsv: c64 => tbsv;
}

macro_rules! triangular_packed {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            trans: Transpose,
            diag: Diag,
            n: i32,
            ap: &[$t],
            x: &mut [$t],
            incx: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(3, triangular_trans(trans))?;
            let n = chk.dim(5, n)?;
            chk.buffer(6, ap.len(), packed_len(n))?;
            let incx = chk.inc(8, incx)?;
            chk.vector(7, x.len(), n, incx)?;
            level2::$kernel(layout, uplo, trans, diag, n, ap, x, incx);
            Ok(())
        }
    )*};
}

triangular_packed! {
    stpmv: f32 => tpmv;
    dtpmv: f64 => tpmv;
    ctpmv: c32 => tpmv;
    ztpmv: c64 => tpmv;
    stpsv: f32 => tpsv;
    dtpsv: f64 => tpsv;
    ctpsv: c32 => tpsv;
    ztpsv: c64 => tpsv;
}

macro_rules! symmetric_mv_full {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            x: &[$t],
            incx: i32,
            beta: $t,
            y: &mut [$t],
            incy: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let lda = chk.ld(6, lda, n)?;
            chk.buffer(5, a.len(), dense_len(layout, n, n, lda))?;
            let incx = chk.inc(8, incx)?;
            chk.vector(7, x.len(), n, incx)?;
            let incy = chk.inc(11, incy)?;
            chk.vector(10, y.len(), n, incy)?;
            level2::$kernel(layout, uplo, n, alpha, a, lda, x, incx, beta, y, incy);
            Ok(())
        }
    )*};
}

symmetric_mv_full! {
    ssymv: f32 => symv;
    dsymv: f64 => symv;
    chemv: c32 => hemv;
    zhemv: c64 => hemv;
}

macro_rules! symmetric_mv_band {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            k: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            x: &[$t],
            incx: i32,
            beta: $t,
            y: &mut [$t],
            incy: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let k = chk.dim(4, k)?;
            let lda = chk.ld(7, lda, k + 1)?;
            chk.buffer(6, a.len(), band_len(layout, n, n, k, 0, lda))?;
            let incx = chk.inc(9, incx)?;
            chk.vector(8, x.len(), n, incx)?;
            let incy = chk.inc(12, incy)?;
            chk.vector(11, y.len(), n, incy)?;
            level2::$kernel(layout, uplo, n, k, alpha, a, lda, x, incx, beta, y, incy);
            Ok(())
        }
    )*};
}

symmetric_mv_band! {
    ssbmv: f32 => sbmv;
    dsbmv: f64 => sbmv;
    chbmv: c32 => hbmv;
    zhbmv: c64 => hbmv;
}

macro_rules! symmetric_mv_packed {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $t,
            ap: &[$t],
            x: &[$t],
            incx: i32,
            beta: $t,
            y: &mut [$t],
            incy: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            chk.buffer(5, ap.len(), packed_len(n))?;
            let incx = chk.inc(7, incx)?;
            chk.vector(6, x.len(), n, incx)?;
            let incy = chk.inc(10, incy)?;
            chk.vector(9, y.len(), n, incy)?;
            level2::$kernel(layout, uplo, n, alpha, ap, x, incx, beta, y, incy);
            Ok(())
        }
    )*};
}

symmetric_mv_packed! {
    sspmv: f32 => spmv;
    dspmv: f64 => spmv;
    chpmv: c32 => hpmv;
    zhpmv: c64 => hpmv;
}

macro_rules! ger {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        /// Rank-1 update `A := alpha * x * y' + A`.
        pub fn $name(
            layout: Layout,
            m: i32,
            n: i32,
            alpha: $t,
            x: &[$t],
            incx: i32,
            y: &[$t],
            incy: i32,
            a: &mut [$t],
            lda: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let m = chk.dim(2, m)?;
            let n = chk.dim(3, n)?;
            let incx = chk.inc(6, incx)?;
            chk.vector(5, x.len(), m, incx)?;
            let incy = chk.inc(8, incy)?;
            chk.vector(7, y.len(), n, incy)?;
            let lda = chk.ld(10, lda, layout.leading_dim(m, n))?;
            chk.buffer(9, a.len(), dense_len(layout, m, n, lda))?;
            level2::$kernel(layout, m, n, alpha, x, incx, y, incy, a, lda);
            Ok(())
        }
    )*};
}

ger! {
    sger: f32 => geru;
    dger: f64 => geru;
    cgeru: c32 => geru;
    zgeru: c64 => geru;
    cgerc: c32 => gerc;
    zgerc: c64 => gerc;
}

macro_rules! symmetric_rank1_full {
    ($($name:ident: $alpha:ty, $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $alpha,
            x: &[$t],
            incx: i32,
            a: &mut [$t],
            lda: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let incx = chk.inc(6, incx)?;
            chk.vector(5, x.len(), n, incx)?;
            let lda = chk.ld(8, lda, n)?;
            chk.buffer(7, a.len(), dense_len(layout, n, n, lda))?;
            level2::$kernel(layout, uplo, n, alpha, x, incx, a, lda);
            Ok(())
        }
    )*};
}

symmetric_rank1_full! {
    ssyr: f32, f32 => syr;
    dsyr: f64, f64 => syr;
    cher: f32, c32 => her;
    zher: f64, c64 => her;
}

macro_rules! symmetric_rank1_packed {
    ($($name:ident: $alpha:ty, $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $alpha,
            x: &[$t],
            incx: i32,
            ap: &mut [$t],
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let incx = chk.inc(6, incx)?;
            chk.vector(5, x.len(), n, incx)?;
            chk.buffer(7, ap.len(), packed_len(n))?;
            level2::$kernel(layout, uplo, n, alpha, x, incx, ap);
            Ok(())
        }
    )*};
}

symmetric_rank1_packed! {
    sspr: f32, f32 => spr;
    dspr: f64, f64 => spr;
    chpr: f32, c32 => hpr;
    zhpr: f64, c64 => hpr;
}

macro_rules! symmetric_rank2_full {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $t,
            x: &[$t],
            incx: i32,
            y: &[$t],
            incy: i32,
            a: &mut [$t],
            lda: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let incx = chk.inc(6, incx)?;
            chk.vector(5, x.len(), n, incx)?;
            let incy = chk.inc(8, incy)?;
            chk.vector(7, y.len(), n, incy)?;
            let lda = chk.ld(10, lda, n)?;
            chk.buffer(9, a.len(), dense_len(layout, n, n, lda))?;
            level2::$kernel(layout, uplo, n, alpha, x, incx, y, incy, a, lda);
            Ok(())
        }
    )*};
}

symmetric_rank2_full! {
    ssyr2: f32 => syr2;
    dsyr2: f64 => syr2;
    cher2: c32 => her2;
    zher2: c64 => her2;
}

macro_rules! symmetric_rank2_packed {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            n: i32,
            alpha: $t,
            x: &[$t],
            incx: i32,
            y: &[$t],
            incy: i32,
            ap: &mut [$t],
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let n = chk.dim(3, n)?;
            let incx = chk.inc(6, incx)?;
            chk.vector(5, x.len(), n, incx)?;
            let incy = chk.inc(8, incy)?;
            chk.vector(7, y.len(), n, incy)?;
            chk.buffer(9, ap.len(), packed_len(n))?;
            level2::$kernel(layout, uplo, n, alpha, x, incx, y, incy, ap);
            Ok(())
        }
    )*};
}

symmetric_rank2_packed! {
    sspr2: f32 => spr2;
    dspr2: f64 => spr2;
    chpr2: c32 => hpr2;
    zhpr2: c64 => hpr2;
}

// ============================================================================
// Level 3
// ============================================================================

macro_rules! gemm {
    ($($name:ident: $t:ty;)*) => {$(
        /// `C := alpha * op(A) * op(B) + beta * C`.
        pub fn $name(
            layout: Layout,
            trans_a: Transpose,
            trans_b: Transpose,
            m: i32,
            n: i32,
            k: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            b: &[$t],
            ldb: i32,
            beta: $t,
            c: &mut [$t],
            ldc: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let m = chk.dim(4, m)?;
            let n = chk.dim(5, n)?;
            let k = chk.dim(6, k)?;
            let (ar, ac) = trans_a.op_shape(m, k);
            let (br, bc) = trans_b.op_shape(k, n);
            let lda = chk.ld(9, lda, layout.leading_dim(ar, ac))?;
            chk.buffer(8, a.len(), dense_len(layout, ar, ac, lda))?;
            let ldb = chk.ld(11, ldb, layout.leading_dim(br, bc))?;
            chk.buffer(10, b.len(), dense_len(layout, br, bc, ldb))?;
            let ldc = chk.ld(14, ldc, layout.leading_dim(m, n))?;
            chk.buffer(13, c.len(), dense_len(layout, m, n, ldc))?;
            level3::gemm(layout, trans_a, trans_b, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc);
            Ok(())
        }
    )*};
}

gemm! {
    sgemm: f32;
    dgemm: f64;
    cgemm: c32;
    zgemm: c64;
}

macro_rules! symm {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        /// `C := alpha * A * B + beta * C` or `alpha * B * A + beta * C`.
        pub fn $name(
            layout: Layout,
            side: Side,
            uplo: Uplo,
            m: i32,
            n: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            b: &[$t],
            ldb: i32,
            beta: $t,
            c: &mut [$t],
            ldc: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            let m = chk.dim(4, m)?;
            let n = chk.dim(5, n)?;
            let order = match side {
                Side::Left => m,
                Side::Right => n,
            };
            let lda = chk.ld(8, lda, order)?;
            chk.buffer(7, a.len(), dense_len(layout, order, order, lda))?;
            let ldb = chk.ld(10, ldb, layout.leading_dim(m, n))?;
            chk.buffer(9, b.len(), dense_len(layout, m, n, ldb))?;
            let ldc = chk.ld(13, ldc, layout.leading_dim(m, n))?;
            chk.buffer(12, c.len(), dense_len(layout, m, n, ldc))?;
            level3::$kernel(layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc);
            Ok(())
        }
    )*};
}

symm! {
    ssymm: f32 => symm;
    dsymm: f64 => symm;
    csymm: c32 => symm;
    zsymm: c64 => symm;
    chemm: c32 => hemm;
    zhemm: c64 => hemm;
}

macro_rules! rank_k {
    ($($name:ident: $scale:ty, $t:ty => $kernel:ident, $legal:expr;)*) => {$(
        /// Rank-k update of the `uplo` triangle of C.
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            trans: Transpose,
            n: i32,
            k: i32,
            alpha: $scale,
            a: &[$t],
            lda: i32,
            beta: $scale,
            c: &mut [$t],
            ldc: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(3, $legal(trans))?;
            let n = chk.dim(4, n)?;
            let k = chk.dim(5, k)?;
            let (ar, ac) = trans.op_shape(n, k);
            let lda = chk.ld(8, lda, layout.leading_dim(ar, ac))?;
            chk.buffer(7, a.len(), dense_len(layout, ar, ac, lda))?;
            let ldc = chk.ld(11, ldc, n)?;
            chk.buffer(10, c.len(), dense_len(layout, n, n, ldc))?;
            level3::$kernel(layout, uplo, trans, n, k, alpha, a, lda, beta, c, ldc);
            Ok(())
        }
    )*};
}

rank_k! {
    ssyrk: f32, f32 => syrk, symmetric_update_trans::<f32>;
    dsyrk: f64, f64 => syrk, symmetric_update_trans::<f64>;
    csyrk: c32, c32 => syrk, symmetric_update_trans::<c32>;
    zsyrk: c64, c64 => syrk, symmetric_update_trans::<c64>;
    cherk: f32, c32 => herk, hermitian_update_trans;
    zherk: f64, c64 => herk, hermitian_update_trans;
}

macro_rules! rank_2k {
    ($($name:ident: $beta:ty, $t:ty => $kernel:ident, $legal:expr;)*) => {$(
        /// Rank-2k update of the `uplo` triangle of C.
        pub fn $name(
            layout: Layout,
            uplo: Uplo,
            trans: Transpose,
            n: i32,
            k: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            b: &[$t],
            ldb: i32,
            beta: $beta,
            c: &mut [$t],
            ldc: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(3, $legal(trans))?;
            let n = chk.dim(4, n)?;
            let k = chk.dim(5, k)?;
            let (r, cl) = trans.op_shape(n, k);
            let min = layout.leading_dim(r, cl);
            let lda = chk.ld(8, lda, min)?;
            chk.buffer(7, a.len(), dense_len(layout, r, cl, lda))?;
            let ldb = chk.ld(10, ldb, min)?;
            chk.buffer(9, b.len(), dense_len(layout, r, cl, ldb))?;
            let ldc = chk.ld(13, ldc, n)?;
            chk.buffer(12, c.len(), dense_len(layout, n, n, ldc))?;
            level3::$kernel(layout, uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc);
            Ok(())
        }
    )*};
}

rank_2k! {
    ssyr2k: f32, f32 => syr2k, symmetric_update_trans::<f32>;
    dsyr2k: f64, f64 => syr2k, symmetric_update_trans::<f64>;
    csyr2k: c32, c32 => syr2k, symmetric_update_trans::<c32>;
    zsyr2k: c64, c64 => syr2k, symmetric_update_trans::<c64>;
    cher2k: f32, c32 => her2k, hermitian_update_trans;
    zher2k: f64, c64 => her2k, hermitian_update_trans;
}

macro_rules! triangular_mm {
    ($($name:ident: $t:ty => $kernel:ident;)*) => {$(
        pub fn $name(
            layout: Layout,
            side: Side,
            uplo: Uplo,
            trans_a: Transpose,
            diag: Diag,
            m: i32,
            n: i32,
            alpha: $t,
            a: &[$t],
            lda: i32,
            b: &mut [$t],
            ldb: i32,
        ) -> Result<()> {
            let chk = Check::new(routine!($name));
            chk.tag(4, triangular_trans(trans_a))?;
            let m = chk.dim(6, m)?;
            let n = chk.dim(7, n)?;
            let order = match side {
                Side::Left => m,
                Side::Right => n,
            };
            let lda = chk.ld(10, lda, order)?;
            chk.buffer(9, a.len(), dense_len(layout, order, order, lda))?;
            let ldb = chk.ld(12, ldb, layout.leading_dim(m, n))?;
            chk.buffer(11, b.len(), dense_len(layout, m, n, ldb))?;
            level3::$kernel(layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb);
            Ok(())
        }
    )*};
}

triangular_mm! {
    strmm: f32 => trmm;
    dtrmm: f64 => trmm;
    ctrmm: c32 => trmm;
    ztrmm: c64 => trmm;
    strsm: f32 => trsm;
    dtrsm: f64 => trsm;
    ctrsm: c32 => trsm;
    ztrsm: c64 => trsm;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lamina_core::error::{BlasError, Reason};

    #[test]
    fn test_level1_concrete_values() {
        let x = [1.0f64, 2.0, 3.0];
        assert_relative_eq!(dnrm2(3, &x, 1).unwrap(), 14f64.sqrt(), max_relative = 1e-15);
        assert_eq!(dasum(3, &x, 1).unwrap(), 6.0);
        assert_eq!(idamax(3, &x, 1).unwrap(), 2);
        assert_eq!(ddot(3, &x, 1, &x, 1).unwrap(), 14.0);
    }

    #[test]
    fn test_dgemv_rowmajor() {
        let a = [1.0f64, 2.0, 3.0, 4.0];
        let x = [1.0f64, 1.0];
        let mut y = [0.0f64; 2];
        dgemv(Layout::RowMajor, Transpose::NoTrans, 2, 2, 1.0, &a, 2, &x, 1, 0.0, &mut y, 1).unwrap();
        assert_eq!(y, [3.0, 7.0]);
    }

    #[test]
    fn test_negative_n_is_reported_at_its_position() {
        let mut x = [1.0f32, 2.0];
        let err = sscal(-1, 2.0, &mut x, 1).unwrap_err();
        assert_eq!(
            err,
            BlasError::IllegalArgument {
                routine: "cblas_sscal",
                position: 1,
                reason: Reason::NegativeDimension(-1),
            }
        );
        assert_eq!(x, [1.0, 2.0]);

        let mut y = [9.0f64; 2];
        let err = dgemv(Layout::ColMajor, Transpose::NoTrans, 2, -3, 1.0, &[], 2, &[], 1, 0.0, &mut y, 1).unwrap_err();
        assert_eq!(err.position(), Some(4));
        assert_eq!(y, [9.0; 2]);
    }

    #[test]
    fn test_first_bad_argument_wins() {
        let mut c = [0.0f64; 4];
        // m is fine, lda too small (pos 9) and ldc too small (pos 14): 9 wins.
        let err = dgemm(
            Layout::ColMajor,
            Transpose::NoTrans,
            Transpose::NoTrans,
            2,
            2,
            2,
            1.0,
            &[0.0; 4],
            1,
            &[0.0; 4],
            2,
            0.0,
            &mut c,
            1,
        )
        .unwrap_err();
        assert_eq!(err.position(), Some(9));
        assert_eq!(err.routine(), Some("cblas_dgemm"));
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let mut y = [0.0f64; 2];
        let err = dgemv(Layout::RowMajor, Transpose::NoTrans, 2, 2, 1.0, &[1.0; 3], 2, &[1.0; 2], 1, 0.0, &mut y, 1)
            .unwrap_err();
        assert_eq!(err.position(), Some(6));
        let err = daxpy(3, 1.0, &[1.0; 3], 2, &mut [0.0; 3], 1).unwrap_err();
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_buffer_is_checked_before_later_arguments() {
        // A too short (pos 6) and incx zero (pos 9): A comes first.
        let mut y = [0.0f64; 2];
        let err = dgemv(Layout::ColMajor, Transpose::NoTrans, 2, 2, 1.0, &[1.0; 3], 2, &[1.0; 2], 0, 0.0, &mut y, 1)
            .unwrap_err();
        assert_eq!(err.position(), Some(6));
        // x too short (pos 3) and incy zero (pos 6).
        let err = daxpy(3, 1.0, &[1.0; 2], 1, &mut [0.0; 3], 0).unwrap_err();
        assert_eq!(err.position(), Some(3));
        // A too short (pos 8) and ldc too small (pos 14).
        let mut c = [0.0f64; 4];
        let err = dgemm(
            Layout::RowMajor,
            Transpose::NoTrans,
            Transpose::NoTrans,
            2,
            2,
            2,
            1.0,
            &[0.0; 3],
            2,
            &[0.0; 4],
            2,
            0.0,
            &mut c,
            1,
        )
        .unwrap_err();
        assert_eq!(err.position(), Some(8));
        // Packed A (pos 6) is sized by n alone and precedes incx (pos 8).
        let mut x = [1.0f32; 2];
        let err = stpmv(Layout::ColMajor, Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, &[1.0; 2], &mut x, 0)
            .unwrap_err();
        assert_eq!(err.position(), Some(6));
    }

    #[test]
    fn test_zero_increment_is_rejected() {
        let err = dcopy(2, &[1.0, 2.0], 0, &mut [0.0; 2], 1).unwrap_err();
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_transpose_legality_per_family() {
        let a = [c64::new(1.0, 0.0)];
        let mut c = [c64::new(0.0, 0.0)];
        let err = zherk(Layout::ColMajor, Uplo::Upper, Transpose::Trans, 1, 1, 1.0, &a, 1, 0.0, &mut c, 1).unwrap_err();
        assert_eq!(err.position(), Some(3));
        let err = zsyrk(
            Layout::ColMajor,
            Uplo::Upper,
            Transpose::ConjTrans,
            1,
            1,
            c64::new(1.0, 0.0),
            &a,
            1,
            c64::new(0.0, 0.0),
            &mut c,
            1,
        )
        .unwrap_err();
        assert_eq!(err.position(), Some(3));
        // Real syrk accepts ConjTrans as Trans.
        let mut cr = [0.0f64];
        dsyrk(Layout::ColMajor, Uplo::Upper, Transpose::ConjTrans, 1, 1, 1.0, &[2.0], 1, 0.0, &mut cr, 1).unwrap();
        assert_eq!(cr, [4.0]);

        let mut x = [1.0f32];
        let err = strsv(Layout::RowMajor, Uplo::Lower, Transpose::ConjNoTrans, Diag::Unit, 1, &[1.0], 1, &mut x, 1)
            .unwrap_err();
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_complex_dot_forms() {
        let x = [c32::new(1.0, 1.0)];
        let y = [c32::new(2.0, -1.0)];
        let mut out = c32::new(0.0, 0.0);
        cdotc_sub(1, &x, 1, &y, 1, &mut out).unwrap();
        assert_eq!(out, cdotc(1, &x, 1, &y, 1).unwrap());
        // (1 - i)(2 - i) = 1 - 3i
        assert_eq!(out, c32::new(1.0, -3.0));
        zdotu_sub(0, &[], 1, &[], 1, &mut c64::new(1.0, 1.0)).unwrap();
    }

    #[test]
    fn test_rotg_wrappers_write_through() {
        let (mut a, mut b, mut c, mut s) = (3.0f64, 4.0, 0.0, 0.0);
        drotg(&mut a, &mut b, &mut c, &mut s);
        assert_relative_eq!(a, 5.0);
        assert_relative_eq!(c, 0.6);
        assert_relative_eq!(s, 0.8);

        let mut za = c64::new(0.0, 0.0);
        let (mut zc, mut zs) = (9.0, c64::new(0.0, 0.0));
        zrotg(&mut za, c64::new(2.0, 0.0), &mut zc, &mut zs);
        assert_eq!((za, zc, zs), (c64::new(2.0, 0.0), 0.0, c64::new(1.0, 0.0)));
    }

    #[test]
    fn test_band_lda_floor() {
        let mut y = [0.0f64; 3];
        // kl + ku + 1 = 3 > lda = 2
        let err = dgbmv(Layout::ColMajor, Transpose::NoTrans, 3, 3, 1, 1, 1.0, &[0.0; 9], 2, &[0.0; 3], 1, 0.0, &mut y, 1)
            .unwrap_err();
        assert_eq!(err.position(), Some(9));
    }
}
