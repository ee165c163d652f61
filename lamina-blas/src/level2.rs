//! BLAS Level 2: Matrix-vector operations.
//!
//! Full, band and packed variants of a family share one engine generic over
//! [`Addressing`]; the storage kind only decides where `(i, j)` lives and
//! which coordinates are in range. Layout is folded into the addressing, so
//! no kernel branches on it in the inner loop.
//!
//! Vector arguments follow the BLAS increment rule (see [`Strided`]).
//! `beta == 0` overwrites `y` without reading it; `alpha == 0, beta == 1`
//! returns before touching anything.

use lamina_core::addressing::{Addressing, Band, Dense, MatRef, Packed, Strided};
use lamina_core::layout::{Diag, Layout, Transpose, Uplo};
use lamina_core::scalar::Scalar;

// ============================================================================
// Shared helpers
// ============================================================================

/// `y := beta * y`. `beta == 0` writes zeros without reading `y`.
#[inline]
fn scale_y<T: Scalar>(beta: T, y: &mut [T], sy: Strided) {
    if beta == T::zero() {
        for i in 0..sy.n {
            y[sy.at(i)] = T::zero();
        }
    } else if beta != T::one() {
        for i in 0..sy.n {
            y[sy.at(i)] *= beta;
        }
    }
}

/// Stored off-diagonal rows of column `j` in an order-`n` triangle with `k`
/// off-diagonals (`k >= n - 1` for full and packed storage).
#[inline]
fn off_diagonal_rows(uplo: Uplo, j: usize, n: usize, k: usize) -> std::ops::Range<usize> {
    match uplo {
        Uplo::Upper => j.saturating_sub(k)..j,
        Uplo::Lower => (j + 1)..(j + k + 1).min(n),
    }
}

// ============================================================================
// GEMV: General matrix-vector multiply
// y := alpha * op(A) * x + beta * y
// ============================================================================

/// `y := alpha * op(A) * x + beta * y` with A stored `m x n`.
///
/// The loop order follows whichever axis of op(A) is contiguous: dot
/// products when its rows are, column axpys otherwise.
pub fn gemv<T: Scalar>(
    layout: Layout,
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let (ylen, xlen) = trans.op_shape(m, n);
    let (sx, sy) = (Strided::new(xlen, incx), Strided::new(ylen, incy));

    scale_y(beta, y, sy);
    if alpha == T::zero() {
        return;
    }

    let op = MatRef::new(a, m, n, layout, lda).op(trans);
    if op.col_stride() == 1 {
        // Rows of op(A) are contiguous: y[i] += alpha * dot(row_i, x)
        for i in 0..ylen {
            let mut acc = T::zero();
            for j in 0..xlen {
                acc += op.get(i, j) * x[sx.at(j)];
            }
            y[sy.at(i)] += alpha * acc;
        }
    } else {
        // Columns are contiguous: y += (alpha * x[j]) * col_j
        for j in 0..xlen {
            let t = alpha * x[sx.at(j)];
            for i in 0..ylen {
                y[sy.at(i)] += t * op.get(i, j);
            }
        }
    }
}

// ============================================================================
// GBMV: General band matrix-vector multiply
// ============================================================================

/// [`gemv`] for an `m x n` band matrix with `kl` sub- and `ku`
/// super-diagonals. Only in-band elements are read.
pub fn gbmv<T: Scalar>(
    layout: Layout,
    trans: Transpose,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let (ylen, xlen) = trans.op_shape(m, n);
    let (sx, sy) = (Strided::new(xlen, incx), Strided::new(ylen, incy));

    scale_y(beta, y, sy);
    if alpha == T::zero() {
        return;
    }

    let band = Band::new(layout, kl, ku, lda);
    let conj = trans.is_conj();
    if trans.is_trans() {
        for j in 0..n {
            let mut acc = T::zero();
            for i in band.rows_in_col(j, m) {
                acc += a[band.offset(i, j)].conj_if(conj) * x[sx.at(i)];
            }
            y[sy.at(j)] += alpha * acc;
        }
    } else {
        for j in 0..n {
            let t = alpha * x[sx.at(j)];
            for i in band.rows_in_col(j, m) {
                y[sy.at(i)] += t * a[band.offset(i, j)].conj_if(conj);
            }
        }
    }
}

// ============================================================================
// SYMV / HEMV family: y := alpha * A * x + beta * y, A symmetric or Hermitian
// ============================================================================

/// Engine for every symmetric/Hermitian matrix-vector product. Reads only
/// the `uplo` triangle: each stored `a_ij` contributes `a_ij * x_j` to `y_i`
/// and its mirror (`conj(a_ij)` when Hermitian) `* x_i` to `y_j`. Hermitian
/// diagonals are read as real.
fn symmetric_mv<T: Scalar, A: Addressing>(
    herm: bool,
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    addr: A,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));

    scale_y(beta, y, sy);
    if alpha == T::zero() {
        return;
    }

    for j in 0..n {
        let t1 = alpha * x[sx.at(j)];
        let mut t2 = T::zero();
        for i in off_diagonal_rows(uplo, j, n, k) {
            let aij = a[addr.offset(i, j)];
            y[sy.at(i)] += t1 * aij;
            t2 += aij.conj_if(herm) * x[sx.at(i)];
        }
        let d = a[addr.offset(j, j)];
        let d = if herm { d.real_part() } else { d };
        y[sy.at(j)] += t1 * d + alpha * t2;
    }
}

/// `y := alpha * A * x + beta * y`, A symmetric, full storage.
pub fn symv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Dense::new(layout, lda);
    symmetric_mv(false, uplo, n, n, alpha, a, addr, x, incx, beta, y, incy);
}

/// `y := alpha * A * x + beta * y`, A Hermitian, full storage.
pub fn hemv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Dense::new(layout, lda);
    symmetric_mv(true, uplo, n, n, alpha, a, addr, x, incx, beta, y, incy);
}

/// Symmetric band: `k` off-diagonals stored in the `uplo` triangle.
pub fn sbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Band::triangle(layout, uplo, k, lda);
    symmetric_mv(false, uplo, n, k, alpha, a, addr, x, incx, beta, y, incy);
}

/// Hermitian band.
pub fn hbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Band::triangle(layout, uplo, k, lda);
    symmetric_mv(true, uplo, n, k, alpha, a, addr, x, incx, beta, y, incy);
}

/// Symmetric packed.
pub fn spmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    ap: &[T],
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Packed::new(layout, uplo, n);
    symmetric_mv(false, uplo, n, n, alpha, ap, addr, x, incx, beta, y, incy);
}

/// Hermitian packed.
pub fn hpmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    ap: &[T],
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    let addr = Packed::new(layout, uplo, n);
    symmetric_mv(true, uplo, n, n, alpha, ap, addr, x, incx, beta, y, incy);
}

// ============================================================================
// TRMV / TRSV family: x := op(A) * x, x := op(A)^-1 * x
// ============================================================================

/// op(A) of a stored triangle, read element-wise.
#[derive(Clone, Copy)]
struct Triangle<'a, T, A> {
    a: &'a [T],
    addr: A,
    trans: bool,
    conj: bool,
    unit: bool,
    /// Triangle of op(A) holding the non-zeros.
    uplo: Uplo,
    /// Off-diagonals kept (`n` for full and packed storage).
    k: usize,
}

impl<'a, T: Scalar, A: Addressing> Triangle<'a, T, A> {
    fn new(a: &'a [T], addr: A, uplo: Uplo, trans: Transpose, diag: Diag, k: usize) -> Self {
        Triangle {
            a,
            addr,
            trans: trans.is_trans(),
            conj: trans.is_conj(),
            unit: diag == Diag::Unit,
            uplo: if trans.is_trans() { uplo.flip() } else { uplo },
            k,
        }
    }

    /// Element `(i, j)` of op(A); must lie in the stored triangle.
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        let (r, c) = if self.trans { (j, i) } else { (i, j) };
        self.a[self.addr.offset(r, c)].conj_if(self.conj)
    }

    /// Columns of row `i` of op(A) strictly off the diagonal.
    #[inline]
    fn off_diagonal_cols(&self, i: usize, n: usize) -> std::ops::Range<usize> {
        match self.uplo {
            Uplo::Upper => (i + 1)..(i + self.k + 1).min(n),
            Uplo::Lower => i.saturating_sub(self.k)..i,
        }
    }
}

/// `x := op(A) * x` in place.
///
/// Row `i` of an upper op(A) reads only `x[i..]`, so rows go top to bottom;
/// lower rows read `x[..=i]` and go bottom to top. Each `x[i]` is written
/// after the last read of its old value.
fn triangular_mv<T: Scalar, A: Addressing>(tri: Triangle<'_, T, A>, n: usize, x: &mut [T], incx: isize) {
    if n == 0 {
        return;
    }
    let sx = Strided::new(n, incx);
    let row = |i: usize, x: &mut [T]| {
        let xi = x[sx.at(i)];
        let mut acc = if tri.unit { xi } else { tri.at(i, i) * xi };
        for j in tri.off_diagonal_cols(i, n) {
            acc += tri.at(i, j) * x[sx.at(j)];
        }
        x[sx.at(i)] = acc;
    };
    match tri.uplo {
        Uplo::Upper => (0..n).for_each(|i| row(i, x)),
        Uplo::Lower => (0..n).rev().for_each(|i| row(i, x)),
    }
}

/// Solve `op(A) * x = b` in place (`x` holds `b` on entry).
///
/// Lower op(A) is forward substitution, upper is backward: every `x[j]` a
/// row reads is already final. A zero diagonal propagates Inf/NaN.
fn triangular_sv<T: Scalar, A: Addressing>(tri: Triangle<'_, T, A>, n: usize, x: &mut [T], incx: isize) {
    if n == 0 {
        return;
    }
    let sx = Strided::new(n, incx);
    let row = |i: usize, x: &mut [T]| {
        let mut acc = x[sx.at(i)];
        for j in tri.off_diagonal_cols(i, n) {
            acc -= tri.at(i, j) * x[sx.at(j)];
        }
        x[sx.at(i)] = if tri.unit { acc } else { acc / tri.at(i, i) };
    };
    match tri.uplo {
        Uplo::Lower => (0..n).for_each(|i| row(i, x)),
        Uplo::Upper => (0..n).rev().for_each(|i| row(i, x)),
    }
}

/// `x := op(A) * x`, A triangular, full storage.
pub fn trmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    let tri = Triangle::new(a, Dense::new(layout, lda), uplo, trans, diag, n);
    triangular_mv(tri, n, x, incx);
}

/// `x := op(A)^-1 * x`, A triangular, full storage.
pub fn trsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    let tri = Triangle::new(a, Dense::new(layout, lda), uplo, trans, diag, n);
    triangular_sv(tri, n, x, incx);
}

/// Triangular band multiply, `k` off-diagonals.
pub fn tbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    let addr = Band::triangle(layout, uplo, k, lda);
    triangular_mv(Triangle::new(a, addr, uplo, trans, diag, k), n, x, incx);
}

/// Triangular band solve, `k` off-diagonals.
pub fn tbsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    let addr = Band::triangle(layout, uplo, k, lda);
    triangular_sv(Triangle::new(a, addr, uplo, trans, diag, k), n, x, incx);
}

/// Triangular packed multiply.
pub fn tpmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    incx: isize,
) {
    let addr = Packed::new(layout, uplo, n);
    triangular_mv(Triangle::new(ap, addr, uplo, trans, diag, n), n, x, incx);
}

/// Triangular packed solve.
pub fn tpsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    incx: isize,
) {
    let addr = Packed::new(layout, uplo, n);
    triangular_sv(Triangle::new(ap, addr, uplo, trans, diag, n), n, x, incx);
}

// ============================================================================
// GER: General rank-1 update
// A := alpha * x * y' + A
// ============================================================================

fn general_rank1<T: Scalar>(
    conj: bool,
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    if m == 0 || n == 0 || alpha == T::zero() {
        return;
    }
    let (sx, sy) = (Strided::new(m, incx), Strided::new(n, incy));
    let d = Dense::new(layout, lda);
    match layout {
        Layout::ColMajor => {
            for j in 0..n {
                let t = alpha * y[sy.at(j)].conj_if(conj);
                for i in 0..m {
                    a[d.offset(i, j)] += x[sx.at(i)] * t;
                }
            }
        }
        Layout::RowMajor => {
            for i in 0..m {
                let t = alpha * x[sx.at(i)];
                for j in 0..n {
                    a[d.offset(i, j)] += t * y[sy.at(j)].conj_if(conj);
                }
            }
        }
    }
}

/// `A := alpha * x * y^T + A` (`ger` for real data).
pub fn geru<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    general_rank1(false, layout, m, n, alpha, x, incx, y, incy, a, lda);
}

/// `A := alpha * x * y^H + A`.
pub fn gerc<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    general_rank1(true, layout, m, n, alpha, x, incx, y, incy, a, lda);
}

// ============================================================================
// SYR / HER / SYR2 / HER2: symmetric and Hermitian rank updates
// ============================================================================

/// Stored rows of column `j`, diagonal included.
#[inline]
fn triangle_rows(uplo: Uplo, j: usize, n: usize) -> std::ops::Range<usize> {
    match uplo {
        Uplo::Upper => 0..j + 1,
        Uplo::Lower => j..n,
    }
}

/// `A := alpha * x * x' + A` on the `uplo` triangle, `'` being `^H` when
/// `herm` (diagonal forced real) and `^T` otherwise.
fn symmetric_rank1<T: Scalar, A: Addressing>(
    herm: bool,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    a: &mut [T],
    addr: A,
) {
    if n == 0 || alpha == T::zero() {
        return;
    }
    let sx = Strided::new(n, incx);
    for j in 0..n {
        let t = alpha * x[sx.at(j)].conj_if(herm);
        for i in triangle_rows(uplo, j, n) {
            a[addr.offset(i, j)] += x[sx.at(i)] * t;
        }
        if herm {
            let d = addr.offset(j, j);
            a[d] = a[d].real_part();
        }
    }
}

/// `A := alpha * x * y' + alpha' * y * x' + A` on the `uplo` triangle;
/// Hermitian form uses `y^H`, `conj(alpha)`, `x^H` and keeps the diagonal real.
fn symmetric_rank2<T: Scalar, A: Addressing>(
    herm: bool,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    addr: A,
) {
    if n == 0 || alpha == T::zero() {
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    let alpha2 = alpha.conj_if(herm);
    for j in 0..n {
        let t1 = alpha * y[sy.at(j)].conj_if(herm);
        let t2 = alpha2 * x[sx.at(j)].conj_if(herm);
        for i in triangle_rows(uplo, j, n) {
            a[addr.offset(i, j)] += x[sx.at(i)] * t1 + y[sy.at(i)] * t2;
        }
        if herm {
            let d = addr.offset(j, j);
            a[d] = a[d].real_part();
        }
    }
}

/// `A := alpha * x * x^T + A`, A symmetric, full storage.
pub fn syr<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    a: &mut [T],
    lda: usize,
) {
    symmetric_rank1(false, uplo, n, alpha, x, incx, a, Dense::new(layout, lda));
}

/// `A := alpha * x * x^H + A`, A Hermitian, real `alpha`.
pub fn her<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T::Real,
    x: &[T],
    incx: isize,
    a: &mut [T],
    lda: usize,
) {
    let addr = Dense::new(layout, lda);
    symmetric_rank1(true, uplo, n, T::from_real(alpha), x, incx, a, addr);
}

/// Symmetric packed rank-1 update.
pub fn spr<T: Scalar>(layout: Layout, uplo: Uplo, n: usize, alpha: T, x: &[T], incx: isize, ap: &mut [T]) {
    symmetric_rank1(false, uplo, n, alpha, x, incx, ap, Packed::new(layout, uplo, n));
}

/// Hermitian packed rank-1 update.
pub fn hpr<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T::Real,
    x: &[T],
    incx: isize,
    ap: &mut [T],
) {
    let addr = Packed::new(layout, uplo, n);
    symmetric_rank1(true, uplo, n, T::from_real(alpha), x, incx, ap, addr);
}

/// `A := alpha * x * y^T + alpha * y * x^T + A`, full storage.
pub fn syr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    let addr = Dense::new(layout, lda);
    symmetric_rank2(false, uplo, n, alpha, x, incx, y, incy, a, addr);
}

/// `A := alpha * x * y^H + conj(alpha) * y * x^H + A`, full storage.
pub fn her2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    let addr = Dense::new(layout, lda);
    symmetric_rank2(true, uplo, n, alpha, x, incx, y, incy, a, addr);
}

/// Symmetric packed rank-2 update.
pub fn spr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    ap: &mut [T],
) {
    let addr = Packed::new(layout, uplo, n);
    symmetric_rank2(false, uplo, n, alpha, x, incx, y, incy, ap, addr);
}

/// Hermitian packed rank-2 update.
pub fn hpr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    ap: &mut [T],
) {
    let addr = Packed::new(layout, uplo, n);
    symmetric_rank2(true, uplo, n, alpha, x, incx, y, incy, ap, addr);
}
