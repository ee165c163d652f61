//! BLAS Level 3: Matrix-matrix operations.
//!
//! Every routine here is a thin layer over the blocked engine in
//! [`crate::gemm`]: `gemm` calls it directly, `symm`/`hemm` feed it a
//! [`Symmetric`] operand that mirrors the stored triangle during packing,
//! the rank-k family runs it on the off-diagonal rectangles of C and
//! handles diagonal blocks element-wise, and `trmm`/`trsm` use it for the
//! cross-block updates between diagonal blocks.
//!
//! Right-side triangular operations run as left-side ones on the transposed
//! view of B, so only one traversal order per triangle exists.

use lamina_core::addressing::{MatMut, MatRef};
use lamina_core::config::config;
use lamina_core::layout::{Diag, Layout, Side, Transpose, Uplo};
use lamina_core::parallel::for_each_outer_block;
use lamina_core::scalar::Scalar;

use crate::gemm::{gemm_accumulate, Symmetric};

/// Diagonal block order for blocked triangular kernels.
const TRIANGLE_BLOCK: usize = 64;

// ============================================================================
// Shared helpers
// ============================================================================

/// `C := beta * C`. `beta == 0` writes zeros without reading C.
fn scale_matrix<T: Scalar>(beta: T, c: &mut MatMut<'_, T>) {
    if beta == T::one() {
        return;
    }
    for j in 0..c.cols() {
        for i in 0..c.rows() {
            let v = c.at_mut(i, j);
            *v = if beta == T::zero() { T::zero() } else { beta * *v };
        }
    }
}

/// Rows of column `j` in the `uplo` triangle of an order-`n` matrix.
#[inline]
fn triangle_rows(uplo: Uplo, j: usize, n: usize) -> std::ops::Range<usize> {
    match uplo {
        Uplo::Upper => 0..j + 1,
        Uplo::Lower => j..n,
    }
}

/// `C := beta * C` on the `uplo` triangle only. With `real_diag` the
/// diagonal also loses its imaginary part, even when `beta == 1`.
fn scale_triangle<T: Scalar>(beta: T, uplo: Uplo, real_diag: bool, c: &mut MatMut<'_, T>) {
    if beta == T::one() && !real_diag {
        return;
    }
    let n = c.rows();
    for j in 0..n {
        for i in triangle_rows(uplo, j, n) {
            let v = c.at_mut(i, j);
            let scaled = if beta == T::zero() {
                T::zero()
            } else if beta == T::one() {
                *v
            } else {
                beta * *v
            };
            *v = if real_diag && i == j {
                scaled.real_part()
            } else {
                scaled
            };
        }
    }
}

// ============================================================================
// GEMM: General Matrix Multiply
// C := alpha * op(A) * op(B) + beta * C
// ============================================================================

/// `C := alpha * op(A) * op(B) + beta * C` with `op(A): m x k`,
/// `op(B): k x n`.
///
/// `beta == 0` makes the result independent of C's prior contents.
pub fn gemm<T: Scalar>(
    layout: Layout,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if m == 0 || n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, m, n, layout, ldc);
    scale_matrix(beta, &mut cm);
    if alpha == T::zero() || k == 0 {
        return;
    }

    // Stored shapes: op_shape is its own inverse.
    let (ar, ac) = trans_a.op_shape(m, k);
    let (br, bc) = trans_b.op_shape(k, n);
    let a_op = MatRef::new(a, ar, ac, layout, lda).op(trans_a);
    let b_op = MatRef::new(b, br, bc, layout, ldb).op(trans_b);

    gemm_accumulate(k, alpha, &a_op, &b_op, cm, config().threads_for(m * n));
}

// ============================================================================
// SYMM / HEMM: C := alpha * A * B + beta * C (or B * A), A symmetric/Hermitian
// ============================================================================

fn symmetric_mm<T: Scalar>(
    herm: bool,
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, m, n, layout, ldc);
    scale_matrix(beta, &mut cm);
    if alpha == T::zero() {
        return;
    }

    let order = match side {
        Side::Left => m,
        Side::Right => n,
    };
    let sym = Symmetric {
        a: MatRef::new(a, order, order, layout, lda),
        uplo,
        herm,
    };
    let bm = MatRef::new(b, m, n, layout, ldb);
    let threads = config().threads_for(m * n);
    match side {
        Side::Left => gemm_accumulate(m, alpha, &sym, &bm, cm, threads),
        Side::Right => gemm_accumulate(n, alpha, &bm, &sym, cm, threads),
    }
}

/// `C := alpha * A * B + beta * C` (Left) or `alpha * B * A + beta * C`
/// (Right), A symmetric with only its `uplo` triangle read.
pub fn symm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    symmetric_mm(false, layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc);
}

/// [`symm`] with A Hermitian; its diagonal is read as real.
pub fn hemm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    symmetric_mm(true, layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc);
}

// ============================================================================
// SYRK / HERK / SYR2K / HER2K: rank-k updates of one triangle of C
// ============================================================================

/// `C += sum(alpha_t * P_t * Q_t)` on the `uplo` triangle of the order-`n`
/// matrix `c`, each `P_t: n x k`, `Q_t: k x n`.
///
/// Columns are taken in panels of [`TRIANGLE_BLOCK`]. Within a panel the
/// rectangle strictly off the diagonal block goes through the blocked
/// engine; the diagonal block is done element-wise so the opposite triangle
/// is never written.
fn triangular_update<T: Scalar>(
    uplo: Uplo,
    k: usize,
    terms: &[(T, MatRef<'_, T>, MatRef<'_, T>)],
    real_diag: bool,
    mut c: MatMut<'_, T>,
) {
    let n = c.rows();
    let threads = config().threads_for(n * n / 2);

    for j0 in (0..n).step_by(TRIANGLE_BLOCK) {
        let jb = TRIANGLE_BLOCK.min(n - j0);

        let (r0, rows) = match uplo {
            Uplo::Upper => (0, j0),
            Uplo::Lower => (j0 + jb, n - j0 - jb),
        };
        if rows > 0 {
            for &(alpha, p, q) in terms {
                let p = p.submatrix(r0, 0, rows, k);
                let q = q.submatrix(0, j0, k, jb);
                gemm_accumulate(k, alpha, &p, &q, c.rb_mut().submatrix(r0, j0, rows, jb), threads);
            }
        }

        for j in j0..j0 + jb {
            let rows = match uplo {
                Uplo::Upper => j0..j + 1,
                Uplo::Lower => j..j0 + jb,
            };
            for i in rows {
                let mut s = T::zero();
                for &(alpha, p, q) in terms {
                    let mut acc = T::zero();
                    for l in 0..k {
                        acc += p.get(i, l) * q.get(l, j);
                    }
                    s += alpha * acc;
                }
                let v = c.at_mut(i, j);
                let sum = *v + s;
                *v = if real_diag && i == j { sum.real_part() } else { sum };
            }
        }
    }
}

/// `C := alpha * op(A) * op(A)^T + beta * C` on the `uplo` triangle, with
/// `op(A): n x k` (`A` itself for NoTrans, `A^T` otherwise).
pub fn syrk<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, n, n, layout, ldc);
    scale_triangle(beta, uplo, false, &mut cm);
    if alpha == T::zero() || k == 0 {
        return;
    }
    let (ar, ac) = trans.op_shape(n, k);
    let p = MatRef::new(a, ar, ac, layout, lda).op(trans);
    triangular_update(uplo, k, &[(alpha, p, p.transpose())], false, cm);
}

/// `C := alpha * op(A) * op(A)^H + beta * C` with real `alpha`, `beta`;
/// `op(A)` is `A` (NoTrans) or `A^H` (ConjTrans). The diagonal of C stays
/// real.
pub fn herk<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T::Real,
    a: &[T],
    lda: usize,
    beta: T::Real,
    c: &mut [T],
    ldc: usize,
) {
    let (alpha, beta) = (T::from_real(alpha), T::from_real(beta));
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, n, n, layout, ldc);
    scale_triangle(beta, uplo, true, &mut cm);
    if alpha == T::zero() || k == 0 {
        return;
    }
    let (ar, ac) = trans.op_shape(n, k);
    let p = MatRef::new(a, ar, ac, layout, lda).op(trans);
    triangular_update(uplo, k, &[(alpha, p, p.transpose().conjugate())], true, cm);
}

/// `C := alpha * op(A) * op(B)^T + alpha * op(B) * op(A)^T + beta * C` on
/// the `uplo` triangle, `op(A), op(B): n x k`.
pub fn syr2k<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, n, n, layout, ldc);
    scale_triangle(beta, uplo, false, &mut cm);
    if alpha == T::zero() || k == 0 {
        return;
    }
    let (r, cl) = trans.op_shape(n, k);
    let p = MatRef::new(a, r, cl, layout, lda).op(trans);
    let q = MatRef::new(b, r, cl, layout, ldb).op(trans);
    let terms = [(alpha, p, q.transpose()), (alpha, q, p.transpose())];
    triangular_update(uplo, k, &terms, false, cm);
}

/// `C := alpha * op(A) * op(B)^H + conj(alpha) * op(B) * op(A)^H + beta * C`
/// with real `beta`; the diagonal of C stays real.
pub fn her2k<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T::Real,
    c: &mut [T],
    ldc: usize,
) {
    let beta = T::from_real(beta);
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let mut cm = MatMut::new(c, n, n, layout, ldc);
    scale_triangle(beta, uplo, true, &mut cm);
    if alpha == T::zero() || k == 0 {
        return;
    }
    let (r, cl) = trans.op_shape(n, k);
    let p = MatRef::new(a, r, cl, layout, lda).op(trans);
    let q = MatRef::new(b, r, cl, layout, ldb).op(trans);
    let terms = [
        (alpha, p, q.transpose().conjugate()),
        (alpha.conj(), q, p.transpose().conjugate()),
    ];
    triangular_update(uplo, k, &terms, true, cm);
}

// ============================================================================
// TRMM / TRSM: triangular multiply and solve with a matrix right-hand side
// ============================================================================

/// The triangular factor as it acts from the left on (a view of) B.
#[derive(Clone, Copy)]
struct LeftTriangle<'a, T> {
    t: MatRef<'a, T>,
    /// Triangle of `t` holding the non-zeros.
    uplo: Uplo,
    unit: bool,
}

impl<'a, T: Scalar> LeftTriangle<'a, T> {
    /// `op(A)` for Left, `op(A)^T` for Right: `B * op(A) = (op(A)^T * B^T)^T`.
    fn new(a: MatRef<'a, T>, side: Side, uplo: Uplo, trans: Transpose, diag: Diag) -> Self {
        let mut t = a.op(trans);
        let mut uplo = if trans.is_trans() { uplo.flip() } else { uplo };
        if side == Side::Right {
            t = t.transpose();
            uplo = uplo.flip();
        }
        LeftTriangle {
            t,
            uplo,
            unit: diag == Diag::Unit,
        }
    }

    /// Block starts in the order that keeps every cross-block read on
    /// rows whose values are still the ones needed: top-down for upper,
    /// bottom-up for lower (`solve` reverses this).
    fn blocks(&self, p: usize, forward: bool) -> Vec<usize> {
        let mut starts: Vec<usize> = (0..p).step_by(TRIANGLE_BLOCK).collect();
        if !forward {
            starts.reverse();
        }
        starts
    }

    /// `t[i0..i1, cols] * b[cols, :]` as an owned column-major block.
    fn cross_product(&self, i0: usize, ib: usize, c0: usize, w: usize, b: &MatMut<'_, T>) -> Vec<T> {
        let q = b.cols();
        let mut out = vec![T::zero(); ib * q];
        let lhs = self.t.submatrix(i0, c0, ib, w);
        let rhs = b.rb().submatrix(c0, 0, w, q);
        let block = MatMut::new(&mut out, ib, q, Layout::ColMajor, ib.max(1));
        gemm_accumulate(w, T::one(), &lhs, &rhs, block, 1);
        out
    }

    /// `b := t * b` in place.
    fn multiply(&self, mut b: MatMut<'_, T>) {
        let (p, q) = (b.rows(), b.cols());
        let upper = self.uplo == Uplo::Upper;
        for i0 in self.blocks(p, upper) {
            let ib = TRIANGLE_BLOCK.min(p - i0);
            let i1 = i0 + ib;
            // Contribution of rows outside the block, read before they change.
            let (c0, w) = if upper { (i1, p - i1) } else { (0, i0) };
            let cross = (w > 0).then(|| self.cross_product(i0, ib, c0, w, &b));

            for col in 0..q {
                let row = |i: usize, b: &mut MatMut<'_, T>| {
                    let bi = b.get(i, col);
                    let mut acc = if self.unit { bi } else { self.t.get(i, i) * bi };
                    let range = if upper { (i + 1)..i1 } else { i0..i };
                    for j in range {
                        acc += self.t.get(i, j) * b.get(j, col);
                    }
                    *b.at_mut(i, col) = acc;
                };
                if upper {
                    (i0..i1).for_each(|i| row(i, &mut b));
                } else {
                    (i0..i1).rev().for_each(|i| row(i, &mut b));
                }
            }

            if let Some(cross) = cross {
                for col in 0..q {
                    for r in 0..ib {
                        *b.at_mut(i0 + r, col) += cross[r + col * ib];
                    }
                }
            }
        }
    }

    /// `b := t^-1 * b` in place. Lower runs forward, upper backward; every
    /// row a step reads is already solved.
    fn solve(&self, mut b: MatMut<'_, T>) {
        let (p, q) = (b.rows(), b.cols());
        let lower = self.uplo == Uplo::Lower;
        for i0 in self.blocks(p, lower) {
            let ib = TRIANGLE_BLOCK.min(p - i0);
            let i1 = i0 + ib;
            let (c0, w) = if lower { (0, i0) } else { (i1, p - i1) };
            if w > 0 {
                let cross = self.cross_product(i0, ib, c0, w, &b);
                for col in 0..q {
                    for r in 0..ib {
                        *b.at_mut(i0 + r, col) -= cross[r + col * ib];
                    }
                }
            }

            for col in 0..q {
                let row = |i: usize, b: &mut MatMut<'_, T>| {
                    let mut acc = b.get(i, col);
                    let range = if lower { i0..i } else { (i + 1)..i1 };
                    for j in range {
                        acc -= self.t.get(i, j) * b.get(j, col);
                    }
                    *b.at_mut(i, col) = if self.unit { acc } else { acc / self.t.get(i, i) };
                };
                if lower {
                    (i0..i1).for_each(|i| row(i, &mut b));
                } else {
                    (i0..i1).rev().for_each(|i| row(i, &mut b));
                }
            }
        }
    }
}

/// Run `f` on `b` split into disjoint column blocks, in parallel when the
/// columns are the outer axis. Columns of a triangular right-hand side are
/// independent.
fn by_column_blocks<T: Scalar, F>(b: MatMut<'_, T>, f: F)
where
    F: Fn(MatMut<'_, T>) + Sync,
{
    let threads = config().threads_for(b.rows() * b.cols());
    if threads > 1 && !b.outer_is_rows() {
        for_each_outer_block(b, threads, 1, |_, block| f(block));
    } else {
        f(b);
    }
}

/// Shared prologue of `trmm`/`trsm`: scale B by alpha and return the
/// left-acting triangle with the matching view of B. `None` when there is
/// nothing left to do.
fn triangular_setup<'a, 'b, T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    trans_a: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &'a [T],
    lda: usize,
    b: &'b mut [T],
    ldb: usize,
) -> Option<(LeftTriangle<'a, T>, MatMut<'b, T>)> {
    if m == 0 || n == 0 {
        return None;
    }
    let mut bm = MatMut::new(b, m, n, layout, ldb);
    // alpha == 0 zeroes B without reading A.
    scale_matrix(alpha, &mut bm);
    if alpha == T::zero() {
        return None;
    }
    let order = match side {
        Side::Left => m,
        Side::Right => n,
    };
    let tri = LeftTriangle::new(MatRef::new(a, order, order, layout, lda), side, uplo, trans_a, diag);
    let bv = match side {
        Side::Left => bm,
        Side::Right => bm.transpose(),
    };
    Some((tri, bv))
}

/// `B := alpha * op(A) * B` (Left) or `alpha * B * op(A)` (Right), A
/// triangular.
pub fn trmm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    trans_a: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) {
    if let Some((tri, bv)) = triangular_setup(layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb) {
        by_column_blocks(bv, |block| tri.multiply(block));
    }
}

/// Solve `op(A) * X = alpha * B` (Left) or `X * op(A) = alpha * B` (Right)
/// for X, overwriting B. A zero diagonal propagates Inf/NaN.
pub fn trsm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    trans_a: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) {
    if let Some((tri, bv)) = triangular_setup(layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb) {
        by_column_blocks(bv, |block| tri.solve(block));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lamina_core::scalar::c64;

    #[test]
    fn test_gemm_2x2_rowmajor() {
        let a = vec![1.0f64, 2.0, 3.0, 4.0];
        let b = vec![5.0f64, 6.0, 7.0, 8.0];
        let mut c = vec![0.0f64; 4];
        gemm(Layout::RowMajor, Transpose::NoTrans, Transpose::NoTrans, 2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_gemm_alpha_beta_and_transposes() {
        // A^T * B with A = [[1, 3], [2, 4]] stored row-major.
        let a = vec![1.0f32, 3.0, 2.0, 4.0];
        let b = vec![5.0f32, 6.0, 7.0, 8.0];
        let mut c = vec![1.0f32; 4];
        gemm(Layout::RowMajor, Transpose::Trans, Transpose::NoTrans, 2, 2, 2, 2.0, &a, 2, &b, 2, 1.0, &mut c, 2);
        assert_eq!(c, vec![39.0, 45.0, 87.0, 101.0]);

        // Column-major with B transposed: C = A * B^T
        let a = vec![1.0f32, 3.0, 2.0, 4.0]; // [[1, 2], [3, 4]]
        let b = vec![5.0f32, 7.0, 6.0, 8.0]; // [[5, 6], [7, 8]]
        let mut c = vec![0.0f32; 4];
        gemm(Layout::ColMajor, Transpose::NoTrans, Transpose::Trans, 2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        // [[17, 23], [39, 53]] column-major
        assert_eq!(c, vec![17.0, 39.0, 23.0, 53.0]);
    }

    #[test]
    fn test_gemm_rectangular_with_padding() {
        // A: 2x3, B: 3x2, lda = 4, ldc = 3 (row-major)
        let a = vec![1.0f64, 2.0, 3.0, -1.0, 4.0, 5.0, 6.0, -1.0];
        let b = vec![7.0f64, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut c = vec![-7.0f64; 6];
        gemm(Layout::RowMajor, Transpose::NoTrans, Transpose::NoTrans, 2, 2, 3, 1.0, &a, 4, &b, 2, 0.0, &mut c, 3);
        assert_eq!(c, vec![58.0, 64.0, -7.0, 139.0, 154.0, -7.0]);
    }

    #[test]
    fn test_zgemm_conj_trans() {
        let i = c64::new(0.0, 1.0);
        let one = c64::new(1.0, 0.0);
        let zero = c64::new(0.0, 0.0);
        // A = [[i]], B = [[i]]: A^H * B = -i * i = 1
        let mut c = vec![zero];
        gemm(Layout::ColMajor, Transpose::ConjTrans, Transpose::NoTrans, 1, 1, 1, one, &[i], 1, &[i], 1, zero, &mut c, 1);
        assert_eq!(c[0], one);
        gemm(Layout::ColMajor, Transpose::ConjNoTrans, Transpose::ConjNoTrans, 1, 1, 1, one, &[i], 1, &[i], 1, zero, &mut c, 1);
        assert_eq!(c[0], -one);
    }

    #[test]
    fn test_symm_left_and_right() {
        // A = [[1, 2], [2, 3]] via its lower triangle; opposite slot poisoned.
        let a = vec![1.0f64, f64::NAN, 2.0, 3.0];
        let b = vec![1.0f64, 0.0, 0.0, 1.0];
        let mut c = vec![0.0f64; 4];
        symm(Layout::RowMajor, Side::Left, Uplo::Lower, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![1.0, 2.0, 2.0, 3.0]);

        let b = vec![1.0f64, 1.0];
        let mut c = vec![0.0f64; 2];
        symm(Layout::RowMajor, Side::Right, Uplo::Lower, 1, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![3.0, 5.0]);
    }

    #[test]
    fn test_hemm_uses_conjugate_mirror() {
        let zero = c64::new(0.0, 0.0);
        let one = c64::new(1.0, 0.0);
        // A = [[2, i], [-i, 3]] via upper triangle, diag imag ignored.
        let a = vec![c64::new(2.0, 7.0), c64::new(f64::NAN, 0.0), c64::new(0.0, 1.0), c64::new(3.0, 0.0)];
        let b = vec![one, one];
        let mut c = vec![zero; 2];
        hemm(Layout::ColMajor, Side::Left, Uplo::Upper, 2, 1, one, &a, 2, &b, 2, zero, &mut c, 2);
        assert_eq!(c, vec![c64::new(2.0, 1.0), c64::new(3.0, -1.0)]);
    }

    #[test]
    fn test_syrk_writes_one_triangle() {
        // A = [[1, 2], [3, 4]]: A * A^T = [[5, 11], [11, 25]]
        let a = vec![1.0f64, 2.0, 3.0, 4.0];
        let mut c = vec![-1.0f64; 4];
        syrk(Layout::RowMajor, Uplo::Upper, Transpose::NoTrans, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![5.0, 11.0, -1.0, 25.0]);

        // A^T * A = [[10, 14], [14, 20]], lower
        let mut c = vec![-1.0f64; 4];
        syrk(Layout::RowMajor, Uplo::Lower, Transpose::Trans, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![10.0, -1.0, 14.0, 20.0]);
    }

    #[test]
    fn test_syr2k() {
        // A = [1, 0]^T, B = [0, 1]^T (n = 2, k = 1): A B^T + B A^T = [[0, 1], [1, 0]]
        let a = vec![1.0f64, 0.0];
        let b = vec![0.0f64, 1.0];
        let mut c = vec![5.0f64; 4];
        syr2k(Layout::ColMajor, Uplo::Lower, Transpose::NoTrans, 2, 1, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
        assert_eq!(c, vec![0.0, 1.0, 5.0, 0.0]);
    }

    #[test]
    fn test_herk_diagonal_is_exactly_real() {
        let a = vec![c64::new(1.0, 2.0), c64::new(0.5, -1.0), c64::new(3.0, 0.25), c64::new(-2.0, 1.0)];
        let mut c = vec![c64::new(1.0, 9.0), c64::new(0.0, 0.0), c64::new(0.0, 0.0), c64::new(2.0, -9.0)];
        herk(Layout::ColMajor, Uplo::Lower, Transpose::NoTrans, 2, 2, 1.0, &a, 2, 1.0, &mut c, 2);
        assert_eq!(c[0].im, 0.0);
        assert_eq!(c[3].im, 0.0);
        // C00 = 1 + |1+2i|^2 + |3+0.25i|^2
        assert_relative_eq!(c[0].re, 1.0 + 5.0 + 9.0625);
        // C10 = a10 conj(a00) + a11 conj(a01)
        let want = c64::new(0.5, -1.0) * c64::new(1.0, -2.0) + c64::new(-2.0, 1.0) * c64::new(3.0, -0.25);
        assert_relative_eq!(c[1].re, want.re);
        assert_relative_eq!(c[1].im, want.im);
        assert_eq!(c[2], c64::new(0.0, 0.0));
    }

    #[test]
    fn test_trmm_left_upper() {
        // U = [[1, 2], [0, 3]], B = I: U * I = U
        let a = vec![1.0f64, 2.0, 0.0, 3.0];
        let mut b = vec![1.0f64, 0.0, 0.0, 1.0];
        trmm(Layout::RowMajor, Side::Left, Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, 2, 1.0, &a, 2, &mut b, 2);
        assert_eq!(b, vec![1.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn test_trsm_right_lower_trans() {
        // X * L^T = B, L = [[2, 0], [1, 1]], X = [[1, 1]] -> B = X * L^T = [[2, 2]]
        let a = vec![2.0f64, 0.0, 1.0, 1.0];
        let mut b = vec![2.0f64, 2.0];
        trsm(Layout::RowMajor, Side::Right, Uplo::Lower, Transpose::Trans, Diag::NonUnit, 1, 2, 1.0, &a, 2, &mut b, 2);
        assert_eq!(b, vec![1.0, 1.0]);
    }

    #[test]
    fn test_trsm_alpha_zero_does_not_read_a() {
        let a = vec![f64::NAN; 4];
        let mut b = vec![3.0f64; 4];
        trsm(Layout::ColMajor, Side::Left, Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, 2, 0.0, &a, 2, &mut b, 2);
        assert_eq!(b, vec![0.0; 4]);
    }

    #[test]
    fn test_blocked_triangular_roundtrip() {
        // Order above TRIANGLE_BLOCK so cross-block updates are exercised.
        let p = 150;
        let q = 7;
        let mut a = vec![0.0f64; p * p];
        for i in 0..p {
            for j in 0..p {
                a[i * p + j] = if i == j {
                    2.0 + (i % 5) as f64
                } else {
                    ((i * 3 + j * 7) % 11) as f64 / 50.0 - 0.1
                };
            }
        }
        let x0: Vec<f64> = (0..p * q).map(|v| ((v * 13) % 17) as f64 - 8.0).collect();
        for side in [Side::Left, Side::Right] {
            let (m, n) = if side == Side::Left { (p, q) } else { (q, p) };
            for uplo in [Uplo::Upper, Uplo::Lower] {
                for trans in [Transpose::NoTrans, Transpose::Trans] {
                    let mut b = x0.clone();
                    trmm(Layout::ColMajor, side, uplo, trans, Diag::NonUnit, m, n, 2.0, &a, p, &mut b, m);
                    trsm(Layout::ColMajor, side, uplo, trans, Diag::NonUnit, m, n, 0.5, &a, p, &mut b, m);
                    for (got, want) in b.iter().zip(&x0) {
                        assert_relative_eq!(*got, *want, epsilon = 1e-9);
                    }
                }
            }
        }
    }
}
