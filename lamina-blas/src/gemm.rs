//! Cache-blocked GEMM engine shared by every Level 3 routine.
//!
//! Goto BLAS algorithm: pack a KC x NC panel of B and an MC x KC block of A
//! into contiguous MR/NR-wide strips, then sweep an MR x NR register tile
//! over the packed data. Loop order is NC -> KC -> MC -> NR -> MR, so one
//! packed B panel is reused across every A block and stays in L3, each
//! packed A block stays in L2, and a B micro-panel stays in L1.
//!
//! Operands are read through [`Operand`] during packing, so transposition,
//! conjugation and the implied half of a symmetric/Hermitian matrix cost
//! nothing extra: the packed buffers always hold op(A) and op(B).
//!
//! Large outputs are split along C's outer axis into disjoint blocks, one
//! per worker thread (see [`for_each_outer_block`]).

use lamina_core::addressing::{MatMut, MatRef};
use lamina_core::layout::Uplo;
use lamina_core::parallel::for_each_outer_block;
use lamina_core::scalar::Scalar;

/// Below this many multiply-adds (`m * n * k`) packing costs more than it
/// saves and the direct loop runs instead.
const DIRECT_THRESHOLD: usize = 48 * 48 * 48;

// ============================================================================
// Operands
// ============================================================================

/// A logical matrix read element-wise while packing.
pub(crate) trait Operand<T>: Sync {
    fn at(&self, i: usize, j: usize) -> T;
}

impl<T: Scalar> Operand<T> for MatRef<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.get(i, j)
    }
}

/// Full symmetric or Hermitian matrix reconstructed from one stored
/// triangle. The unstored half is never read: `(i, j)` outside the triangle
/// is served from `(j, i)`, conjugated when Hermitian. Hermitian diagonals
/// are read as real.
#[derive(Clone, Copy)]
pub(crate) struct Symmetric<'a, T> {
    pub a: MatRef<'a, T>,
    pub uplo: Uplo,
    pub herm: bool,
}

impl<T: Scalar> Operand<T> for Symmetric<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        if i == j {
            let d = self.a.get(i, i);
            return if self.herm { d.real_part() } else { d };
        }
        let stored = match self.uplo {
            Uplo::Upper => i < j,
            Uplo::Lower => i > j,
        };
        if stored {
            self.a.get(i, j)
        } else {
            self.a.get(j, i).conj_if(self.herm)
        }
    }
}

/// `inner` with its origin moved to `(di, dj)`.
struct Shifted<'a, O> {
    inner: &'a O,
    di: usize,
    dj: usize,
}

impl<T, O: Operand<T>> Operand<T> for Shifted<'_, O> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.inner.at(i + self.di, j + self.dj)
    }
}

// ============================================================================
// Entry
// ============================================================================

/// `C += alpha * A * B` with `A: m x k`, `B: k x n` and `c: m x n`.
///
/// Any beta scaling of C has already happened. `threads` caps the number of
/// workers; pass 1 from code that is itself running on a worker.
pub(crate) fn gemm_accumulate<T, A, B>(k: usize, alpha: T, a: &A, b: &B, c: MatMut<'_, T>, threads: usize)
where
    T: Scalar,
    A: Operand<T>,
    B: Operand<T>,
{
    let (m, n) = (c.rows(), c.cols());
    if m == 0 || n == 0 || k == 0 || alpha == T::zero() {
        return;
    }
    if m * n * k <= DIRECT_THRESHOLD {
        gemm_direct(k, alpha, a, b, c);
        return;
    }

    // Each worker owns whole rows (or columns) of C and the matching rows of
    // A (or columns of B).
    let rows_outer = c.outer_is_rows();
    let align = if rows_outer { T::MR } else { T::NR };
    for_each_outer_block(c, threads, align, |start, block| {
        if rows_outer {
            let a = Shifted { inner: a, di: start, dj: 0 };
            gemm_blocked(k, alpha, &a, b, block);
        } else {
            let b = Shifted { inner: b, di: 0, dj: start };
            gemm_blocked(k, alpha, a, &b, block);
        }
    });
}

/// Triple loop for small problems; C is walked one column at a time.
fn gemm_direct<T: Scalar, A: Operand<T>, B: Operand<T>>(k: usize, alpha: T, a: &A, b: &B, mut c: MatMut<'_, T>) {
    let (m, n) = (c.rows(), c.cols());
    for j in 0..n {
        for p in 0..k {
            let t = alpha * b.at(p, j);
            for i in 0..m {
                *c.at_mut(i, j) += a.at(i, p) * t;
            }
        }
    }
}

// ============================================================================
// Blocked path
// ============================================================================

fn gemm_blocked<T: Scalar, A: Operand<T>, B: Operand<T>>(k: usize, alpha: T, a: &A, b: &B, mut c: MatMut<'_, T>) {
    let (m, n) = (c.rows(), c.cols());
    let mc = T::MC.min(m);
    let nc = T::NC.min(n);
    let kc = T::KC.min(k);

    // Packed buffers: padded to MR/NR boundaries so every strip is full width
    let mut packed_a = vec![T::zero(); mc.div_ceil(T::MR) * T::MR * kc];
    let mut packed_b = vec![T::zero(); nc.div_ceil(T::NR) * T::NR * kc];

    for jc in (0..n).step_by(nc) {
        let jb = nc.min(n - jc);

        for pc in (0..k).step_by(kc) {
            let pb = kc.min(k - pc);
            pack_b(b, pc, jc, pb, jb, &mut packed_b);

            for ic in (0..m).step_by(mc) {
                let ib = mc.min(m - ic);
                pack_a(a, ic, pc, ib, pb, &mut packed_a);
                macrokernel(alpha, &packed_a, &packed_b, c.rb_mut().submatrix(ic, jc, ib, jb), pb);
            }
        }
    }
}

/// Pack an `mb x kb` block of A at `(ic, pc)` into MR-row strips:
/// strip `s` holds `kb` consecutive MR-tall columns. Rows past `mb` are
/// zero-filled.
fn pack_a<T: Scalar, A: Operand<T>>(a: &A, ic: usize, pc: usize, mb: usize, kb: usize, packed: &mut [T]) {
    let mr = T::MR;
    let mut idx = 0;
    for strip in (0..mb).step_by(mr) {
        let rows = mr.min(mb - strip);
        for p in 0..kb {
            for ir in 0..mr {
                packed[idx] = if ir < rows {
                    a.at(ic + strip + ir, pc + p)
                } else {
                    T::zero()
                };
                idx += 1;
            }
        }
    }
}

/// Pack a `kb x nb` panel of B at `(pc, jc)` into NR-column strips:
/// strip `s` holds `kb` consecutive NR-wide rows. Columns past `nb` are
/// zero-filled.
fn pack_b<T: Scalar, B: Operand<T>>(b: &B, pc: usize, jc: usize, kb: usize, nb: usize, packed: &mut [T]) {
    let nr = T::NR;
    let mut idx = 0;
    for strip in (0..nb).step_by(nr) {
        let cols = nr.min(nb - strip);
        for p in 0..kb {
            for jr in 0..nr {
                packed[idx] = if jr < cols {
                    b.at(pc + p, jc + strip + jr)
                } else {
                    T::zero()
                };
                idx += 1;
            }
        }
    }
}

fn macrokernel<T: Scalar>(alpha: T, packed_a: &[T], packed_b: &[T], mut c: MatMut<'_, T>, kb: usize) {
    let (mb, nb) = (c.rows(), c.cols());
    let (mr, nr) = (T::MR, T::NR);

    for (jr, col) in (0..nb).step_by(nr).enumerate() {
        let cols = nr.min(nb - col);
        let pb = &packed_b[jr * nr * kb..(jr + 1) * nr * kb];

        for (ir, row) in (0..mb).step_by(mr).enumerate() {
            let rows = mr.min(mb - row);
            let pa = &packed_a[ir * mr * kb..(ir + 1) * mr * kb];
            tile(alpha, pa, pb, &mut c, row, col, rows, cols, kb);
        }
    }
}

/// Dispatch to the register tile matching the domain's MR x NR.
#[inline(always)]
fn tile<T: Scalar>(
    alpha: T,
    pa: &[T],
    pb: &[T],
    c: &mut MatMut<'_, T>,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    kb: usize,
) {
    match (T::MR, T::NR) {
        (6, 16) => microkernel::<T, 6, 16>(alpha, pa, pb, c, row, col, rows, cols, kb),
        (6, 8) => microkernel::<T, 6, 8>(alpha, pa, pb, c, row, col, rows, cols, kb),
        (4, 4) => microkernel::<T, 4, 4>(alpha, pa, pb, c, row, col, rows, cols, kb),
        _ => microkernel_any(alpha, pa, pb, c, row, col, rows, cols, kb),
    }
}

/// MR x NR tile of C held in a fixed-size accumulator the compiler keeps in
/// registers. Each K step is MR broadcasts against one NR-wide row of B.
#[inline(always)]
fn microkernel<T: Scalar, const MR: usize, const NR: usize>(
    alpha: T,
    pa: &[T],
    pb: &[T],
    c: &mut MatMut<'_, T>,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    kb: usize,
) {
    let mut acc = [[T::zero(); NR]; MR];

    for p in 0..kb {
        let a = &pa[p * MR..(p + 1) * MR];
        let b = &pb[p * NR..(p + 1) * NR];
        for ir in 0..MR {
            let av = a[ir];
            for jr in 0..NR {
                acc[ir][jr] += av * b[jr];
            }
        }
    }

    // Write back with alpha, clipped to the live part of the tile
    for ir in 0..rows {
        for jr in 0..cols {
            *c.at_mut(row + ir, col + jr) += alpha * acc[ir][jr];
        }
    }
}

/// Tile for blocking parameters without a fixed-size kernel.
fn microkernel_any<T: Scalar>(
    alpha: T,
    pa: &[T],
    pb: &[T],
    c: &mut MatMut<'_, T>,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    kb: usize,
) {
    let (mr, nr) = (T::MR, T::NR);
    for ir in 0..rows {
        for jr in 0..cols {
            let mut s = T::zero();
            for p in 0..kb {
                s += pa[p * mr + ir] * pb[p * nr + jr];
            }
            *c.at_mut(row + ir, col + jr) += alpha * s;
        }
    }
}
