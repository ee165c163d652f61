//! Logical-to-physical addressing for every storage kind.
//!
//! A kernel never branches on layout. It asks an [`Addressing`] value for the
//! offset of logical element `(i, j)` and the answer already folds in the
//! layout, the leading dimension and, for compact storage, the band or packed
//! arrangement. Transposition is a stride swap on [`Dense`], [`MatRef`] and
//! [`MatMut`], never a copy.
//!
//! ## Packed triangles
//!
//! Exactly `n(n+1)/2` elements are stored. The one formula used by every
//! packed routine is [`packed_index`]:
//!
//! | layout   | uplo  | stored element    | offset               |
//! |----------|-------|-------------------|----------------------|
//! | ColMajor | Upper | `i <= j`          | `i + j(j+1)/2`       |
//! | ColMajor | Lower | `i >= j`          | `i + j(2n-j-1)/2`    |
//! | RowMajor | Upper | `i <= j`          | `j + i(2n-i-1)/2`    |
//! | RowMajor | Lower | `i >= j`          | `j + i(i+1)/2`       |
//!
//! A row-major triangle is the column-major opposite triangle of the
//! transpose, which is why the row-major rows mirror the column-major ones.
//!
//! ## Bands
//!
//! A band matrix with `kl` sub- and `ku` super-diagonals keeps element
//! `(i, j)` only for `j - ku <= i <= j + kl`. Column-major storage puts it at
//! row `ku + i - j` of column `j`; row-major storage at column `kl + j - i` of
//! row `i`. Kernels only visit in-band coordinates, see [`Band::rows_in_col`].

use std::ops::Range;

use crate::layout::{Layout, Transpose, Uplo};
use crate::scalar::Scalar;

/// Physical offset of logical element `(i, j)`.
pub trait Addressing: Copy {
    fn offset(&self, i: usize, j: usize) -> usize;
}

// ============================================================================
// Dense rectangular
// ============================================================================

/// Full rectangular storage as a pair of strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dense {
    /// Distance between `(i, j)` and `(i + 1, j)`.
    pub rs: usize,
    /// Distance between `(i, j)` and `(i, j + 1)`.
    pub cs: usize,
}

impl Dense {
    #[inline]
    pub fn new(layout: Layout, ld: usize) -> Self {
        match layout {
            Layout::RowMajor => Dense { rs: ld, cs: 1 },
            Layout::ColMajor => Dense { rs: 1, cs: ld },
        }
    }

    #[inline]
    pub fn transposed(self) -> Self {
        Dense {
            rs: self.cs,
            cs: self.rs,
        }
    }

    /// Addressing of op(A): transposed when `trans` swaps rows and columns.
    #[inline]
    pub fn op(self, trans: Transpose) -> Self {
        if trans.is_trans() {
            self.transposed()
        } else {
            self
        }
    }
}

impl Addressing for Dense {
    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        i * self.rs + j * self.cs
    }
}

// ============================================================================
// Band
// ============================================================================

/// Compact band storage with `kl` sub-diagonals and `ku` super-diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub layout: Layout,
    pub kl: usize,
    pub ku: usize,
    pub ld: usize,
}

impl Band {
    #[inline]
    pub fn new(layout: Layout, kl: usize, ku: usize, ld: usize) -> Self {
        Band { layout, kl, ku, ld }
    }

    /// Symmetric, Hermitian or triangular band holding `k` off-diagonals in
    /// the `uplo` triangle.
    #[inline]
    pub fn triangle(layout: Layout, uplo: Uplo, k: usize, ld: usize) -> Self {
        match uplo {
            Uplo::Upper => Band::new(layout, 0, k, ld),
            Uplo::Lower => Band::new(layout, k, 0, ld),
        }
    }

    /// Rows of column `j` that lie inside the band of a `rows`-row matrix:
    /// `max(0, j - ku) ..= min(rows - 1, j + kl)`.
    #[inline]
    pub fn rows_in_col(&self, j: usize, rows: usize) -> Range<usize> {
        let start = j.saturating_sub(self.ku);
        let end = (j + self.kl + 1).min(rows);
        start..end.max(start)
    }
}

impl Addressing for Band {
    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i + self.ku >= j && i <= j + self.kl, "({i}, {j}) outside band");
        match self.layout {
            Layout::ColMajor => (self.ku + i - j) + j * self.ld,
            Layout::RowMajor => (self.kl + j - i) + i * self.ld,
        }
    }
}

// ============================================================================
// Packed triangle
// ============================================================================

/// Offset of `(i, j)` in an order-`n` packed triangle. `(i, j)` must lie in
/// the stored triangle.
#[inline(always)]
pub fn packed_index(layout: Layout, uplo: Uplo, n: usize, i: usize, j: usize) -> usize {
    match (layout, uplo) {
        (Layout::ColMajor, Uplo::Upper) => i + j * (j + 1) / 2,
        (Layout::ColMajor, Uplo::Lower) => i + j * (2 * n - j - 1) / 2,
        (Layout::RowMajor, Uplo::Upper) => j + i * (2 * n - i - 1) / 2,
        (Layout::RowMajor, Uplo::Lower) => j + i * (i + 1) / 2,
    }
}

/// Packed triangular storage of an order-`n` matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    pub layout: Layout,
    pub uplo: Uplo,
    pub n: usize,
}

impl Packed {
    #[inline]
    pub fn new(layout: Layout, uplo: Uplo, n: usize) -> Self {
        Packed { layout, uplo, n }
    }
}

impl Addressing for Packed {
    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(
            match self.uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            },
            "({i}, {j}) outside the stored triangle"
        );
        packed_index(self.layout, self.uplo, self.n, i, j)
    }
}

// ============================================================================
// Strided vector
// ============================================================================

/// `n` elements spaced `inc` apart. A negative increment walks the buffer
/// backwards: logical element 0 is the last one in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strided {
    pub n: usize,
    pub inc: isize,
}

impl Strided {
    #[inline]
    pub fn new(n: usize, inc: isize) -> Self {
        debug_assert!(inc != 0);
        Strided { n, inc }
    }

    #[inline(always)]
    pub fn at(&self, i: usize) -> usize {
        if self.inc >= 0 {
            i * self.inc as usize
        } else {
            (self.n - 1 - i) * self.inc.unsigned_abs()
        }
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        self.inc == 1
    }
}

// ============================================================================
// Required buffer lengths
// ============================================================================

/// Elements addressed by a dense `rows x cols` matrix.
#[inline]
pub fn dense_len(layout: Layout, rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    let (outer, inner) = match layout {
        Layout::RowMajor => (rows, cols),
        Layout::ColMajor => (cols, rows),
    };
    (outer - 1) * ld + inner
}

/// Elements addressed by a band matrix with `kl + ku + 1` stored diagonals.
#[inline]
pub fn band_len(layout: Layout, rows: usize, cols: usize, kl: usize, ku: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    let outer = match layout {
        Layout::RowMajor => rows,
        Layout::ColMajor => cols,
    };
    (outer - 1) * ld + kl + ku + 1
}

/// Elements in an order-`n` packed triangle.
#[inline]
pub fn packed_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Elements addressed by an `n`-vector with increment `inc`.
#[inline]
pub fn vector_len(n: usize, inc: isize) -> usize {
    if n == 0 {
        0
    } else {
        1 + (n - 1) * inc.unsigned_abs()
    }
}

// ============================================================================
// Strided matrix views
// ============================================================================

/// Read-only strided view of a dense matrix, optionally conjugated.
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    rs: usize,
    cs: usize,
    conj: bool,
}

impl<'a, T: Scalar> MatRef<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize, layout: Layout, ld: usize) -> Self {
        let d = Dense::new(layout, ld);
        Self::from_strides(data, rows, cols, d.rs, d.cs)
    }

    pub fn from_strides(data: &'a [T], rows: usize, cols: usize, rs: usize, cs: usize) -> Self {
        MatRef {
            data,
            rows,
            cols,
            rs,
            cs,
            conj: false,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.rs
    }

    #[inline]
    pub fn col_stride(&self) -> usize {
        self.cs
    }

    #[inline]
    pub fn is_conj(&self) -> bool {
        self.conj
    }

    #[inline]
    pub fn transpose(self) -> Self {
        MatRef {
            rows: self.cols,
            cols: self.rows,
            rs: self.cs,
            cs: self.rs,
            ..self
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        MatRef {
            conj: !self.conj,
            ..self
        }
    }

    /// op(A) for a transpose tag.
    #[inline]
    pub fn op(self, trans: Transpose) -> Self {
        let m = if trans.is_trans() {
            self.transpose()
        } else {
            self
        };
        if trans.is_conj() {
            m.conjugate()
        } else {
            m
        }
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.rs + j * self.cs].conj_if(self.conj)
    }

    /// The `rows x cols` block starting at `(i0, j0)`.
    pub fn submatrix(self, i0: usize, j0: usize, rows: usize, cols: usize) -> Self {
        debug_assert!(i0 + rows <= self.rows && j0 + cols <= self.cols);
        let data = if rows == 0 || cols == 0 {
            &self.data[..0]
        } else {
            &self.data[i0 * self.rs + j0 * self.cs..]
        };
        MatRef {
            data,
            rows,
            cols,
            ..self
        }
    }
}

/// Mutable strided view of a dense matrix.
#[derive(Debug)]
pub struct MatMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    rs: usize,
    cs: usize,
}

impl<'a, T: Scalar> MatMut<'a, T> {
    pub fn new(data: &'a mut [T], rows: usize, cols: usize, layout: Layout, ld: usize) -> Self {
        let d = Dense::new(layout, ld);
        Self::from_strides(data, rows, cols, d.rs, d.cs)
    }

    pub fn from_strides(data: &'a mut [T], rows: usize, cols: usize, rs: usize, cs: usize) -> Self {
        MatMut {
            data,
            rows,
            cols,
            rs,
            cs,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn transpose(self) -> Self {
        MatMut {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            rs: self.cs,
            cs: self.rs,
        }
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.rs + j * self.cs]
    }

    #[inline(always)]
    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        debug_assert!(i < self.rows && j < self.cols);
        &mut self.data[i * self.rs + j * self.cs]
    }

    /// Shared view of the same elements.
    #[inline]
    pub fn rb(&self) -> MatRef<'_, T> {
        MatRef::from_strides(&*self.data, self.rows, self.cols, self.rs, self.cs)
    }

    /// Reborrow for a shorter lifetime.
    #[inline]
    pub fn rb_mut(&mut self) -> MatMut<'_, T> {
        MatMut {
            data: &mut *self.data,
            rows: self.rows,
            cols: self.cols,
            rs: self.rs,
            cs: self.cs,
        }
    }

    /// The `rows x cols` block starting at `(i0, j0)`.
    pub fn submatrix(self, i0: usize, j0: usize, rows: usize, cols: usize) -> Self {
        debug_assert!(i0 + rows <= self.rows && j0 + cols <= self.cols);
        let (rs, cs) = (self.rs, self.cs);
        let data = self.data;
        let data = if rows == 0 || cols == 0 {
            &mut data[..0]
        } else {
            &mut data[i0 * rs + j0 * cs..]
        };
        MatMut {
            data,
            rows,
            cols,
            rs,
            cs,
        }
    }

    /// Whether rows are the outer (large-stride) axis. A single column with
    /// unit strides counts as row-outer.
    #[inline]
    pub fn outer_is_rows(&self) -> bool {
        self.rs > self.cs || (self.rs == self.cs && self.cols <= 1)
    }

    /// Length of the outer axis.
    #[inline]
    pub fn outer_dim(&self) -> usize {
        if self.outer_is_rows() {
            self.rows
        } else {
            self.cols
        }
    }

    /// Split into two disjoint views along the outer axis: indices `< at`
    /// and `>= at`. The halves can be handed to different threads.
    pub fn split_outer(self, at: usize) -> (Self, Self) {
        let rows_outer = self.outer_is_rows();
        let (outer, stride) = if rows_outer {
            (self.rows, self.rs)
        } else {
            (self.cols, self.cs)
        };
        debug_assert!(at <= outer);
        let (rows, cols, rs, cs) = (self.rows, self.cols, self.rs, self.cs);
        let data = self.data;
        let mid = (at * stride).min(data.len());
        let (head, tail) = data.split_at_mut(mid);
        let tail = if at == outer { &mut tail[..0] } else { tail };
        if rows_outer {
            (
                MatMut::from_strides(head, at, cols, rs, cs),
                MatMut::from_strides(tail, rows - at, cols, rs, cs),
            )
        } else {
            (
                MatMut::from_strides(head, rows, at, rs, cs),
                MatMut::from_strides(tail, rows, cols - at, rs, cs),
            )
        }
    }
}
