//! CBLAS-style layout, transpose, triangle, diagonal and side tags.
//!
//! The numeric discriminants match the CBLAS enumerations so raw codes coming
//! from foreign callers can be converted with `TryFrom<i32>`.

use crate::error::BlasError;

/// Memory layout for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Layout {
    /// Row-major (C-style): elements in a row are contiguous.
    #[default]
    RowMajor = 101,
    /// Column-major (Fortran-style): elements in a column are contiguous.
    ColMajor = 102,
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans = 111,
    /// Transpose.
    Trans = 112,
    /// Conjugate transpose (for complex types).
    ConjTrans = 113,
    /// Conjugate without transposing (for complex types).
    ConjNoTrans = 114,
}

impl Layout {
    /// Leading dimension stride for an M x N matrix.
    #[inline(always)]
    pub fn leading_dim(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => cols,
            Layout::ColMajor => rows,
        }
    }

    /// Linear index into a flat array for element (i, j) of an M x N matrix.
    #[inline(always)]
    pub fn index(self, i: usize, j: usize, ld: usize) -> usize {
        match self {
            Layout::RowMajor => i * ld + j,
            Layout::ColMajor => j * ld + i,
        }
    }

    /// The other layout. Reading a row-major buffer as column-major yields
    /// the transpose.
    #[inline]
    pub fn flip(self) -> Layout {
        match self {
            Layout::RowMajor => Layout::ColMajor,
            Layout::ColMajor => Layout::RowMajor,
        }
    }
}

impl Transpose {
    /// Whether rows and columns of the operand are swapped.
    #[inline(always)]
    pub fn is_trans(self) -> bool {
        matches!(self, Transpose::Trans | Transpose::ConjTrans)
    }

    /// Whether the operand's elements are conjugated.
    #[inline(always)]
    pub fn is_conj(self) -> bool {
        matches!(self, Transpose::ConjTrans | Transpose::ConjNoTrans)
    }

    /// Logical shape of op(A) for a stored `rows x cols` matrix.
    #[inline]
    pub fn op_shape(self, rows: usize, cols: usize) -> (usize, usize) {
        if self.is_trans() {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }
}

/// BLAS triangle specifier (upper/lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
}

impl Uplo {
    /// The triangle that holds the same elements after a transpose.
    #[inline]
    pub fn flip(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

/// BLAS side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

/// BLAS diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

macro_rules! impl_try_from_code {
    ($ty:ident, $kind:literal, { $($code:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<i32> for $ty {
            type Error = BlasError;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($ty::$variant),)+
                    _ => Err(BlasError::InvalidCode { kind: $kind, code }),
                }
            }
        }
    };
}

impl_try_from_code!(Layout, "layout", { 101 => RowMajor, 102 => ColMajor });
impl_try_from_code!(Transpose, "transpose", {
    111 => NoTrans,
    112 => Trans,
    113 => ConjTrans,
    114 => ConjNoTrans,
});
impl_try_from_code!(Uplo, "uplo", { 121 => Upper, 122 => Lower });
impl_try_from_code!(Diag, "diag", { 131 => NonUnit, 132 => Unit });
impl_try_from_code!(Side, "side", { 141 => Left, 142 => Right });
