// CBLAS signatures are long by nature; kernels index packed buffers directly.
#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]

//! # lamina-blas
//!
//! Pure Rust dense BLAS over `f32`, `f64`, `Complex<f32>` and `Complex<f64>`.
//!
//! Two layers:
//!
//! - [`level1`], [`level2`], [`level3`]: generic kernels over
//!   [`Scalar`](lamina_core::Scalar). They take `usize` dimensions and
//!   `isize` increments and assume their arguments were already validated.
//! - [`cblas`] (re-exported at the crate root): the prefixed entry points
//!   (`sdot`, `zgemv`, `dtrsm`, ...) with CBLAS argument conventions. They
//!   validate every argument first to last and return a
//!   [`BlasError`](lamina_core::BlasError) naming the first bad one.
//!
//! Level 3 products go through a cache-blocked GEMM engine (packed panels,
//! register-tile microkernels) that splits large outputs across scoped
//! threads. `LAMINA_NUM_THREADS` caps the worker count.
//!
//! ```
//! use lamina_blas::{dgemm, Layout, Transpose};
//!
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [5.0, 6.0, 7.0, 8.0];
//! let mut c = [0.0; 4];
//! dgemm(Layout::RowMajor, Transpose::NoTrans, Transpose::NoTrans,
//!       2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2).unwrap();
//! assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! Foreign-style error reporting goes through an
//! [`ErrorSink`](lamina_core::ErrorSink):
//!
//! ```
//! use lamina_blas::{dscal, RecordingSink, ReportExt};
//!
//! let sink = RecordingSink::new();
//! let mut x = [1.0, 2.0];
//! assert!(dscal(-1, 2.0, &mut x, 1).or_report(&sink).is_none());
//! assert_eq!(sink.reports(), vec![("cblas_dscal".to_string(), 1)]);
//! assert_eq!(x, [1.0, 2.0]);
//! ```

pub mod cblas;
mod gemm;
pub mod level1;
pub mod level2;
pub mod level3;
mod validate;

pub use cblas::*;
pub use lamina_core::error::{BlasError, ErrorSink, Reason, RecordingSink, ReportExt, Result, StderrSink};
pub use lamina_core::layout::{Diag, Layout, Side, Transpose, Uplo};
pub use lamina_core::scalar::{as_complex, as_complex_mut, c32, c64, Scalar};
