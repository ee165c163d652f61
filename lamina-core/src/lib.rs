//! # Lamina Core
//!
//! Shared vocabulary for the lamina BLAS kernels.
//!
//! This crate provides:
//! - **CBLAS tags**: layout, transpose, triangle, diagonal and side enums with
//!   their CBLAS numeric codes.
//! - **Scalar domains**: one [`Scalar`] trait over `f32`, `f64`, `c32`, `c64`,
//!   carrying arithmetic primitives and GEMM blocking parameters.
//! - **Addressing model**: offset functions for dense, band and packed storage,
//!   strided vectors, and the [`MatRef`]/[`MatMut`] views kernels iterate over.
//! - **Errors**: [`BlasError`] and the [`ErrorSink`] trait that decides how a
//!   rejected call is surfaced.
//! - **Parallel execution**: scoped-thread helpers that hand each worker a
//!   disjoint block of the output.

pub mod addressing;
pub mod config;
pub mod error;
pub mod layout;
pub mod parallel;
pub mod scalar;

pub use addressing::{Addressing, Band, Dense, MatMut, MatRef, Packed, Strided};
pub use config::{config, Config};
pub use error::{BlasError, ErrorSink, Reason, RecordingSink, ReportExt, Result, StderrSink};
pub use layout::{Diag, Layout, Side, Transpose, Uplo};
pub use parallel::for_each_outer_block;
pub use scalar::{c32, c64, RealScalar, Scalar};
