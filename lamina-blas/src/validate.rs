//! Argument checking for the CBLAS entry points.
//!
//! Each entry point builds a [`Check`] for its routine name and walks its
//! parameters in order. A buffer's required length depends on the
//! leading dimension or increment that follows it, so each buffer is checked
//! right after that parameter. The first failure is returned and nothing has
//! been written.

use lamina_core::addressing::vector_len;
use lamina_core::error::{BlasError, Reason, Result};

pub(crate) struct Check {
    routine: &'static str,
}

impl Check {
    #[inline]
    pub(crate) fn new(routine: &'static str) -> Self {
        Check { routine }
    }

    #[inline]
    fn fail<T>(&self, position: usize, reason: Reason) -> Result<T> {
        Err(BlasError::IllegalArgument {
            routine: self.routine,
            position,
            reason,
        })
    }

    /// A tag that this routine does not accept.
    #[inline]
    pub(crate) fn tag(&self, position: usize, legal: bool) -> Result<()> {
        if legal {
            Ok(())
        } else {
            self.fail(position, Reason::IllegalTag)
        }
    }

    /// Matrix order, vector length, bandwidth or inner dimension: `>= 0`.
    #[inline]
    pub(crate) fn dim(&self, position: usize, value: i32) -> Result<usize> {
        if value < 0 {
            self.fail(position, Reason::NegativeDimension(value as i64))
        } else {
            Ok(value as usize)
        }
    }

    /// Vector increment: any non-zero value.
    #[inline]
    pub(crate) fn inc(&self, position: usize, value: i32) -> Result<isize> {
        if value == 0 {
            self.fail(position, Reason::ZeroIncrement)
        } else {
            Ok(value as isize)
        }
    }

    /// Leading dimension: `>= max(1, min)`.
    #[inline]
    pub(crate) fn ld(&self, position: usize, value: i32, min: usize) -> Result<usize> {
        let min = min.max(1);
        if value < 0 || (value as usize) < min {
            self.fail(
                position,
                Reason::LeadingDimension {
                    ld: value as i64,
                    min,
                },
            )
        } else {
            Ok(value as usize)
        }
    }

    /// A buffer must hold every element the call addresses.
    #[inline]
    pub(crate) fn buffer(&self, position: usize, len: usize, required: usize) -> Result<()> {
        if len < required {
            self.fail(position, Reason::BufferTooShort { len, required })
        } else {
            Ok(())
        }
    }

    /// Buffer check for an `n`-vector with increment `inc`.
    #[inline]
    pub(crate) fn vector(&self, position: usize, len: usize, n: usize, inc: isize) -> Result<()> {
        self.buffer(position, len, vector_len(n, inc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_failure_is_reported_with_its_position() {
        let chk = Check::new("cblas_dgemv");
        let err = chk.dim(3, -1).unwrap_err();
        assert_eq!(err.routine(), Some("cblas_dgemv"));
        assert_eq!(err.position(), Some(3));
        assert_eq!(chk.dim(3, 0).unwrap(), 0);
    }

    #[test]
    fn test_leading_dimension_floor_is_one() {
        let chk = Check::new("cblas_sgemm");
        assert!(chk.ld(8, 0, 0).is_err());
        assert_eq!(chk.ld(8, 1, 0).unwrap(), 1);
        assert!(chk.ld(8, 3, 4).is_err());
        assert!(chk.ld(8, -5, 1).is_err());
    }

    #[test]
    fn test_increment_and_buffers() {
        let chk = Check::new("cblas_daxpy");
        assert!(chk.inc(4, 0).is_err());
        assert_eq!(chk.inc(4, -2).unwrap(), -2);
        assert!(chk.vector(3, 4, 3, 2).is_err());
        assert!(chk.vector(3, 5, 3, -2).is_ok());
        assert!(chk.vector(3, 0, 0, 1).is_ok());
        assert_eq!(
            chk.buffer(6, 2, 3).unwrap_err(),
            BlasError::IllegalArgument {
                routine: "cblas_daxpy",
                position: 6,
                reason: Reason::BufferTooShort {
                    len: 2,
                    required: 3
                },
            }
        );
    }

    #[test]
    fn test_illegal_tag() {
        let chk = Check::new("cblas_zherk");
        assert!(chk.tag(3, true).is_ok());
        assert_eq!(chk.tag(3, false).unwrap_err().position(), Some(3));
    }
}
