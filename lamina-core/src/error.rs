//! Argument errors and the sink that surfaces them.
//!
//! Entry points never partially compute: every argument is checked first to
//! last before any output is touched, and the first failure comes back as a
//! [`BlasError::IllegalArgument`] naming the routine and the 1-based position
//! of the offending parameter. What happens next is the caller's policy,
//! expressed as an [`ErrorSink`].

use std::sync::Mutex;

/// Why an argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("dimension {0} is negative")]
    NegativeDimension(i64),
    #[error("increment must be non-zero")]
    ZeroIncrement,
    #[error("leading dimension {ld} is smaller than the required {min}")]
    LeadingDimension { ld: i64, min: usize },
    #[error("buffer holds {len} elements but {required} are addressed")]
    BufferTooShort { len: usize, required: usize },
    #[error("tag value is not legal for this routine")]
    IllegalTag,
}

/// Errors reported by lamina entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlasError {
    /// Parameter `position` (1-based) of `routine` was incorrect.
    #[error("parameter {position} to routine {routine} was incorrect: {reason}")]
    IllegalArgument {
        routine: &'static str,
        position: usize,
        reason: Reason,
    },

    /// A raw CBLAS enumeration code did not name any variant.
    #[error("invalid {kind} code {code}")]
    InvalidCode { kind: &'static str, code: i32 },

    /// An interleaved complex buffer must hold whole (re, im) pairs.
    #[error("interleaved complex buffer has odd length {0}")]
    OddInterleavedLength(usize),
}

/// Result type for lamina entry points.
pub type Result<T> = std::result::Result<T, BlasError>;

impl BlasError {
    /// Routine name for argument errors.
    pub fn routine(&self) -> Option<&'static str> {
        match self {
            BlasError::IllegalArgument { routine, .. } => Some(routine),
            _ => None,
        }
    }

    /// 1-based argument position for argument errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            BlasError::IllegalArgument { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Forward an argument error to `sink`. Other variants are not routine
    /// argument errors and are not reported.
    pub fn report_to(&self, sink: &dyn ErrorSink) {
        if let BlasError::IllegalArgument {
            routine, position, ..
        } = self
        {
            sink.report(routine, *position);
        }
    }
}

/// Receives (routine, argument position) for every rejected call and decides
/// how to surface it.
pub trait ErrorSink {
    fn report(&self, routine: &str, position: usize);
}

/// Prints the conventional xerbla line to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn report(&self, routine: &str, position: usize) {
        eprintln!(" ** On entry to {routine} parameter number {position} had an illegal value");
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, usize)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far, oldest first.
    pub fn reports(&self) -> Vec<(String, usize)> {
        match self.reports.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, routine: &str, position: usize) {
        let mut guard = match self.reports.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((routine.to_string(), position));
    }
}

/// Route the error of a `Result` into an [`ErrorSink`].
pub trait ReportExt<T> {
    /// `Some(value)` on success; on failure report to `sink` and return `None`.
    fn or_report(self, sink: &dyn ErrorSink) -> Option<T>;
}

impl<T> ReportExt<T> for Result<T> {
    fn or_report(self, sink: &dyn ErrorSink) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                e.report_to(sink);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_routine_and_position() {
        let err = BlasError::IllegalArgument {
            routine: "cblas_dgemm",
            position: 4,
            reason: Reason::NegativeDimension(-1),
        };
        assert_eq!(
            err.to_string(),
            "parameter 4 to routine cblas_dgemm was incorrect: dimension -1 is negative"
        );
        assert_eq!(err.routine(), Some("cblas_dgemm"));
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn test_recording_sink_collects_reports() {
        let sink = RecordingSink::new();
        let res: Result<()> = Err(BlasError::IllegalArgument {
            routine: "cblas_sscal",
            position: 1,
            reason: Reason::NegativeDimension(-3),
        });
        assert!(res.or_report(&sink).is_none());
        let ok: Result<u8> = Ok(7);
        assert_eq!(ok.or_report(&sink), Some(7));
        assert_eq!(sink.reports(), vec![("cblas_sscal".to_string(), 1)]);
    }

    #[test]
    fn test_non_argument_errors_are_not_reported() {
        let sink = RecordingSink::new();
        BlasError::OddInterleavedLength(3).report_to(&sink);
        assert!(sink.reports().is_empty());
    }
}
