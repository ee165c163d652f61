//! Runtime configuration, detected once per process.
//!
//! ```text
//! LAMINA_NUM_THREADS=1    single-threaded kernels
//! LAMINA_NUM_THREADS=8    at most 8 workers per call
//! (unset)                 std::thread::available_parallelism()
//! ```

use std::sync::OnceLock;

/// Environment variable overriding the worker count.
pub const NUM_THREADS_ENV: &str = "LAMINA_NUM_THREADS";

/// Output size (elements of C) above which Level 3 kernels split work
/// across threads. Below it, spawn overhead dominates.
pub const PARALLEL_THRESHOLD: usize = 256 * 256;

/// Execution settings shared by all kernels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on workers per call (>= 1).
    pub num_threads: usize,
    /// Minimum output elements before a call goes parallel.
    pub parallel_threshold: usize,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    /// Read the environment and hardware.
    pub fn detect() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let env = std::env::var(NUM_THREADS_ENV).ok();
        Config {
            num_threads: threads_from(env.as_deref(), cores),
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }

    /// Workers to use for an output of `elements` entries.
    #[inline]
    pub fn threads_for(&self, elements: usize) -> usize {
        if elements > self.parallel_threshold {
            self.num_threads
        } else {
            1
        }
    }
}

/// Parse a thread-count override; unparsable or zero values fall back to
/// the core count.
fn threads_from(env: Option<&str>, cores: usize) -> usize {
    match env.and_then(|v| v.trim().parse::<usize>().ok()) {
        Some(n) if n > 0 => n,
        _ => cores.max(1),
    }
}

/// Process-wide configuration (cached after first call).
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override() {
        assert_eq!(threads_from(Some("3"), 16), 3);
        assert_eq!(threads_from(Some(" 1 "), 16), 1);
        assert_eq!(threads_from(Some("0"), 16), 16);
        assert_eq!(threads_from(Some("many"), 4), 4);
        assert_eq!(threads_from(None, 0), 1);
    }

    #[test]
    fn test_threads_for_respects_threshold() {
        let cfg = Config {
            num_threads: 8,
            parallel_threshold: 100,
        };
        assert_eq!(cfg.threads_for(100), 1);
        assert_eq!(cfg.threads_for(101), 8);
    }

    #[test]
    fn test_config_is_cached() {
        let a = config() as *const Config;
        let b = config() as *const Config;
        assert_eq!(a, b);
        assert!(config().num_threads >= 1);
    }
}
