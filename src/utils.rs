//! Utility functions for time, string manipulation, and file system operations.
//!
//! This module provides helpers used throughout the application:
//! - [`Clock`] abstraction so cache expiry and date windows are testable
//! - String truncation for logging response bodies
//! - Date extraction from ISO-8601 timestamps for card display
//! - File system validation for output directories

use chrono::{DateTime, Local};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Source of "now" for the fetcher and its cache.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// The `YYYY-MM-DD` prefix of an ISO-8601 timestamp.
///
/// Returns the input unchanged when it is shorter than a date.
pub fn published_date(published_at: &str) -> &str {
    published_at.get(..10).unwrap_or(published_at)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // A sync probe keeps the error surface simple.
    let scratch_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&scratch_path)?;
    if let Err(e) = stdfs::remove_file(&scratch_path) {
        debug!(path = %scratch_path, error = %e, "Could not remove write-test file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
pub use self::test_support::ManualClock;

#[cfg(test)]
mod test_support {
    use super::Clock;
    use chrono::{DateTime, Duration, Local};
    use std::sync::Mutex;

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Local>>,
    }

    impl ManualClock {
        pub fn new(now: DateTime<Local>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock().unwrap()
        }
    }
}
