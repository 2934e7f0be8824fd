//! Retry and politeness-delay utilities.
//!
//! Every fetch failure (network error, timeout, non-2xx status) is treated as
//! transient and retried after a randomized delay. Politeness delays between
//! fragments and locations use the same randomized sleep.

use std::future::Future;
use std::time::Duration;

use carscan_core::DelayRange;

use crate::error::ScraperError;

/// Draws a delay uniformly from `range`. A zero or degenerate range never
/// touches the RNG.
#[must_use]
pub fn sample_delay(range: DelayRange) -> Duration {
    if range.is_zero() {
        return Duration::ZERO;
    }
    if range.max_ms <= range.min_ms {
        return Duration::from_millis(range.min_ms);
    }
    Duration::from_millis(rand::random_range(range.min_ms..range.max_ms))
}

/// Sleeps for a random interval drawn from `range`.
pub async fn polite_pause(range: DelayRange) {
    let delay = sample_delay(range);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Executes `operation` up to `max_attempts` times in total.
///
/// On success the result is returned immediately. On failure the function
/// sleeps for a random interval drawn from `backoff` and tries again. Once the
/// budget is spent the last error is returned. `max_attempts = 0` behaves
/// like `1`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff: DelayRange,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            tracing::error!(attempt, max_attempts, error = %err, "all fetch attempts failed");
            return Err(err);
        }

        let delay = sample_delay(backoff);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "fetch failed, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://test.example.com/cars".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, DelayRange::ZERO, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, DelayRange::ZERO, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, DelayRange::ZERO, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        // max_attempts counts the first try
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(0, DelayRange::ZERO, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_sleeps_within_range() {
        let started = tokio::time::Instant::now();
        let result = retry_with_backoff(2, DelayRange::new(2000, 5000), || async {
            Err::<u32, ScraperError>(server_error())
        })
        .await;
        assert!(result.is_err());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2000), "slept {elapsed:?}");
        assert!(elapsed < Duration::from_millis(5000), "slept {elapsed:?}");
    }

    #[test]
    fn sample_delay_zero_range() {
        assert_eq!(sample_delay(DelayRange::ZERO), Duration::ZERO);
    }

    #[test]
    fn sample_delay_fixed_range() {
        assert_eq!(
            sample_delay(DelayRange::new(250, 250)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn sample_delay_stays_in_half_open_range() {
        for _ in 0..200 {
            let delay = sample_delay(DelayRange::new(500, 1500));
            assert!(delay >= Duration::from_millis(500));
            assert!(delay < Duration::from_millis(1500));
        }
    }
}
