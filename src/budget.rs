//! Budget pre-check: predicts whether a batch can finish before its deadline.
//!
//! Reporting handlers skip company resolution entirely when the batch is predicted to
//! outlast their own timeout, rather than starting work that will be abandoned.

use std::time::Duration;

/// Estimated wall-clock time to resolve `count` phone numbers
///
/// Workers run in waves of `concurrency` lookups, each taking `expected_latency`.
/// Concurrency is capped at `count` the same way the executor caps its workers.
pub fn estimate_batch_duration(
    count: usize,
    concurrency: usize,
    expected_latency: Duration,
) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let workers = concurrency.clamp(1, count);
    let waves = count.div_ceil(workers);
    expected_latency.saturating_mul(u32::try_from(waves).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_takes_no_time() {
        assert_eq!(
            estimate_batch_duration(0, 3, Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[test]
    fn estimate_counts_waves_of_workers() {
        let latency = Duration::from_millis(500);
        assert_eq!(estimate_batch_duration(3, 3, latency), latency);
        assert_eq!(estimate_batch_duration(4, 3, latency), latency * 2);
        assert_eq!(estimate_batch_duration(10, 2, latency), latency * 5);
    }

    #[test]
    fn estimate_caps_workers_at_phone_count() {
        let latency = Duration::from_millis(500);
        assert_eq!(estimate_batch_duration(2, 50, latency), latency);
    }

    #[test]
    fn zero_concurrency_is_treated_as_one_worker() {
        let latency = Duration::from_millis(100);
        assert_eq!(estimate_batch_duration(5, 0, latency), latency * 5);
    }

    #[test]
    fn large_batches_saturate_instead_of_overflowing() {
        let estimate = estimate_batch_duration(usize::MAX, 1, Duration::from_secs(u64::MAX / 2));
        assert_eq!(estimate, Duration::MAX);
    }

    #[test]
    fn default_latency_estimates_around_the_deadline() {
        let latency = Duration::from_millis(800);
        // 90 numbers at concurrency 3: 30 waves x 800ms
        assert_eq!(estimate_batch_duration(90, 3, latency), Duration::from_secs(24));
        // 100 numbers: 34 waves x 800ms
        assert_eq!(
            estimate_batch_duration(100, 3, latency),
            Duration::from_millis(27_200)
        );
    }
}
