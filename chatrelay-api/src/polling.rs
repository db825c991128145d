use std::future::Future;
use std::time::Duration;

use crate::config::PollingConfig;

/// Fixed-interval, bounded-attempt polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: u32,
}

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe returned a ready value after `attempts` reads
    Ready { value: T, attempts: u32 },
    /// Every attempt was used; `last` is the final value observed
    Exhausted { last: T, attempts: u32 },
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

    /// `max_attempts` is clamped to at least one read
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// No delay between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(Duration::ZERO, max_attempts)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Call `probe` until `is_ready` accepts its value or attempts run out.
    ///
    /// The probe receives the 1-based attempt number. The policy sleeps for
    /// `interval` between attempts but not after the last one. Probe errors
    /// end the loop immediately.
    pub async fn run<T, E, F, Fut, R>(&self, mut probe: F, is_ready: R) -> Result<PollOutcome<T>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&T) -> bool,
    {
        let mut attempt = 1;
        loop {
            let value = probe(attempt).await?;
            if is_ready(&value) {
                return Ok(PollOutcome::Ready {
                    value,
                    attempts: attempt,
                });
            }
            if attempt >= self.max_attempts {
                return Ok(PollOutcome::Exhausted {
                    last: value,
                    attempts: attempt,
                });
            }
            tokio::time::sleep(self.interval).await;
            attempt += 1;
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms), config.max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval(), Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 30);
        assert_eq!(PollPolicy::from(&PollingConfig::default()), policy);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(PollPolicy::immediate(0).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_ready_on_third_attempt() {
        let calls = Cell::new(0u32);
        let outcome = PollPolicy::immediate(5)
            .run(
                |attempt| {
                    calls.set(calls.get() + 1);
                    async move { Ok::<_, ()>(attempt) }
                },
                |value| *value == 3,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Ready {
                value: 3,
                attempts: 3
            }
        );
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let outcome = PollPolicy::immediate(4)
            .run(|attempt| async move { Ok::<_, ()>(attempt) }, |_| false)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Exhausted {
                last: 4,
                attempts: 4
            }
        );
    }

    #[tokio::test]
    async fn test_probe_error_stops_loop() {
        let calls = Cell::new(0u32);
        let result = PollPolicy::immediate(10)
            .run(
                |attempt| {
                    calls.set(calls.get() + 1);
                    async move {
                        if attempt == 2 {
                            Err("lost connection")
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                |_| false,
            )
            .await;

        assert_eq!(result, Err("lost connection"));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_attempts_only() {
        let start = tokio::time::Instant::now();
        let _ = PollPolicy::new(Duration::from_secs(2), 3)
            .run(|attempt| async move { Ok::<_, ()>(attempt) }, |_| false)
            .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(6), "elapsed {elapsed:?}");
    }
}
