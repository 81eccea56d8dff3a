//! Request spacing for the OMDb client.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum interval between requests (~10 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Keeps consecutive OMDb requests at least `min_interval` apart.
///
/// The free OMDb tier has a daily quota; a runaway pagination loop should
/// not spend it in one burst.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbRateLimiter {
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_allowed: Option<Instant>,
}

impl OmdbRateLimiter {
    /// Creates a limiter with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Creates a limiter with the default spacing (100ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until a request may start, then reserves the next slot.
    pub async fn wait(&mut self) {
        if let Some(at) = self.next_allowed {
            tokio::time::sleep_until(at).await;
        }
        let now = Instant::now();
        self.next_allowed = now.checked_add(self.min_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        // Arrange
        let mut limiter = OmdbRateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        // Act
        limiter.wait().await;

        // Assert
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(
            limiter.next_allowed,
            start.checked_add(Duration::from_secs(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_requests_are_spaced() {
        // Arrange
        let mut limiter = OmdbRateLimiter::new(Duration::from_millis(250));
        let start = Instant::now();

        // Act
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        // Assert
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gap_needs_no_wait() {
        // Arrange
        let mut limiter = OmdbRateLimiter::default_interval();
        limiter.wait().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        let before = Instant::now();

        // Act
        limiter.wait().await;

        // Assert
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
