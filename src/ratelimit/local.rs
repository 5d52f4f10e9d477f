use std::{num::NonZeroU32, sync::Arc, time::Duration};

use chrono::Utc;
use governor::{
	clock::{Clock, DefaultClock},
	middleware::StateInformationMiddleware,
	DefaultKeyedRateLimiter, Quota, RateLimiter,
};

use super::{Decision, Error, Policy, Ratelimit};

/// Rate limiter with counters kept in this process.
///
/// Allows a burst of `requests`, after which one request comes back per
/// `window`. At most `requests` pass in any trailing `window`.
pub struct LocalRatelimit {
	limiter: Arc<DefaultKeyedRateLimiter<String, StateInformationMiddleware>>,
	clock: DefaultClock,
	policy: Policy,
}

impl LocalRatelimit {
	pub fn new(policy: Policy) -> Self {
		let burst = NonZeroU32::new(policy.requests).unwrap_or(NonZeroU32::MIN);
		let period = policy.window.max(Duration::from_millis(1));

		let quota = Quota::with_period(period)
			.unwrap_or_else(|| Quota::per_second(burst))
			.allow_burst(burst);

		Self {
			limiter: Arc::new(
				RateLimiter::keyed(quota).with_middleware::<StateInformationMiddleware>(),
			),
			clock: DefaultClock::default(),
			policy,
		}
	}

	/// Periodically drops keys whose limits have fully replenished.
	pub fn cleanup_old_limits(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
		let limiter = self.limiter.clone();

		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);

			loop {
				ticker.tick().await;

				tracing::debug!("rate limiting storage size: {}", limiter.len());

				limiter.retain_recent();
			}
		})
	}
}

#[axum::async_trait]
impl Ratelimit for LocalRatelimit {
	async fn limit(&self, identifier: &str) -> Result<Decision, Error> {
		let now = Utc::now();
		let key = self.policy.key(identifier);

		Ok(match self.limiter.check_key(&key) {
			Ok(snapshot) => Decision {
				success: true,
				remaining: snapshot.remaining_burst_capacity(),
				reset: now,
			},
			Err(not_until) => {
				let wait = not_until.wait_time_from(self.clock.now());

				Decision {
					success: false,
					remaining: 0,
					reset: now
						+ chrono::Duration::from_std(wait).unwrap_or(chrono::Duration::zero()),
				}
			}
		})
	}
}

#[cfg(test)]
mod test {
	use std::time::Instant;

	use super::*;
	use crate::ratelimit::retry_after_secs;

	#[tokio::test]
	async fn test_allows_burst_then_denies() {
		let limiter = LocalRatelimit::new(Policy::default());

		for _ in 0..3 {
			assert!(limiter.limit("user_alice").await.unwrap().success);
		}

		let decision = limiter.limit("user_alice").await.unwrap();

		assert!(!decision.success);

		let wait = retry_after_secs(decision.reset, Utc::now());

		assert!(wait > 0);
		assert!(wait <= 60);
	}

	#[tokio::test]
	async fn test_spaced_requests_stay_within_window() {
		let window = Duration::from_millis(600);
		let limiter = LocalRatelimit::new(Policy {
			requests: 3,
			window,
			..Policy::default()
		});
		let start = Instant::now();

		for _ in 0..3 {
			assert!(limiter.limit("user_alice").await.unwrap().success);
		}

		tokio::time::sleep(Duration::from_millis(210)).await;
		assert!(!limiter.limit("user_alice").await.unwrap().success);

		tokio::time::sleep(Duration::from_millis(210)).await;
		if start.elapsed() < window {
			assert!(!limiter.limit("user_alice").await.unwrap().success);
		}

		tokio::time::sleep((start + Duration::from_millis(700)).saturating_duration_since(Instant::now())).await;

		// One slot per window comes back, not the whole burst.
		assert!(limiter.limit("user_alice").await.unwrap().success);
		assert!(!limiter.limit("user_alice").await.unwrap().success);
	}

	#[tokio::test]
	async fn test_identifiers_are_independent() {
		let limiter = LocalRatelimit::new(Policy {
			requests: 1,
			..Policy::default()
		});

		assert!(limiter.limit("user_alice").await.unwrap().success);
		assert!(!limiter.limit("user_alice").await.unwrap().success);
		assert!(limiter.limit("user_bob").await.unwrap().success);
	}
}
