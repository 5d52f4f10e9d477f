mod local;
mod redis;

pub use self::{local::LocalRatelimit, redis::RedisRatelimit};

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("redis error: {0}")]
	Redis(#[from] ::redis::RedisError),
}

/// Where rate limit counters are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
	/// Shared counters in Redis, safe across any number of instances.
	#[default]
	Redis,
	/// Counters in this process only.
	Local,
}

/// How many requests an identifier may make within a window.
#[derive(Debug, Clone)]
pub struct Policy {
	pub requests: u32,
	pub window: Duration,
	/// Namespace for the counter keys, so unrelated counters can share a store.
	pub prefix: String,
}

impl Default for Policy {
	fn default() -> Self {
		Self {
			requests: 3,
			window: Duration::from_secs(60),
			prefix: "@upstash/ratelimit".into(),
		}
	}
}

impl Policy {
	pub fn key(&self, identifier: &str) -> String {
		format!("{}:{}", self.prefix, identifier)
	}
}

/// The outcome of a single rate limit check.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
	pub success: bool,
	pub remaining: u32,
	/// When the identifier may make another request.
	pub reset: DateTime<Utc>,
}

#[axum::async_trait]
pub trait Ratelimit: Send + Sync {
	/// Counts a request for `identifier` and reports whether it is allowed.
	async fn limit(&self, identifier: &str) -> Result<Decision, Error>;
}

/// Whole seconds from `now` until `reset`, rounded up and never negative.
pub fn retry_after_secs(reset: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
	let millis = (reset - now).num_milliseconds().max(0);

	u64::try_from(millis).unwrap_or_default().div_ceil(1000)
}

#[cfg(test)]
mod test {
	use chrono::TimeDelta;

	use super::*;

	#[test]
	fn test_retry_after_rounds_up() {
		let now = Utc::now();

		assert_eq!(retry_after_secs(now + TimeDelta::milliseconds(200), now), 1);
		assert_eq!(retry_after_secs(now + TimeDelta::milliseconds(59_001), now), 60);
		assert_eq!(retry_after_secs(now + TimeDelta::seconds(5), now), 5);
	}

	#[test]
	fn test_retry_after_never_negative() {
		let now = Utc::now();

		assert_eq!(retry_after_secs(now - TimeDelta::seconds(3), now), 0);
		assert_eq!(retry_after_secs(now, now), 0);
	}

	#[test]
	fn test_policy_key() {
		let policy = Policy::default();

		assert_eq!(policy.key("user_alice"), "@upstash/ratelimit:user_alice");
		assert_eq!(policy.requests, 3);
		assert_eq!(policy.window, Duration::from_secs(60));
	}
}
