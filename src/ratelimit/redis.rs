use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, Script};

use super::{Decision, Error, Policy, Ratelimit};

/// Approximates a sliding window with the current and previous fixed buckets.
///
/// Takes the weight of the previous bucket from [`Buckets::weight`] and
/// decides like [`remaining`]. Returns the remaining requests, or -1 when denied.
const SLIDING_WINDOW: &str = r#"
local current_key = KEYS[1]
local previous_key = KEYS[2]
local tokens = tonumber(ARGV[1])
local weight = tonumber(ARGV[2])
local window = tonumber(ARGV[3])

local current = tonumber(redis.call("GET", current_key) or "0")
local previous = tonumber(redis.call("GET", previous_key) or "0")

previous = math.floor(weight * previous)

if previous + current >= tokens then
	return -1
end

local value = redis.call("INCR", current_key)
if value == 1 then
	redis.call("PEXPIRE", current_key, window * 2 + 1000)
end

return tokens - (value + previous)
"#;

/// The fixed buckets a sliding window check touches.
#[derive(Debug, PartialEq, Eq)]
struct Buckets {
	current: i64,
	previous: i64,
	/// Milliseconds into the current bucket.
	elapsed_ms: i64,
	window_ms: i64,
	/// Start of the next bucket, in milliseconds since the epoch.
	reset_ms: i64,
}

impl Buckets {
	fn at(now_ms: i64, window_ms: i64) -> Self {
		let current = now_ms.div_euclid(window_ms);

		Self {
			current,
			previous: current - 1,
			elapsed_ms: now_ms.rem_euclid(window_ms),
			window_ms,
			reset_ms: (current + 1) * window_ms,
		}
	}

	/// The share of the previous bucket still inside the trailing window.
	#[allow(clippy::cast_precision_loss)]
	fn weight(&self) -> f64 {
		1.0 - self.elapsed_ms as f64 / self.window_ms as f64
	}
}

/// The decision [`SLIDING_WINDOW`] makes for the counts it reads.
///
/// Returns the requests left after counting this one, or -1 when denied.
#[cfg(test)]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn remaining(requests: u32, current: i64, previous: i64, weight: f64) -> i64 {
	let previous = (weight * previous as f64).floor() as i64;
	let requests = i64::from(requests);

	if previous + current >= requests {
		return -1;
	}

	requests - (current + 1 + previous)
}

/// Maps the script's result onto a [`Decision`].
fn decision(remaining: i64, buckets: &Buckets, now: DateTime<Utc>) -> Decision {
	Decision {
		success: remaining >= 0,
		remaining: u32::try_from(remaining).unwrap_or_default(),
		reset: DateTime::from_timestamp_millis(buckets.reset_ms).unwrap_or(now),
	}
}

/// Rate limiter with counters shared through Redis.
pub struct RedisRatelimit {
	connection: ConnectionManager,
	policy: Policy,
	script: Script,
}

impl RedisRatelimit {
	pub async fn connect(redis_url: &str, policy: Policy) -> Result<Self, Error> {
		let client = redis::Client::open(redis_url)?;
		let connection = ConnectionManager::new(client).await?;

		Ok(Self {
			connection,
			policy,
			script: Script::new(SLIDING_WINDOW),
		})
	}

	fn window_ms(&self) -> i64 {
		i64::try_from(self.policy.window.as_millis())
			.unwrap_or(i64::MAX)
			.max(1)
	}
}

#[axum::async_trait]
impl Ratelimit for RedisRatelimit {
	async fn limit(&self, identifier: &str) -> Result<Decision, Error> {
		let now = Utc::now();
		let window_ms = self.window_ms();
		let buckets = Buckets::at(now.timestamp_millis(), window_ms);
		let key = self.policy.key(identifier);

		// ConnectionManager handles share the same underlying multiplexed connection.
		let mut connection = self.connection.clone();

		let remaining: i64 = self
			.script
			.key(format!("{key}:{}", buckets.current))
			.key(format!("{key}:{}", buckets.previous))
			.arg(self.policy.requests)
			.arg(buckets.weight())
			.arg(window_ms)
			.invoke_async(&mut connection)
			.await?;

		Ok(decision(remaining, &buckets, now))
	}
}
