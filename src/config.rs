use std::time::Duration;

use serde::Deserialize;

use crate::{identity, pages::Site, ratelimit};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("environment error: {0}")]
	Env(#[from] envy::Error),
	#[error("REDIS_URL must be set when RATELIMIT_BACKEND is redis")]
	MissingRedisUrl,
}

fn default_host() -> String {
	"127.0.0.1".into()
}

fn default_port() -> u16 {
	3000
}

fn default_clerk_api_url() -> String {
	identity::DEFAULT_API_URL.into()
}

fn default_sign_in_url() -> String {
	"/sign-in".into()
}

fn default_site_title() -> String {
	"Tweater".into()
}

fn default_site_description() -> String {
	"A Feedist Community".into()
}

fn default_ratelimit_requests() -> u32 {
	3
}

fn default_ratelimit_window_secs() -> u64 {
	60
}

fn default_ratelimit_prefix() -> String {
	"@upstash/ratelimit".into()
}

/// Process configuration, read from the environment.
///
/// Each field is read from the upper-case variable of the same name,
/// e.g. `database_url` from `DATABASE_URL`.
#[derive(Debug, Deserialize)]
pub struct Config {
	pub database_url: String,
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,

	pub clerk_secret_key: String,
	#[serde(default = "default_clerk_api_url")]
	pub clerk_api_url: String,
	/// PEM public key that session tokens are signed with.
	pub clerk_jwt_key: String,

	#[serde(default = "default_sign_in_url")]
	pub sign_in_url: String,
	#[serde(default = "default_site_title")]
	pub site_title: String,
	#[serde(default = "default_site_description")]
	pub site_description: String,

	#[serde(default)]
	pub ratelimit_backend: ratelimit::Backend,
	pub redis_url: Option<String>,
	#[serde(default = "default_ratelimit_requests")]
	pub ratelimit_requests: u32,
	#[serde(default = "default_ratelimit_window_secs")]
	pub ratelimit_window_secs: u64,
	#[serde(default = "default_ratelimit_prefix")]
	pub ratelimit_prefix: String,

	pub otel_exporter_otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::validate(envy::from_env()?)
	}

	fn validate(config: Self) -> Result<Self, Error> {
		if config.ratelimit_backend == ratelimit::Backend::Redis && config.redis_url.is_none() {
			return Err(Error::MissingRedisUrl);
		}

		Ok(config)
	}

	/// The JWT key with escaped newlines expanded, so it fits on one line in `.env`.
	pub fn clerk_jwt_key(&self) -> String {
		self.clerk_jwt_key.replace("\\n", "\n")
	}

	pub fn ratelimit_policy(&self) -> ratelimit::Policy {
		ratelimit::Policy {
			requests: self.ratelimit_requests,
			window: Duration::from_secs(self.ratelimit_window_secs),
			prefix: self.ratelimit_prefix.clone(),
		}
	}

	pub fn site(&self) -> Site {
		Site {
			title: self.site_title.clone(),
			description: self.site_description.clone(),
			sign_in_url: self.sign_in_url.clone(),
		}
	}
}
