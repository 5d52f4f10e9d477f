//! Server-rendered pages.
//!
//! Pages call the same operations as the RPC routes and render their
//! results directly, so the first response already contains the data.

mod home;
mod layout;
mod profile;

use axum::{
	http::{header, StatusCode},
	response::{IntoResponse, Redirect},
	routing::get,
	Router,
};
use chrono::{DateTime, Utc};

use crate::{auth, AppState};

/// Settings for the chrome around every page.
#[derive(Debug, Clone)]
pub struct Site {
	pub title: String,
	pub description: String,
	/// Where the identity provider's sign-in flow starts.
	pub sign_in_url: String,
}

impl Default for Site {
	fn default() -> Self {
		Self {
			title: "Tweater".into(),
			description: "A Feedist Community".into(),
			sign_in_url: "/sign-in".into(),
		}
	}
}

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(home::home))
		.route("/sign-out", get(sign_out))
		.route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
		.route("/:username", get(profile::profile))
}

/// Clears the session cookie and returns to the feed.
async fn sign_out() -> impl IntoResponse {
	(
		[(header::SET_COOKIE, auth::clear_cookie().to_string())],
		Redirect::to("/"),
	)
}

/// Profile links are written as `/@id`; the lookup wants the bare id.
pub fn normalize_username(username: &str) -> &str {
	username.strip_prefix('@').unwrap_or(username)
}

fn plural(count: i64, unit: &str) -> String {
	format!("{count} {unit}s ago")
}

/// Describes how long ago `then` was, relative to `now`.
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
	let seconds = (now - then).num_seconds().max(0);
	let round = |value: i64, unit: i64| (value + unit / 2) / unit;

	let minutes = round(seconds, 60);
	let hours = round(seconds, 3_600);
	let days = round(seconds, 86_400);

	match seconds {
		0..=44 => "a few seconds ago".into(),
		45..=89 => "a minute ago".into(),
		90..=2_699 => plural(minutes, "minute"),
		2_700..=5_399 => "an hour ago".into(),
		5_400..=79_199 => plural(hours, "hour"),
		79_200..=129_599 => "a day ago".into(),
		129_600..=2_246_399 => plural(days, "day"),
		2_246_400..=3_887_999 => "a month ago".into(),
		_ if days < 320 => plural(round(days, 30), "month"),
		_ if days < 548 => "a year ago".into(),
		_ => plural(round(days, 365).max(2), "year"),
	}
}

#[cfg(test)]
mod test {
	use chrono::TimeDelta;

	use super::*;
	use crate::{store::PostStore, test::*};

	#[test]
	fn test_normalize_username() {
		assert_eq!(normalize_username("@alice"), "alice");
		assert_eq!(normalize_username("alice"), "alice");
		assert_eq!(normalize_username("@@alice"), "@alice");
	}

	#[test]
	fn test_from_now() {
		let now = Utc::now();
		let ago = |seconds: i64| from_now(now - TimeDelta::seconds(seconds), now);

		assert_eq!(ago(0), "a few seconds ago");
		assert_eq!(ago(-30), "a few seconds ago");
		assert_eq!(ago(60), "a minute ago");
		assert_eq!(ago(5 * 60), "5 minutes ago");
		assert_eq!(ago(60 * 60), "an hour ago");
		assert_eq!(ago(3 * 3_600), "3 hours ago");
		assert_eq!(ago(24 * 3_600), "a day ago");
		assert_eq!(ago(4 * 86_400), "4 days ago");
		assert_eq!(ago(30 * 86_400), "a month ago");
		assert_eq!(ago(90 * 86_400), "3 months ago");
		assert_eq!(ago(400 * 86_400), "a year ago");
		assert_eq!(ago(3 * 365 * 86_400), "3 years ago");
	}

	#[tokio::test]
	async fn test_home_signed_out() {
		let fixture = fixture();
		fixture.identity.add_user("alice");
		fixture.posts.create("alice", "hello <world>").await.unwrap();

		let response = fixture.server.get("/").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let body = response.text();

		assert!(body.contains("Sign in"));
		assert!(!body.contains(r#"id="composer""#));
		assert!(body.contains("hello &lt;world&gt;"));
		assert!(body.contains(r#"href="/@alice""#));
	}

	#[tokio::test]
	async fn test_home_signed_in() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let body = response.text();

		assert!(body.contains(r#"id="composer""#));
		assert!(body.contains("Sign out"));
	}

	#[tokio::test]
	async fn test_home_feed_failure() {
		let fixture = fixture();
		fixture.posts.create("ghost", "boo").await.unwrap();

		let response = fixture.server.get("/").await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.text().contains("Something went wrong"));
	}

	#[tokio::test]
	async fn test_profile_strips_at() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let with_at = fixture
			.server
			.get("/@alice")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		let without_at = fixture
			.server
			.get("/alice")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(with_at.status_code(), StatusCode::OK);
		assert_eq!(without_at.status_code(), StatusCode::OK);
		assert_eq!(with_at.text(), without_at.text());
		assert!(with_at.text().contains("https://img.example/alice.png"));
	}

	#[tokio::test]
	async fn test_profile_signed_out() {
		let fixture = fixture();
		fixture.identity.add_user("alice");

		let response = fixture.server.get("/@alice").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert!(response.text().contains("Sign in"));
	}

	#[tokio::test]
	async fn test_profile_unknown_user() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/@nobody")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.text().contains("Something went wrong..."));
	}

	#[tokio::test]
	async fn test_sign_out_clears_cookie() {
		let fixture = fixture();

		let response = fixture.server.get("/sign-out").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

		let cookie = response.header("set-cookie");
		let cookie = cookie.to_str().unwrap();

		assert!(cookie.starts_with("__session="));
		assert!(cookie.contains("Max-Age=0"));
		assert!(cookie.contains("HttpOnly"));
	}
}
