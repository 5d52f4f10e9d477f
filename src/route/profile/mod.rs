use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("User not found")]
	UserNotFound(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/getUserByUsername",
		get_with(get_user_by_username, get_user_by_username_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UserNotFound(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());
		let Self::UserNotFound(user) = self;

		message.detail("user", user).into_vec()
	}
}

#[cfg(test)]
mod test {
	use serde_json::Value;

	use crate::test::*;

	#[tokio::test]
	async fn test_lookup_profile() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/api/profile/getUserByUsername")
			.add_query_param("id", "alice")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(
			response.json::<Value>(),
			json!({
				"id": "alice",
				"profileImageUrl": "https://img.example/alice.png",
			})
		);
	}

	#[tokio::test]
	async fn test_lookup_requires_caller() {
		let fixture = fixture();
		fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/api/profile/getUserByUsername")
			.add_query_param("id", "alice")
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_lookup_unknown_user() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/api/profile/getUserByUsername")
			.add_query_param("id", "nobody")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"][0]["content"],
			"User not found"
		);
	}

	#[tokio::test]
	async fn test_lookup_requires_id() {
		let fixture = fixture();
		let token = fixture.identity.add_user("alice");

		let response = fixture
			.server
			.get("/api/profile/getUserByUsername")
			.add_header(header::AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
	}
}
