use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The identity provider has no user for a post's author.
	#[error("Author or post not found")]
	AuthorNotFound(Uuid),
	#[error("You are posting too fast. Please wait {retry_after} seconds before posting again.")]
	RateLimited { retry_after: u64 },
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/getAll", get_with(get_all, get_all_docs))
		.api_route("/create", post_with(create, create_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::AuthorNotFound(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::AuthorNotFound(post) => message.detail("post", post.to_string()),
			Self::RateLimited { retry_after } => message.detail("retryAfter", retry_after),
		}
		.into_vec()
	}
}
