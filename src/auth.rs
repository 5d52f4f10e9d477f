use axum::http::StatusCode;

use crate::error;

/// The cookie the identity provider stores its session token in.
pub const COOKIE_NAME: &str = "__session";

/// An error that can occur while resolving the caller's identity.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no session cookie or bearer token")]
	NoSession,
	#[error("invalid session")]
	InvalidSession,
}

pub type RouteError = error::RouteError<Error>;

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NoSession | Self::InvalidSession => StatusCode::UNAUTHORIZED,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		error::Message::new(self.to_string()).into_vec()
	}
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_clear_cookie() {
		let cookie = clear_cookie();

		assert_eq!(cookie.name(), COOKIE_NAME);
		assert_eq!(cookie.value(), "");
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.path(), Some("/"));
		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}
}
