use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{auth, openapi::SECURITY_SCHEME_SESSION, Identity};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// The authenticated principal of a request.
///
/// A [`Caller`] can only be obtained by verifying the request's session token
/// with the identity provider, so any operation that takes one is guaranteed
/// to run on behalf of a signed-in user.
///
/// ```rust
/// async fn route(caller: Caller) {
///   println!("{}", caller.id());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Caller {
	id: String,
}

impl Caller {
	/// The identity provider's id of the caller.
	pub fn id(&self) -> &str {
		&self.id
	}
}

/// Finds the session token in the `Authorization` header or the session cookie.
fn session_token(parts: &request::Parts) -> Result<Option<String>, auth::Error> {
	if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
		let value = value.to_str().map_err(|_| auth::Error::InvalidSession)?;
		let token = value
			.strip_prefix(AUTHORIZATION_PREFIX)
			.ok_or(auth::Error::InvalidSession)?;

		return Ok(Some(token.to_string()));
	}

	let token = parts
		.headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == auth::COOKIE_NAME)
		.map(|cookie| cookie.value().to_string());

	Ok(token)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
	Identity: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = auth::RouteError;

	/// Resolves the caller from a bearer token or session cookie.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = session_token(parts)?.ok_or(auth::Error::NoSession)?;

		let identity = Identity::from_ref(state);
		let id = identity
			.authenticate(&token)
			.await?
			.ok_or(auth::Error::InvalidSession)?;

		Ok(Self { id })
	}
}

impl OperationInput for Caller {
	/// Adds a session requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
