use axum::extract::State;
use macros::route;

use crate::{
	extract::{Caller, Json, Query},
	identity::{self, IdentityProvider},
	openapi::tag,
	AppState,
};

use super::{model, Error, RouteError};

/// Looks up the public profile of a user by id.
///
/// Only signed-in callers may look up profiles.
pub async fn lookup_profile(
	identity: &dyn IdentityProvider,
	_caller: &Caller,
	id: &str,
) -> Result<model::Author, RouteError> {
	let user = identity
		.get_user(id)
		.await?
		.ok_or_else(|| Error::UserNotFound(id.to_string()))?;

	Ok(identity::filter_user_for_client(&user))
}

/// Get user profile
/// Returns the public profile of a user by their id.
#[route(tag = tag::PROFILE)]
pub async fn get_user_by_username(
	State(state): State<AppState>,
	caller: Caller,
	Query(input): Query<model::ProfileInput>,
) -> Result<Json<model::Author>, RouteError> {
	let author = lookup_profile(state.identity.as_ref(), &caller, &input.id).await?;

	Ok(Json(author))
}
