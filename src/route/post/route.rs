use std::collections::{BTreeSet, HashMap};

use axum::extract::State;
use chrono::Utc;
use macros::route;

use crate::{
	extract::{Caller, Json},
	identity::{self, IdentityProvider},
	openapi::tag,
	ratelimit::{self, Ratelimit},
	store::PostStore,
	AppState,
};

use super::{model, Error, RouteError};

/// Lists the most recent posts, newest first, each joined to its author.
///
/// Authors are fetched in a single batch. A post whose author the identity
/// provider does not return fails the whole listing.
pub async fn list_posts(
	posts: &dyn PostStore,
	identity: &dyn IdentityProvider,
) -> Result<Vec<model::PostWithAuthor>, RouteError> {
	let posts = posts.list_recent(model::FEED_LIMIT).await?;

	if posts.is_empty() {
		return Ok(Vec::new());
	}

	let author_ids = posts
		.iter()
		.map(|post| post.author_id.clone())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect::<Vec<_>>();

	let authors = identity
		.get_users(&author_ids, model::FEED_LIMIT)
		.await?
		.iter()
		.map(|user| (user.id.clone(), identity::filter_user_for_client(user)))
		.collect::<HashMap<_, _>>();

	posts
		.into_iter()
		.map(|post| -> Result<_, RouteError> {
			let author = authors
				.get(&post.author_id)
				.cloned()
				.ok_or(Error::AuthorNotFound(post.id))?;

			Ok(model::PostWithAuthor { post, author })
		})
		.collect()
}

/// Creates a post on behalf of the caller, subject to the caller's rate limit.
pub async fn create_post(
	posts: &dyn PostStore,
	ratelimit: &dyn Ratelimit,
	caller: &Caller,
	input: model::CreatePostInput,
) -> Result<model::Post, RouteError> {
	let decision = ratelimit.limit(caller.id()).await?;

	if !decision.success {
		let retry_after = ratelimit::retry_after_secs(decision.reset, Utc::now());

		tracing::debug!(caller = caller.id(), retry_after, "post rate limited");

		return Err(Error::RateLimited { retry_after }.into());
	}

	let post = posts.create(caller.id(), &input.content).await?;

	tracing::info!(
		post = %post.id,
		author = %post.author_id,
		remaining = decision.remaining,
		"created post"
	);

	Ok(post)
}

/// Get all posts
/// Returns up to 100 of the most recent posts, newest first, with their authors.
#[route(tag = tag::POST)]
pub async fn get_all(
	State(state): State<AppState>,
) -> Result<Json<Vec<model::PostWithAuthor>>, RouteError> {
	let posts = list_posts(state.posts.as_ref(), state.identity.as_ref()).await?;

	Ok(Json(posts))
}

/// Create post
/// Creates a new post authored by the signed-in user, subject to a per-user rate limit.
#[route(tag = tag::POST)]
pub async fn create(
	State(state): State<AppState>,
	caller: Caller,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = create_post(
		state.posts.as_ref(),
		state.ratelimit.as_ref(),
		&caller,
		input,
	)
	.await?;

	Ok(Json(post))
}
