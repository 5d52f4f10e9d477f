use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::identity::Author;

/// The most posts the feed returns.
pub const FEED_LIMIT: usize = 100;

/// A single post, created by a user.
#[model(create)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The identity provider's id of the user that created the post.
	#[serde(skip_deserializing)]
	pub author_id: String,
	/// The text of the post.
	#[validate(length(min = 1, max = 280))]
	pub content: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post together with the public profile of its author.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PostWithAuthor {
	pub post: Post,
	pub author: Author,
}
