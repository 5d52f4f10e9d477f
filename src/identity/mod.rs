//! Access to the external identity provider.
//!
//! Users are owned by the provider. Nothing here is persisted locally, every
//! read goes back to the provider, either by id or by a batch of ids.

mod clerk;
#[cfg(test)]
pub mod memory;

pub use clerk::{ClerkIdentity, DEFAULT_API_URL};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("http error: {0}")]
	Http(#[from] reqwest::Error),
	#[error("token error: {0}")]
	Token(#[from] jsonwebtoken::errors::Error),
	#[error("invalid api url: {0}")]
	Url(#[from] url::ParseError),
	#[error("api url cannot be a base")]
	CannotBeABase,
}

/// A user record as returned by the identity provider.
///
/// Only the fields this service reads are kept, and none of them
/// are sent to clients directly. See [`filter_user_for_client`].
#[derive(Debug, Clone, Deserialize)]
pub struct User {
	pub id: String,
	#[serde(default)]
	pub profile_image_url: String,
}

/// The public projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
	/// The identity provider's id of the user.
	pub id: String,
	/// A URL to the user's avatar.
	pub profile_image_url: String,
}

pub fn filter_user_for_client(user: &User) -> Author {
	Author {
		id: user.id.clone(),
		profile_image_url: user.profile_image_url.clone(),
	}
}

#[axum::async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Verifies a session token, returning the id of the user it belongs to.
	///
	/// Invalid or expired tokens resolve to `None`.
	async fn authenticate(&self, token: &str) -> Result<Option<String>, Error>;

	/// Fetches a single user by id.
	async fn get_user(&self, id: &str) -> Result<Option<User>, Error>;

	/// Fetches up to `limit` users whose ids are in `ids`.
	///
	/// Unknown ids are omitted from the result.
	async fn get_users(&self, ids: &[String], limit: usize) -> Result<Vec<User>, Error>;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_filter_user_for_client() {
		let user = User {
			id: "user_2abc".into(),
			profile_image_url: "https://img.example/alice.png".into(),
		};

		let author = filter_user_for_client(&user);
		let value = serde_json::to_value(&author).unwrap();

		assert_eq!(
			value,
			serde_json::json!({
				"id": "user_2abc",
				"profileImageUrl": "https://img.example/alice.png",
			})
		);
	}
}
