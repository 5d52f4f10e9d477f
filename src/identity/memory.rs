use std::{collections::HashMap, sync::RwLock};

use super::{Error, IdentityProvider, User};

/// In-memory identity provider.
///
/// Each user can sign in with a single fixed token.
#[derive(Default)]
pub struct MemoryIdentity {
	users: RwLock<HashMap<String, User>>,
	tokens: RwLock<HashMap<String, String>>,
}

impl MemoryIdentity {
	/// Adds a user, returning the bearer token that authenticates as them.
	pub fn add_user(&self, id: &str) -> String {
		let token = format!("token-{id}");

		self.users.write().unwrap().insert(
			id.to_string(),
			User {
				id: id.to_string(),
				profile_image_url: format!("https://img.example/{id}.png"),
			},
		);

		self.tokens
			.write()
			.unwrap()
			.insert(token.clone(), id.to_string());

		token
	}
}

#[axum::async_trait]
impl IdentityProvider for MemoryIdentity {
	async fn authenticate(&self, token: &str) -> Result<Option<String>, Error> {
		Ok(self.tokens.read().unwrap().get(token).cloned())
	}

	async fn get_user(&self, id: &str) -> Result<Option<User>, Error> {
		Ok(self.users.read().unwrap().get(id).cloned())
	}

	async fn get_users(&self, ids: &[String], limit: usize) -> Result<Vec<User>, Error> {
		let users = self.users.read().unwrap();

		Ok(users
			.values()
			.filter(|user| ids.contains(&user.id))
			.take(limit)
			.cloned()
			.collect())
	}
}
