use std::sync::Mutex;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::route::post::model::Post;

use super::PostStore;

/// In-memory post store.
///
/// Creation times are strictly increasing, even for posts created
/// within the same clock tick.
#[derive(Default)]
pub struct MemoryPostStore {
	posts: Mutex<Vec<Post>>,
}

impl MemoryPostStore {
	pub fn len(&self) -> usize {
		self.posts.lock().unwrap().len()
	}
}

#[axum::async_trait]
impl PostStore for MemoryPostStore {
	async fn create(&self, author_id: &str, content: &str) -> Result<Post, sqlx::Error> {
		let mut posts = self.posts.lock().unwrap();

		let mut created_at = Utc::now();

		if let Some(last) = posts.last() {
			created_at = created_at.max(last.created_at + Duration::microseconds(1));
		}

		let post = Post {
			id: Uuid::new_v4(),
			author_id: author_id.to_string(),
			content: content.to_string(),
			created_at,
		};

		posts.push(post.clone());

		Ok(post)
	}

	async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, sqlx::Error> {
		let posts = self.posts.lock().unwrap();

		Ok(posts
			.iter()
			.rev()
			.take(limit)
			.cloned()
			.collect())
	}
}
