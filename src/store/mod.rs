mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgPostStore;

use crate::route::post::model::Post;

/// Persistence for posts. Posts are append-only.
#[axum::async_trait]
pub trait PostStore: Send + Sync {
	/// Inserts a post, assigning its id and creation time.
	async fn create(&self, author_id: &str, content: &str) -> Result<Post, sqlx::Error>;

	/// Returns up to `limit` posts, newest first.
	async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, sqlx::Error>;
}
