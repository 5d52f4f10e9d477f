use crate::{route::post::model::Post, Database};

use super::PostStore;

pub struct PgPostStore {
	database: Database,
}

impl PgPostStore {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[axum::async_trait]
impl PostStore for PgPostStore {
	async fn create(&self, author_id: &str, content: &str) -> Result<Post, sqlx::Error> {
		sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, author_id, content)
				VALUES (DEFAULT, $1, $2)
				RETURNING *
			"#,
		)
		.bind(author_id)
		.bind(content)
		.fetch_one(&self.database)
		.await
	}

	async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, sqlx::Error> {
		sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				ORDER BY created_at DESC
				LIMIT $1
			"#,
		)
		.bind(i64::try_from(limit).unwrap_or(i64::MAX))
		.fetch_all(&self.database)
		.await
	}
}
