use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::{Error, IdentityProvider, User};

pub const DEFAULT_API_URL: &str = "https://api.clerk.com/v1/";

/// Claims of a session token that this service reads.
#[derive(Debug, Deserialize)]
struct Claims {
	sub: String,
}

/// Identity provider backed by the Clerk backend API.
///
/// Session tokens are verified locally against the instance's public key,
/// users are fetched over HTTP with the secret key.
pub struct ClerkIdentity {
	client: reqwest::Client,
	api_url: Url,
	secret_key: String,
	decoding_key: DecodingKey,
	validation: Validation,
}

impl ClerkIdentity {
	/// Creates a client that verifies RS256 session tokens with the given PEM public key.
	pub fn new(api_url: &str, secret_key: impl Into<String>, jwt_key: &str) -> Result<Self, Error> {
		let decoding_key = DecodingKey::from_rsa_pem(jwt_key.as_bytes())?;

		Self::with_key(api_url, secret_key, decoding_key, Algorithm::RS256)
	}

	pub fn with_key(
		api_url: &str,
		secret_key: impl Into<String>,
		decoding_key: DecodingKey,
		algorithm: Algorithm,
	) -> Result<Self, Error> {
		let api_url = Url::parse(api_url)?;

		if api_url.cannot_be_a_base() {
			return Err(Error::CannotBeABase);
		}

		let mut validation = Validation::new(algorithm);
		validation.validate_nbf = true;
		validation.validate_aud = false;

		Ok(Self {
			client: reqwest::Client::new(),
			api_url,
			secret_key: secret_key.into(),
			decoding_key,
			validation,
		})
	}

	/// Appends percent-encoded path segments to the API base URL.
	fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
		let mut url = self.api_url.clone();

		url.path_segments_mut()
			.map_err(|()| Error::CannotBeABase)?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}

#[axum::async_trait]
impl IdentityProvider for ClerkIdentity {
	async fn authenticate(&self, token: &str) -> Result<Option<String>, Error> {
		match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
			Ok(data) => Ok(Some(data.claims.sub)),
			Err(error) => {
				tracing::debug!(%error, "rejected session token");
				Ok(None)
			}
		}
	}

	#[tracing::instrument(skip(self))]
	async fn get_user(&self, id: &str) -> Result<Option<User>, Error> {
		let response = self
			.client
			.get(self.endpoint(&["users", id])?)
			.bearer_auth(&self.secret_key)
			.send()
			.await?;

		if response.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}

		Ok(Some(response.error_for_status()?.json().await?))
	}

	#[tracing::instrument(skip(self, ids), fields(ids = ids.len()))]
	async fn get_users(&self, ids: &[String], limit: usize) -> Result<Vec<User>, Error> {
		// An empty filter lists every user of the instance.
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut query = ids
			.iter()
			.map(|id| ("user_id", id.clone()))
			.collect::<Vec<_>>();

		query.push(("limit", limit.to_string()));

		let users = self
			.client
			.get(self.endpoint(&["users"])?)
			.bearer_auth(&self.secret_key)
			.query(&query)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		Ok(users)
	}
}

#[cfg(test)]
mod test {
	use jsonwebtoken::{EncodingKey, Header};
	use serde_json::json;
	use wiremock::{
		matchers::{header, method, path, query_param},
		Mock, MockServer, ResponseTemplate,
	};

	use super::*;

	const SECRET: &[u8] = b"test-signing-secret";

	fn client(api_url: &str) -> ClerkIdentity {
		ClerkIdentity::with_key(
			api_url,
			"sk_test_123",
			DecodingKey::from_secret(SECRET),
			Algorithm::HS256,
		)
		.unwrap()
	}

	fn token(sub: &str, exp: i64) -> String {
		jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			&json!({ "sub": sub, "exp": exp, "nbf": 0 }),
			&EncodingKey::from_secret(SECRET),
		)
		.unwrap()
	}

	#[tokio::test]
	async fn test_authenticate() {
		let clerk = client(DEFAULT_API_URL);
		let exp = chrono::Utc::now().timestamp() + 600;

		assert_eq!(
			clerk.authenticate(&token("user_alice", exp)).await.unwrap(),
			Some("user_alice".to_string())
		);

		let expired = chrono::Utc::now().timestamp() - 3600;

		assert_eq!(clerk.authenticate(&token("user_alice", expired)).await.unwrap(), None);
		assert_eq!(clerk.authenticate("not-a-token").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_get_users() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.and(path("/v1/users"))
			.and(query_param("user_id", "user_alice"))
			.and(query_param("limit", "100"))
			.and(header("authorization", "Bearer sk_test_123"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([
				{
					"id": "user_alice",
					"profile_image_url": "https://img.example/alice.png",
					"image_url": "https://img.example/alice.png",
					"username": "alice",
					"email_addresses": [],
				}
			])))
			.expect(1)
			.mount(&server)
			.await;

		let clerk = client(&format!("{}/v1/", server.uri()));
		let users = clerk
			.get_users(&["user_alice".into(), "user_bob".into()], 100)
			.await
			.unwrap();

		assert_eq!(users.len(), 1);
		assert_eq!(users[0].id, "user_alice");
		assert_eq!(users[0].profile_image_url, "https://img.example/alice.png");
	}

	#[tokio::test]
	async fn test_get_users_empty_skips_request() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(500))
			.expect(0)
			.mount(&server)
			.await;

		let clerk = client(&format!("{}/v1/", server.uri()));

		assert!(clerk.get_users(&[], 100).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_get_user() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.and(path("/v1/users/user_alice"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"id": "user_alice",
				"profile_image_url": "https://img.example/alice.png",
			})))
			.mount(&server)
			.await;

		Mock::given(method("GET"))
			.and(path("/v1/users/nobody"))
			.respond_with(ResponseTemplate::new(404).set_body_json(json!({
				"errors": [{ "code": "resource_not_found" }],
			})))
			.mount(&server)
			.await;

		let clerk = client(&format!("{}/v1/", server.uri()));

		let user = clerk.get_user("user_alice").await.unwrap().unwrap();
		assert_eq!(user.id, "user_alice");

		assert!(clerk.get_user("nobody").await.unwrap().is_none());
	}
}
