#![warn(clippy::pedantic)]

mod auth;
mod config;
mod error;
mod extract;
mod identity;
mod openapi;
mod pages;
mod ratelimit;
mod route;
mod store;
mod trace;


use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	config::Config,
	identity::{ClerkIdentity, IdentityProvider},
	pages::Site,
	ratelimit::{LocalRatelimit, Ratelimit, RedisRatelimit},
	store::{PgPostStore, PostStore},
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

pub type Posts = Arc<dyn PostStore>;
pub type Identity = Arc<dyn IdentityProvider>;
pub type Limiter = Arc<dyn Ratelimit>;

/// The shared application state.
///
/// Every external service sits behind a trait object, so handlers never
/// know whether they talk to Postgres, Clerk and Redis or to stand-ins.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub posts: Posts,
	pub identity: Identity,
	pub ratelimit: Limiter,
	pub site: Arc<Site>,
}

/// Builds the full application: the RPC API, its documentation and the pages.
pub fn app(state: State) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/api/post", route::post::routes())
		.nest("/api/profile", route::profile::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.merge(pages::routes())
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(config.otel_exporter_otlp_endpoint.as_deref())
		.expect("failed to initialize tracing");

	let database = Database::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let policy = config.ratelimit_policy();
	let ratelimit: Limiter = match config.ratelimit_backend {
		ratelimit::Backend::Redis => {
			let url = config
				.redis_url
				.as_deref()
				.expect("REDIS_URL must be set");

			Arc::new(
				RedisRatelimit::connect(url, policy)
					.await
					.expect("failed to connect to redis"),
			)
		}
		ratelimit::Backend::Local => {
			let limiter = LocalRatelimit::new(policy);
			limiter.cleanup_old_limits(Duration::from_secs(60));

			Arc::new(limiter)
		}
	};

	let identity = ClerkIdentity::new(
		&config.clerk_api_url,
		config.clerk_secret_key.clone(),
		&config.clerk_jwt_key(),
	)
	.expect("invalid identity provider configuration");

	let state = State {
		posts: Arc::new(PgPostStore::new(database)),
		identity: Arc::new(identity),
		ratelimit,
		site: Arc::new(config.site()),
	};

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(
		host = %config.host,
		port = config.port,
		backend = ?config.ratelimit_backend,
		"listening"
	);

	axum::serve(listener, app(state))
		.await
		.expect("server error");
}
