use std::{borrow::Cow, convert::Infallible};

use axum::{
	body::Body,
	extract::rejection::QueryRejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{identity, ratelimit};

pub type Map = serde_json::Map<String, serde_json::Value>;

/// Errors returned by extractors that are shared by every route group.
pub type AppError = RouteError<Infallible>;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A human-readable (or machine-readable, for codes) description of the error.
	pub content: Cow<'a, str>,
	/// The request field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional structured information about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Describes how a route group's error is presented to the client.
///
/// Messages are sent to the client, so they must not contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn into_errors(self) -> Vec<Message<'static>>;
}

impl ErrorShape for Infallible {
	fn status(&self) -> StatusCode {
		match *self {}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		match self {}
	}
}

/// Error type for a route group.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T: ErrorShape> {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0:?}")]
	Json(JsonSchemaRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("identity error: {0}")]
	Identity(#[from] identity::Error),
	#[error("ratelimit error: {0}")]
	Ratelimit(#[from] ratelimit::Error),
	#[error(transparent)]
	Route(T),
}

impl<T: ErrorShape> From<JsonSchemaRejection> for RouteError<T> {
	fn from(rejection: JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T: ErrorShape> RouteError<T> {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) => StatusCode::BAD_REQUEST,
			Self::Route(error) => error.status(),
			Self::Database(..) | Self::Identity(..) | Self::Ratelimit(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						Message::new(
							error
								.message
								.clone()
								.unwrap_or_else(|| error.code.clone()),
						)
						.field(field.to_string())
					})
				})
				.collect(),
			Self::Json(..) => Message::new("invalid_request_body").into_vec(),
			Self::Query(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Route(error) => error.into_errors(),
			Self::Database(..) | Self::Identity(..) | Self::Ratelimit(..) => {
				Message::new("internal_server_error").into_vec()
			}
		}
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(
			status,
			Json(ErrorResponse {
				success: false,
				errors: self.into_errors(),
			}),
		)
			.into_response()
	}
}

impl<T: ErrorShape> aide::OperationOutput for RouteError<T> {
	type Inner = Self;
}
