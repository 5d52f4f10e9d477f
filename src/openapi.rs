use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{auth, error, extract::Json};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const POST: &str = "Post";
	pub const PROFILE: &str = "Profile";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Tweater")
		.summary("A tiny micro-blogging service")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Posting and reading the global feed".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("Public user profiles".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some(format!(
					"An identity provider session token, sent as a bearer token or the `{}` cookie",
					auth::COOKIE_NAME
				)),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			"Session Cookie",
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: auth::COOKIE_NAME.into(),
				description: Some("The identity provider's session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message<'static>>, _>(|res| {
			res.example(
				error::Message::new("internal_server_error")
					.field("optional field")
					.detail("key", "value"),
			)
		})
}
