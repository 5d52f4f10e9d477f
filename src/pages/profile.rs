use axum::{
	extract::{Path, State},
	http::StatusCode,
};
use maud::{html, Markup};

use crate::{extract::Caller, route::profile::route::lookup_profile, AppState};

use super::{layout, normalize_username};

/// A single user's profile, at `/{username}` or `/@{username}`.
pub async fn profile(
	State(state): State<AppState>,
	caller: Option<Caller>,
	Path(username): Path<String>,
) -> (StatusCode, Markup) {
	let username = normalize_username(&username);

	let Some(caller) = caller else {
		let content = html! {
			div class="notice" {
				"Sign in to view "
				"@" (username)
				". "
				a href=(state.site.sign_in_url) { "Sign in" }
			}
		};

		return (
			StatusCode::UNAUTHORIZED,
			layout::page(&state.site, username, false, &content),
		);
	};

	let (status, content) = match lookup_profile(state.identity.as_ref(), &caller, username).await
	{
		Ok(author) => (
			StatusCode::OK,
			html! {
				div class="bar" {
					(layout::avatar(&author, 96))
				}
				div class="notice" { "@" (author.id) }
			},
		),
		Err(error) => {
			tracing::error!(%error, username, "failed to load profile");

			(error.status(), layout::notice("Something went wrong..."))
		}
	};

	(status, layout::page(&state.site, username, true, &content))
}
