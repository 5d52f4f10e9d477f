use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::{
	extract::Caller,
	identity::{self, Author},
	route::post::{model::PostWithAuthor, route::list_posts},
	AppState,
};

use super::{from_now, layout};

fn composer(me: &Author) -> Markup {
	html! {
		form id="composer" class="composer" {
			(layout::avatar(me, 56))
			input type="text" name="content" placeholder="Say something..." maxlength="280" autocomplete="off";
			button type="submit" { "Post" }
		}
	}
}

fn post_view(item: &PostWithAuthor, now: DateTime<Utc>) -> Markup {
	let PostWithAuthor { post, author } = item;

	html! {
		div class="post" id=(post.id) {
			(layout::avatar(author, 48))
			div {
				div class="meta" {
					a class="author" href=(format!("/@{}", author.id)) { "@" (author.id) }
					span { " · " }
					time class="age" datetime=(post.created_at.to_rfc3339()) { (from_now(post.created_at, now)) }
				}
				span { (post.content) }
			}
		}
	}
}

/// The global feed, with a composer for signed-in callers.
pub async fn home(State(state): State<AppState>, caller: Option<Caller>) -> (StatusCode, Markup) {
	let me = match &caller {
		Some(caller) => match state.identity.get_user(caller.id()).await {
			Ok(user) => user.as_ref().map(identity::filter_user_for_client),
			Err(error) => {
				tracing::warn!(%error, caller = caller.id(), "failed to load signed-in user");
				None
			}
		},
		None => None,
	};

	let (status, feed) = match list_posts(state.posts.as_ref(), state.identity.as_ref()).await {
		Ok(posts) => {
			let now = Utc::now();

			(
				StatusCode::OK,
				html! {
					@for item in &posts {
						(post_view(item, now))
					}
				},
			)
		}
		Err(error) => {
			tracing::error!(%error, "failed to load feed");

			(error.status(), layout::notice("Something went wrong"))
		}
	};

	let content = html! {
		@if let Some(me) = &me {
			div class="bar" { (composer(me)) }
		}
		div class="feed" { (feed) }
	};

	(
		status,
		layout::page(&state.site, &state.site.title, caller.is_some(), &content),
	)
}
