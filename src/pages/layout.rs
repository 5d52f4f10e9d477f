use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::identity::Author;

use super::Site;

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; background: #000; color: #e2e8f0; font-family: system-ui, sans-serif; }
a { color: inherit; text-decoration: none; }
.shell { display: flex; justify-content: center; min-height: 100vh; }
.column { width: 100%; max-width: 42rem; border-left: 1px solid #94a3b8; border-right: 1px solid #94a3b8; }
.bar { display: flex; justify-content: space-between; padding: 1rem; border-bottom: 1px solid #94a3b8; }
.composer { display: flex; gap: 0.75rem; width: 100%; }
.composer input { flex-grow: 1; background: transparent; color: inherit; border: 1px solid #94a3b8; border-radius: 0.25rem; padding: 0 0.5rem; }
.composer.posting { filter: brightness(50%); }
.avatar { border-radius: 9999px; }
.post { display: flex; align-items: center; gap: 0.5rem; margin: 0 1.5rem; padding: 2rem 0.5rem; border-bottom: 1px solid #94a3b8; }
.meta { color: #64748b; }
.meta .author { font-weight: 600; }
.meta .age { font-weight: 300; }
.notice { padding: 2rem; text-align: center; }
.toaster { position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); }
.toast { background: #fff; color: #1e293b; border-radius: 0.5rem; padding: 0.75rem 1rem; margin-top: 0.5rem; }
"#;

const SCRIPT: &str = r#"
function toast(message) {
	const toaster = document.getElementById("toaster");
	const item = document.createElement("div");
	item.className = "toast";
	item.textContent = message;
	toaster.appendChild(item);
	setTimeout(() => item.remove(), 4000);
}

const composer = document.getElementById("composer");

if (composer) {
	const input = composer.querySelector("input");

	composer.addEventListener("submit", async (event) => {
		event.preventDefault();

		const content = input.value;
		if (content === "") return;

		composer.classList.add("posting");
		input.disabled = true;

		try {
			const response = await fetch("/api/post/create", {
				method: "POST",
				headers: { "content-type": "application/json" },
				credentials: "same-origin",
				body: JSON.stringify({ content }),
			});

			if (response.ok) {
				input.value = "";
				window.location.reload();
				return;
			}

			const body = await response.json().catch(() => null);
			const message = body && body.errors && body.errors[0] && body.errors[0].content;

			if (response.status === 429 && message) {
				toast(message);
			} else {
				toast("Failed to post! Please try again later.");
			}
		} catch (error) {
			toast("Failed to post! Please try again later.");
		} finally {
			composer.classList.remove("posting");
			input.disabled = false;
		}
	});
}
"#;

/// Wraps page content in the document shell shared by every page.
pub fn page(site: &Site, title: &str, signed_in: bool, content: &Markup) -> Markup {
	html! {
		(DOCTYPE)
		html lang="en" {
			head {
				meta charset="utf-8";
				meta name="viewport" content="width=device-width, initial-scale=1";
				title { (title) }
				meta name="description" content=(site.description);
				link rel="icon" href="/favicon.ico";
				style { (PreEscaped(STYLE)) }
			}
			body {
				main class="shell" {
					div class="column" {
						nav class="bar" {
							a href="/" { (site.title) }
							@if signed_in {
								a href="/sign-out" { "Sign out" }
							} @else {
								a href=(site.sign_in_url) { "Sign in" }
							}
						}
						(content)
					}
				}
				div id="toaster" class="toaster" role="status" aria-live="polite" {}
				script { (PreEscaped(SCRIPT)) }
			}
		}
	}
}

pub fn avatar(author: &Author, size: u32) -> Markup {
	html! {
		img class="avatar" src=(author.profile_image_url) alt=(format!("@{}", author.id)) width=(size) height=(size);
	}
}

pub fn notice(message: &str) -> Markup {
	html! {
		div class="notice" { (message) }
	}
}
