use std::fmt::Write;

use chrono::FixedOffset;

use crate::model::{self, Post};

use super::route::BOARD_PATH;

const STYLE: &str = "<style>\
	body { font-family: sans-serif; margin: 24px; }\
	.box { max-width: 900px; margin: 0 auto; }\
	.post { border: 1px solid silver; padding: 1em; border-radius: 8px; margin: 1em 0; }\
	.author { background-color: #eef; padding: 2px 6px; border-radius: 6px; }\
	.body { white-space: pre-wrap; line-height: 1.6; margin-top: 8px; }\
	.meta { color: #666; font-size: 12px; margin-top: 8px; }\
	.img { margin-top: 8px; }\
	.img img { max-width: 360px; height: auto; border: 1px solid #ddd; border-radius: 8px; }\
	</style>";

/// Renders the board page: the search form, the write form, and every post
/// matching `query`, newest first.
///
/// Everything that came from a user is escaped, and times are shown in `timezone`.
pub fn render(posts: &[Post], query: &str, timezone: &FixedOffset) -> String {
	let query = query.trim();
	let mut html = String::with_capacity(1024 + posts.len() * 256);

	html.push_str("<!DOCTYPE html><html><head><meta charset='utf-8'><title>BBS</title>");
	html.push_str(STYLE);
	html.push_str("</head><body><div class='box'><h1>BBS</h1>");
	search_form(&mut html, query);
	write_form(&mut html);
	html.push_str("<hr>");

	for post in model::search(posts, query) {
		render_post(&mut html, post, timezone);
	}

	html.push_str("</div></body></html>");
	html
}

fn render_post(html: &mut String, post: &Post, timezone: &FixedOffset) {
	let _ = write!(
		html,
		"<div class='post'>({id}) <span class='author'>{author}</span><div class='body'>{body}</div>",
		id = post.id,
		author = escape(&post.author),
		body = escape(&post.body),
	);

	if let Some(image) = post.image() {
		let _ = write!(
			html,
			"<div class='img'><img src='{}' alt='posted image'></div>",
			escape(image)
		);
	}

	let _ = write!(
		html,
		"<div class='meta'>{}</div></div>",
		post.created_at.with_timezone(timezone).format("%Y/%m/%d %H:%M")
	);
}

fn search_form(html: &mut String, query: &str) {
	let _ = write!(
		html,
		"<div><form action='{BOARD_PATH}' method='get'>\
		Search: <input type='text' name='q' value='{}' placeholder='name or message keyword' style='width:20em;'>\
		<input type='submit' value='Search'> <a href='{BOARD_PATH}'>Clear</a>\
		</form></div><hr>",
		escape(query)
	);
}

fn write_form(html: &mut String) {
	let _ = write!(
		html,
		"<div><form action='{BOARD_PATH}/write' method='post' enctype='multipart/form-data'>\
		Name: <input type='text' name='name'><br>\
		Message:<br><textarea name='body' style='width:30em; height:6em;'></textarea><br>\
		Image: <input type='file' name='image' accept='image/*'><br>\
		<input type='submit' value='Post'>\
		</form></div>"
	);
}

/// Escapes the characters that are significant in HTML text and in
/// attribute values of either quote style.
pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&#34;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}

	escaped
}
