use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The author shown when a post is submitted without a name.
pub const ANONYMOUS: &str = "anonymous";

/// A single bulletin board post.
///
/// The serialized field names are the ones used by the backing JSON file,
/// so changing them breaks existing boards. A field missing from a
/// hand-edited file takes its zero value instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Post {
	/// The sequential identifier of the post, starting at 1.
	pub id: u64,
	/// The name of the author.
	#[serde(rename = "name")]
	pub author: String,
	/// The message itself. Line breaks are kept as written.
	pub body: String,
	/// Relative URL of the attached image, or empty when there is none.
	#[serde(rename = "image")]
	pub image_path: String,
	/// The creation time of the post, in epoch seconds.
	#[serde(rename = "ctime", with = "chrono::serde::ts_seconds")]
	#[schemars(with = "i64")]
	pub created_at: DateTime<Utc>,
}

impl Post {
	/// The attached image, if any.
	pub fn image(&self) -> Option<&str> {
		(!self.image_path.is_empty()).then_some(self.image_path.as_str())
	}

	/// Whether the post matches a search query.
	///
	/// `needle` must already be lowercased. An empty needle matches everything.
	pub fn matches(&self, needle: &str) -> bool {
		if needle.is_empty() {
			return true;
		}

		format!("{} {}", self.author, self.body)
			.to_lowercase()
			.contains(needle)
	}
}

/// The user supplied part of a post, before it is given an id and timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
	pub author: String,
	pub body: String,
	pub image_path: String,
}

impl NewPost {
	/// Normalizes raw form input: both fields are trimmed and an empty
	/// author becomes [`ANONYMOUS`].
	pub fn new(author: &str, body: &str, image_path: Option<String>) -> Self {
		let author = author.trim();

		Self {
			author: if author.is_empty() {
				ANONYMOUS.to_owned()
			} else {
				author.to_owned()
			},
			body: body.trim().to_owned(),
			image_path: image_path.unwrap_or_default(),
		}
	}
}

/// Normalizes a raw search query into the lowercased needle used by [`Post::matches`].
pub fn needle(query: &str) -> String {
	query.trim().to_lowercase()
}

/// Returns the posts matching `query`, newest first.
pub fn search<'a>(posts: &'a [Post], query: &str) -> impl Iterator<Item = &'a Post> {
	let needle = needle(query);

	posts.iter().rev().filter(move |post| post.matches(&needle))
}
