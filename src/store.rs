use std::{
	io,
	path::{Path, PathBuf},
	sync::Arc,
};

use axum::http::StatusCode;

use crate::{
	clock::{Clock, NameGenerator, SystemClock, UuidNames},
	model::{NewPost, Post},
};

/// Image extensions accepted for attachments, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unsupported image type")]
	UnsupportedImageType(String),
	#[error("io error: {0}")]
	Io(#[from] io::Error),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::UnsupportedImageType(..) => StatusCode::BAD_REQUEST,
			Self::Io(..) | Self::Json(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// The bulletin board storage: a JSON file holding every post, plus a
/// directory of uploaded images.
///
/// Every read goes back to the file and every write rewrites it whole.
/// There is no locking, so two concurrent [`Store::append`] calls can both
/// read the same collection and the last one to write wins, dropping the
/// other post.
#[derive(Clone)]
pub struct Store {
	data_file: PathBuf,
	upload_dir: PathBuf,
	upload_url: String,
	clock: Arc<dyn Clock>,
	names: Arc<dyn NameGenerator>,
}

impl Store {
	/// Creates a store backed by `data_file`, saving attachments into
	/// `upload_dir` which is served under `upload_url`.
	pub fn new(
		data_file: impl Into<PathBuf>,
		upload_dir: impl Into<PathBuf>,
		upload_url: impl Into<String>,
	) -> Self {
		Self {
			data_file: data_file.into(),
			upload_dir: upload_dir.into(),
			upload_url: upload_url.into().trim_end_matches('/').to_owned(),
			clock: Arc::new(SystemClock),
			names: Arc::new(UuidNames),
		}
	}

	#[must_use]
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	#[cfg(test)]
	#[must_use]
	pub fn with_names(mut self, names: Arc<dyn NameGenerator>) -> Self {
		self.names = names;
		self
	}

	pub fn data_file(&self) -> &Path {
		&self.data_file
	}

	pub fn upload_dir(&self) -> &Path {
		&self.upload_dir
	}

	/// Reads every post, oldest first.
	///
	/// A missing file is an empty board. An unreadable or malformed file is
	/// also treated as empty; it is only logged.
	pub async fn load(&self) -> Vec<Post> {
		let content = match tokio::fs::read(&self.data_file).await {
			Ok(content) => content,
			Err(error) if error.kind() == io::ErrorKind::NotFound => return Vec::new(),
			Err(error) => {
				tracing::warn!(path = %self.data_file.display(), %error, "failed to read posts, treating board as empty");
				return Vec::new();
			}
		};

		match serde_json::from_slice(&content) {
			Ok(posts) => posts,
			Err(error) => {
				tracing::warn!(path = %self.data_file.display(), %error, "malformed posts file, treating board as empty");
				Vec::new()
			}
		}
	}

	/// Replaces the whole collection on disk.
	pub async fn save(&self, posts: &[Post]) -> Result<(), Error> {
		let content = serde_json::to_vec(posts)?;

		if let Some(parent) = self.data_file.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		tokio::fs::write(&self.data_file, content).await?;
		Ok(())
	}

	/// Appends a post, assigning it the next id and the current time.
	pub async fn append(&self, input: NewPost) -> Result<Post, Error> {
		let mut posts = self.load().await;

		let post = Post {
			id: posts.iter().map(|post| post.id).max().unwrap_or(0) + 1,
			author: input.author,
			body: input.body,
			image_path: input.image_path,
			created_at: truncate_to_seconds(self.clock.now()),
		};

		posts.push(post.clone());
		self.save(&posts).await?;

		tracing::info!(id = post.id, count = posts.len(), "appended post");

		Ok(post)
	}

	/// Saves an uploaded image under a freshly generated name and returns
	/// the URL it is served from.
	///
	/// Nothing is written when the extension of `original_name` is not an
	/// accepted image type.
	pub async fn store_attachment(&self, original_name: &str, bytes: &[u8]) -> Result<String, Error> {
		let extension = image_extension(original_name)?;
		let file_name = self.names.generate(&format!(".{extension}"));
		let path = self.upload_dir.join(&file_name);

		tokio::fs::create_dir_all(&self.upload_dir).await?;

		if let Err(error) = tokio::fs::write(&path, bytes).await {
			// a failed write can leave a truncated file behind
			let _ = tokio::fs::remove_file(&path).await;
			return Err(error.into());
		}

		tracing::info!(file = %file_name, size = bytes.len(), "stored attachment");

		Ok(format!("{}/{file_name}", self.upload_url))
	}
}

/// Returns the lowercased extension of `name` if it is an accepted image type.
///
/// The extension is whatever follows the last dot of the final path
/// component, so a bare `.png` counts as a png.
pub fn image_extension(name: &str) -> Result<String, Error> {
	let extension = Path::new(name)
		.file_name()
		.and_then(|file_name| file_name.to_str())
		.and_then(|file_name| file_name.rsplit_once('.'))
		.map(|(_, extension)| extension.to_ascii_lowercase())
		.unwrap_or_default();

	if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
		Ok(extension)
	} else {
		Err(Error::UnsupportedImageType(extension))
	}
}

fn truncate_to_seconds(time: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
	chrono::DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(time)
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use chrono::DateTime;
	use tempfile::TempDir;

	use super::*;
	use crate::clock::fixed::{FixedClock, SequentialNames};

	fn store(dir: &TempDir) -> Store {
		Store::new(
			dir.path().join("logs.json"),
			dir.path().join("uploads"),
			"/uploads",
		)
		.with_clock(Arc::new(FixedClock(
			DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap(),
		)))
		.with_names(Arc::new(SequentialNames::default()))
	}

	#[tokio::test]
	async fn test_load_missing_file_is_empty() {
		let dir = TempDir::new().unwrap();

		assert!(store(&dir).load().await.is_empty());
	}

	#[tokio::test]
	async fn test_load_malformed_file_is_empty() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		std::fs::write(store.data_file(), "{not json").unwrap();

		assert!(store.load().await.is_empty());
	}

	#[tokio::test]
	async fn test_load_keeps_records_with_missing_fields() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		std::fs::write(
			store.data_file(),
			r#"[
				{"id": 1, "name": "alice", "body": "first", "image": "", "ctime": 1600000000},
				{"id": 2, "body": "no name", "ctime": 1600000060},
				{"name": "bob"}
			]"#,
		)
		.unwrap();

		let posts = store.load().await;

		assert_eq!(posts.len(), 3);
		assert_eq!(posts[0].author, "alice");
		assert_eq!(posts[1].author, "");
		assert_eq!(posts[1].body, "no name");
		assert_eq!(posts[2].id, 0);
		assert_eq!(posts[2].body, "");
		assert_eq!(posts[2].created_at.timestamp(), 0);

		let post = store.append(NewPost::new("carol", "new", None)).await.unwrap();

		assert_eq!(post.id, 3);
		assert_eq!(store.load().await.len(), 4);
	}

	#[tokio::test]
	async fn test_append_assigns_sequential_ids() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		for expected in 1..=3 {
			let before = store.load().await.len();
			let post = store
				.append(NewPost::new("alice", "hello", None))
				.await
				.unwrap();

			assert_eq!(post.id, expected);
			assert_eq!(store.load().await.len(), before + 1);
		}
	}

	#[tokio::test]
	async fn test_append_continues_after_max_id() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		let existing = Post {
			id: 41,
			author: "bob".into(),
			body: "old".into(),
			image_path: String::new(),
			created_at: DateTime::from_timestamp(1, 0).unwrap(),
		};

		store.save(&[existing]).await.unwrap();

		let post = store.append(NewPost::new("", "new", None)).await.unwrap();

		assert_eq!(post.id, 42);
		assert_eq!(post.author, "anonymous");
		assert_eq!(post.created_at.timestamp(), 1_700_000_000);
		assert_eq!(post.created_at.timestamp_subsec_nanos(), 0);
	}

	#[tokio::test]
	async fn test_save_then_load_round_trips() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		let posts = vec![
			Post {
				id: 1,
				author: "alice".into(),
				body: "line one\nline two".into(),
				image_path: "/uploads/upload-1.png".into(),
				created_at: DateTime::from_timestamp(1_600_000_000, 0).unwrap(),
			},
			Post {
				id: 2,
				author: "<b>bob</b>".into(),
				body: "\"quoted\" & 'single'".into(),
				image_path: String::new(),
				created_at: DateTime::from_timestamp(1_600_000_060, 0).unwrap(),
			},
		];

		store.save(&posts).await.unwrap();

		assert_eq!(store.load().await, posts);
	}

	#[tokio::test]
	async fn test_save_creates_parent_directory() {
		let dir = TempDir::new().unwrap();
		let store = Store::new(dir.path().join("nested/deeper/logs.json"), dir.path(), "/uploads");

		store.save(&[]).await.unwrap();

		assert_eq!(std::fs::read_to_string(store.data_file()).unwrap(), "[]");
	}

	#[tokio::test]
	async fn test_store_attachment_writes_file() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		let path = store
			.store_attachment("Photo.JPG", b"not really a jpeg")
			.await
			.unwrap();

		assert_eq!(path, "/uploads/upload-1.jpg");
		assert_eq!(
			std::fs::read(store.upload_dir().join("upload-1.jpg")).unwrap(),
			b"not really a jpeg"
		);
	}

	#[tokio::test]
	async fn test_store_attachment_rejects_other_types() {
		let dir = TempDir::new().unwrap();
		let store = store(&dir);

		for name in ["payload.exe", "noextension", "image.png.sh", "trailing.", "png.d/file"] {
			let error = store.store_attachment(name, b"MZ").await.unwrap_err();

			assert!(matches!(error, Error::UnsupportedImageType(..)), "{name}");
			assert_eq!(error.status(), StatusCode::BAD_REQUEST);
		}

		assert!(!store.upload_dir().exists());
	}

	#[test]
	fn test_image_extension() {
		assert_eq!(image_extension("a.PNG").unwrap(), "png");
		assert_eq!(image_extension("dir/b.webp").unwrap(), "webp");
		assert_eq!(image_extension("c.jpeg").unwrap(), "jpeg");
		assert!(image_extension("d.svg").is_err());
		assert_eq!(image_extension(".png").unwrap(), "png");
		assert_eq!(image_extension(".GIF").unwrap(), "gif");
	}
}
