use axum::{
	extract::{
		multipart::{Field, Multipart, MultipartRejection},
		State,
	},
	response::{Html, Redirect},
};
use chrono::FixedOffset;

use crate::{
	extract::Query,
	model::NewPost,
	route::model::SearchInput,
	store::Store,
};

use super::{render, Error, RouteError};

/// Where the board lives, and where every write sends the client back to.
pub const BOARD_PATH: &str = "/bbs";

/// An uploaded file, fully buffered.
struct Upload {
	file_name: String,
	bytes: axum::body::Bytes,
}

/// The fields of the write form.
#[derive(Default)]
struct WriteForm {
	name: String,
	body: String,
	image: Option<Upload>,
}

/// Shows every post matching the optional keyword, newest first.
pub async fn show_board(
	State(store): State<Store>,
	State(timezone): State<FixedOffset>,
	Query(search): Query<SearchInput>,
) -> Html<String> {
	let posts = store.load().await;

	Html(render::render(&posts, &search.q, &timezone))
}

/// Stores a new post from a `multipart/form-data` submission.
///
/// The whole form is read before anything touches the disk, so a request
/// that turns out to be too large or malformed leaves no trace.
pub async fn write_post(
	State(store): State<Store>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, RouteError> {
	let mut multipart = multipart.map_err(|error| Error::MalformedForm(error.body_text()))?;
	let form = read_form(&mut multipart).await?;

	let image_path = match form.image {
		Some(upload) => Some(store.store_attachment(&upload.file_name, &upload.bytes).await?),
		None => None,
	};

	store
		.append(NewPost::new(&form.name, &form.body, image_path))
		.await?;

	Ok(Redirect::to(BOARD_PATH))
}

/// Anything but a POST to the write endpoint goes back to the board.
pub async fn back_to_board() -> Redirect {
	Redirect::to(BOARD_PATH)
}

async fn read_form(multipart: &mut Multipart) -> Result<WriteForm, Error> {
	let mut form = WriteForm::default();

	while let Some(field) = multipart.next_field().await? {
		let name = field.name().unwrap_or_default().to_owned();

		match name.as_str() {
			"name" => form.name = field.text().await?,
			"body" => form.body = field.text().await?,
			"image" => form.image = read_upload(field).await?,
			_ => {}
		}
	}

	Ok(form)
}

/// Buffers a file field. A field without a file name is an empty file
/// input, meaning no image was chosen.
async fn read_upload(field: Field<'_>) -> Result<Option<Upload>, Error> {
	let file_name = field
		.file_name()
		.filter(|name| !name.is_empty())
		.map(str::to_owned);
	let bytes = field.bytes().await?;

	Ok(file_name.map(|file_name| Upload { file_name, bytes }))
}
