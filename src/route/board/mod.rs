use axum::{
	extract::DefaultBodyLimit,
	http::StatusCode,
	routing::{get, post},
	Router,
};

use crate::{error, AppState};

pub mod render;
pub mod route;

/// The largest write request accepted, attachment included.
pub const MAX_REQUEST_SIZE: usize = 5 << 20;

/// An error that can occur while writing a post.
///
/// The messages are presented to the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("malformed form: {0}")]
	MalformedForm(String),
	#[error("request is too large, the limit is 5 MiB")]
	PayloadTooLarge,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new().route("/bbs", get(show_board)).route(
		"/bbs/write",
		post(write_post)
			.fallback(back_to_board)
			.layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE)),
	)
}

impl From<axum::extract::multipart::MultipartError> for Error {
	fn from(error: axum::extract::multipart::MultipartError) -> Self {
		if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
			Self::PayloadTooLarge
		} else {
			Self::MalformedForm(error.body_text())
		}
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::MalformedForm(..) | Self::PayloadTooLarge => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::PayloadTooLarge => error::Message::new(self.to_string())
				.detail("limit", MAX_REQUEST_SIZE)
				.into_vec(),
			Self::MalformedForm(..) => error::Message::new(self.to_string()).into_vec(),
		}
	}
}
