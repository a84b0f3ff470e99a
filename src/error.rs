use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	extract::rejection,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{extract::Json, store};

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A human-readable description of the error.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional machine-readable context.
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

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
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
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn into_errors(self) -> Vec<Message<'static>>;
}

/// Errors shared by every route.
///
/// The Display output is only logged, never sent to the client, so it may
/// contain internal details.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) => StatusCode::BAD_REQUEST,
			Self::Query(error) => error.status(),
			Self::Path(error) => error.status(),
			Self::Store(error) => error.status(),
		}
	}

	pub fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					let field = field.to_string();

					errors.iter().map(move |error| {
						let content = error
							.message
							.clone()
							.unwrap_or_else(|| error.code.clone());

						Message::new(content.into_owned()).field(field.clone())
					})
				})
				.collect(),
			Self::Query(error) => Message::new(error.body_text()).into_vec(),
			Self::Path(error) => Message::new(error.body_text()).into_vec(),
			Self::Store(store::Error::UnsupportedImageType(extension)) => {
				Message::new("unsupported image type, expected one of png/jpg/jpeg/gif/webp")
					.field("image")
					.detail("extension", extension)
					.into_vec()
			}
			Self::Store(..) => Message::new("internal server error").into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		respond(status, self.into_errors())
	}
}

/// An error returned from a route, either shared or specific to that route.
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T> From<store::Error> for RouteError<T> {
	fn from(error: store::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(error = %error, "request failed");
				}

				respond(status, error.into_errors())
			}
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = Self;
}

fn respond(status: StatusCode, errors: Vec<Message<'static>>) -> Response {
	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}
