use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(u64),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_posts, get_posts_docs))
		.api_route("/:id", get_with(get_post, get_post_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());
		let Self::UnknownPost(post) = self;

		message.detail("post", post).into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::{model::NewPost, test::*};

	#[tokio::test]
	async fn test_list_posts_newest_first() {
		let app = app();

		for (author, body) in [("alice", "first"), ("bob", "second"), ("carol", "Third FIRST")] {
			app.store
				.append(NewPost::new(author, body, None))
				.await
				.unwrap();
		}

		let response = app.server.get("/api/posts").await;

		assert_eq!(response.status_code(), 200);

		let posts = response.json::<serde_json::Value>();
		let ids = posts
			.as_array()
			.unwrap()
			.iter()
			.map(|post| post["id"].as_u64().unwrap())
			.collect::<Vec<_>>();

		assert_eq!(ids, vec![3, 2, 1]);
		assert_eq!(posts[0]["name"], "carol");
		assert_eq!(posts[0]["ctime"], FIXED_TIMESTAMP);

		let response = app.server.get("/api/posts").add_query_param("q", "first").await;
		let ids = response
			.json::<serde_json::Value>()
			.as_array()
			.unwrap()
			.iter()
			.map(|post| post["id"].as_u64().unwrap())
			.collect::<Vec<_>>();

		assert_eq!(ids, vec![3, 1]);
	}

	#[tokio::test]
	async fn test_long_query_is_rejected() {
		let app = app();

		let response = app
			.server
			.get("/api/posts")
			.add_query_param("q", "x".repeat(300))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<serde_json::Value>()["errors"][0]["field"], "q");
	}

	#[tokio::test]
	async fn test_get_single_post() {
		let app = app();

		app.store
			.append(NewPost::new("alice", "hello", None))
			.await
			.unwrap();

		let response = app.server.get("/api/posts/1").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["body"], "hello");

		let response = app.server.get("/api/posts/2").await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({
				"success": false,
				"errors": [{ "content": "unknown post 2", "details": { "post": 2 } }],
			})
		);

		let response = app.server.get("/api/posts/abc").await;

		assert_eq!(response.status_code(), 400);
	}
}
