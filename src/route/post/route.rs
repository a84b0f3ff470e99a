use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	model::search,
	openapi::tag,
	store::Store,
};

use super::{model, Error, RouteError};

/// Get all posts
/// Returns every post matching the optional keyword, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(store): State<Store>,
	Query(input): Query<model::SearchInput>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let posts = store.load().await;

	Ok(Json(search(&posts, &input.q).cloned().collect()))
}

/// Get single post
/// Returns a single post by its id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(store): State<Store>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store
		.load()
		.await
		.into_iter()
		.find(|post| post.id == path.id);

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}
