use axum::extract::State;
use macros::route;

use crate::{
	extract::{Author, Json, Path},
	openapi::tag,
	store::Store,
};

use super::{model, RouteError};

/// Create post
/// Creates a new post authored by the requesting author.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(store): State<Store>,
	Author(author_id): Author,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store.create(input.text, &author_id).await?;

	tracing::info!(post_id = %post.id, author_id = %post.author_id, "created post");

	Ok(Json(post))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(store): State<Store>,
	Path(path): Path<model::PostIdInput>,
) -> Result<Json<model::Post>, RouteError> {
	Ok(Json(store.get_by_id(&path.post_id).await?))
}

/// Update post
/// Replaces the text of an existing post. Only the author of the post may update it,
/// and the body must carry the new `text`.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(store): State<Store>,
	Author(author_id): Author,
	Path(path): Path<model::PostIdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = store
		.patch_by_id(&path.post_id, input.text, &author_id)
		.await?;

	tracing::info!(post_id = %post.id, "updated post");

	Ok(Json(post))
}
