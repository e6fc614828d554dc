use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	page,
	route::post::RouteError,
	store::Store,
};

use super::model;

/// Get user posts
/// Returns a page of the user's posts, newest first. Pass `nextPage` of one page as
/// `page` to get the next one.
#[route(tag = tag::USER)]
pub async fn get_user_posts(
	State(store): State<Store>,
	Path(path): Path<model::UserIdInput>,
	Query(input): Query<model::PageInput>,
) -> Result<Json<model::Page>, RouteError> {
	let posts = store.list_by_author(&path.user_id).await?;

	Ok(Json(page::paginate(posts, input.page.as_deref(), input.size)?))
}
