use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::page::DEFAULT_PAGE_SIZE;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn default_page_size() -> i64 {
	DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PageInput {
	/// The token of the page to return, taken from `nextPage` of the previous page.
	/// Omit it to get the first page.
	pub page: Option<String>,
	/// The number of posts to return.
	#[validate(range(min = 0, max = 100))]
	#[serde(default = "default_page_size")]
	pub size: i64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostIdInput {
	/// The unique identifier of the post.
	pub post_id: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UserIdInput {
	/// The author whose posts are listed.
	pub user_id: String,
}
