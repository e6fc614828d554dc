//! Cursor pagination over a snapshot of an author's posts.
//!
//! Posts are ordered newest first: by creation time descending, then by id
//! descending when two posts share a creation time. A page token is the id of
//! the first post of the page it asks for.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::Serialize;

use crate::model::{Post, PostId};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("page size {0} is outside 0..=100")]
	InvalidPageSize(i64),
	#[error("page token {0} does not match any post")]
	InvalidPageToken(String),
}

/// A single page of posts.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
	/// The posts on this page, newest first.
	pub posts: Vec<Post>,
	/// The token of the next page. Absent on the last page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_page: Option<PostId>,
}

/// Newest-first ordering used for every feed.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
	b.created_at
		.cmp(&a.created_at)
		.then_with(|| b.id.cmp(&a.id))
}

/// Cuts one page out of `posts`.
///
/// An absent or empty `token` asks for the first page. Otherwise the page
/// starts at the post whose id equals `token`, and a token that matches no
/// post is an error.
pub fn paginate(mut posts: Vec<Post>, token: Option<&str>, size: i64) -> Result<Page, Error> {
	if !(0..=MAX_PAGE_SIZE).contains(&size) {
		return Err(Error::InvalidPageSize(size));
	}

	// `size` is within 0..=100
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let size = size as usize;

	posts.sort_unstable_by(newest_first);

	let start = match token.filter(|token| !token.is_empty()) {
		Some(token) => posts
			.iter()
			.position(|post| post.id == token)
			.ok_or_else(|| Error::InvalidPageToken(token.to_owned()))?,
		None => 0,
	};

	let mut page = posts.split_off(start);
	let next_page = page.get(size).map(|post| post.id.clone());
	page.truncate(size);

	Ok(Page {
		posts: page,
		next_page,
	})
}
