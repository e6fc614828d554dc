use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, model::PostId, page, store, AppState};

pub mod model;
pub mod route;

/// An error that can occur while handling posts and feeds.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information. Storage errors are logged instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(PostId),
	#[error("post {0} belongs to another author")]
	NotAuthor(PostId),
	#[error("page size {0} is out of range")]
	InvalidPageSize(i64),
	#[error("unknown page token {0}")]
	InvalidPageToken(String),
	#[error("storage error: {0}")]
	Storage(#[source] store::Error),
}

pub type RouteError = error::RouteError<Error>;

impl From<store::Error> for Error {
	fn from(error: store::Error) -> Self {
		match error {
			store::Error::NotFound(id) => Self::UnknownPost(id),
			store::Error::Forbidden(id) => Self::NotAuthor(id),
			error @ store::Error::Backend(..) => Self::Storage(error),
		}
	}
}

impl From<page::Error> for Error {
	fn from(error: page::Error) -> Self {
		match error {
			page::Error::InvalidPageSize(size) => Self::InvalidPageSize(size),
			page::Error::InvalidPageToken(token) => Self::InvalidPageToken(token),
		}
	}
}

impl From<store::Error> for RouteError {
	fn from(error: store::Error) -> Self {
		Error::from(error).into()
	}
}

impl From<page::Error> for RouteError {
	fn from(error: page::Error) -> Self {
		Error::from(error).into()
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", post_with(create_post, create_post_docs))
		.api_route(
			"/:post_id",
			get_with(get_post, get_post_docs)
				.patch_with(update_post, update_post_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::FORBIDDEN,
			Self::InvalidPageSize(..) | Self::InvalidPageToken(..) => StatusCode::BAD_REQUEST,
			Self::Storage(..) => StatusCode::SERVICE_UNAVAILABLE,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.detail("post", post.as_str())
				.into_vec(),
			Self::NotAuthor(post) => error::Message::new("not_author")
				.detail("post", post.as_str())
				.into_vec(),
			Self::InvalidPageSize(size) => error::Message::new("invalid_page_size")
				.field("size")
				.detail("size", *size)
				.into_vec(),
			Self::InvalidPageToken(token) => error::Message::new("invalid_page_token")
				.field("page")
				.detail("page", token.as_str())
				.into_vec(),
			Self::Storage(..) => error::Message::new("storage_unavailable").into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_create_and_get_post() {
		let app = app();

		let response = app
			.post("/api/v1/posts")
			.add_header(author_header(), author("abc123"))
			.json(&json!({ "text": "hello world" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let created = response.json::<Value>();
		assert_eq!(created["text"], "hello world");
		assert_eq!(created["authorId"], "abc123");
		assert_eq!(created["createdAt"], created["lastModifiedAt"]);
		assert_eq!(created["createdAt"].as_str().unwrap().len(), 30);

		let id = created["id"].as_str().unwrap();
		let response = app.get(&format!("/api/v1/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>(), created);
	}

	#[tokio::test]
	async fn test_create_requires_author() {
		let app = app();

		let response = app
			.post("/api/v1/posts")
			.json(&json!({ "text": "hello" }))
			.await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(response.json::<Value>()["success"], false);

		let response = app
			.post("/api/v1/posts")
			.add_header(author_header(), author("NOT-HEX"))
			.json(&json!({ "text": "hello" }))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[tokio::test]
	async fn test_create_rejects_malformed_body() {
		let app = app();

		let response = app
			.post("/api/v1/posts")
			.add_header(author_header(), author("abc"))
			.json(&json!({ "message": "hello" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post("/api/v1/posts")
			.add_header(author_header(), author("abc"))
			.text("not json")
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[tokio::test]
	async fn test_get_unknown_post() {
		let app = app();

		let response = app.get("/api/v1/posts/missing").await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<Value>()["errors"][0]["content"],
			"unknown_post"
		);
	}

	#[tokio::test]
	async fn test_patch_post() {
		let app = app();
		let created = create(&app, "abc", "before").await;
		let id = created["id"].as_str().unwrap();

		let response = app
			.patch(&format!("/api/v1/posts/{id}"))
			.add_header(author_header(), author("abc"))
			.json(&json!({ "text": "after" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let patched = response.json::<Value>();
		assert_eq!(patched["id"], created["id"]);
		assert_eq!(patched["text"], "after");
		assert_eq!(patched["createdAt"], created["createdAt"]);

		let fetched = app.get(&format!("/api/v1/posts/{id}")).await;
		assert_eq!(fetched.json::<Value>()["text"], "after");
	}

	#[tokio::test]
	async fn test_patch_requires_text() {
		let app = app();
		let created = create(&app, "abc", "unchanged").await;
		let id = created["id"].as_str().unwrap();

		for body in [json!({}), json!({ "txt": "x" }), json!({ "text": null })] {
			let response = app
				.patch(&format!("/api/v1/posts/{id}"))
				.add_header(author_header(), author("abc"))
				.json(&body)
				.await;

			assert_eq!(response.status_code(), 400);
			assert_eq!(response.json::<Value>()["success"], false);
		}

		let fetched = app.get(&format!("/api/v1/posts/{id}")).await;
		assert_eq!(fetched.json::<Value>(), created);
	}

	#[tokio::test]
	async fn test_patch_by_other_author() {
		let app = app();
		let created = create(&app, "abc", "mine").await;
		let id = created["id"].as_str().unwrap();

		let response = app
			.patch(&format!("/api/v1/posts/{id}"))
			.add_header(author_header(), author("def"))
			.json(&json!({ "text": "theirs" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let fetched = app.get(&format!("/api/v1/posts/{id}")).await;
		assert_eq!(fetched.json::<Value>(), created);
	}

	#[tokio::test]
	async fn test_patch_errors() {
		let app = app();

		let response = app
			.patch("/api/v1/posts/missing")
			.add_header(author_header(), author("abc"))
			.json(&json!({ "text": "x" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.patch("/api/v1/posts/missing")
			.json(&json!({ "text": "x" }))
			.await;

		assert_eq!(response.status_code(), 401);
	}
}
