//! Shared helpers for route tests.

use std::{sync::Arc, time::Duration};

pub use axum::http::{HeaderName, HeaderValue};
pub use axum_test::TestServer;
pub use serde_json::{json, Value};

use crate::{extract::author::AUTHOR_HEADER, store::MemoryStore, State};

/// Builds a test server over a fresh in-memory store.
pub fn app() -> TestServer {
	let state = State {
		store: Arc::new(MemoryStore::default()),
	};

	TestServer::new(crate::app(state, Duration::from_secs(5))).unwrap()
}

pub fn author_header() -> HeaderName {
	HeaderName::from_static("system-design-user-id")
}

pub fn author(author_id: &str) -> HeaderValue {
	HeaderValue::from_str(author_id).unwrap()
}

/// Creates a post through the API and returns its JSON.
pub async fn create(app: &TestServer, author_id: &str, text: &str) -> Value {
	let response = app
		.post("/api/v1/posts")
		.add_header(author_header(), author(author_id))
		.json(&json!({ "text": text }))
		.await;

	assert_eq!(response.status_code(), 200);
	response.json::<Value>()
}

#[test]
fn test_author_header_name_matches() {
	assert!(author_header().as_str().eq_ignore_ascii_case(AUTHOR_HEADER));
}
