use aide::axum::{routing::get_with, ApiRouter};
use macros::route;

use crate::{openapi::tag, AppState};

pub const GREETING: &str = "Hello from postfeed";

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/ping", get_with(ping, ping_docs))
}

/// Ping
/// Responds with an empty body while the service is up.
#[route(tag = tag::MAINTENANCE)]
pub async fn ping() {}

/// Plain-text greeting served at `/`, outside of the documented API.
pub async fn root() -> &'static str {
	GREETING
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_ping() {
		let app = app();

		let response = app.get("/maintenance/ping").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().is_empty());
	}

	#[tokio::test]
	async fn test_root() {
		let app = app();

		let response = app.get("/").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.text(), super::GREETING);
	}
}
