use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

pub const SPEC_URL: &str = "/docs/private/api.json";

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.api_route(
			"/",
			get_with(
				Scalar::new(SPEC_URL).with_title("Postfeed").axum_handler(),
				|op| op.description("This documentation page."),
			),
		)
		.route("/private/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_openapi_document() {
		let app = app();

		let response = app.get(super::SPEC_URL).await;

		assert_eq!(response.status_code(), 200);

		let api = response.json::<Value>();
		let has_operation = |prefix: &str, method: &str| {
			api["paths"]
				.as_object()
				.unwrap()
				.iter()
				.any(|(path, item)| path.starts_with(prefix) && item[method].is_object())
		};

		assert!(has_operation("/api/v1/posts", "post"));
		assert!(has_operation("/api/v1/posts", "patch"));
		assert!(has_operation("/api/v1/users", "get"));
		assert!(api["components"]["securitySchemes"]["Author"].is_object());
	}
}
