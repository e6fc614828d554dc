use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::author::AUTHOR_HEADER, extract::Json};

pub const SECURITY_SCHEME_AUTHOR: &str = "Author";

pub mod tag {
	pub const POST: &str = "Post";
	pub const USER: &str = "User";
	pub const MAINTENANCE: &str = "Maintenance";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Postfeed")
		.summary("A minimal social feed")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Creating, reading and editing posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("Paginated feeds of a user's posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::MAINTENANCE.into(),
			description: Some("Liveness checks".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_AUTHOR,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: AUTHOR_HEADER.into(),
				description: Some("The lowercase hex id of the requesting author".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: error::Message::new("unknown_post")
					.detail("post", "JbZkD8gqLqH1H0Yb")
					.into_vec(),
			})
		})
}
