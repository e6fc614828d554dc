use aide::OperationInput;
use axum::{
	extract::FromRequestParts,
	http::{request, StatusCode},
};

use crate::{error, openapi::SECURITY_SCHEME_AUTHOR};

/// Header carrying the identifier of the requesting author.
pub const AUTHOR_HEADER: &str = "System-Design-User-Id";

/// An error that can occur while reading the author header.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("missing author header")]
	MissingAuthorHeader,
	#[error("author header must be a lowercase hex token")]
	InvalidAuthorHeader,
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::UNAUTHORIZED
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		error::Message::new(self.to_string())
			.field(AUTHOR_HEADER)
			.into_vec()
	}
}

/// Checks that the author id is a non-empty lowercase hex token.
pub fn is_valid_author_id(author_id: &str) -> bool {
	!author_id.is_empty() && author_id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

/// The author making the request, taken from the [`AUTHOR_HEADER`] header.
///
/// This is a syntactic check only: any well-formed token is trusted.
///
/// ```rust
/// async fn route(Author(author_id): Author) {
///   println!("{author_id}");
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Author
where
	S: Sync + Send,
{
	type Rejection = error::RouteError<Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let value = parts
			.headers
			.get(AUTHOR_HEADER)
			.ok_or(Error::MissingAuthorHeader)?
			.to_str()
			.map_err(|_| Error::InvalidAuthorHeader)?;

		if !is_valid_author_id(value) {
			return Err(Error::InvalidAuthorHeader.into());
		}

		Ok(Self(value.to_owned()))
	}
}

impl OperationInput for Author {
	/// Adds the author header requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_AUTHOR.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}

#[cfg(test)]
mod test {
	use super::is_valid_author_id;

	#[test]
	fn test_accepts_lowercase_hex() {
		assert!(is_valid_author_id("0123456789abcdef"));
		assert!(is_valid_author_id("a"));
	}

	#[test]
	fn test_rejects_other_tokens() {
		assert!(!is_valid_author_id(""));
		assert!(!is_valid_author_id("ABCDEF"));
		assert!(!is_valid_author_id("abc-123"));
		assert!(!is_valid_author_id("abcg"));
		assert!(!is_valid_author_id("ab cd"));
	}
}
