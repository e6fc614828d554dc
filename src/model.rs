use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Timestamps are written as RFC 3339 in UTC with exactly nine fractional
/// digits, so every timestamp has the same length and sorts chronologically
/// as a string.
pub mod timestamp {
	use chrono::{DateTime, SecondsFormat, Utc};
	use serde::Serializer;

	pub fn format(time: &DateTime<Utc>) -> String {
		time.to_rfc3339_opts(SecondsFormat::Nanos, true)
	}

	pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&format(time))
	}
}

/// Opaque post identifier. Only comparable within the store that issued it.
pub type PostId = String;

/// A single post, created by an author.
///
/// The `id`, `author_id` and timestamps are assigned by the store and are
/// never read from a request body.
#[model(required_update)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: PostId,
	/// The text of the post. Any string is accepted, including an empty one.
	pub text: String,
	/// The author that created the post, as a lowercase hex token.
	#[serde(skip_deserializing)]
	pub author_id: String,
	/// The creation time of the post.
	#[serde(skip_deserializing, serialize_with = "timestamp::serialize")]
	pub created_at: DateTime<Utc>,
	/// The time of the last edit. Equal to `createdAt` until the post is patched.
	#[serde(skip_deserializing, serialize_with = "timestamp::serialize")]
	pub last_modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
	use chrono::{Duration, TimeZone};

	use super::*;

	fn post(created_at: DateTime<Utc>) -> Post {
		Post {
			id: "JbZkD8gqLqH1H0Yb".into(),
			text: "hello".into(),
			author_id: "abc".into(),
			created_at,
			last_modified_at: created_at + Duration::milliseconds(1),
		}
	}

	#[test]
	fn test_timestamps_have_a_fixed_width() {
		let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 13).unwrap();
		let precise = whole + Duration::nanoseconds(123_456_789);

		assert_eq!(timestamp::format(&whole), "2024-05-01T12:00:13.000000000Z");
		assert_eq!(timestamp::format(&precise), "2024-05-01T12:00:13.123456789Z");
		assert!(timestamp::format(&whole) < timestamp::format(&precise));
	}

	#[test]
	fn test_post_json_shape() {
		let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 13).unwrap();
		let value = serde_json::to_value(post(created_at)).unwrap();

		assert_eq!(
			value,
			serde_json::json!({
				"id": "JbZkD8gqLqH1H0Yb",
				"text": "hello",
				"authorId": "abc",
				"createdAt": "2024-05-01T12:00:13.000000000Z",
				"lastModifiedAt": "2024-05-01T12:00:13.001000000Z",
			})
		);
	}

	#[test]
	fn test_update_input_requires_text() {
		assert!(serde_json::from_str::<UpdatePostInput>("{}").is_err());
		assert!(serde_json::from_str::<UpdatePostInput>(r#"{"txt":"x"}"#).is_err());
		assert_eq!(
			serde_json::from_str::<UpdatePostInput>(r#"{"text":"x"}"#).unwrap().text,
			"x"
		);
	}
}
