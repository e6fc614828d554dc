use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
	bson::{doc, oid::ObjectId, Document},
	options::{FindOneAndUpdateOptions, ReturnDocument},
	Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::{Error, PostStore};
use crate::model::{timestamp, Post};

pub const DEFAULT_DATABASE: &str = "postfeed";
pub const COLLECTION: &str = "posts";

/// A post as persisted in MongoDB, keyed by a native [`ObjectId`].
///
/// Timestamps are stored as fixed-width strings, so comparing them as strings
/// compares them in time.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
	#[serde(rename = "_id")]
	id: ObjectId,
	text: String,
	author_id: String,
	#[serde(serialize_with = "timestamp::serialize")]
	created_at: DateTime<Utc>,
	#[serde(serialize_with = "timestamp::serialize")]
	last_modified_at: DateTime<Utc>,
}

impl From<PostDocument> for Post {
	fn from(document: PostDocument) -> Self {
		Self {
			id: document.id.to_hex(),
			text: document.text,
			author_id: document.author_id,
			created_at: document.created_at,
			last_modified_at: document.last_modified_at,
		}
	}
}

/// A post store backed by a MongoDB collection.
///
/// The store keeps no mutable state of its own. Consistency relies on
/// MongoDB's atomic single-document operations.
#[derive(Debug, Clone)]
pub struct MongoStore {
	posts: Collection<PostDocument>,
}

impl MongoStore {
	/// Connects to MongoDB and makes sure the author index exists.
	///
	/// The database is `database` if given, otherwise the one named in the
	/// connection string, otherwise [`DEFAULT_DATABASE`].
	pub async fn connect(url: &str, database: Option<&str>) -> Result<Self, Error> {
		let client = Client::with_uri_str(url).await?;
		let database = match database {
			Some(name) => client.database(name),
			None => client
				.default_database()
				.unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
		};

		let posts = database.collection::<PostDocument>(COLLECTION);
		posts
			.create_index(
				IndexModel::builder().keys(doc! { "authorId": 1 }).build(),
				None,
			)
			.await?;

		tracing::info!(database = %database.name(), "connected to mongodb");

		Ok(Self { posts })
	}
}

/// Ids that are not valid object ids cannot name any stored post.
fn parse_id(id: &str) -> Result<ObjectId, Error> {
	ObjectId::parse_str(id).map_err(|_| Error::NotFound(id.to_owned()))
}

/// Replaces the text and moves `lastModifiedAt` to `now`, unless it is
/// already later, so a writer with a lagging clock never moves it backwards.
fn patch_update(text: String, now: &DateTime<Utc>) -> Document {
	doc! {
		"$set": { "text": text },
		"$max": { "lastModifiedAt": timestamp::format(now) },
	}
}

#[axum::async_trait]
impl PostStore for MongoStore {
	async fn create(&self, text: String, author_id: &str) -> Result<Post, Error> {
		let now = Utc::now();
		let document = PostDocument {
			id: ObjectId::new(),
			text,
			author_id: author_id.to_owned(),
			created_at: now,
			last_modified_at: now,
		};

		self.posts.insert_one(&document, None).await?;
		tracing::debug!(post_id = %document.id, "stored post in mongodb");

		Ok(document.into())
	}

	async fn get_by_id(&self, id: &str) -> Result<Post, Error> {
		let object_id = parse_id(id)?;

		self.posts
			.find_one(doc! { "_id": object_id }, None)
			.await?
			.map(Post::from)
			.ok_or_else(|| Error::NotFound(id.to_owned()))
	}

	async fn patch_by_id(&self, id: &str, text: String, requester: &str) -> Result<Post, Error> {
		let object_id = parse_id(id)?;

		let options = FindOneAndUpdateOptions::builder()
			.return_document(ReturnDocument::After)
			.build();

		let updated = self
			.posts
			.find_one_and_update(
				doc! { "_id": object_id, "authorId": requester },
				patch_update(text, &Utc::now()),
				options,
			)
			.await?;

		if let Some(document) = updated {
			tracing::debug!(post_id = %id, "patched post in mongodb");
			return Ok(document.into());
		}

		// Nothing was written; only decide which error to report.
		let exists = self
			.posts
			.count_documents(doc! { "_id": object_id }, None)
			.await?
			> 0;

		Err(if exists {
			Error::Forbidden(id.to_owned())
		} else {
			Error::NotFound(id.to_owned())
		})
	}

	async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, Error> {
		let documents = self
			.posts
			.find(doc! { "authorId": author_id }, None)
			.await?
			.try_collect::<Vec<_>>()
			.await?;

		Ok(documents.into_iter().map(Post::from).collect())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	async fn store() -> MongoStore {
		let url = std::env::var("MONGO_URL").expect("MONGO_URL must be set");

		MongoStore::connect(&url, Some("postfeed_test"))
			.await
			.expect("failed to connect to mongodb")
	}

	#[test]
	fn test_document_converts_to_post() {
		let id = ObjectId::new();
		let now = Utc::now();

		let post = Post::from(PostDocument {
			id,
			text: "hello".into(),
			author_id: "abc".into(),
			created_at: now,
			last_modified_at: now,
		});

		assert_eq!(post.id, id.to_hex());
		assert_eq!(post.id.len(), 24);
		assert_eq!(post.created_at, post.last_modified_at);
	}

	#[test]
	fn test_document_stores_fixed_width_timestamps() {
		let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:13Z")
			.unwrap()
			.with_timezone(&Utc);

		let document = mongodb::bson::to_document(&PostDocument {
			id: ObjectId::new(),
			text: "hello".into(),
			author_id: "abc".into(),
			created_at: now,
			last_modified_at: now,
		})
		.unwrap();

		assert_eq!(
			document.get_str("createdAt").unwrap(),
			"2024-05-01T12:00:13.000000000Z"
		);
		assert_eq!(
			document.get_str("lastModifiedAt").unwrap(),
			"2024-05-01T12:00:13.000000000Z"
		);
	}

	#[test]
	fn test_patch_never_moves_modification_time_back() {
		let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:13.5Z")
			.unwrap()
			.with_timezone(&Utc);

		assert_eq!(
			patch_update("edited".into(), &now),
			doc! {
				"$set": { "text": "edited" },
				"$max": { "lastModifiedAt": "2024-05-01T12:00:13.500000000Z" },
			}
		);
	}

	#[test]
	fn test_malformed_id_is_not_found() {
		assert!(matches!(parse_id("not-an-object-id"), Err(Error::NotFound(..))));
	}

	#[tokio::test]
	#[ignore = "requires a running MongoDB at MONGO_URL"]
	async fn test_create_get_patch() {
		let store = store().await;

		let created = store.create("hello".into(), "abc").await.unwrap();
		assert_eq!(store.get_by_id(&created.id).await.unwrap().text, "hello");

		let result = store
			.patch_by_id(&created.id, "nope".into(), "def")
			.await;
		assert!(matches!(result, Err(Error::Forbidden(..))));

		let patched = store
			.patch_by_id(&created.id, "edited".into(), "abc")
			.await
			.unwrap();
		assert_eq!(patched.text, "edited");
		assert!(patched.last_modified_at >= created.created_at);

		let again = store
			.patch_by_id(&created.id, "edited".into(), "abc")
			.await
			.unwrap();
		assert!(again.last_modified_at >= patched.last_modified_at);

		let missing = ObjectId::new().to_hex();
		let result = store.patch_by_id(&missing, "x".into(), "abc").await;
		assert!(matches!(result, Err(Error::NotFound(..))));
	}

	#[tokio::test]
	#[ignore = "requires a running MongoDB at MONGO_URL"]
	async fn test_list_by_author() {
		let store = store().await;
		let author = format!("{:x}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

		store.create("one".into(), &author).await.unwrap();
		store.create("two".into(), &author).await.unwrap();

		assert_eq!(store.list_by_author(&author).await.unwrap().len(), 2);
	}
}
