use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use super::{id, Error, PostStore};
use crate::model::{Post, PostId};

/// A post store kept entirely in process memory.
///
/// A single reader/writer lock guards the whole map: reads share it, while
/// `create` and `patch_by_id` hold it exclusively for their entire
/// check-and-write sequence. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	posts: HashMap<PostId, Post>,
	/// Creation time of the newest post, used to keep creation times strictly increasing.
	last_created_at: Option<DateTime<Utc>>,
}

impl Inner {
	fn next_created_at(&mut self) -> DateTime<Utc> {
		let now = Utc::now();
		let created_at = match self.last_created_at {
			Some(last) if now <= last => last + Duration::nanoseconds(1),
			_ => now,
		};

		self.last_created_at = Some(created_at);
		created_at
	}

	fn unused_id(&self) -> PostId {
		loop {
			let id = id::generate();

			if !self.posts.contains_key(&id) {
				return id;
			}
		}
	}
}

#[axum::async_trait]
impl PostStore for MemoryStore {
	async fn create(&self, text: String, author_id: &str) -> Result<Post, Error> {
		let mut inner = self.inner.write();

		let created_at = inner.next_created_at();
		let post = Post {
			id: inner.unused_id(),
			text,
			author_id: author_id.to_owned(),
			created_at,
			last_modified_at: created_at,
		};

		inner.posts.insert(post.id.clone(), post.clone());
		tracing::debug!(post_id = %post.id, "stored post in memory");

		Ok(post)
	}

	async fn get_by_id(&self, id: &str) -> Result<Post, Error> {
		self.inner
			.read()
			.posts
			.get(id)
			.cloned()
			.ok_or_else(|| Error::NotFound(id.to_owned()))
	}

	async fn patch_by_id(&self, id: &str, text: String, requester: &str) -> Result<Post, Error> {
		let mut inner = self.inner.write();

		let post = inner
			.posts
			.get_mut(id)
			.ok_or_else(|| Error::NotFound(id.to_owned()))?;

		if post.author_id != requester {
			return Err(Error::Forbidden(id.to_owned()));
		}

		post.text = text;

		post.last_modified_at = Utc::now().max(post.last_modified_at);
		tracing::debug!(post_id = %post.id, "patched post in memory");

		Ok(post.clone())
	}

	async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, Error> {
		Ok(self
			.inner
			.read()
			.posts
			.values()
			.filter(|post| post.author_id == author_id)
			.cloned()
			.collect())
	}
}
