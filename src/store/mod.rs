//! Post storage behind a single capability trait.
//!
//! Two implementations exist: [`MemoryStore`], a process-local map, and
//! [`MongoStore`], backed by a MongoDB collection. One of them is chosen at
//! startup from [`config::Storage`] and shared with every handler as a [`Store`].

pub mod id;
mod memory;
mod mongo;

use std::sync::Arc;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::{
	config,
	model::{Post, PostId},
};

/// The store instance shared with handlers.
pub type Store = Arc<dyn PostStore>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	NotFound(PostId),
	#[error("post {0} belongs to another author")]
	Forbidden(PostId),
	/// A failure of the storage backend. This is the only error worth retrying.
	#[error("storage backend error: {0}")]
	Backend(#[from] mongodb::error::Error),
}

/// The operations every post store supports.
#[axum::async_trait]
pub trait PostStore: Send + Sync {
	/// Stores a new post, assigning its id and timestamps.
	async fn create(&self, text: String, author_id: &str) -> Result<Post, Error>;

	/// Returns the post with the given id.
	async fn get_by_id(&self, id: &str) -> Result<Post, Error>;

	/// Updates a post on behalf of `requester`.
	///
	/// Fails with [`Error::NotFound`] if the post does not exist and with
	/// [`Error::Forbidden`] if `requester` is not its author. The ownership
	/// check and the write happen as a single atomic step. The modification
	/// time never moves backwards.
	async fn patch_by_id(&self, id: &str, text: String, requester: &str) -> Result<Post, Error>;

	/// Returns every post of the author, in no particular order.
	async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, Error>;
}

/// Builds the store selected by the configuration.
pub async fn connect(storage: &config::Storage) -> Result<Store, Error> {
	Ok(match storage {
		config::Storage::InMemory => Arc::new(MemoryStore::default()),
		config::Storage::Mongo { url, database } => {
			Arc::new(MongoStore::connect(url, database.as_deref()).await?)
		}
	})
}
