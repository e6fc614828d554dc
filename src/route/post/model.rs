pub use crate::{
	model::{CreatePostInput, Post, UpdatePostInput},
	route::model::PostIdInput,
};
