pub use crate::{
	page::Page,
	route::model::{PageInput, UserIdInput},
};
