pub mod docs;
pub mod maintenance;
pub mod model;
pub mod post;
pub mod user;
