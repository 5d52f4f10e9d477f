pub mod docs;
pub mod post;
pub mod profile;
