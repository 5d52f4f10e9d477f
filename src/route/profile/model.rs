use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

pub use crate::identity::Author;

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ProfileInput {
	/// The identity provider's id of the user.
	pub id: String,
}
