mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a documentation function for the route, named after the annotated function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary, the rest its description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates a `CreateXInput` struct for the model with `#[model(create)]`.
///
/// Fields with `#[serde(skip_deserializing)]` or `#[serde(skip)]` are left out, and all
/// other fields are included verbatim (including attributes).
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
