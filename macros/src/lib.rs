mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the annotated function with the suffix `_docs`.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two request body structs next to the model: `CreateXInput` and `UpdateXInput`.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are left out of both.
/// The remaining fields are copied verbatim into `CreateXInput` and wrapped in `Option`
/// in `UpdateXInput`, so that an absent field leaves the stored value unchanged.
///
/// With `#[model(required_update)]`, `UpdateXInput` keeps the fields required instead.
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
