//! Proc macros for searchkit.
//!
//! - [`Filter`] - Generate searchkit field descriptors from struct annotations
//!
//! Use the re-export `searchkit::Filter` rather than depending on this crate
//! directly; the generated code refers to `::searchkit` paths.

mod filter;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `searchkit::Filter` for a search criteria struct.
///
/// Every named field becomes one entry of the filter's shape, in
/// declaration order. Leaf fields are read through `searchkit::FilterValue`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[search("...")]` | Annotation string: operator, columns, alias, params |
/// | `#[search("-")]` or `#[search(skip)]` | Exclude the field |
/// | `#[search("dive")]` or `#[search(flatten)]` | Nested filter record, `T` or `Option<T>` where `T: Filter` |
/// | (none) | `eq` against the snake_case field name |
///
/// # Example
///
/// ```ignore
/// use searchkit::{Between, Filter, NullBool};
///
/// #[derive(Filter)]
/// struct PostSearch {
///     #[search("iContains,column=title|body")]
///     q: String,
///
///     #[search("between,params=type:date delimiter::")]
///     created: String,
///
///     #[search("isNull,column=deleted_at")]
///     deleted: NullBool,
///
///     #[search(flatten)]
///     author: Option<AuthorSearch>,
///
///     #[search(skip)]
///     page: u32,
/// }
///
/// #[derive(Filter)]
/// struct AuthorSearch {
///     #[search("eq,column=id,alias=a")]
///     author_id: Option<i64>,
/// }
/// ```
#[proc_macro_derive(Filter, attributes(search))]
pub fn filter_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    filter::filter_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
