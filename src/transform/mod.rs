//! Result transformation module
//!
//! Decorates pages with navigation URLs for web responses. Links are built
//! from a base URL, standard parameter names (renamable) and optional static
//! parameters, and query strings are form-url-encoded.

mod extensions;
mod transformers;
mod types;

pub use extensions::{PagedUrlExt, TransformExt, UrlExt};
pub use transformers::{
    CursorUrlTransformer, ResultTransformer, SimpleUrlTransformer, SizeAwareUrlTransformer,
};
pub use types::{
    CursorUrlPage, LinkBuilder, UrlPage, DEFAULT_CURSOR_PARAM, DEFAULT_PAGE_PARAM,
    DEFAULT_PAGE_SIZE_PARAM, TOTAL_ITEMS_PARAM, TOTAL_PAGES_PARAM,
};
