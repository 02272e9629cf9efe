//! Fluent transformation of pages

use super::transformers::{
    CursorUrlTransformer, ResultTransformer, SimpleUrlTransformer, SizeAwareUrlTransformer,
};
use super::types::{CursorUrlPage, UrlPage};
use crate::error::Result;
use crate::pagination::{CursorPage, Page, PagedResult, SizedPage};
use crate::types::CursorKey;

/// Apply arbitrary transformations to a page
pub trait TransformExt: Sized {
    /// Apply a closure to the whole page
    fn transform<U>(self, f: impl FnOnce(Self) -> U) -> U {
        f(self)
    }

    /// Apply a configured transformer
    fn transform_with<X: ResultTransformer<Self>>(self, transformer: &X) -> X::Output {
        transformer.transform(self)
    }
}

impl<T> TransformExt for Page<T> {}
impl<T> TransformExt for SizedPage<T> {}
impl<T, K> TransformExt for CursorPage<T, K> {}

/// Decorate page-number results with simple links
pub trait PagedUrlExt<T>: PagedResult<T> + Sized {
    /// Add links that do not rely on the total count
    fn with_simple_url(self, base_url: &str) -> Result<UrlPage<T>>;
}

impl<T> PagedUrlExt<T> for Page<T> {
    fn with_simple_url(self, base_url: &str) -> Result<UrlPage<T>> {
        Ok(SimpleUrlTransformer::new(base_url)?.transform(self))
    }
}

impl<T> PagedUrlExt<T> for SizedPage<T> {
    fn with_simple_url(self, base_url: &str) -> Result<UrlPage<T>> {
        Ok(SimpleUrlTransformer::new(base_url)?.transform(self))
    }
}

/// Decorate a result with the richest links its metadata supports
pub trait UrlExt: Sized {
    /// Decorated page
    type Output;

    /// Add navigation links built on `base_url`
    fn with_url(self, base_url: &str) -> Result<Self::Output>;
}

impl<T> UrlExt for SizedPage<T> {
    type Output = UrlPage<T>;

    fn with_url(self, base_url: &str) -> Result<UrlPage<T>> {
        Ok(SizeAwareUrlTransformer::new(base_url)?.transform(self))
    }
}

impl<T, K: CursorKey> UrlExt for CursorPage<T, K> {
    type Output = CursorUrlPage<T, K>;

    fn with_url(self, base_url: &str) -> Result<CursorUrlPage<T, K>> {
        Ok(CursorUrlTransformer::new(base_url)?.transform(self))
    }
}
