//! Thin per-entity wrappers over the REST endpoints.
//!
//! Each wrapper borrows the [`AkeneoClient`](crate::client::AkeneoClient)
//! and maps one entity's documented paths; compiled search criteria come
//! from [`crate::search::SearchBuilder`].

pub mod categories;
pub mod product_models;
pub mod products;

pub use categories::CategoriesApi;
pub use product_models::ProductModelsApi;
pub use products::ProductsApi;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::Result;

/// Hydrate one raw item into a typed entity.
pub(crate) fn hydrate<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
