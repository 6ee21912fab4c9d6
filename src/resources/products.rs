//! Product endpoints.
//!
//! Products are addressable two ways: by UUID (`products-uuid`) and by
//! identifier/SKU (`products`). Listing goes through the UUID endpoint;
//! search can either ride the list query parameters or POST the criteria
//! to the dedicated search endpoint.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::hydrate;
use crate::client::AkeneoClient;
use crate::errors::{Error, Result};
use crate::models::Product;
use crate::pagination::PaginatedResponse;
use crate::search::SearchBuilder;

pub struct ProductsApi<'a> {
    client: &'a AkeneoClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a AkeneoClient) -> Self {
        Self { client }
    }

    /// Fetch one product by UUID.
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Product> {
        let value = self
            .client
            .get(&format!("api/rest/v1/products-uuid/{uuid}"), None)
            .await?;
        hydrate(value)
    }

    /// Fetch one product by identifier (SKU).
    pub async fn get(&self, identifier: &str) -> Result<Product> {
        let value = self
            .client
            .get(&format!("api/rest/v1/products/{identifier}"), None)
            .await?;
        hydrate(value)
    }

    /// List products, with the search criteria and pagination carried as
    /// query parameters.
    pub async fn list(&self, search: &SearchBuilder) -> Result<PaginatedResponse<Product>> {
        let params = search.build_search_params();
        let envelope = self
            .client
            .get("api/rest/v1/products-uuid", Some(&params))
            .await?;
        PaginatedResponse::from_envelope(envelope)
    }

    /// Search products by POSTing the criteria as a native nested body.
    pub async fn search(&self, search: &SearchBuilder) -> Result<Vec<Product>> {
        let body = search_body(search)?;
        let envelope = self
            .client
            .post("api/rest/v1/products-uuid/search", &Value::Object(body))
            .await?
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "search returned an empty body".to_string(),
            })?;
        let items = envelope
            .pointer("/_embedded/items")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "search response has no `_embedded.items`".to_string(),
            })?;
        items.iter().cloned().map(hydrate).collect()
    }

    /// Create a product through the UUID endpoint.
    pub async fn create(&self, product: &Product) -> Result<()> {
        let body = serde_json::to_value(product)?;
        self.client.post("api/rest/v1/products-uuid", &body).await?;
        Ok(())
    }

    /// Partially update a product by UUID. PATCH usually answers with an
    /// empty body, in which case the updated product is re-fetched.
    pub async fn update_by_uuid(&self, uuid: Uuid, data: &Value) -> Result<Product> {
        let response = self
            .client
            .patch(&format!("api/rest/v1/products-uuid/{uuid}"), data)
            .await?;
        match response {
            Some(value) => hydrate(value),
            None => self.get_by_uuid(uuid).await,
        }
    }

    /// Partially update a product by identifier.
    pub async fn update(&self, identifier: &str, data: &Value) -> Result<Product> {
        let response = self
            .client
            .patch(&format!("api/rest/v1/products/{identifier}"), data)
            .await?;
        match response {
            Some(value) => hydrate(value),
            None => self.get(identifier).await,
        }
    }

    /// Delete a product by UUID.
    pub async fn delete_by_uuid(&self, uuid: Uuid) -> Result<()> {
        self.client
            .delete(&format!("api/rest/v1/products-uuid/{uuid}"))
            .await
    }

    /// Delete a product by identifier.
    pub async fn delete(&self, identifier: &str) -> Result<()> {
        self.client
            .delete(&format!("api/rest/v1/products/{identifier}"))
            .await
    }

    /// Update several products in one call; returns one status object per
    /// submitted product.
    pub async fn bulk_update(&self, products: &[Value]) -> Result<Vec<Value>> {
        self.client
            .patch_collection("api/rest/v1/products", products)
            .await
    }

    /// Same as [`ProductsApi::bulk_update`], addressed by UUID.
    pub async fn bulk_update_by_uuid(&self, products: &[Value]) -> Result<Vec<Value>> {
        self.client
            .patch_collection("api/rest/v1/products-uuid", products)
            .await
    }
}

/// POST-body shape for the search endpoint: the criteria as a nested
/// structure plus any pagination fields that were set.
fn search_body(search: &SearchBuilder) -> Result<Map<String, Value>> {
    let mut body = Map::new();
    let criteria = search.build_search_criteria();
    if !criteria.is_empty() {
        body.insert("search".to_string(), serde_json::to_value(&criteria)?);
    }
    let params = search.build_search_params();
    if let Some(page) = params.page {
        body.insert("page".to_string(), page.into());
    }
    if let Some(limit) = params.limit {
        body.insert("limit".to_string(), limit.into());
    }
    if let Some(with_count) = params.with_count {
        body.insert("with_count".to_string(), with_count.into());
    }
    Ok(body)
}
