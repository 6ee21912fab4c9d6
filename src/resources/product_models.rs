//! Product model endpoints.

use serde_json::Value;

use super::hydrate;
use crate::client::AkeneoClient;
use crate::errors::Result;
use crate::models::ProductModel;
use crate::pagination::PaginatedResponse;
use crate::search::SearchBuilder;

pub struct ProductModelsApi<'a> {
    client: &'a AkeneoClient,
}

impl<'a> ProductModelsApi<'a> {
    pub(crate) fn new(client: &'a AkeneoClient) -> Self {
        Self { client }
    }

    /// Fetch one product model by code.
    pub async fn get(&self, code: &str) -> Result<ProductModel> {
        let value = self
            .client
            .get(&format!("api/rest/v1/product-models/{code}"), None)
            .await?;
        hydrate(value)
    }

    /// List product models; search criteria and pagination travel as query
    /// parameters.
    pub async fn list(&self, search: &SearchBuilder) -> Result<PaginatedResponse<ProductModel>> {
        let params = search.build_search_params();
        let envelope = self
            .client
            .get("api/rest/v1/product-models", Some(&params))
            .await?;
        PaginatedResponse::from_envelope(envelope)
    }

    /// Create a product model.
    pub async fn create(&self, model: &ProductModel) -> Result<()> {
        let body = serde_json::to_value(model)?;
        self.client.post("api/rest/v1/product-models", &body).await?;
        Ok(())
    }

    /// Partially update a product model; re-fetches when the API answers
    /// PATCH with an empty body.
    pub async fn update(&self, code: &str, data: &Value) -> Result<ProductModel> {
        let response = self
            .client
            .patch(&format!("api/rest/v1/product-models/{code}"), data)
            .await?;
        match response {
            Some(value) => hydrate(value),
            None => self.get(code).await,
        }
    }

    /// Delete a product model by code.
    pub async fn delete(&self, code: &str) -> Result<()> {
        self.client
            .delete(&format!("api/rest/v1/product-models/{code}"))
            .await
    }

    /// Update several product models in one call.
    pub async fn bulk_update(&self, models: &[Value]) -> Result<Vec<Value>> {
        self.client
            .patch_collection("api/rest/v1/product-models", models)
            .await
    }
}
