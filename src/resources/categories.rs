//! Category endpoints.

use serde_json::Value;

use super::hydrate;
use crate::client::AkeneoClient;
use crate::errors::Result;
use crate::models::Category;
use crate::pagination::PaginatedResponse;
use crate::search::SearchBuilder;

pub struct CategoriesApi<'a> {
    client: &'a AkeneoClient,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(client: &'a AkeneoClient) -> Self {
        Self { client }
    }

    /// Fetch one category by code.
    pub async fn get(&self, code: &str) -> Result<Category> {
        let value = self
            .client
            .get(&format!("api/rest/v1/categories/{code}"), None)
            .await?;
        hydrate(value)
    }

    /// List categories; criteria and pagination travel as query parameters.
    pub async fn list(&self, search: &SearchBuilder) -> Result<PaginatedResponse<Category>> {
        let params = search.build_search_params();
        let envelope = self
            .client
            .get("api/rest/v1/categories", Some(&params))
            .await?;
        PaginatedResponse::from_envelope(envelope)
    }

    /// Create a category.
    pub async fn create(&self, category: &Category) -> Result<()> {
        let body = serde_json::to_value(category)?;
        self.client.post("api/rest/v1/categories", &body).await?;
        Ok(())
    }

    /// Partially update a category; re-fetches when the API answers PATCH
    /// with an empty body.
    pub async fn update(&self, code: &str, data: &Value) -> Result<Category> {
        let response = self
            .client
            .patch(&format!("api/rest/v1/categories/{code}"), data)
            .await?;
        match response {
            Some(value) => hydrate(value),
            None => self.get(code).await,
        }
    }

    /// Update several categories in one call.
    pub async fn bulk_update(&self, categories: &[Value]) -> Result<Vec<Value>> {
        self.client
            .patch_collection("api/rest/v1/categories", categories)
            .await
    }
}
