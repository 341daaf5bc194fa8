//! `/products`.

use super::RestClient;
use crate::error::ApiError;
use crate::providers::ProductApi;
use crate::types::{Product, ProductId};

impl ProductApi for RestClient {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/products/{id}")).await
    }
}
