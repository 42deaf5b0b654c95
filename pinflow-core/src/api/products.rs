// File: pinflow-core/src/api/products.rs

use serde::Deserialize;

use pinflow_common::Error;
use pinflow_common::models::{Ack, PainPointsRequest, Product, ProductDraft};

use super::ApiClient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PainPointsBody {
    pain_points: String,
}

impl ApiClient {
    pub async fn products(&self) -> Result<Vec<Product>, Error> {
        self.get_json("products").await
    }

    pub async fn product(&self, id: &str) -> Result<Product, Error> {
        self.get_json(&format!("products/{id}")).await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, Error> {
        self.post_json("products", draft).await
    }

    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<Product, Error> {
        self.put_json(&format!("products/{id}"), draft).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("products/{id}")).await
    }

    pub async fn duplicate_product(&self, id: &str) -> Result<Product, Error> {
        self.post_empty(&format!("products/{id}/duplicate")).await
    }

    /// Ask the backend to generate (and queue) one pin for the product.
    pub async fn generate_pin(&self, id: &str) -> Result<Ack, Error> {
        self.post_empty(&format!("products/{id}/generate-pin")).await
    }

    /// Backend-side copy assist: pain-point text for a product title.
    pub async fn generate_pain_points(&self, req: &PainPointsRequest) -> Result<String, Error> {
        let body: PainPointsBody = self.post_json("products/generate-pain-points", req).await?;
        Ok(body.pain_points)
    }
}
