//! `/carts`.

use super::RestClient;
use crate::error::ApiError;
use crate::providers::CartApi;
use crate::types::CartRequest;

impl CartApi for RestClient {
    async fn get_carts(&self) -> Result<Vec<CartRequest>, ApiError> {
        self.get_json("/carts").await
    }

    async fn add_cart(&self, request: &CartRequest) -> Result<CartRequest, ApiError> {
        self.post_json("/carts", request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::super::test_support::client_for;
    use super::*;
    use crate::types::CartProduct;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_carts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/carts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "userId": 1, "date": "2020-03-02T00:00:00.000Z",
                 "products": [{"productId": 1, "quantity": 4}]}
            ])))
            .mount(&server)
            .await;

        let carts = client_for(&server).get_carts().await.unwrap();

        assert_eq!(carts[0].user_id, 1);
        assert_eq!(
            carts[0].products,
            vec![CartProduct {
                product_id: 1,
                quantity: 4
            }]
        );
    }

    #[tokio::test]
    async fn test_add_cart_posts_entry() {
        let server = MockServer::start().await;
        let body = json!({"id": 1, "userId": 1, "products": [{"productId": 5, "quantity": 1}]});
        Mock::given(method("POST"))
            .and(path("/carts"))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let request = CartRequest {
            id: 1,
            user_id: 1,
            products: vec![CartProduct {
                product_id: 5,
                quantity: 1,
            }],
        };
        let created = client_for(&server).add_cart(&request).await.unwrap();

        assert_eq!(created, request);
    }
}
