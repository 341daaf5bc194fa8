//! `/auth/login` and `/users` (registration).

use super::RestClient;
use crate::error::ApiError;
use crate::providers::AuthApi;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

impl AuthApi for RestClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post_json("/users", request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::super::test_support::client_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "mor_2314", "password": "83r5^_"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .login(&LoginRequest {
                username: "mor_2314".into(),
                password: "83r5^_".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, "abc");
    }

    #[tokio::test]
    async fn test_login_rejection_uses_body_as_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("username or password is incorrect"),
            )
            .mount(&server)
            .await;

        let error = client_for(&server)
            .login(&LoginRequest {
                username: "u".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ApiError::Status {
                status: 401,
                message: "username or password is incorrect".into()
            }
        );
    }

    #[tokio::test]
    async fn test_register_sends_confirm_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({
                "username": "newbie",
                "email": "newbie@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .register(&RegisterRequest {
                username: "newbie".into(),
                email: "newbie@example.com".into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.id, Some(11));
    }
}
