//! `/users/{id}`.

use super::RestClient;
use crate::error::ApiError;
use crate::providers::ProfileApi;
use crate::types::{Profile, UserId};

impl ProfileApi for RestClient {
    async fn get_profile(&self, id: UserId) -> Result<Profile, ApiError> {
        self.get_json(&format!("/users/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::super::test_support::client_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2,
                "email": "morrison@gmail.com",
                "username": "mor_2314",
                "password": "83r5^_",
                "name": {"firstname": "david", "lastname": "morrison"},
                "phone": "1-570-236-7033",
                "address": {
                    "street": "Lovers Ln",
                    "number": 7267,
                    "city": "kilcoole",
                    "zipcode": "12926-3874",
                    "geolocation": {"lat": "-37.3159", "long": "81.1496"}
                }
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).get_profile(2).await.unwrap();

        assert_eq!(profile.username, "mor_2314");
        assert_eq!(profile.name.lastname, "morrison");
        assert_eq!(profile.phone, "1-570-236-7033");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = RestClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(2)).unwrap();
        let error = client.get_profile(1).await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)));
        assert!(error.to_string().starts_with("Request failed: "));
    }
}
