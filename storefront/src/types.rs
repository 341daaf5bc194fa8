//! Data model of the storefront REST API.
//!
//! Field names follow the server's camelCase JSON.

use crate::constants::categories;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product identifier.
pub type ProductId = u64;

/// User identifier.
pub type UserId = u64;

/// A product of the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: f64,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Server-defined category name (e.g. `"men's clothing"`).
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

/// One product line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    /// Product id.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: u32,
}

/// A cart entry, as sent to and returned by `/carts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    /// Cart id.
    pub id: u64,
    /// Owner of the cart.
    pub user_id: UserId,
    /// Product lines.
    #[serde(default)]
    pub products: Vec<CartProduct>,
}

/// Full name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
}

/// Geographic coordinates, as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub long: String,
}

/// Postal address of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name.
    pub street: String,
    /// House number.
    pub number: u32,
    /// City.
    pub city: String,
    /// Postal code.
    pub zipcode: String,
    /// Coordinates.
    pub geolocation: Geolocation,
}

/// A user profile from `/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User id.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Full name.
    pub name: Name,
    /// Phone number; the API sends it as a string or a number.
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    /// Postal address.
    pub address: Address,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
}

/// Response of `POST /users`: the created user, of which only the id is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Id assigned by the server, if it sent one.
    #[serde(default)]
    pub id: Option<UserId>,
}

/// UI-facing product category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// Men's clothing.
    Male,
    /// Women's clothing.
    Female,
    /// Jewelery.
    Jewelery,
    /// Electronics.
    Electronics,
}

impl CategoryFilter {
    /// Every filter, in menu order.
    pub const ALL: [Self; 4] = [Self::Male, Self::Female, Self::Jewelery, Self::Electronics];

    /// The filter's own name (`"male"`, `"female"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Jewelery => "jewelery",
            Self::Electronics => "electronics",
        }
    }

    /// The server category this filter selects.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Male => categories::MENS_CLOTHING,
            Self::Female => categories::WOMENS_CLOTHING,
            Self::Jewelery => categories::JEWELERY,
            Self::Electronics => categories::ELECTRONICS,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown category `{s}` (expected male, female, jewelery or electronics)")
            })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_request_uses_camel_case() {
        let cart = CartRequest {
            id: 1,
            user_id: 1,
            products: vec![CartProduct {
                product_id: 7,
                quantity: 2,
            }],
        };

        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            json!({"id": 1, "userId": 1, "products": [{"productId": 7, "quantity": 2}]})
        );
    }

    #[test]
    fn test_profile_accepts_numeric_phone() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 1,
            "email": "john@gmail.com",
            "username": "johnd",
            "name": {"firstname": "john", "lastname": "doe"},
            "phone": 15702367033_u64,
            "address": {
                "street": "new road",
                "number": 7682,
                "city": "kilcoole",
                "zipcode": "12926-3874",
                "geolocation": {"lat": "-37.3159", "long": "81.1496"}
            }
        }))
        .unwrap();

        assert_eq!(profile.phone, "15702367033");
        assert_eq!(profile.address.geolocation.long, "81.1496");
    }

    #[test]
    fn test_register_request_field_names() {
        let request = RegisterRequest {
            username: "u".into(),
            email: "u@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["confirmPassword"], "secret1");
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("male".parse::<CategoryFilter>(), Ok(CategoryFilter::Male));
        assert_eq!("Electronics".parse::<CategoryFilter>(), Ok(CategoryFilter::Electronics));
        assert!("shoes".parse::<CategoryFilter>().is_err());
        assert_eq!(CategoryFilter::Female.category(), "women's clothing");
        assert_eq!(CategoryFilter::Jewelery.category(), "jewelery");
    }
}
