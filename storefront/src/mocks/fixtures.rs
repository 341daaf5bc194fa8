//! Sample data in the shape the storefront API returns.

use crate::types::{
    Address, CartProduct, CartRequest, Geolocation, Name, Product, ProductId, Profile, UserId,
};

/// A product with the given id and category.
#[must_use]
pub fn product(id: ProductId, title: &str, category: &str, price: f64) -> Product {
    Product {
        id,
        title: title.to_string(),
        price,
        description: format!("{title} description"),
        category: category.to_string(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
    }
}

/// One product per category.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(1, "Fjallraven Backpack", "men's clothing", 109.95),
        product(2, "Rain Jacket Women", "women's clothing", 39.99),
        product(3, "Silver Dragon Bracelet", "jewelery", 695.0),
        product(4, "Portable SSD 1TB", "electronics", 109.0),
    ]
}

/// A cart entry holding a single product line.
#[must_use]
pub fn cart_request(user_id: UserId, product_id: ProductId, quantity: u32) -> CartRequest {
    CartRequest {
        id: user_id,
        user_id,
        products: vec![CartProduct {
            product_id,
            quantity,
        }],
    }
}

/// Carts listed by `GET /carts`.
#[must_use]
pub fn carts() -> Vec<CartRequest> {
    vec![
        CartRequest {
            id: 1,
            user_id: 1,
            products: vec![
                CartProduct {
                    product_id: 1,
                    quantity: 4,
                },
                CartProduct {
                    product_id: 2,
                    quantity: 1,
                },
            ],
        },
        CartRequest {
            id: 2,
            user_id: 1,
            products: vec![CartProduct {
                product_id: 3,
                quantity: 6,
            }],
        },
    ]
}

/// A complete user profile.
#[must_use]
pub fn profile() -> Profile {
    Profile {
        id: 1,
        email: "john@gmail.com".to_string(),
        username: "johnd".to_string(),
        name: Name {
            firstname: "john".to_string(),
            lastname: "doe".to_string(),
        },
        phone: "1-570-236-7033".to_string(),
        address: Address {
            street: "new road".to_string(),
            number: 7682,
            city: "kilcoole".to_string(),
            zipcode: "12926-3874".to_string(),
            geolocation: Geolocation {
                lat: "-37.3159".to_string(),
                long: "81.1496".to_string(),
            },
        },
    }
}
