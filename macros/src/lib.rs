//! Derive macros for storefront action catalogs
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates `<Source>/<event>` type names and
//!   terminal-action helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use storefront_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(source = "Cart")]
//! enum CartAction {
//!     GetCarts,
//!
//!     #[terminal]
//!     GetCartsSuccess { cart: Vec<CartRequest> },
//!
//!     #[terminal]
//!     GetCartsFailure { error: String },
//! }
//!
//! // Generated methods:
//! assert_eq!(CartAction::GetCarts.action_type(), "Cart/getCarts");
//! assert!(CartAction::GetCartsFailure { error: "boom".into() }.is_terminal());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Derive macro for Action enums
///
/// Generates, on the enum:
/// - `action_type()` - the unique `<Source>/<event>` name of the variant
/// - `is_terminal()` - true for variants marked `#[terminal]`
/// - `ACTION_TYPES` - every name of the enum, in declaration order
///
/// # Attributes
///
/// - `#[action(source = "Auth")]` on the enum - the feature prefix (required)
/// - `#[action(name = "...")]` on a variant - use this exact name instead of
///   the generated one
/// - `#[terminal]` on a variant - marks a success/failure result
///
/// The generated event name is the variant name with its first letter
/// lowercased, so `LoginSuccess` under source `Auth` becomes `Auth/loginSuccess`.
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(source = "Auth")]
/// enum AuthAction {
///     Login { username: String, password: String },
///
///     #[terminal]
///     LoginSuccess { token: String },
///
///     #[terminal]
///     LoginFailure { error: String },
/// }
///
/// let action = AuthAction::LoginSuccess { token: "abc".into() };
/// assert_eq!(action.action_type(), "Auth/loginSuccess");
/// assert!(action.is_terminal());
/// ```
#[proc_macro_derive(Action, attributes(action, terminal))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_action(&input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    let source = action_attribute(&input.attrs, "source")?.ok_or_else(|| {
        syn::Error::new_spanned(
            name,
            "#[derive(Action)] requires #[action(source = \"Feature\")]",
        )
    })?;

    let mut type_arms = Vec::new();
    let mut terminal_arms = Vec::new();
    let mut type_names: Vec<String> = Vec::new();

    for variant in &data_enum.variants {
        let type_name = match action_attribute(&variant.attrs, "name")? {
            Some(explicit) => explicit,
            None => format!("{source}/{}", lower_camel(&variant.ident.to_string())),
        };

        if type_names.contains(&type_name) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate action type `{type_name}`"),
            ));
        }

        let pattern = variant_pattern(variant);
        type_arms.push(quote! { #pattern => #type_name, });

        let terminal = has_attribute(&variant.attrs, "terminal");
        terminal_arms.push(quote! { #pattern => #terminal, });

        type_names.push(type_name);
    }

    Ok(quote! {
        impl #name {
            /// Every action type name of this enum, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#type_names),*];

            /// The unique `<Source>/<event>` name of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match self {
                    #(#type_arms)*
                }
            }

            /// Returns true if this action is the terminal result of a request
            #[must_use]
            #[allow(clippy::match_same_arms)]
            pub const fn is_terminal(&self) -> bool {
                match self {
                    #(#terminal_arms)*
                }
            }
        }
    })
}

/// `Self::Variant`, `Self::Variant(..)` or `Self::Variant { .. }`
fn variant_pattern(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Read `key = "value"` out of `#[action(...)]`
fn action_attribute(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut found = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("source") || meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident(key) {
                    found = Some(value.value());
                }
                Ok(())
            } else {
                Err(meta.error("expected `source` or `name`"))
            }
        })?;
    }

    Ok(found)
}

fn lower_camel(ident: &str) -> String {
    let mut chars = ident.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
