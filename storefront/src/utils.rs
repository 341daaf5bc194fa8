//! Small helpers shared across modules.

/// Strip an authorization scheme from a stored token.
///
/// A value made of exactly two space-separated parts (`"Bearer abc"`) yields
/// the second part; anything else is returned unchanged. Empty input yields
/// `None`.
///
/// # Examples
///
/// ```
/// use storefront::utils::extract_token;
///
/// assert_eq!(extract_token("Bearer abc"), Some("abc"));
/// assert_eq!(extract_token("abc"), Some("abc"));
/// assert_eq!(extract_token(""), None);
/// ```
#[must_use]
pub fn extract_token(raw: &str) -> Option<&str> {
    if raw.is_empty() {
        return None;
    }

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(token), None) => Some(token),
        _ => Some(raw),
    }
}
