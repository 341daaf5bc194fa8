//! Login and registration forms.
//!
//! Field rules are checked before anything is dispatched. Messages are the
//! ones shown next to the fields, in field order.

use crate::constants::validation::{
    CONFIRM_PASSWORD_REQUIRED, EMAIL_REQUIRED, PASSWORD_MIN_LENGTH, PASSWORD_MIN_LENGTH_MESSAGE,
    PASSWORD_MISMATCH, PASSWORD_REQUIRED, USERNAME_REQUIRED,
};
use crate::types::{LoginRequest, RegisterRequest};

/// Errors of a password field: required, then minimum length.
fn password_errors(password: &str, errors: &mut Vec<&'static str>) {
    if password.is_empty() {
        errors.push(PASSWORD_REQUIRED);
    } else if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(PASSWORD_MIN_LENGTH_MESSAGE);
    }
}

/// The login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl LoginForm {
    /// Form filled with `username` and `password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Every failed rule.
    #[must_use]
    pub fn errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push(USERNAME_REQUIRED);
        }
        password_errors(&self.password, &mut errors);
        errors
    }

    /// Whether the form may be submitted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// The request to submit.
    ///
    /// # Errors
    ///
    /// Returns the failed rules when the form is invalid.
    pub fn validate(self) -> Result<LoginRequest, Vec<&'static str>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(LoginRequest {
            username: self.username,
            password: self.password,
        })
    }
}

/// The registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
}

impl RegisterForm {
    /// Every failed rule.
    ///
    /// A mismatch is only reported once both passwords are filled in.
    #[must_use]
    pub fn errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();

        if self.username.is_empty() {
            errors.push(USERNAME_REQUIRED);
        }
        if self.email.is_empty() {
            errors.push(EMAIL_REQUIRED);
        }
        password_errors(&self.password, &mut errors);

        if self.confirm_password.is_empty() {
            errors.push(CONFIRM_PASSWORD_REQUIRED);
        } else if !self.password.is_empty() && self.password != self.confirm_password {
            errors.push(PASSWORD_MISMATCH);
        }

        errors
    }

    /// Whether the form may be submitted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// The request to submit.
    ///
    /// # Errors
    ///
    /// Returns the failed rules when the form is invalid.
    pub fn validate(self) -> Result<RegisterRequest, Vec<&'static str>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterRequest {
            username: self.username,
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    fn register_form(password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            username: "newbie".into(),
            email: "newbie@example.com".into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    #[test]
    fn test_empty_login_form() {
        assert_eq!(
            LoginForm::default().errors(),
            vec!["Username is required", "Password is required"]
        );
    }

    #[test]
    fn test_short_password() {
        let form = LoginForm::new("johnd", "12345");
        assert_eq!(form.errors(), vec!["Password must be at least 6 characters long"]);
        assert!(!form.is_valid());

        assert!(LoginForm::new("johnd", "123456").is_valid());
    }

    #[test]
    fn test_login_validate() {
        let request = LoginForm::new("johnd", "m38rmF$").validate().unwrap();
        assert_eq!(request.username, "johnd");
        assert_eq!(request.password, "m38rmF$");

        assert!(LoginForm::new("", "secret1").validate().is_err());
    }

    #[test]
    fn test_mismatch_needs_both_passwords() {
        assert_eq!(
            register_form("secret1", "").errors(),
            vec!["Confirm Password is required"]
        );
        assert_eq!(register_form("secret1", "secret2").errors(), vec!["Passwords do not match"]);
        assert_eq!(
            register_form("", "secret1").errors(),
            vec!["Password is required"]
        );
        assert!(register_form("secret1", "secret1").is_valid());
    }

    #[test]
    fn test_empty_register_form() {
        assert_eq!(
            RegisterForm::default().errors(),
            vec![
                "Username is required",
                "Email is required",
                "Password is required",
                "Confirm Password is required",
            ]
        );
    }

    #[test]
    fn test_register_validate() {
        let request = register_form("secret1", "secret1").validate().unwrap();
        assert_eq!(request.confirm_password, "secret1");

        assert_eq!(
            register_form("abc", "abd").validate().unwrap_err(),
            vec!["Password must be at least 6 characters long", "Passwords do not match"]
        );
    }
}
