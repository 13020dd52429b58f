//! Form validation
//!
//! Runs before any network call. Field rules are `validator` derives on the
//! forms and requests; a failure becomes an `Error::Validation` carrying the
//! message shown next to the offending field. Text fields are checked
//! trimmed.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::{BookCreateRequest, ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest};

/// Special characters a password must draw at least one of
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Registration form, including the confirmation field
#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "password_classes")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Change-password form, including the confirmation field
#[derive(Debug, Clone, Default, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "password_classes")
    )]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn to_request(&self) -> ChangePasswordRequest {
        ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        }
    }
}

pub fn validate_login(request: &LoginRequest) -> Result<()> {
    LoginRequest {
        email: request.email.trim().to_string(),
        password: request.password.clone(),
    }
    .validate()?;
    Ok(())
}

pub fn validate_register(form: &RegisterForm) -> Result<()> {
    RegisterForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        ..form.clone()
    }
    .validate()?;
    Ok(())
}

pub fn validate_change_password(form: &ChangePasswordForm) -> Result<()> {
    form.validate()?;
    Ok(())
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<()> {
    ProfileUpdate {
        name: update.name.trim().to_string(),
        email: update.email.trim().to_string(),
        time_stamp: update
            .time_stamp
            .clone()
            .filter(|t| !t.trim().is_empty()),
        image: None,
        ..update.clone()
    }
    .validate()?;
    Ok(())
}

pub fn validate_book(request: &BookCreateRequest) -> Result<()> {
    BookCreateRequest {
        title: request.title.trim().to_string(),
        image: None,
        ..request.clone()
    }
    .validate()?;
    Ok(())
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Letters, digits and [`PASSWORD_SPECIALS`] only, with one of each class:
/// lowercase, uppercase, digit, special. Length is a separate rule.
pub fn password_classes(password: &str) -> std::result::Result<(), ValidationError> {
    let is_special = |c: char| PASSWORD_SPECIALS.contains(c);
    if let Some(bad) = password
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || is_special(*c)))
    {
        return Err(rule(
            "password_charset",
            format!("Password contains an unsupported character '{}'", bad),
        ));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(is_special);
    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(rule(
            "password_classes",
            format!(
                "Password must contain an uppercase letter, a lowercase letter, a number and one of {}",
                PASSWORD_SPECIALS
            ),
        ));
    }
    Ok(())
}

/// Available copies never exceed the total
pub fn copies_fit(request: &BookCreateRequest) -> std::result::Result<(), ValidationError> {
    if request.available_copies > request.total_copies {
        return Err(rule(
            "copies",
            "Available copies cannot exceed total copies",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn login(email: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: "x".to_string(),
        }
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_login(&login("ada@example.com")).is_ok());
        assert!(validate_login(&login("  a.b+c@mail.example.org ")).is_ok());

        for bad in ["", "ada", "ada@", "@example.com", "a b@x.io", "a@b@c.io", "ada@.com"] {
            let err = validate_login(&login(bad)).unwrap_err();
            assert!(
                err.to_string().contains("valid email address"),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_password_classes() {
        assert!(password_classes("Secret1!").is_ok());
        assert!(password_classes("Abcdef1@xyz").is_ok());

        // missing a class each
        assert!(password_classes("secret1!").is_err());
        assert!(password_classes("SECRET1!").is_err());
        assert!(password_classes("Secrets!").is_err());
        assert!(password_classes("Secret12").is_err());
        // characters outside the allowed set
        assert!(password_classes("Secret1!#").is_err());
        assert!(password_classes("Secret 1!").is_err());
    }

    #[test]
    fn test_short_password_reports_length() {
        let err = validate_register(&register_form("Se1!", "Se1!")).unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"), "{}", err);
    }

    #[test]
    fn test_mismatch_message() {
        match validate_register(&register_form("Secret1!", "Secret1?")) {
            Err(crate::error::Error::Validation(msg)) => assert_eq!(msg, "Passwords don't match"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_login_requires_password() {
        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert!(validate_login(&request).unwrap_err().is_validation());
    }

    #[test]
    fn test_register_rules() {
        assert!(validate_register(&register_form("Secret1!", "Secret1!")).is_ok());
        assert!(validate_register(&register_form("Secret1!", "Secret1?")).is_err());

        let mut short_name = register_form("Secret1!", "Secret1!");
        short_name.name = " A ".to_string();
        assert!(validate_register(&short_name).is_err());
    }

    #[test]
    fn test_register_request_trims() {
        let mut form = register_form("Secret1!", "Secret1!");
        form.email = " ada@example.com ".to_string();
        assert_eq!(form.to_request().email, "ada@example.com");
    }

    #[test]
    fn test_change_password_rules() {
        let form = ChangePasswordForm {
            old_password: "old".to_string(),
            new_password: "Newpass1!".to_string(),
            confirm_password: "Newpass1!".to_string(),
        };
        assert!(validate_change_password(&form).is_ok());

        let no_old = ChangePasswordForm { old_password: String::new(), ..form.clone() };
        assert!(validate_change_password(&no_old).is_err());

        let mismatch = ChangePasswordForm { confirm_password: "Other1!x".to_string(), ..form };
        assert!(validate_change_password(&mismatch).is_err());
    }

    #[test]
    fn test_profile_requires_name_email_and_token() {
        let update = ProfileUpdate {
            id: 1,
            time_stamp: Some("AAAA".to_string()),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            sex: Sex::Female,
            bio: None,
            address: None,
            phone: None,
            birth_date: None,
            credit: None,
            role: None,
            image: None,
        };
        assert!(validate_profile(&update).is_ok());
        assert!(validate_profile(&ProfileUpdate { name: " ".into(), ..update.clone() }).is_err());
        assert!(validate_profile(&ProfileUpdate { email: "nope".into(), ..update.clone() }).is_err());
        assert!(validate_profile(&ProfileUpdate { time_stamp: None, ..update }).is_err());
    }

    #[test]
    fn test_book_copy_counts() {
        let request = BookCreateRequest {
            title: "Dune".to_string(),
            description: None,
            genre: None,
            credit: Some(2.0),
            total_copies: 3,
            available_copies: 3,
            image: None,
        };
        assert!(validate_book(&request).is_ok());
        assert!(validate_book(&BookCreateRequest { available_copies: 4, ..request.clone() }).is_err());
        assert!(validate_book(&BookCreateRequest { total_copies: -1, ..request.clone() }).is_err());
        assert!(validate_book(&BookCreateRequest { title: "  ".into(), ..request.clone() }).is_err());
        assert!(validate_book(&BookCreateRequest { credit: Some(-1.0), ..request }).is_err());
    }
}
