//! Demo sign-in, sign-up, and sign-out.
//!
//! There is no credential check: any well-formed form signs the user in.
//! Validation mirrors what the API's own sign-up form enforces.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::state::{Action, Page, Store, User};

const MIN_LOGIN_PASSWORD: usize = 6;
const MIN_SIGNUP_PASSWORD: usize = 8;
const MIN_FULL_NAME: usize = 2;
const MIN_USERNAME: usize = 3;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| pattern(r"\S+@\S+\.\S+"));
static USERNAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[a-zA-Z0-9_]+$"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\+?[0-9\s\-()]+$"));
static LOWER: LazyLock<Regex> = LazyLock::new(|| pattern(r"[a-z]"));
static UPPER: LazyLock<Regex> = LazyLock::new(|| pattern(r"[A-Z]"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| pattern(r"[0-9]"));
static SYMBOL: LazyLock<Regex> = LazyLock::new(|| pattern(r"[^a-zA-Z0-9]"));

/// Compiles a pattern literal from this module.
#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("validation pattern literal compiles")
}

/// A rejected form field.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Password must contain uppercase, lowercase, and numbers")]
    PasswordTooWeak,
    #[error("Please confirm your password")]
    ConfirmationRequired,
    #[error("Passwords do not match")]
    ConfirmationMismatch,
    #[error("Full name is required")]
    FullNameRequired,
    #[error("Full name must be at least {MIN_FULL_NAME} characters")]
    FullNameTooShort,
    #[error("Username is required")]
    UsernameRequired,
    #[error("Username must be at least {MIN_USERNAME} characters")]
    UsernameTooShort,
    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameInvalid,
    #[error("Please enter a valid phone number")]
    PhoneInvalid,
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmailRequired | Self::EmailInvalid => "email",
            Self::PasswordRequired | Self::PasswordTooShort(_) | Self::PasswordTooWeak => {
                "password"
            }
            Self::ConfirmationRequired | Self::ConfirmationMismatch => "confirmPassword",
            Self::FullNameRequired | Self::FullNameTooShort => "fullName",
            Self::UsernameRequired | Self::UsernameTooShort | Self::UsernameInvalid => {
                "username"
            }
            Self::PhoneInvalid => "phone",
        }
    }
}

/// Sign-in form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Checks every field; returns all errors in field order.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = check_email(&self.email) {
            errors.push(e);
        }
        if self.password.is_empty() {
            errors.push(ValidationError::PasswordRequired);
        } else if self.password.chars().count() < MIN_LOGIN_PASSWORD {
            errors.push(ValidationError::PasswordTooShort(MIN_LOGIN_PASSWORD));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    /// Optional; empty means not given.
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Checks every field; returns all errors in field order.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim().chars().count();
        if full_name == 0 {
            errors.push(ValidationError::FullNameRequired);
        } else if full_name < MIN_FULL_NAME {
            errors.push(ValidationError::FullNameTooShort);
        }

        // Length is measured trimmed, the character set untrimmed.
        let username = self.username.trim().chars().count();
        if username == 0 {
            errors.push(ValidationError::UsernameRequired);
        } else if username < MIN_USERNAME {
            errors.push(ValidationError::UsernameTooShort);
        } else if !USERNAME.is_match(&self.username) {
            errors.push(ValidationError::UsernameInvalid);
        }

        if let Err(e) = check_email(&self.email) {
            errors.push(e);
        }

        if !self.phone.is_empty() && !PHONE.is_match(&self.phone) {
            errors.push(ValidationError::PhoneInvalid);
        }

        if self.password.is_empty() {
            errors.push(ValidationError::PasswordRequired);
        } else if self.password.chars().count() < MIN_SIGNUP_PASSWORD {
            errors.push(ValidationError::PasswordTooShort(MIN_SIGNUP_PASSWORD));
        } else if !is_mixed_password(&self.password) {
            errors.push(ValidationError::PasswordTooWeak);
        }

        if self.confirm_password.is_empty() {
            errors.push(ValidationError::ConfirmationRequired);
        } else if self.password != self.confirm_password {
            errors.push(ValidationError::ConfirmationMismatch);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Password strength on a 0..=5 scale, one point each for length of at
/// least eight, a lowercase letter, an uppercase letter, a digit, and a
/// symbol.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= MIN_SIGNUP_PASSWORD,
        LOWER.is_match(password),
        UPPER.is_match(password),
        DIGIT.is_match(password),
        SYMBOL.is_match(password),
    ];
    checks.into_iter().map(u8::from).sum()
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        Err(ValidationError::EmailRequired)
    } else if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::EmailInvalid)
    }
}

fn is_mixed_password(password: &str) -> bool {
    LOWER.is_match(password) && UPPER.is_match(password) && DIGIT.is_match(password)
}

/// Signs users in and out of the demo session.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: Arc<Store>,
}

impl SessionService {
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Signs in with any well-formed email and password and opens the
    /// dashboard. The display name is the email's local part.
    ///
    /// # Errors
    ///
    /// Returns the field errors; the store is not touched.
    pub fn login(&self, form: &LoginForm) -> Result<User, Vec<ValidationError>> {
        form.validate()?;
        let email = form.email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();
        Ok(self.sign_in(name))
    }

    /// Registers and signs in with any well-formed sign-up form and opens
    /// the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the field errors; the store is not touched.
    pub fn signup(&self, form: &SignupForm) -> Result<User, Vec<ValidationError>> {
        form.validate()?;
        Ok(self.sign_in(form.full_name.trim().to_string()))
    }

    /// Signs out and returns to the dashboard.
    pub fn logout(&self) {
        tracing::info!("signed out");
        self.store.dispatch(Action::Logout);
    }

    fn sign_in(&self, name: String) -> User {
        let user = User {
            name,
            id: Uuid::now_v7().simple().to_string(),
        };
        tracing::info!(user = %user.name, "signed in");
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        self.store.dispatch(Action::SetActivePage(Page::Dashboard));
        user
    }
}
