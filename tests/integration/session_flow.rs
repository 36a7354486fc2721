//! Integration tests for the demo session and its effect on the store.
//!
//! Verification command: `cargo test --test session_flow`

use std::sync::Arc;

use parking_lot::Mutex;

use projectflow::session::{LoginForm, SessionService, SignupForm, ValidationError};
use projectflow::state::{Page, Store};

fn signup_form() -> SignupForm {
    SignupForm {
        full_name: "  Grace Hopper ".to_string(),
        username: "grace_h".to_string(),
        email: "grace@navy.mil".to_string(),
        phone: String::new(),
        password: "Compiler1952".to_string(),
        confirm_password: "Compiler1952".to_string(),
    }
}

#[test]
fn signup_then_logout() {
    let store = Arc::new(Store::new());
    let session = SessionService::new(Arc::clone(&store));

    let user = session.signup(&signup_form()).unwrap();
    assert_eq!(user.name, "Grace Hopper");
    assert!(!user.id.is_empty());

    let state = store.snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.active_page, Page::Dashboard);

    session.logout();
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert_eq!(state.active_page, Page::Dashboard);
}

#[test]
fn each_sign_in_gets_a_fresh_identity() {
    let store = Arc::new(Store::new());
    let session = SessionService::new(Arc::clone(&store));
    let form = LoginForm {
        email: "ada@example.com".to_string(),
        password: "engine".to_string(),
    };

    let first = session.login(&form).unwrap();
    session.logout();
    let second = session.login(&form).unwrap();

    assert_eq!(first.name, second.name);
    assert_ne!(first.id, second.id);
}

#[test]
fn rejected_signup_does_not_notify_subscribers() {
    let store = Arc::new(Store::new());
    let session = SessionService::new(Arc::clone(&store));
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| *counter.lock() += 1);

    let mut form = signup_form();
    form.confirm_password = "Compiler1953".to_string();
    let errors = session.signup(&form).unwrap_err();

    assert_eq!(errors, vec![ValidationError::ConfirmationMismatch]);
    assert_eq!(errors[0].to_string(), "Passwords do not match");
    assert_eq!(*calls.lock(), 0);
}

#[test]
fn weak_signup_password_is_rejected() {
    let store = Arc::new(Store::new());
    let session = SessionService::new(store);

    let mut form = signup_form();
    form.password = "compiler1952".to_string();
    form.confirm_password = "compiler1952".to_string();

    let errors = session.signup(&form).unwrap_err();
    assert_eq!(errors, vec![ValidationError::PasswordTooWeak]);
    assert_eq!(errors[0].field(), "password");
}
