//! Client-only login stub. Nothing is checked against a store and nothing is
//! persisted; the ledger screen only needs to know whether someone is logged in.

use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

#[derive(Debug, Default)]
pub struct Auth {
    user: Option<User>,
}

impl Auth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, email: &str) -> Result<&User, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingField("Email"));
        }

        info!(email, "user logged in");
        Ok(&*self.user.insert(User {
            email: email.to_string(),
        }))
    }

    pub fn logout(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(user) = &user {
            info!(email = %user.email, "user logged out");
        }
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Checks a sign-up form. Success does not log the user in.
    pub fn register(&self, email: &str, password: &str, confirm: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        info!(email = email.trim(), "registration accepted");
        Ok(())
    }
}
