// Plaintext credential check backing `GET /api/users?email=..&password=..`.
// Passwords are compared as stored; there is no hashing, session or token.

use thiserror::Error;

use crate::database::models::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Query parameters that drive authentication mode on the users list
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials<'a> {
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl<'a> Credentials<'a> {
    pub fn new(email: Option<&'a str>, password: Option<&'a str>) -> Self {
        Self {
            email: email.filter(|e| !e.is_empty()),
            password: password.filter(|p| !p.is_empty()),
        }
    }
}

/// Linear scan for the first candidate whose password matches exactly.
/// An empty candidate set never authenticates.
pub fn authenticate(candidates: Vec<User>, password: &str) -> Result<User, AuthError> {
    candidates
        .into_iter()
        .find(|user| user.password_matches(password))
        .ok_or(AuthError::InvalidCredentials)
}
