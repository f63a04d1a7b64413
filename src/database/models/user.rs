use serde::{Deserialize, Serialize};

/// Stored user record. The password is plaintext and must never leave the
/// service; handlers only ever serialize [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

impl User {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}
