use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account that can author posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    /// Relative media path of the profile avatar.
    pub avatar_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            avatar_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable account fields.
    pub fn update_account(&mut self, email: Option<String>, first_name: String, last_name: String) {
        self.email = email;
        self.first_name = first_name;
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, path: String) {
        self.avatar_path = Some(path);
        self.updated_at = Utc::now();
    }
}
