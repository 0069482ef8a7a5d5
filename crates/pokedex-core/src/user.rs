//! Registered API users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account. The password is only ever held as an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// The public view of a [`User`], safe to return from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id:       Uuid,
  pub username: String,
}

impl From<&User> for UserProfile {
  fn from(u: &User) -> Self {
    Self { id: u.user_id, username: u.username.clone() }
  }
}
