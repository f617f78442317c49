/// User domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier (system-assigned row id)
pub type UserId = i64;

/// User account as persisted in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, immutable once assigned
    pub id: UserId,

    /// Unique email address, case-sensitive as stored
    pub email: String,

    /// Unique login name
    pub username: String,

    /// Opaque password hash. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,

    /// Optional display name
    pub full_name: Option<String>,

    pub is_active: bool,

    pub is_superuser: bool,

    /// Assigned on insert
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
}

/// Partial update. `None` leaves the column untouched.
///
/// `full_name` is doubly optional: `Some(None)` clears the name while `None`
/// keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub hashed_password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UpdateUser {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.hashed_password.is_none()
            && self.full_name.is_none()
            && self.is_active.is_none()
            && self.is_superuser.is_none()
    }
}
