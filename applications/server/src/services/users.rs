/// User business rules
///
/// Uniqueness is checked before every write that can break it (email first,
/// then username), passwords are hashed before they reach the repository,
/// and a missing user is a `NotFound` error rather than an empty result.
use crate::error::{Result, ServerError};
use crate::services::AuthService;
use serde_json::json;
use starter_core::{CreateUser, UpdateUser, User, UserId, UserRepository};

/// Input for [`UserService::create_user`]
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Input for [`UserService::update_user`]; `None` leaves a field unchanged
///
/// `full_name: Some(None)` clears the stored name.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<Option<String>>,
}

pub struct UserService<'a, R> {
    repository: R,
    auth: &'a AuthService,
}

impl<'a, R: UserRepository> UserService<'a, R> {
    pub fn new(repository: R, auth: &'a AuthService) -> Self {
        Self { repository, auth }
    }

    pub async fn create_user(&mut self, input: NewUser) -> Result<User> {
        if self.repository.exists_by_email(&input.email).await? {
            tracing::warn!(email = %input.email, "Attempt to create user with existing email");
            return Err(ServerError::conflict(
                "Email already registered",
                json!({ "email": input.email }),
            ));
        }

        if self.repository.exists_by_username(&input.username).await? {
            tracing::warn!(
                username = %input.username,
                "Attempt to create user with existing username"
            );
            return Err(ServerError::conflict(
                "Username already taken",
                json!({ "username": input.username }),
            ));
        }

        let hashed_password = self.auth.hash_password_blocking(input.password).await?;
        let user = self
            .repository
            .create(CreateUser {
                email: input.email,
                username: input.username,
                hashed_password,
                full_name: input.full_name,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User created successfully");
        Ok(user)
    }

    pub async fn get_user(&mut self, user_id: UserId) -> Result<User> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }

    pub async fn get_users(&mut self, skip: u32, limit: u32) -> Result<Vec<User>> {
        Ok(self.repository.get_multi(skip, limit).await?)
    }

    pub async fn update_user(&mut self, user_id: UserId, changes: UserChanges) -> Result<User> {
        let current = self.get_user(user_id).await?;

        if let Some(email) = changes.email.as_deref() {
            if email != current.email && self.repository.exists_by_email(email).await? {
                return Err(ServerError::conflict(
                    "Email already in use",
                    json!({ "email": email }),
                ));
            }
        }

        if let Some(username) = changes.username.as_deref() {
            if username != current.username && self.repository.exists_by_username(username).await?
            {
                return Err(ServerError::conflict(
                    "Username already taken",
                    json!({ "username": username }),
                ));
            }
        }

        let hashed_password = match changes.password {
            Some(password) => Some(self.auth.hash_password_blocking(password).await?),
            None => None,
        };

        let fields = UpdateUser {
            email: changes.email,
            username: changes.username,
            hashed_password,
            full_name: changes.full_name,
            ..UpdateUser::default()
        };

        let user = self
            .repository
            .update(user_id, fields)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        tracing::info!(user_id, "User updated successfully");
        Ok(user)
    }

    pub async fn delete_user(&mut self, user_id: UserId) -> Result<()> {
        self.get_user(user_id).await?;

        if !self.repository.delete(user_id).await? {
            return Err(user_not_found(user_id));
        }

        tracing::info!(user_id, "User deleted successfully");
        Ok(())
    }

    /// Returns the user when `password` matches, `None` otherwise
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            return Ok(None);
        };

        let verified = self
            .auth
            .verify_password_blocking(password.to_string(), user.hashed_password.clone())
            .await?;

        Ok(verified.then_some(user))
    }

    pub async fn count_users(&mut self) -> Result<i64> {
        Ok(self.repository.count().await?)
    }
}

fn user_not_found(user_id: UserId) -> ServerError {
    ServerError::not_found("User not found", json!({ "user_id": user_id }))
}
