//! Repository traits for the persistence layer
//!
//! Implementations operate on a session supplied by the caller. They never
//! begin, commit or roll back transactions themselves; the owner of the
//! session decides the unit of work.

use crate::error::Result;
use crate::types::{CreateUser, UpdateUser, User, UserId};
use async_trait::async_trait;

/// Generic CRUD over a single entity table
#[async_trait]
pub trait Repository: Send {
    /// Entity stored in the table
    type Entity: Send;
    /// Primary key type
    type Id: Send + Copy;
    /// Fields required to insert a row
    type Create: Send;
    /// Partial update payload
    type Update: Send;

    /// Get an entity by primary key
    async fn get(&mut self, id: Self::Id) -> Result<Option<Self::Entity>>;

    /// Get a page window of entities, ordered by ascending id
    async fn get_multi(&mut self, skip: u32, limit: u32) -> Result<Vec<Self::Entity>>;

    /// Insert a row and return it with generated id and timestamps populated
    async fn create(&mut self, fields: Self::Create) -> Result<Self::Entity>;

    /// Apply only the supplied fields. Returns `None` if no row has `id`.
    async fn update(&mut self, id: Self::Id, fields: Self::Update)
        -> Result<Option<Self::Entity>>;

    /// Remove a row. Returns true iff a row was deleted.
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;

    /// Total number of rows
    async fn count(&mut self) -> Result<i64>;
}

/// User-specific lookups on top of the generic CRUD contract
#[async_trait]
pub trait UserRepository:
    Repository<Entity = User, Id = UserId, Create = CreateUser, Update = UpdateUser>
{
    /// Find a user by exact email
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>>;

    /// Find a user by exact username
    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>>;

    /// Check whether any user has this email
    async fn exists_by_email(&mut self, email: &str) -> Result<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Check whether any user has this username
    async fn exists_by_username(&mut self, username: &str) -> Result<bool> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}
