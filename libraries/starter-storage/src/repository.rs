use crate::users;
use async_trait::async_trait;
use sqlx::SqliteConnection;
use starter_core::{
    error::Result,
    repository::{Repository, UserRepository},
    types::{CreateUser, UpdateUser, User, UserId},
};

/// User repository over a caller-supplied `SQLite` session
///
/// Accepts anything that dereferences to a connection: a pooled connection or
/// an open transaction. Commit and rollback stay with the caller.
pub struct SqliteUserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteUserRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> Repository for SqliteUserRepository<'c> {
    type Entity = User;
    type Id = UserId;
    type Create = CreateUser;
    type Update = UpdateUser;

    async fn get(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(users::get_by_id(&mut *self.conn, id).await?)
    }

    async fn get_multi(&mut self, skip: u32, limit: u32) -> Result<Vec<User>> {
        Ok(users::get_page(&mut *self.conn, skip, limit).await?)
    }

    async fn create(&mut self, fields: CreateUser) -> Result<User> {
        Ok(users::create(&mut *self.conn, fields).await?)
    }

    async fn update(&mut self, id: UserId, fields: UpdateUser) -> Result<Option<User>> {
        Ok(users::update(&mut *self.conn, id, fields).await?)
    }

    async fn delete(&mut self, id: UserId) -> Result<bool> {
        Ok(users::delete(&mut *self.conn, id).await?)
    }

    async fn count(&mut self) -> Result<i64> {
        Ok(users::count(&mut *self.conn).await?)
    }
}

#[async_trait]
impl<'c> UserRepository for SqliteUserRepository<'c> {
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>> {
        Ok(users::get_by_email(&mut *self.conn, email).await?)
    }

    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>> {
        Ok(users::get_by_username(&mut *self.conn, username).await?)
    }
}
