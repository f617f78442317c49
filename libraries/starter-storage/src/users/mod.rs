//! User table queries

use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use starter_core::types::{CreateUser, UpdateUser, User, UserId};

const COLUMNS: &str = "id, email, username, hashed_password, full_name, \
                       is_active, is_superuser, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    hashed_password: String,
    full_name: Option<String>,
    is_active: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            hashed_password: row.hashed_password,
            full_name: row.full_name,
            is_active: row.is_active,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Get a user by id
pub async fn get_by_id(conn: &mut SqliteConnection, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(User::from))
}

/// Get a page of users in ascending id order
pub async fn get_page(conn: &mut SqliteConnection, skip: u32, limit: u32) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(i64::from(limit))
    .bind(i64::from(skip))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

/// Get a user by exact email
pub async fn get_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
    let row =
        sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(User::from))
}

/// Get a user by exact username
pub async fn get_by_username(conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
    let row =
        sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(User::from))
}

/// Insert a user
///
/// New users start active and without superuser rights. Both timestamps are
/// set to the insert time.
pub async fn create(conn: &mut SqliteConnection, user: CreateUser) -> Result<User> {
    let now = Utc::now();

    let row = sqlx::query_as::<_, UserRow>(&format!(
        "INSERT INTO users (email, username, hashed_password, full_name,
                            is_active, is_superuser, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, 0, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(user.email)
    .bind(user.username)
    .bind(user.hashed_password)
    .bind(user.full_name)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

/// Apply a partial update
///
/// `updated_at` is refreshed even when `changes` is empty. Returns `None`
/// when no user has `id`.
pub async fn update(
    conn: &mut SqliteConnection,
    id: UserId,
    changes: UpdateUser,
) -> Result<Option<User>> {
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET updated_at = ");
    query.push_bind(Utc::now());

    if let Some(email) = changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(username) = changes.username {
        query.push(", username = ").push_bind(username);
    }
    if let Some(hashed_password) = changes.hashed_password {
        query.push(", hashed_password = ").push_bind(hashed_password);
    }
    if let Some(full_name) = changes.full_name {
        query.push(", full_name = ").push_bind(full_name);
    }
    if let Some(is_active) = changes.is_active {
        query.push(", is_active = ").push_bind(is_active);
    }
    if let Some(is_superuser) = changes.is_superuser {
        query.push(", is_superuser = ").push_bind(is_superuser);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(" RETURNING ").push(COLUMNS);

    let row = query
        .build_query_as::<UserRow>()
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(User::from))
}

/// Delete a user. Returns true iff a row was removed.
pub async fn delete(conn: &mut SqliteConnection, id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count all users
pub async fn count(conn: &mut SqliteConnection) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;

    Ok(total)
}
