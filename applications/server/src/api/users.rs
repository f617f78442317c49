/// User API routes
use crate::{
    api::extract::ValidatedJson,
    error::Result,
    services::{NewUser, UserChanges, UserService},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer};
use starter_core::{User, UserId};
use starter_storage::SqliteUserRepository;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreateRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub full_name: Option<String>,
}

impl From<UserCreateRequest> for NewUser {
    fn from(request: UserCreateRequest) -> Self {
        Self {
            email: request.email,
            username: request.username,
            password: request.password,
            full_name: request.full_name,
        }
    }
}

/// Partial update; absent fields are left unchanged
///
/// `"full_name": null` clears the name. A null email, username or password
/// is treated like an absent one.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(min = 8))]
    #[serde(default)]
    pub password: Option<String>,
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "present")]
    pub full_name: Option<Option<String>>,
}

impl From<UserUpdateRequest> for UserChanges {
    fn from(request: UserUpdateRequest) -> Self {
        Self {
            email: request.email,
            username: request.username,
            password: request.password,
            full_name: request.full_name,
        }
    }
}

/// Wraps any present value, `null` included, in `Some`
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

/// POST {prefix}/users
pub async fn create_user(
    State(app_state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UserCreateRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let mut tx = app_state.db.begin().await?;
    let user = UserService::new(SqliteUserRepository::new(&mut tx), &app_state.auth_service)
        .create_user(request.into())
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET {prefix}/users/:id
pub async fn get_user(
    Path(user_id): Path<UserId>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let mut conn = app_state.db.pool().acquire().await?;
    let user = UserService::new(SqliteUserRepository::new(&mut conn), &app_state.auth_service)
        .get_user(user_id)
        .await?;

    Ok(Json(user))
}

/// GET {prefix}/users?skip=&limit=
///
/// Ordered by ascending id; `limit` defaults to the configured page size and
/// is capped at the configured maximum.
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<User>>> {
    let limit = app_state.settings.page_limit(pagination.limit);
    let mut conn = app_state.db.pool().acquire().await?;
    let users = UserService::new(SqliteUserRepository::new(&mut conn), &app_state.auth_service)
        .get_users(pagination.skip, limit)
        .await?;

    Ok(Json(users))
}

/// PUT {prefix}/users/:id
pub async fn update_user(
    Path(user_id): Path<UserId>,
    State(app_state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UserUpdateRequest>,
) -> Result<Json<User>> {
    let mut tx = app_state.db.begin().await?;
    let user = UserService::new(SqliteUserRepository::new(&mut tx), &app_state.auth_service)
        .update_user(user_id, request.into())
        .await?;
    tx.commit().await?;

    Ok(Json(user))
}

/// DELETE {prefix}/users/:id
pub async fn delete_user(
    Path(user_id): Path<UserId>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    let mut tx = app_state.db.begin().await?;
    UserService::new(SqliteUserRepository::new(&mut tx), &app_state.auth_service)
        .delete_user(user_id)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_absent_and_null_full_name() {
        let absent: UserUpdateRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.full_name, None);

        let cleared: UserUpdateRequest = serde_json::from_str(r#"{"full_name": null}"#).unwrap();
        assert_eq!(cleared.full_name, Some(None));

        let set: UserUpdateRequest = serde_json::from_str(r#"{"full_name": "Ada"}"#).unwrap();
        assert_eq!(set.full_name, Some(Some("Ada".to_string())));
    }

    #[test]
    fn test_create_constraints() {
        let valid = UserCreateRequest {
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: "password123".to_string(),
            full_name: None,
        };
        assert!(valid.validate().is_ok());

        let errors = UserCreateRequest {
            email: "not-an-email".to_string(),
            username: "ab".to_string(),
            password: "short".to_string(),
            full_name: Some("x".repeat(101)),
        }
        .validate()
        .unwrap_err();

        let fields = errors.field_errors();
        for field in ["email", "username", "password", "full_name"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_update_constraints_apply_only_when_present() {
        assert!(UserUpdateRequest::default().validate().is_ok());

        let too_long = UserUpdateRequest {
            full_name: Some(Some("x".repeat(101))),
            ..Default::default()
        };
        assert!(too_long.validate().is_err());

        let short_password = UserUpdateRequest {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(short_password.validate().is_err());
    }
}
