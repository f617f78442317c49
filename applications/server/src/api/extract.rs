/// Request extractors
use crate::error::ServerError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationErrors};

/// JSON body that is deserialized and then checked with [`Validate`]
///
/// Both malformed bodies and constraint violations are rejected as
/// `VALIDATION_ERROR` (422) in the standard error envelope.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ServerError::validation(
                "Invalid request body",
                json!({ "body": rejection.body_text() }),
            )
        })?;

        value
            .validate()
            .map_err(|errors| ServerError::validation("Validation failed", field_details(&errors)))?;

        Ok(Self(value))
    }
}

/// Field name to list of messages
fn field_details(errors: &ValidationErrors) -> Value {
    let fields: Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();

    Value::Object(fields)
}
