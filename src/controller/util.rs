use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{data::user::UserRepository, error::Error, model::api::ErrorDto, model::app::AppState};

/// Resolve the calling user from the `X-User-Id` header.
///
/// Application authentication is owned by the web layer; by the time a
/// request reaches this surface it carries the resolved account id. A
/// missing or unknown id yields the 404 response to return as-is.
pub async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Result<entity::user::Model, Response>, Error> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.parse::<i32>().ok());

    let user = match user_id {
        Some(user_id) => UserRepository::new(&state.db).get(user_id).await?,
        None => None,
    };

    match user {
        Some(user) => Ok(Ok(user)),
        None => Ok(Err((
            StatusCode::NOT_FOUND,
            Json(ErrorDto {
                error: "User not found".to_string(),
            }),
        )
            .into_response())),
    }
}
