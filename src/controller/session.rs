use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use crate::{
    controller::util::current_user,
    error::Error,
    mfl::session::SessionService,
    model::{app::AppState, session::LinkRequest},
};

/// Link the user's remote account: canonical login plus best-effort logins
/// against every league host found in the directory.
pub async fn link_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LinkRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = SessionService::new(&state.db, &state.gateway);
    let summary = service
        .link_account(user.id, &body.username, &body.password, body.season)
        .await?;

    Ok(Json(summary).into_response())
}
