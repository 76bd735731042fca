use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    controller::util::current_user,
    error::Error,
    model::app::AppState,
    service::live::LiveService,
};

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub season: i32,
}

/// Current-week scoring tiles plus the cross-league aggregate.
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LiveQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = LiveService::new(
        &state.db,
        &state.config,
        &state.gateway,
        &state.host_locks,
        &state.live_cache,
        &state.injury_cache,
    );
    let dashboard = service.dashboard(&user, query.season).await?;

    Ok(Json(dashboard).into_response())
}

/// Injury report for the user's rostered players.
pub async fn injuries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LiveQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = LiveService::new(
        &state.db,
        &state.config,
        &state.gateway,
        &state.host_locks,
        &state.live_cache,
        &state.injury_cache,
    );
    let digest = service.injuries(&user, query.season).await?;

    Ok(Json(digest).into_response())
}
