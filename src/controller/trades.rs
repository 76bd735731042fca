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
    service::trades_feed::TradesFeedService,
};

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub season: i32,
}

/// The user's open trades across every league, bucketed into
/// received / sent / unknown.
pub async fn open_trades(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TradesQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = TradesFeedService::new(
        &state.db,
        &state.config,
        &state.gateway,
        &state.host_locks,
        &state.trades_cache,
    );
    let feed = service.open_trades(&user, query.season).await?;

    Ok(Json(feed).into_response())
}
