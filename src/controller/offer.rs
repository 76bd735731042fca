use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    controller::util::current_user,
    error::Error,
    model::{
        app::AppState,
        offer::{
            BuyCandidate, OfferMode, SellCandidate, SendRequest, SendResult, UpgradeCandidate,
        },
    },
    service::{
        entitlement::{Decision, EntitlementService},
        trade::{template_by_code, TradeService, PRICE_TEMPLATES},
    },
};

#[derive(Debug, Deserialize)]
pub struct CandidatesQuery {
    pub season: i32,
    pub player_id: i64,
    pub mode: OfferMode,
    /// Price template code; "upgrade" selects the pick-upgrade flow.
    pub template: Option<String>,
    pub upgrade_give_round: Option<i32>,
    pub upgrade_receive_round: Option<i32>,
}

/// Candidate leagues for the offer builder. Gated on a recent sync so the
/// builder never works from stale rosters.
#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub sync_required: bool,
    pub buy: Vec<BuyCandidate>,
    pub sell: Vec<SellCandidate>,
    pub upgrade: Vec<UpgradeCandidate>,
}

pub async fn candidates(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CandidatesQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = TradeService::new(&state.db, &state.config, &state.gateway, &state.host_locks);

    let mut response = CandidatesResponse {
        sync_required: false,
        buy: Vec::new(),
        sell: Vec::new(),
        upgrade: Vec::new(),
    };

    if !service
        .has_recent_sync(user.id, Utc::now().naive_utc())
        .await?
    {
        response.sync_required = true;
        return Ok(Json(response).into_response());
    }

    let template_code = query.template.as_deref().unwrap_or("2nd");

    if template_code == "upgrade" {
        // Pick Upgrade is sell-only and needs both rounds.
        let (Some(give_round), Some(receive_round)) =
            (query.upgrade_give_round, query.upgrade_receive_round)
        else {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(crate::model::api::ErrorDto {
                    error: "Pick Upgrade requires both give and receive rounds".to_string(),
                }),
            )
                .into_response());
        };
        if query.mode != OfferMode::Sell {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(crate::model::api::ErrorDto {
                    error: "Pick Upgrade is only available in sell mode".to_string(),
                }),
            )
                .into_response());
        }

        response.upgrade = service
            .upgrade_candidates(
                user.id,
                query.season,
                query.player_id,
                give_round,
                receive_round,
            )
            .await?;
        return Ok(Json(response).into_response());
    }

    // Unknown codes fall back to the default template, as the builder does.
    let template = template_by_code(template_code).unwrap_or(&PRICE_TEMPLATES[4]);

    match query.mode {
        OfferMode::Buy => {
            response.buy = service
                .buy_candidates(user.id, query.season, query.player_id, template)
                .await?;
        }
        OfferMode::Sell => {
            response.sell = service
                .sell_candidates(user.id, query.season, query.player_id, template)
                .await?;
        }
    }

    Ok(Json(response).into_response())
}

/// Validate, gate, and submit a batch of offers.
///
/// The batch consumes exactly one unit of mass-offer quota regardless of
/// size; an entitlement denial is a normal response, not an error.
pub async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SendRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let trade_service =
        TradeService::new(&state.db, &state.config, &state.gateway, &state.host_locks);

    // Validation happens before the gate so a malformed batch never burns
    // quota, and before any network call.
    let prepared = trade_service
        .prepare_offers(user.id, body.season, &body.drafts)
        .await?;

    let gate = EntitlementService::new(&state.db, &state.config);
    let decision = gate
        .consume_mass_offer(&user, prepared.len() as u32, Utc::now().date_naive())
        .await?;

    if let Decision::Denied { reason } = decision {
        return Ok(Json(SendResult {
            denied: Some(reason),
            outcomes: Vec::new(),
        })
        .into_response());
    }

    let outcomes = trade_service.submit_batch(&user, prepared).await;

    Ok(Json(SendResult {
        denied: None,
        outcomes,
    })
    .into_response())
}
