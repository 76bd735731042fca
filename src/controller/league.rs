use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    controller::util::current_user,
    data::{
        draft_pick::DraftPickRepository, franchise::FranchiseRepository, league::LeagueRepository,
        player::PlayerRepository, roster::RosterRepository,
    },
    error::Error,
    model::{
        app::AppState,
        sync::{LeagueSummary, PickSummary, RosterListing, RosterPlayer, SelectionRequest},
    },
    service::sync::SyncService,
};

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: i32,
}

/// The user's linked leagues with their sync status.
pub async fn list_leagues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let leagues = LeagueRepository::new(&state.db)
        .list_by_user_season(user.id, query.season)
        .await?;

    let summaries: Vec<LeagueSummary> = leagues
        .into_iter()
        .map(|league| LeagueSummary {
            remote_id: league.remote_id,
            name: league.name,
            season: league.season,
            franchise_id: league.franchise_id,
            host: league.host,
            starter_slots: league.starter_slots,
            synced_at: league.synced_at,
        })
        .collect();

    Ok(Json(summaries).into_response())
}

/// Apply a league selection and immediately sync the selected leagues.
/// Responds with one outcome per league, never an aggregate pass/fail.
pub async fn apply_selection(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SelectionRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let service = SyncService::new(&state.db, &state.config, &state.gateway, &state.host_locks);
    let targets = service
        .apply_selection(user.id, body.season, &body.selections)
        .await?;
    let outcomes = service.sync_leagues(&user, &targets).await;

    Ok(Json(outcomes).into_response())
}

/// Re-sync every linked league for the season.
pub async fn resync_all(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let leagues = LeagueRepository::new(&state.db)
        .list_by_user_season(user.id, query.season)
        .await?;

    let service = SyncService::new(&state.db, &state.config, &state.gateway, &state.host_locks);
    let outcomes = service.sync_leagues(&user, &leagues).await;

    Ok(Json(outcomes).into_response())
}

/// Per-franchise roster and pick listings for one league.
pub async fn league_rosters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(remote_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let user = match current_user(&state, &headers).await? {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let Some(league) = LeagueRepository::new(&state.db)
        .find_by_remote_id(user.id, &remote_id)
        .await?
    else {
        return Ok(Json(Vec::<RosterListing>::new()).into_response());
    };

    let franchise_repo = FranchiseRepository::new(&state.db);
    let roster_repo = RosterRepository::new(&state.db);
    let pick_repo = DraftPickRepository::new(&state.db);
    let player_repo = PlayerRepository::new(&state.db);

    let mut listings = Vec::new();
    for franchise in franchise_repo.list_by_league(league.id).await? {
        let entries = roster_repo.list_for_franchise(franchise.id).await?;
        let player_ids: Vec<i64> = entries.iter().map(|entry| entry.player_id).collect();
        let players = player_repo.get_many(&player_ids).await?;

        let roster = entries
            .iter()
            .map(|entry| {
                let catalog = players.iter().find(|player| player.id == entry.player_id);
                RosterPlayer {
                    player_id: entry.player_id,
                    name: catalog
                        .map(|player| player.name.clone())
                        .unwrap_or_else(|| format!("Player #{}", entry.player_id)),
                    position: catalog.and_then(|player| player.position.clone()),
                    nfl_team: catalog.and_then(|player| player.nfl_team.clone()),
                    is_starter: entry.is_starter,
                }
            })
            .collect();

        let picks = pick_repo
            .list_for_franchise(franchise.id)
            .await?
            .into_iter()
            .map(|pick| PickSummary {
                id: pick.id,
                season: pick.season,
                round: pick.round,
                pick_number: pick.pick_number,
                original_franchise: pick.original_franchise,
            })
            .collect();

        listings.push(RosterListing {
            franchise_remote_id: franchise.remote_id,
            franchise_name: franchise.name,
            players: roster,
            picks,
        });
    }

    Ok(Json(listings).into_response())
}
