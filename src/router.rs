//! HTTP route registration.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{controller, model::app::AppState};

/// Build the application's router.
///
/// # Registered Endpoints
/// - `POST /api/account/link` - Link the remote commissioner account
/// - `GET  /api/leagues` - Linked leagues with sync status
/// - `POST /api/leagues/selection` - Apply league selection and sync
/// - `POST /api/leagues/sync` - Re-sync every linked league
/// - `GET  /api/leagues/{remote_id}/rosters` - Roster/pick listings
/// - `GET  /api/offers/candidates` - Offer-builder candidates
/// - `POST /api/offers/send` - Gate and submit a mass-offer batch
/// - `GET  /api/trades` - Pending-trades feed
/// - `GET  /api/live` - Live scoring dashboard
/// - `GET  /api/injuries` - Injury digest
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/account/link", post(controller::session::link_account))
        .route("/api/leagues", get(controller::league::list_leagues))
        .route(
            "/api/leagues/selection",
            post(controller::league::apply_selection),
        )
        .route("/api/leagues/sync", post(controller::league::resync_all))
        .route(
            "/api/leagues/{remote_id}/rosters",
            get(controller::league::league_rosters),
        )
        .route("/api/offers/candidates", get(controller::offer::candidates))
        .route("/api/offers/send", post(controller::offer::send))
        .route("/api/trades", get(controller::trades::open_trades))
        .route("/api/live", get(controller::live::dashboard))
        .route("/api/injuries", get(controller::live::injuries))
}
