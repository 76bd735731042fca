use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Per-league outcome of a sync batch. Batches always report item-by-item;
/// there is no aggregate pass/fail.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub league_remote_id: String,
    pub league_name: String,
    pub status: SyncStatus,
    pub message: Option<String>,
    pub teams_touched: u32,
    pub rosters_inserted: u32,
    pub picks_inserted: u32,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    Failed,
    /// The remote host rejected our session; the user must re-link.
    AuthExpired,
}

/// One checkbox row from the league-selection form.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSelection {
    pub remote_id: String,
    pub name: String,
    pub franchise_id: Option<String>,
}

/// Request body applying a league selection for a season.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub season: i32,
    pub selections: Vec<LeagueSelection>,
}

/// League row for the "my leagues" listing.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub remote_id: String,
    pub name: String,
    pub season: i32,
    pub franchise_id: Option<String>,
    pub host: Option<String>,
    pub starter_slots: Option<String>,
    pub synced_at: Option<NaiveDateTime>,
}

/// A franchise's persisted roster and pick holdings.
#[derive(Debug, Clone, Serialize)]
pub struct RosterListing {
    pub franchise_remote_id: String,
    pub franchise_name: String,
    pub players: Vec<RosterPlayer>,
    pub picks: Vec<PickSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterPlayer {
    pub player_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub is_starter: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickSummary {
    pub id: i32,
    pub season: i32,
    pub round: i32,
    pub pick_number: Option<i32>,
    pub original_franchise: Option<String>,
}
