use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LiveStarterRow {
    pub player_id: String,
    pub name: Option<String>,
    pub score: f64,
    pub seconds_remaining: i64,
    pub minutes_remaining: i64,
}

/// One league's current matchup tile.
#[derive(Debug, Clone, Serialize)]
pub struct LiveTile {
    pub league_remote_id: String,
    pub league_name: String,
    pub week: Option<i32>,
    pub my_name: Option<String>,
    pub opp_name: Option<String>,
    pub my_score: f64,
    pub opp_score: f64,
    pub my_progress_pct: u8,
    pub opp_progress_pct: u8,
    pub my_starters: Vec<LiveStarterRow>,
    pub opp_starters: Vec<LiveStarterRow>,
    /// Set when no matchup data was available for this league.
    pub note: Option<String>,
}

/// Cross-league "roster showdown" totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiveAggregate {
    pub my_total_score: f64,
    pub opp_total_score: f64,
    pub my_progress_pct: u8,
    pub opp_progress_pct: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveDashboard {
    pub tiles: Vec<LiveTile>,
    pub aggregate: LiveAggregate,
    pub fetched_at: DateTime<Utc>,
}

/// A player's injury status aggregated across every league that rosters them.
#[derive(Debug, Clone, Serialize)]
pub struct InjuredPlayer {
    pub player_id: i64,
    pub name: String,
    pub status: String,
    pub details: Option<String>,
    pub leagues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InjuryDigest {
    pub rows: Vec<InjuredPlayer>,
    pub fetched_at: DateTime<Utc>,
}
