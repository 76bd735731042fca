use chrono::{DateTime, Utc};
use serde::Serialize;

/// A future pick inside a trade side, already decoded from its token form.
#[derive(Debug, Clone, Serialize)]
pub struct TradePick {
    pub season: i32,
    pub round: i32,
    pub original_franchise: String,
}

/// One pending trade normalized from the viewer's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct TradeRow {
    pub league_remote_id: String,
    pub league_name: String,
    pub trade_id: String,
    /// "received", "sent", or "unknown"; unknown is surfaced as its own
    /// bucket rather than silently treated as received.
    pub direction: String,
    pub from_fid: String,
    pub to_fid: String,
    pub from_name: String,
    pub to_name: String,
    pub players_out: Vec<i64>,
    pub players_in: Vec<i64>,
    pub picks_out: Vec<TradePick>,
    pub picks_in: Vec<TradePick>,
    pub comments: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Deep link to the league's own trade screen.
    pub view_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueTradeSummary {
    pub remote_id: String,
    pub name: String,
    pub count: usize,
    pub errors: Vec<String>,
}

/// The full pending-trades feed for a user, cached briefly per process.
#[derive(Debug, Clone, Serialize)]
pub struct TradesFeed {
    pub rows: Vec<TradeRow>,
    pub per_league: Vec<LeagueTradeSummary>,
    pub fetched_at: DateTime<Utc>,
}
