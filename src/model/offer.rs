use serde::{Deserialize, Serialize};

use crate::model::sync::PickSummary;

/// Whether the user is acquiring the player or shopping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferMode {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize)]
pub struct FranchiseRef {
    pub remote_id: String,
    pub name: String,
    pub record: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueRef {
    pub remote_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundPicks {
    pub round: i32,
    pub picks: Vec<PickSummary>,
}

/// A league where a buy offer for the player is possible: the user does not
/// roster them, the counterparty does, and the user's pick stock meets the
/// selected price template.
#[derive(Debug, Clone, Serialize)]
pub struct BuyCandidate {
    pub league: LeagueRef,
    pub my_franchise: FranchiseRef,
    pub counterparty: FranchiseRef,
    pub my_picks_by_round: Vec<RoundPicks>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellBuyer {
    pub franchise: FranchiseRef,
    pub picks_by_round: Vec<RoundPicks>,
}

/// A league where the user rosters the player and at least one other
/// franchise can pay the selected price template.
#[derive(Debug, Clone, Serialize)]
pub struct SellCandidate {
    pub league: LeagueRef,
    pub my_franchise: FranchiseRef,
    pub buyers: Vec<SellBuyer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeBuyer {
    pub franchise: FranchiseRef,
    pub receive_picks: Vec<PickSummary>,
}

/// Pick-upgrade candidate: the user rosters the player and holds a pick in
/// the give round; buyers hold at least one pick in the receive round.
/// A league with the player but no give-round pick renders disabled.
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeCandidate {
    pub league: LeagueRef,
    pub my_franchise: FranchiseRef,
    pub my_give_picks: Vec<PickSummary>,
    pub buyers: Vec<UpgradeBuyer>,
    pub disabled_reason: Option<String>,
}

/// One user-confirmed offer, exactly as checked in the builder. Only the
/// explicitly selected picks are encoded; nothing is auto-chosen.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferDraft {
    pub league_remote_id: String,
    pub counterparty_fid: String,
    #[serde(default)]
    pub give_player: Option<i64>,
    #[serde(default)]
    pub give_pick_ids: Vec<i32>,
    #[serde(default)]
    pub receive_player: Option<i64>,
    #[serde(default)]
    pub receive_pick_ids: Vec<i32>,
    #[serde(default)]
    pub comments: String,
}

/// A validated offer ready for submission. Plain data: built on the request
/// task from database state, then handed to network workers untouched.
#[derive(Debug, Clone)]
pub struct PreparedOffer {
    pub host: Option<String>,
    pub league_remote_id: String,
    pub league_name: String,
    pub season: i32,
    pub offered_to: String,
    pub will_give_up: Vec<String>,
    pub will_receive: Vec<String>,
    pub comments: String,
    pub expires_ts: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Ok,
    Error,
    /// The call timed out after the request may have reached the host; the
    /// proposal is never retried because a duplicate could already exist.
    Unknown,
}

/// Per-offer result row returned to the caller for display.
#[derive(Debug, Clone, Serialize)]
pub struct OfferOutcome {
    pub league_remote_id: String,
    pub league_name: String,
    pub status: OfferStatus,
    pub message: String,
}

/// Request body for the send endpoint.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub season: i32,
    pub drafts: Vec<OfferDraft>,
}

/// Result of a send action: either the entitlement gate denied it, or every
/// offer carries its own outcome.
#[derive(Debug, Serialize)]
pub struct SendResult {
    pub denied: Option<String>,
    pub outcomes: Vec<OfferOutcome>,
}
