use roxmltree::Node;

use crate::error::Error;
use crate::parser::{attr_any, is_error_root, parse_document, pick::normalize_fid};

/// Assumed game length when computing progress.
const SECONDS_PER_GAME: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct LiveStarter {
    pub player_id: String,
    pub score: f64,
    pub seconds_remaining: i64,
}

impl LiveStarter {
    pub fn minutes_remaining(&self) -> i64 {
        (self.seconds_remaining.max(0) + 59) / 60
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveSide {
    pub franchise_id: String,
    pub score: f64,
    pub starters: Vec<LiveStarter>,
}

impl LiveSide {
    /// Team progress as the percentage of starter game-minutes already
    /// played, clamped to 0..=100.
    pub fn progress_pct(&self) -> u8 {
        if self.starters.is_empty() {
            return 0;
        }

        let played: i64 = self
            .starters
            .iter()
            .map(|s| (SECONDS_PER_GAME - s.seconds_remaining.clamp(0, SECONDS_PER_GAME)).max(0))
            .sum();
        let total = self.starters.len() as i64 * SECONDS_PER_GAME;

        (((played as f64 / total as f64) * 100.0).round() as i64).clamp(0, 100) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveMatchup {
    pub week: Option<i32>,
    pub mine: LiveSide,
    pub opponent: LiveSide,
}

/// Find the matchup containing the viewer's franchise, keeping starters only.
/// Returns `Ok(None)` when no matchup includes the franchise.
pub fn parse_live_scoring(xml: &str, my_fid: &str) -> Result<Option<LiveMatchup>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(None);
    }

    let mine = normalize_fid(my_fid);
    let week = attr_any(&doc.root_element(), &["week"]).and_then(|raw| raw.parse().ok());

    for matchup in doc.descendants().filter(|n| n.has_tag_name("matchup")) {
        let franchises: Vec<Node> = matchup
            .children()
            .filter(|n| n.has_tag_name("franchise"))
            .collect();
        if franchises.len() < 2 {
            continue;
        }

        let Some(index) = franchises.iter().position(|f| {
            attr_any(f, &["id"])
                .map(normalize_fid)
                .is_some_and(|fid| fid == mine)
        }) else {
            continue;
        };

        let my_side = extract_side(&franchises[index]);
        let opp_side = extract_side(&franchises[if index == 0 { 1 } else { 0 }]);

        return Ok(Some(LiveMatchup {
            week,
            mine: my_side,
            opponent: opp_side,
        }));
    }

    Ok(None)
}

fn extract_side(franchise: &Node) -> LiveSide {
    let mut starters = Vec::new();
    if let Some(players) = franchise.children().find(|n| n.has_tag_name("players")) {
        for player in players.children().filter(|n| n.has_tag_name("player")) {
            let status = attr_any(&player, &["status"]).unwrap_or("");
            if !status.eq_ignore_ascii_case("starter") {
                continue;
            }
            starters.push(LiveStarter {
                player_id: attr_any(&player, &["id"]).unwrap_or("").to_string(),
                score: attr_any(&player, &["score"])
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(0.0),
                seconds_remaining: attr_any(&player, &["gameSecondsRemaining"])
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(0),
            });
        }
    }

    LiveSide {
        franchise_id: attr_any(franchise, &["id"])
            .map(normalize_fid)
            .unwrap_or_default(),
        score: attr_any(franchise, &["score"])
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0.0),
        starters,
    }
}

/// One player's injury-report line.
#[derive(Debug, Clone, PartialEq)]
pub struct InjuryRow {
    pub player_id: i64,
    pub status: String,
    pub details: Option<String>,
}

/// Parse the league-wide injuries export.
pub fn parse_injuries(xml: &str) -> Result<Vec<InjuryRow>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for injury in doc.descendants().filter(|n| n.has_tag_name("injury")) {
        let Some(player_id) = attr_any(&injury, &["id", "player_id"]).and_then(|raw| raw.parse().ok())
        else {
            continue;
        };
        let Some(status) = attr_any(&injury, &["status"]) else {
            continue;
        };

        rows.push(InjuryRow {
            player_id,
            status: status.to_string(),
            details: attr_any(&injury, &["details", "exp_return"]).map(str::to_string),
        });
    }

    Ok(rows)
}
