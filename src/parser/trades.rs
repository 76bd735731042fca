use chrono::{DateTime, Utc};
use roxmltree::Node;

use crate::error::Error;
use crate::parser::{
    attr_any, is_error_root, parse_document,
    pick::{normalize_fid, parse_asset_csv, AssetToken},
};

/// Trade statuses that mean the proposal is no longer open. Anything in this
/// list is filtered out at parse time; only genuinely pending trades surface.
const CLOSED_STATUSES: [&str; 6] = [
    "completed",
    "accepted",
    "processed",
    "rejected",
    "declined",
    "cancelled",
];

/// An in-flight proposal between two franchises.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTrade {
    pub trade_id: String,
    /// Proposing franchise.
    pub offered_by: String,
    /// Franchise the proposal was sent to.
    pub offered_to: String,
    /// Assets the proposer surrenders.
    pub will_give_up: Vec<AssetToken>,
    /// Assets the proposer receives (the counterparty's side).
    pub will_receive: Vec<AssetToken>,
    pub comments: String,
    pub description: String,
    pub proposed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Parse result: the open trades plus a count of elements no shape matcher
/// accepted. The count is surfaced so "unparseable" is distinguishable from
/// "no trades".
#[derive(Debug, Default)]
pub struct ParsedTrades {
    pub trades: Vec<PendingTrade>,
    pub unparseable: usize,
}

/// Whether a trade reads as received, sent, or neither for a given viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Received,
    Sent,
    /// The viewer is not identifiable as proposer or proposee. Surfaced as
    /// its own bucket; callers decide how to render it.
    Unknown,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
            Self::Unknown => "unknown",
        }
    }
}

pub fn classify_direction(trade: &PendingTrade, my_fid: &str) -> TradeDirection {
    let mine = normalize_fid(my_fid);
    if !mine.is_empty() && trade.offered_to == mine {
        TradeDirection::Received
    } else if !mine.is_empty() && trade.offered_by == mine {
        TradeDirection::Sent
    } else {
        TradeDirection::Unknown
    }
}

/// Pending-trade payloads appear in three incompatible shapes depending on
/// the host's software version. Each matcher is a structural predicate; they
/// are tried in order and the first that yields a resolvable trade wins.
type ShapeMatcher = fn(&Node) -> Option<PendingTrade>;

const SHAPE_MATCHERS: [ShapeMatcher; 3] = [
    match_nested_offer,
    match_franchise_blocks,
    match_flat_attributes,
];

pub fn parse_pending_trades(xml: &str) -> Result<ParsedTrades, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc)
        || doc
            .descendants()
            .any(|n| n.is_element() && n.has_tag_name("error"))
    {
        // A rejected call is "no data", not an exception; the caller decides
        // how to notify the user.
        return Ok(ParsedTrades::default());
    }

    let mut parsed = ParsedTrades::default();
    for element in doc.descendants().filter(|n| n.has_tag_name("pendingTrade")) {
        if let Some(status) = attr_any(&element, &["status"]) {
            if CLOSED_STATUSES.contains(&status.to_ascii_lowercase().as_str()) {
                continue;
            }
        }

        match SHAPE_MATCHERS.iter().find_map(|matcher| matcher(&element)) {
            Some(trade) => parsed.trades.push(trade),
            None => {
                parsed.unparseable += 1;
                tracing::warn!(
                    trade_id = attr_any(&element, &["trade_id", "id"]).unwrap_or("?"),
                    "pending trade matched no known payload shape"
                );
            }
        }
    }

    Ok(parsed)
}

fn epoch_attr(node: &Node, name: &str) -> Option<DateTime<Utc>> {
    attr_any(node, &[name])
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn trade_shell(element: &Node, offered_by: String, offered_to: String) -> Option<PendingTrade> {
    let trade_id = attr_any(element, &["trade_id", "id"])?;
    if offered_by.is_empty() || offered_to.is_empty() {
        return None;
    }

    Some(PendingTrade {
        trade_id: trade_id.to_string(),
        offered_by,
        offered_to,
        will_give_up: Vec::new(),
        will_receive: Vec::new(),
        comments: attr_any(element, &["comments"]).unwrap_or("").to_string(),
        description: attr_any(element, &["description"]).unwrap_or("").to_string(),
        proposed_at: epoch_attr(element, "timestamp"),
        expires_at: epoch_attr(element, "expires"),
    })
}

/// The side a franchise node surrenders: a CSV attribute or a CSV child
/// element, under any of the known spellings.
fn franchise_side(node: &Node) -> Vec<AssetToken> {
    if let Some(csv) = attr_any(node, &["willGiveUp", "will_give_up", "gives"]) {
        return parse_asset_csv(csv);
    }

    for name in ["willGive", "willGiveUp", "gives"] {
        if let Some(child) = node.children().find(|n| n.has_tag_name(name)) {
            if let Some(text) = child.text() {
                return parse_asset_csv(text);
            }
        }
    }

    Vec::new()
}

/// Shape: `<pendingTrade><offer><franchise .../><franchise .../></offer></pendingTrade>`,
/// proposer first.
fn match_nested_offer(element: &Node) -> Option<PendingTrade> {
    let offer = element.children().find(|n| n.has_tag_name("offer"))?;
    let franchises: Vec<Node> = offer
        .children()
        .filter(|n| n.has_tag_name("franchise"))
        .collect();

    let proposer = franchises.first()?;
    let proposee = franchises.get(1)?;

    build_from_franchise_pair(element, proposer, proposee)
}

/// Shape: sibling `<franchise><willGive>...</willGive></franchise>` blocks
/// directly under the trade element, proposer first.
fn match_franchise_blocks(element: &Node) -> Option<PendingTrade> {
    let franchises: Vec<Node> = element
        .children()
        .filter(|n| n.has_tag_name("franchise"))
        .collect();

    let proposer = franchises.first()?;
    let proposee = franchises.get(1)?;

    build_from_franchise_pair(element, proposer, proposee)
}

fn build_from_franchise_pair(
    element: &Node,
    proposer: &Node,
    proposee: &Node,
) -> Option<PendingTrade> {
    let offered_by = attr_any(proposer, &["id", "franchise_id"]).map(normalize_fid)?;
    let offered_to = attr_any(proposee, &["id", "franchise_id"]).map(normalize_fid)?;

    let will_give_up = franchise_side(proposer);
    let will_receive = franchise_side(proposee);
    if will_give_up.is_empty() && will_receive.is_empty() {
        return None;
    }

    let mut trade = trade_shell(element, offered_by, offered_to)?;
    trade.will_give_up = will_give_up;
    trade.will_receive = will_receive;
    Some(trade)
}

/// Shape: flat attribute-only
/// `<pendingTrade offeringteam=... offeredto=... will_give_up="csv" will_receive="csv"/>`.
fn match_flat_attributes(element: &Node) -> Option<PendingTrade> {
    let offered_by = attr_any(element, &["offeringteam", "offering_team"]).map(normalize_fid)?;
    let offered_to = attr_any(element, &["offeredto", "offered_to"]).map(normalize_fid)?;

    let mut trade = trade_shell(element, offered_by, offered_to)?;
    trade.will_give_up = attr_any(element, &["will_give_up"])
        .map(parse_asset_csv)
        .unwrap_or_default();
    trade.will_receive = attr_any(element, &["will_receive"])
        .map(parse_asset_csv)
        .unwrap_or_default();
    Some(trade)
}
