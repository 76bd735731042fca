use std::collections::BTreeMap;

use roxmltree::Node;

use crate::error::Error;
use crate::parser::{
    attr_any, is_error_root, parse_document,
    pick::{normalize_fid, PickToken},
};

/// One franchise's holdings: rostered players plus owned future picks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FranchiseAssets {
    pub franchise_id: String,
    pub players: Vec<i64>,
    pub picks: Vec<PickToken>,
}

/// True when the payload carried nothing usable, the trigger for the
/// rosters + futureDraftPicks fallback chain.
pub fn all_empty(assets: &[FranchiseAssets]) -> bool {
    assets
        .iter()
        .all(|fr| fr.players.is_empty() && fr.picks.is_empty())
}

/// Parse the primary `assets` export (players and future picks in one call).
pub fn parse_assets(xml: &str) -> Result<Vec<FranchiseAssets>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for franchise in doc.descendants().filter(|n| n.has_tag_name("franchise")) {
        let Some(fid) = attr_any(&franchise, &["id"]) else {
            continue;
        };

        out.push(FranchiseAssets {
            franchise_id: normalize_fid(fid),
            players: player_ids(&franchise),
            picks: pick_tokens(&franchise),
        });
    }

    Ok(out)
}

/// Parse the `rosters` export: players only, no picks.
///
/// Handles nested `<players><player/></players>`, direct `<player/>`
/// children, and the CSV attribute variants `players="1,2,3"` /
/// `player="1,2,3"` seen on some feeds.
pub fn parse_rosters(xml: &str) -> Result<Vec<FranchiseAssets>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for franchise in doc.descendants().filter(|n| n.has_tag_name("franchise")) {
        let Some(fid) = attr_any(&franchise, &["id"]) else {
            continue;
        };

        let mut players = player_ids(&franchise);
        if players.is_empty() {
            if let Some(csv) = attr_any(&franchise, &["players", "player"]) {
                players = csv
                    .split(',')
                    .filter_map(|tok| tok.trim().parse().ok())
                    .collect();
            }
        }

        out.push(FranchiseAssets {
            franchise_id: normalize_fid(fid),
            players,
            picks: Vec::new(),
        });
    }

    Ok(out)
}

/// Parse the `futureDraftPicks` export into a per-franchise pick map.
pub fn parse_future_picks(xml: &str) -> Result<BTreeMap<String, Vec<PickToken>>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(BTreeMap::new());
    }

    let mut out = BTreeMap::new();
    for franchise in doc.descendants().filter(|n| n.has_tag_name("franchise")) {
        let Some(fid) = attr_any(&franchise, &["id"]) else {
            continue;
        };

        let mut picks = pick_tokens(&franchise);

        // Rare variants: <pick>FP_..</pick> text nodes, or a CSV attribute.
        if picks.is_empty() {
            picks = franchise
                .children()
                .filter(|n| n.has_tag_name("pick"))
                .filter_map(|n| n.text())
                .filter_map(PickToken::parse)
                .collect();
        }
        if picks.is_empty() {
            if let Some(csv) = attr_any(&franchise, &["picks"]) {
                picks = csv.split(',').filter_map(PickToken::parse).collect();
            }
        }

        out.insert(normalize_fid(fid), picks);
    }

    Ok(out)
}

/// Merge the two fallback feeds by franchise id.
///
/// A franchise appearing in only one feed still appears in the result with
/// an empty list for the missing half.
pub fn merge_fallback(
    rosters: Vec<FranchiseAssets>,
    picks: BTreeMap<String, Vec<PickToken>>,
) -> Vec<FranchiseAssets> {
    let mut merged: BTreeMap<String, FranchiseAssets> = rosters
        .into_iter()
        .map(|fr| (fr.franchise_id.clone(), fr))
        .collect();

    for (fid, franchise_picks) in picks {
        merged
            .entry(fid.clone())
            .or_insert_with(|| FranchiseAssets {
                franchise_id: fid,
                ..Default::default()
            })
            .picks = franchise_picks;
    }

    merged.into_values().collect()
}

fn player_ids(franchise: &Node) -> Vec<i64> {
    let nodes: Vec<Node> = match franchise.children().find(|n| n.has_tag_name("players")) {
        Some(parent) => parent
            .children()
            .filter(|n| n.has_tag_name("player"))
            .collect(),
        None => franchise
            .children()
            .filter(|n| n.has_tag_name("player"))
            .collect(),
    };

    nodes
        .iter()
        .filter_map(|node| attr_any(node, &["id"]))
        .filter_map(|id| id.parse().ok())
        .collect()
}

fn pick_tokens(franchise: &Node) -> Vec<PickToken> {
    let nodes: Vec<Node> = match franchise
        .children()
        .find(|n| n.has_tag_name("futureYearDraftPicks"))
    {
        Some(parent) => parent
            .children()
            .filter(|n| n.has_tag_name("draftPick"))
            .collect(),
        None => franchise
            .children()
            .filter(|n| n.has_tag_name("draftPick"))
            .collect(),
    };

    nodes
        .iter()
        .filter_map(|node| attr_any(node, &["pick"]))
        .filter_map(PickToken::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSETS_XML: &str = r#"<assets>
        <franchise id="0002">
            <players>
                <player id="13593"/>
                <player id="15241"/>
                <player id="14109"/>
            </players>
            <futureYearDraftPicks>
                <draftPick pick="FP_0002_2026_1"/>
                <draftPick pick="FP_0002_2026_2"/>
                <draftPick pick="garbage"/>
            </futureYearDraftPicks>
        </franchise>
    </assets>"#;

    mod parse_assets {
        use super::*;

        /// Expect players and valid picks, with malformed tokens discarded
        #[test]
        fn parses_players_and_picks() {
            let assets = parse_assets(ASSETS_XML).unwrap();

            assert_eq!(assets.len(), 1);
            assert_eq!(assets[0].franchise_id, "0002");
            assert_eq!(assets[0].players, vec![13593, 15241, 14109]);
            assert_eq!(assets[0].picks.len(), 2);
            assert_eq!(assets[0].picks[0].season, 2026);
            assert_eq!(assets[0].picks[0].round, 1);
        }

        /// Expect an error document to yield an empty list
        #[test]
        fn error_root_yields_empty() {
            let assets = parse_assets("<error>assets blocked</error>").unwrap();
            assert!(assets.is_empty());
        }

        /// Expect franchise ids to be normalized
        #[test]
        fn normalizes_franchise_ids() {
            let assets =
                parse_assets(r#"<assets><franchise id="2"><player id="1"/></franchise></assets>"#)
                    .unwrap();
            assert_eq!(assets[0].franchise_id, "0002");
        }
    }

    mod parse_rosters {
        use super::*;

        /// Expect nested, direct, and CSV-attribute shapes to all parse
        #[test]
        fn handles_all_shapes() {
            let xml = r#"<rosters>
                <franchise id="0001"><players><player id="1"/><player id="2"/></players></franchise>
                <franchise id="0002"><player id="3"/></franchise>
                <franchise id="0003" players="4, 5"/>
            </rosters>"#;

            let rosters = parse_rosters(xml).unwrap();
            assert_eq!(rosters[0].players, vec![1, 2]);
            assert_eq!(rosters[1].players, vec![3]);
            assert_eq!(rosters[2].players, vec![4, 5]);
            assert!(rosters.iter().all(|fr| fr.picks.is_empty()));
        }
    }

    mod parse_future_picks {
        use super::*;

        /// Expect element, text-node, and CSV variants to all parse
        #[test]
        fn handles_all_shapes() {
            let xml = r#"<futureDraftPicks>
                <franchise id="0001">
                    <futureYearDraftPicks><draftPick pick="FP_0001_2026_1"/></futureYearDraftPicks>
                </franchise>
                <franchise id="0002"><pick>FP_0002_2027_2</pick></franchise>
                <franchise id="0003" picks="FP_0003_2026_3,FP_0003_2027_1"/>
            </futureDraftPicks>"#;

            let picks = parse_future_picks(xml).unwrap();
            assert_eq!(picks["0001"].len(), 1);
            assert_eq!(picks["0002"][0].season, 2027);
            assert_eq!(picks["0003"].len(), 2);
        }
    }

    mod merge_fallback {
        use super::*;

        /// Expect franchises present in only one feed to survive the merge
        #[test]
        fn unions_by_franchise_id() {
            let rosters = vec![FranchiseAssets {
                franchise_id: "0001".to_string(),
                players: vec![10],
                picks: Vec::new(),
            }];
            let mut picks = BTreeMap::new();
            picks.insert(
                "0002".to_string(),
                vec![PickToken {
                    original: "0002".to_string(),
                    season: 2026,
                    round: 1,
                }],
            );

            let merged = merge_fallback(rosters, picks);
            assert_eq!(merged.len(), 2);

            let roster_only = merged.iter().find(|f| f.franchise_id == "0001").unwrap();
            assert_eq!(roster_only.players, vec![10]);
            assert!(roster_only.picks.is_empty());

            let picks_only = merged.iter().find(|f| f.franchise_id == "0002").unwrap();
            assert!(picks_only.players.is_empty());
            assert_eq!(picks_only.picks.len(), 1);
        }
    }

    mod all_empty {
        use super::*;

        /// Expect empty payloads and all-zero payloads to trigger fallback
        #[test]
        fn detects_blocked_payloads() {
            assert!(all_empty(&[]));
            assert!(all_empty(&[FranchiseAssets {
                franchise_id: "0001".to_string(),
                ..Default::default()
            }]));
            assert!(!all_empty(&parse_assets(ASSETS_XML).unwrap()));
        }
    }
}
