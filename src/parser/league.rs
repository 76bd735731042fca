use std::collections::BTreeMap;

use roxmltree::Node;

use crate::error::Error;
use crate::parser::{attr_any, is_error_root, parse_document, pick::normalize_fid};

/// One league in the user's remote directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryLeague {
    pub remote_id: String,
    pub name: String,
    pub season: i32,
    pub franchise_id: Option<String>,
    pub host: Option<String>,
}

/// Franchise display metadata from the league-info payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FranchiseMeta {
    pub name: Option<String>,
    pub owner_name: Option<String>,
}

/// Parsed league-info payload.
#[derive(Debug, Clone, Default)]
pub struct LeagueInfo {
    pub franchises: BTreeMap<String, FranchiseMeta>,
    pub starter_slots: Option<String>,
    /// League home host extracted from the `baseURL` attribute.
    pub host: Option<String>,
}

/// Parse the user's league directory.
///
/// Tolerant to the known variants: franchise id as an attribute
/// (`franchise_id`/`franchiseId`) or as a nested `<franchise id=...>`, and
/// `league_id`/`season` attribute spellings.
pub fn parse_league_directory(xml: &str) -> Result<Vec<DirectoryLeague>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for league in doc.descendants().filter(|n| n.has_tag_name("league")) {
        let Some(remote_id) = attr_any(&league, &["id", "league_id"]) else {
            continue;
        };

        let name = attr_any(&league, &["name"])
            .map(str::to_string)
            .unwrap_or_else(|| format!("League {remote_id}"));
        let season = attr_any(&league, &["year", "season"])
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        let franchise_id = attr_any(&league, &["franchise_id", "franchiseId"])
            .map(normalize_fid)
            .or_else(|| {
                league
                    .descendants()
                    .find(|n| n.has_tag_name("franchise"))
                    .and_then(|fr| attr_any(&fr, &["id"]))
                    .map(normalize_fid)
            });

        let host = attr_any(&league, &["url", "homeURL", "host"]).and_then(host_from_url);

        out.push(DirectoryLeague {
            remote_id: remote_id.to_string(),
            name,
            season,
            franchise_id,
            host,
        });
    }

    Ok(out)
}

/// Parse league metadata: franchise names/owners, the starter-requirement
/// string, and the league's home host.
pub fn parse_league_info(xml: &str) -> Result<LeagueInfo, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(LeagueInfo::default());
    }

    let root = doc.root_element();

    let host = doc
        .descendants()
        .find(|n| n.has_tag_name("league"))
        .and_then(|league| attr_any(&league, &["baseURL"]))
        .and_then(host_from_url);

    let mut franchises = BTreeMap::new();
    for franchise in doc.descendants().filter(|n| n.has_tag_name("franchise")) {
        let Some(fid) = attr_any(&franchise, &["id", "franchise_id"]) else {
            continue;
        };
        franchises.insert(
            normalize_fid(fid),
            FranchiseMeta {
                name: attr_any(&franchise, &["name"]).map(str::to_string),
                owner_name: attr_any(&franchise, &["owner_name", "ownerName"]).map(str::to_string),
            },
        );
    }

    Ok(LeagueInfo {
        franchises,
        starter_slots: starter_slots(&root),
        host,
    })
}

/// Reduce an origin or URL to a bare hostname.
fn host_from_url(url: &str) -> Option<String> {
    let rest = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Build the concise starters string, e.g. `QB:1,RB:2-4,WR:3-5,TE:1`.
///
/// Preference order: explicit `positionRules`/`rosterRequirements` blocks,
/// then any `<position>` element carrying attributes, then counting repeated
/// flat `<position>` text nodes. A `count` attribute on the starters block
/// becomes a leading `<total>:` prefix.
fn starter_slots(root: &Node) -> Option<String> {
    let body = scoped_positions(root)
        .or_else(|| {
            let nodes: Vec<Node> = root
                .descendants()
                .filter(|n| n.has_tag_name("position") && n.attributes().next().is_some())
                .collect();
            collect_positions(&nodes)
        })
        .or_else(|| counted_flat_positions(root))?;

    let total = root
        .descendants()
        .find(|n| n.has_tag_name("starters") || n.has_tag_name("starterPositions"))
        .and_then(|n| attr_any(&n, &["count", "total"]))
        .map(str::to_string);

    match total {
        Some(total) => Some(format!("{total}:{body}")),
        None => Some(body),
    }
}

fn scoped_positions(root: &Node) -> Option<String> {
    for scope in ["positionRules", "rosterRequirements"] {
        if let Some(block) = root.descendants().find(|n| n.has_tag_name(scope)) {
            let nodes: Vec<Node> = block
                .descendants()
                .filter(|n| n.has_tag_name("position"))
                .collect();
            if let Some(text) = collect_positions(&nodes) {
                return Some(text);
            }
        }
    }
    None
}

fn collect_positions(nodes: &[Node]) -> Option<String> {
    // Insertion-ordered so output mirrors document order.
    let mut seen: Vec<(String, String)> = Vec::new();

    for position in nodes {
        let Some(name) = attr_any(position, &["name", "position"]) else {
            continue;
        };

        let min = attr_any(position, &["min", "minStarters"]).unwrap_or("");
        let max = attr_any(position, &["max", "limit", "required", "count"]).unwrap_or("");

        let value = if !min.is_empty() && !max.is_empty() && min != max {
            format!("{min}-{max}")
        } else if !max.is_empty() {
            max.to_string()
        } else if !min.is_empty() {
            min.to_string()
        } else {
            "1".to_string()
        };

        if is_degenerate(&value) {
            continue;
        }

        match seen.iter_mut().find(|(n, _)| n == name) {
            None => seen.push((name.to_string(), value)),
            Some((_, prev)) => {
                // Keep the more permissive/explicit representation.
                if is_degenerate(prev) || (value.contains('-') && !prev.contains('-')) {
                    *prev = value;
                }
            }
        }
    }

    if seen.is_empty() {
        None
    } else {
        Some(
            seen.iter()
                .map(|(name, value)| format!("{name}:{value}"))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

fn is_degenerate(value: &str) -> bool {
    value == "0" || value == "0-0"
}

/// Last resort: count repeated `<position>QB</position>` text nodes inside a
/// starters block.
fn counted_flat_positions(root: &Node) -> Option<String> {
    let block = root
        .descendants()
        .find(|n| n.has_tag_name("starterPositions") || n.has_tag_name("starters"))?;

    let mut counts: Vec<(String, u32)> = Vec::new();
    for node in block.descendants().filter(|n| n.has_tag_name("position")) {
        let Some(name) = node.text().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }

    if counts.is_empty() {
        None
    } else {
        Some(
            counts
                .iter()
                .map(|(name, count)| format!("{name}:{count}"))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}
