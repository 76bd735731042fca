use crate::error::Error;
use crate::parser::{attr_any, is_error_root, parse_document, pick::normalize_fid};

/// One franchise's standings line. Rank is the 1-based document order when
/// the payload carries no explicit rank.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub franchise_id: String,
    pub name: Option<String>,
    pub record: String,
    pub points_for: f64,
    pub points_against: f64,
    pub rank: i32,
}

pub fn parse_standings(xml: &str) -> Result<Vec<StandingRow>, Error> {
    let doc = parse_document(xml)?;
    if is_error_root(&doc) {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for franchise in doc.descendants().filter(|n| n.has_tag_name("franchise")) {
        let Some(fid) = attr_any(&franchise, &["id"]) else {
            continue;
        };

        rows.push(StandingRow {
            franchise_id: normalize_fid(fid),
            name: attr_any(&franchise, &["name", "fname"]).map(str::to_string),
            record: attr_any(&franchise, &["h2hwlt"])
                .unwrap_or("0-0-0")
                .to_string(),
            points_for: attr_any(&franchise, &["pf"])
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0.0),
            points_against: attr_any(&franchise, &["pa"])
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0.0),
            rank: rows.len() as i32 + 1,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect ranks to follow document order and defaults to fill gaps
    #[test]
    fn parses_rows_in_order() {
        let xml = r#"<leagueStandings>
            <franchise id="0003" h2hwlt="4-1-0" pf="512.5" pa="401.25"/>
            <franchise id="1" pf="bad"/>
        </leagueStandings>"#;

        let rows = parse_standings(xml).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].franchise_id, "0003");
        assert_eq!(rows[0].record, "4-1-0");
        assert_eq!(rows[0].points_for, 512.5);
        assert_eq!(rows[0].rank, 1);

        assert_eq!(rows[1].franchise_id, "0001");
        assert_eq!(rows[1].record, "0-0-0");
        assert_eq!(rows[1].points_for, 0.0);
        assert_eq!(rows[1].rank, 2);
    }

    /// Expect an error document to yield no rows
    #[test]
    fn error_root_yields_empty() {
        assert!(parse_standings("<error>nope</error>").unwrap().is_empty());
    }
}
