/// Normalize franchise ids to the 4-character zero-padded canonical form.
/// Non-numeric ids pass through unchanged; host payloads are inconsistent
/// about padding, so every comparison and every stored id goes through here.
pub fn normalize_fid(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("{trimmed:0>4}")
    } else {
        trimmed.to_string()
    }
}

/// A future draft pick in its compound-token form:
/// `FP_<original-franchise>_<season>_<round>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickToken {
    pub original: String,
    pub season: i32,
    pub round: i32,
}

impl PickToken {
    /// Decode a token. Malformed tokens yield `None` and are discarded by
    /// callers, never surfaced as errors.
    pub fn parse(token: &str) -> Option<Self> {
        let parts: Vec<&str> = token.trim().split('_').collect();
        if parts.len() != 4 || parts[0] != "FP" {
            return None;
        }

        let season = parts[2].parse().ok()?;
        let round = parts[3].parse().ok()?;
        Some(Self {
            original: normalize_fid(parts[1]),
            season,
            round,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "FP_{}_{}_{}",
            normalize_fid(&self.original),
            self.season,
            self.round
        )
    }
}

/// One asset inside a trade side: either a rostered player or a future pick.
///
/// Remote CSVs mix plain player ids with `FP_` tokens; downstream consumers
/// pattern-match on this instead of re-probing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetToken {
    Player(i64),
    Pick(PickToken),
}

impl AssetToken {
    pub fn parse(token: &str) -> Option<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with("FP_") {
            return PickToken::parse(trimmed).map(Self::Pick);
        }
        trimmed.parse().ok().map(Self::Player)
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Player(id) => id.to_string(),
            Self::Pick(pick) => pick.encode(),
        }
    }
}

/// Split an asset CSV, tolerating blanks and trailing commas; unknown tokens
/// are skipped.
pub fn parse_asset_csv(csv: &str) -> Vec<AssetToken> {
    csv.split(',').filter_map(AssetToken::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalize_fid {
        use super::*;

        /// Expect numeric ids to be zero-padded to 4 characters
        #[test]
        fn pads_numeric_ids() {
            assert_eq!(normalize_fid("1"), "0001");
            assert_eq!(normalize_fid("0001"), "0001");
            assert_eq!(normalize_fid("12"), "0012");
        }

        /// Expect non-numeric ids to pass through unchanged
        #[test]
        fn passes_non_numeric_through() {
            assert_eq!(normalize_fid("abc"), "abc");
            assert_eq!(normalize_fid(" 0007 "), "0007");
        }
    }

    mod pick_token {
        use super::*;

        /// Expect encode/parse to round-trip exactly
        #[test]
        fn round_trips() {
            let pick = PickToken {
                original: "0002".to_string(),
                season: 2026,
                round: 1,
            };
            assert_eq!(pick.encode(), "FP_0002_2026_1");
            assert_eq!(PickToken::parse(&pick.encode()), Some(pick));
        }

        /// Expect the original franchise to be normalized while decoding
        #[test]
        fn normalizes_original_fid() {
            let pick = PickToken::parse("FP_2_2027_3").unwrap();
            assert_eq!(pick.original, "0002");
            assert_eq!(pick.season, 2027);
            assert_eq!(pick.round, 3);
        }

        /// Expect malformed tokens to be discarded, not to error
        #[test]
        fn discards_malformed_tokens() {
            assert_eq!(PickToken::parse("FP_0002_2026"), None);
            assert_eq!(PickToken::parse("FP_0002_xxxx_1"), None);
            assert_eq!(PickToken::parse("DP_0002_2026_1"), None);
            assert_eq!(PickToken::parse("FP_0002_2026_1_extra"), None);
            assert_eq!(PickToken::parse(""), None);
        }
    }

    mod parse_asset_csv {
        use super::*;

        /// Expect players and picks to come back as their own variants
        #[test]
        fn splits_mixed_csv() {
            let assets = parse_asset_csv("16584,FP_0006_2026_1,FP_0005_2027_2,");

            assert_eq!(assets.len(), 3);
            assert_eq!(assets[0], AssetToken::Player(16584));
            assert_eq!(
                assets[1],
                AssetToken::Pick(PickToken {
                    original: "0006".to_string(),
                    season: 2026,
                    round: 1,
                })
            );
        }

        /// Expect blanks and junk tokens to be skipped silently
        #[test]
        fn skips_blank_and_unknown_tokens() {
            let assets = parse_asset_csv(" , garbage ,123,");
            assert_eq!(assets, vec![AssetToken::Player(123)]);
        }
    }
}
