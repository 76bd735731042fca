use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use futures::future;
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{
        draft_pick::DraftPickRepository, franchise::FranchiseRepository, league::LeagueRepository,
        player::PlayerRepository, roster::RosterRepository,
    },
    error::{trade::TradeError, transport::TransportError, Error},
    mfl::{gateway::MflGateway, locks::HostLocks, session},
    model::offer::{
        BuyCandidate, FranchiseRef, LeagueRef, OfferDraft, OfferOutcome, OfferStatus,
        PreparedOffer, RoundPicks, SellBuyer, SellCandidate, UpgradeBuyer, UpgradeCandidate,
    },
    model::sync::PickSummary,
    parser::{imports::parse_import_response, pick::normalize_fid, pick::PickToken},
};

/// Price templates: the draft-pick payment a counterparty must be able to
/// afford, as (round, count) requirements.
pub struct PriceTemplate {
    pub code: &'static str,
    pub label: &'static str,
    pub requirements: &'static [(i32, u32)],
}

pub const PRICE_TEMPLATES: [PriceTemplate; 8] = [
    PriceTemplate {
        code: "2x1st",
        label: "Two 1sts",
        requirements: &[(1, 2)],
    },
    PriceTemplate {
        code: "1st+2nd",
        label: "1st + 2nd",
        requirements: &[(1, 1), (2, 1)],
    },
    PriceTemplate {
        code: "1st",
        label: "1st",
        requirements: &[(1, 1)],
    },
    PriceTemplate {
        code: "2x2nd",
        label: "Two 2nds",
        requirements: &[(2, 2)],
    },
    PriceTemplate {
        code: "2nd",
        label: "2nd",
        requirements: &[(2, 1)],
    },
    PriceTemplate {
        code: "2x3rd",
        label: "Two 3rds",
        requirements: &[(3, 2)],
    },
    PriceTemplate {
        code: "3rd",
        label: "3rd",
        requirements: &[(3, 1)],
    },
    PriceTemplate {
        code: "4th",
        label: "4th",
        requirements: &[(4, 1)],
    },
];

pub fn template_by_code(code: &str) -> Option<&'static PriceTemplate> {
    PRICE_TEMPLATES.iter().find(|template| template.code == code)
}

fn meets_requirements(counts: &HashMap<i32, u32>, requirements: &[(i32, u32)]) -> bool {
    requirements
        .iter()
        .all(|(round, need)| counts.get(round).copied().unwrap_or(0) >= *need)
}

fn pick_summary(pick: &entity::draft_pick::Model) -> PickSummary {
    PickSummary {
        id: pick.id,
        season: pick.season,
        round: pick.round,
        pick_number: pick.pick_number,
        original_franchise: pick.original_franchise.clone(),
    }
}

fn picks_by_round(picks: &[entity::draft_pick::Model]) -> Vec<RoundPicks> {
    let mut grouped: Vec<RoundPicks> = Vec::new();
    for pick in picks {
        match grouped.iter_mut().find(|group| group.round == pick.round) {
            Some(group) => group.picks.push(pick_summary(pick)),
            None => grouped.push(RoundPicks {
                round: pick.round,
                picks: vec![pick_summary(pick)],
            }),
        }
    }
    grouped.sort_by_key(|group| group.round);
    grouped
}

fn franchise_ref(franchise: &entity::franchise::Model) -> FranchiseRef {
    FranchiseRef {
        remote_id: franchise.remote_id.clone(),
        name: franchise.name.clone(),
        record: franchise.record.clone(),
    }
}

fn league_ref(league: &entity::league::Model) -> LeagueRef {
    LeagueRef {
        remote_id: league.remote_id.clone(),
        name: league.name.clone(),
    }
}

pub struct TradeService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    gateway: &'a MflGateway,
    locks: &'a Arc<HostLocks>,
}

impl<'a> TradeService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        config: &'a Config,
        gateway: &'a MflGateway,
        locks: &'a Arc<HostLocks>,
    ) -> Self {
        Self {
            db,
            config,
            gateway,
            locks,
        }
    }

    /// Whether the offer builder may open: at least one league synced within
    /// the freshness window.
    pub async fn has_recent_sync(
        &self,
        user_id: i32,
        now: NaiveDateTime,
    ) -> Result<bool, Error> {
        let cutoff = now - Duration::hours(self.config.sync_max_age_hours);
        Ok(LeagueRepository::new(self.db)
            .has_recent_sync(user_id, cutoff)
            .await?)
    }

    /// Leagues where a buy offer for the player is possible: the user does
    /// not roster them, another franchise does, and the user's pick stock
    /// meets the template.
    pub async fn buy_candidates(
        &self,
        user_id: i32,
        season: i32,
        player_id: i64,
        template: &PriceTemplate,
    ) -> Result<Vec<BuyCandidate>, Error> {
        self.require_player(player_id).await?;

        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);
        let pick_repo = DraftPickRepository::new(self.db);

        let mut candidates = Vec::new();
        for league in league_repo.list_by_user_season(user_id, season).await? {
            let Some(my_team) = self.my_team(&franchise_repo, &league).await? else {
                continue;
            };

            if roster_repo.is_rostered(my_team.id, player_id).await? {
                continue;
            }
            let Some(owner) = roster_repo.owner_of_player(league.id, player_id).await? else {
                continue;
            };
            if owner.id == my_team.id {
                continue;
            }

            let counts = pick_repo.counts_by_round(my_team.id).await?;
            if !meets_requirements(&counts, template.requirements) {
                continue;
            }

            let my_picks = pick_repo.list_for_franchise(my_team.id).await?;
            candidates.push(BuyCandidate {
                league: league_ref(&league),
                my_franchise: franchise_ref(&my_team),
                counterparty: franchise_ref(&owner),
                my_picks_by_round: picks_by_round(&my_picks),
            });
        }

        Ok(candidates)
    }

    /// Leagues where the user rosters the player and at least one other
    /// franchise can pay the template.
    pub async fn sell_candidates(
        &self,
        user_id: i32,
        season: i32,
        player_id: i64,
        template: &PriceTemplate,
    ) -> Result<Vec<SellCandidate>, Error> {
        self.require_player(player_id).await?;

        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);
        let pick_repo = DraftPickRepository::new(self.db);

        let mut candidates = Vec::new();
        for league in league_repo.list_by_user_season(user_id, season).await? {
            let Some(my_team) = self.my_team(&franchise_repo, &league).await? else {
                continue;
            };
            if !roster_repo.is_rostered(my_team.id, player_id).await? {
                continue;
            }

            let mut buyers = Vec::new();
            for franchise in franchise_repo.list_by_league(league.id).await? {
                if franchise.id == my_team.id {
                    continue;
                }
                let counts = pick_repo.counts_by_round(franchise.id).await?;
                if !meets_requirements(&counts, template.requirements) {
                    continue;
                }
                let picks = pick_repo.list_for_franchise(franchise.id).await?;
                buyers.push(SellBuyer {
                    franchise: franchise_ref(&franchise),
                    picks_by_round: picks_by_round(&picks),
                });
            }

            if buyers.is_empty() {
                continue;
            }

            candidates.push(SellCandidate {
                league: league_ref(&league),
                my_franchise: franchise_ref(&my_team),
                buyers,
            });
        }

        Ok(candidates)
    }

    /// Pick-upgrade candidates (sell-only): leagues where the user rosters
    /// the player, with the user's give-round picks and each buyer's
    /// receive-round picks. Selection stays strictly explicit; nothing here
    /// auto-chooses a pick.
    pub async fn upgrade_candidates(
        &self,
        user_id: i32,
        season: i32,
        player_id: i64,
        give_round: i32,
        receive_round: i32,
    ) -> Result<Vec<UpgradeCandidate>, Error> {
        self.require_player(player_id).await?;

        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);
        let pick_repo = DraftPickRepository::new(self.db);

        let mut candidates = Vec::new();
        for league in league_repo.list_by_user_season(user_id, season).await? {
            let Some(my_team) = self.my_team(&franchise_repo, &league).await? else {
                continue;
            };
            if !roster_repo.is_rostered(my_team.id, player_id).await? {
                continue;
            }

            let my_give_picks = pick_repo.list_by_round(my_team.id, give_round).await?;

            let mut buyers = Vec::new();
            for franchise in franchise_repo.list_by_league(league.id).await? {
                if franchise.id == my_team.id {
                    continue;
                }
                let receive_picks = pick_repo.list_by_round(franchise.id, receive_round).await?;
                if receive_picks.is_empty() {
                    continue;
                }
                buyers.push(UpgradeBuyer {
                    franchise: franchise_ref(&franchise),
                    receive_picks: receive_picks.iter().map(pick_summary).collect(),
                });
            }

            let disabled_reason = if my_give_picks.is_empty() {
                Some(format!(
                    "Player on this roster, however no round {give_round} pick available for upgrade."
                ))
            } else {
                None
            };

            candidates.push(UpgradeCandidate {
                league: league_ref(&league),
                my_franchise: franchise_ref(&my_team),
                my_give_picks: my_give_picks.iter().map(pick_summary).collect(),
                buyers,
                disabled_reason,
            });
        }

        Ok(candidates)
    }

    /// Validate drafts and encode them as submittable offers. Everything is
    /// checked before any network call; a validation failure rejects the
    /// whole batch with a user-facing message.
    pub async fn prepare_offers(
        &self,
        user_id: i32,
        season: i32,
        drafts: &[OfferDraft],
    ) -> Result<Vec<PreparedOffer>, Error> {
        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);
        let pick_repo = DraftPickRepository::new(self.db);

        let expires_ts = (Utc::now() + Duration::days(self.config.offer_expiry_days)).timestamp();

        let mut prepared = Vec::new();
        for draft in drafts {
            let league = league_repo
                .find_by_remote_id(user_id, &draft.league_remote_id)
                .await?
                .filter(|league| league.season == season)
                .ok_or_else(|| TradeError::LeagueNotFound(draft.league_remote_id.clone()))?;

            let my_team = self
                .my_team(&franchise_repo, &league)
                .await?
                .ok_or_else(|| TradeError::FranchiseNotSet(league.remote_id.clone()))?;

            let counterparty_fid = normalize_fid(&draft.counterparty_fid);
            let counterparty = franchise_repo
                .find_by_remote_id(league.id, &counterparty_fid)
                .await?
                .ok_or_else(|| TradeError::CounterpartyNotFound {
                    franchise: counterparty_fid.clone(),
                    league: league.remote_id.clone(),
                })?;

            let mut will_give_up = Vec::new();
            if let Some(player_id) = draft.give_player {
                if !roster_repo.is_rostered(my_team.id, player_id).await? {
                    return Err(TradeError::NotRostered {
                        player_id,
                        league: league.remote_id.clone(),
                    }
                    .into());
                }
                will_give_up.push(player_id.to_string());
            }
            will_give_up.extend(
                self.encode_picks(&pick_repo, &draft.give_pick_ids, my_team.id)
                    .await?,
            );

            let mut will_receive = Vec::new();
            if let Some(player_id) = draft.receive_player {
                if !roster_repo.is_rostered(counterparty.id, player_id).await? {
                    return Err(TradeError::NotOwnedByCounterparty {
                        player_id,
                        franchise: counterparty.remote_id.clone(),
                        league: league.remote_id.clone(),
                    }
                    .into());
                }
                will_receive.push(player_id.to_string());
            }
            will_receive.extend(
                self.encode_picks(&pick_repo, &draft.receive_pick_ids, counterparty.id)
                    .await?,
            );

            if will_give_up.is_empty() || will_receive.is_empty() {
                return Err(TradeError::EmptyOffer(league.remote_id.clone()).into());
            }

            prepared.push(PreparedOffer {
                host: league.host.clone(),
                league_remote_id: league.remote_id.clone(),
                league_name: league.name.clone(),
                season: league.season,
                offered_to: counterparty.remote_id.clone(),
                will_give_up,
                will_receive,
                comments: draft.comments.clone(),
                expires_ts,
            });
        }

        Ok(prepared)
    }

    /// Submit prepared offers. Leagues on distinct hosts dispatch
    /// concurrently; offers on one host go out one at a time under the host
    /// lock. No offer is ever retried (a duplicate proposal is worse than a
    /// missed one) and a timeout is reported as an unknown outcome.
    pub async fn submit_batch(
        &self,
        user: &entity::user::Model,
        offers: Vec<PreparedOffer>,
    ) -> Vec<OfferOutcome> {
        let mut by_host: HashMap<String, Vec<PreparedOffer>> = HashMap::new();
        for offer in offers {
            let host = offer
                .host
                .clone()
                .unwrap_or_else(|| self.gateway.canonical_host().to_string());
            by_host.entry(host).or_default().push(offer);
        }

        let host_batches = by_host.into_iter().map(|(host, offers)| {
            let gateway = self.gateway.clone();
            let locks = self.locks.clone();
            let token = session::token_for_host(user, Some(&host));

            async move {
                let lock = locks.for_host(&host);
                let _guard = lock.lock().await;

                let mut outcomes = Vec::new();
                for offer in offers {
                    outcomes.push(submit_one(&gateway, &host, token.as_deref(), offer).await);
                }
                outcomes
            }
        });

        let mut outcomes: Vec<OfferOutcome> = future::join_all(host_batches)
            .await
            .into_iter()
            .flatten()
            .collect();
        outcomes.sort_by(|a, b| a.league_remote_id.cmp(&b.league_remote_id));
        outcomes
    }

    async fn require_player(&self, player_id: i64) -> Result<entity::player::Model, Error> {
        PlayerRepository::new(self.db)
            .get(player_id)
            .await?
            .ok_or_else(|| TradeError::PlayerNotFound(player_id).into())
    }

    async fn my_team(
        &self,
        franchise_repo: &FranchiseRepository<'_>,
        league: &entity::league::Model,
    ) -> Result<Option<entity::franchise::Model>, Error> {
        let Some(fid) = league
            .franchise_id
            .as_deref()
            .map(str::trim)
            .filter(|fid| !fid.is_empty())
        else {
            return Ok(None);
        };
        Ok(franchise_repo.find_by_remote_id(league.id, fid).await?)
    }

    /// Encode selected pick rows, verifying each belongs to the expected
    /// franchise. Order-preserving: tokens go out in selection order.
    async fn encode_picks(
        &self,
        pick_repo: &DraftPickRepository<'_>,
        pick_ids: &[i32],
        franchise_id: i32,
    ) -> Result<Vec<String>, Error> {
        let rows = pick_repo.get_many(pick_ids).await?;
        let by_id: HashMap<i32, &entity::draft_pick::Model> =
            rows.iter().map(|pick| (pick.id, pick)).collect();

        let mut tokens = Vec::new();
        for pick_id in pick_ids {
            let pick = by_id
                .get(pick_id)
                .copied()
                .filter(|pick| pick.franchise_id == franchise_id)
                .ok_or(TradeError::PickNotAvailable(*pick_id))?;

            let original = pick
                .original_franchise
                .as_deref()
                .map(str::trim)
                .filter(|fid| !fid.is_empty())
                .ok_or(TradeError::UnencodablePick(pick.id))?;

            tokens.push(
                PickToken {
                    original: normalize_fid(original),
                    season: pick.season,
                    round: pick.round,
                }
                .encode(),
            );
        }

        Ok(tokens)
    }
}

async fn submit_one(
    gateway: &MflGateway,
    host: &str,
    token: Option<&str>,
    offer: PreparedOffer,
) -> OfferOutcome {
    let client = gateway.host(host, offer.season);
    let expires = offer.expires_ts.to_string();
    let give_csv = offer.will_give_up.join(",");
    let receive_csv = offer.will_receive.join(",");

    let params: Vec<(&str, &str)> = vec![
        ("L", &offer.league_remote_id),
        ("OFFEREDTO", &offer.offered_to),
        ("WILL_GIVE_UP", &give_csv),
        ("WILL_RECEIVE", &receive_csv),
        ("COMMENTS", &offer.comments),
        ("EXPIRES", &expires),
    ];

    let (status, message) = match client.import("tradeProposal", &params, token).await {
        Ok(body) => {
            let (ok, message) = parse_import_response(&body);
            if ok {
                (OfferStatus::Ok, message)
            } else {
                (OfferStatus::Error, message)
            }
        }
        Err(TransportError::Network(err)) if err.is_timeout() => (
            OfferStatus::Unknown,
            "Timed out waiting for the host; the proposal may still have been created. Not retried."
                .to_string(),
        ),
        Err(err) => (OfferStatus::Error, err.to_string()),
    };

    tracing::info!(
        league = %offer.league_remote_id,
        offered_to = %offer.offered_to,
        ?status,
        "trade proposal submitted"
    );

    OfferOutcome {
        league_remote_id: offer.league_remote_id,
        league_name: offer.league_name,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use gridiron_test_utils::prelude::*;

    use super::*;
    use crate::data::user::UserRepository;
    use crate::model::offer::OfferDraft;

    /// Seed one league with the viewer's team (0001), a counterparty
    /// (0002), a player on each side, and picks.
    struct Seeded {
        user: entity::user::Model,
        league: entity::league::Model,
        my_pick_id: i32,
        their_pick_id: i32,
    }

    async fn seed(test: &TestSetup) -> Seeded {
        let user = UserRepository::new(&test.db)
            .create("gm@example.com", "mgr5")
            .await
            .unwrap();
        let user = UserRepository::new(&test.db)
            .store_token_bundle(user.id, "gm", "MFL_USER_ID=tok", &Default::default())
            .await
            .unwrap();

        let league = crate::data::league::LeagueRepository::new(&test.db)
            .create(user.id, "61860", "Dynasty Sauce", 2026, Some("0001".to_string()))
            .await
            .unwrap();

        let franchises = crate::data::franchise::FranchiseRepository::new(&test.db);
        let mine = franchises
            .ensure(league.id, "0001", Some("My Team"))
            .await
            .unwrap();
        let theirs = franchises
            .ensure(league.id, "0002", Some("Oklahoma GMen"))
            .await
            .unwrap();

        let players = crate::data::player::PlayerRepository::new(&test.db);
        players.ensure_placeholder(111).await.unwrap();
        players.ensure_placeholder(222).await.unwrap();

        let rosters = crate::data::roster::RosterRepository::new(&test.db);
        rosters.replace_for_franchise(mine.id, &[111]).await.unwrap();
        rosters.replace_for_franchise(theirs.id, &[222]).await.unwrap();

        let picks = crate::data::draft_pick::DraftPickRepository::new(&test.db);
        picks
            .replace_for_franchise(
                mine.id,
                &[PickToken {
                    original: "0001".to_string(),
                    season: 2026,
                    round: 2,
                }],
            )
            .await
            .unwrap();
        picks
            .replace_for_franchise(
                theirs.id,
                &[PickToken {
                    original: "0002".to_string(),
                    season: 2026,
                    round: 1,
                }],
            )
            .await
            .unwrap();

        let my_pick_id = picks.list_for_franchise(mine.id).await.unwrap()[0].id;
        let their_pick_id = picks.list_for_franchise(theirs.id).await.unwrap()[0].id;

        Seeded {
            user,
            league,
            my_pick_id,
            their_pick_id,
        }
    }

    mod buy_candidates {
        use super::*;

        /// Expect a league where the counterparty owns the player and the
        /// user can pay the template
        #[tokio::test]
        async fn finds_eligible_league() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let template = template_by_code("2nd").unwrap();

            let candidates = service
                .buy_candidates(seeded.user.id, 2026, 222, template)
                .await.unwrap();

            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].counterparty.remote_id, "0002");
            assert_eq!(candidates[0].my_picks_by_round.len(), 1);
            assert_eq!(candidates[0].my_picks_by_round[0].round, 2);

            Ok(())
        }

        /// Expect no candidate when the user cannot pay the template
        #[tokio::test]
        async fn skips_league_without_required_picks() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let template = template_by_code("2x1st").unwrap();

            let candidates = service
                .buy_candidates(seeded.user.id, 2026, 222, template)
                .await.unwrap();
            assert!(candidates.is_empty());

            Ok(())
        }

        /// Expect no candidate for a player the user already rosters
        #[tokio::test]
        async fn skips_league_where_already_owned() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let template = template_by_code("2nd").unwrap();

            let candidates = service
                .buy_candidates(seeded.user.id, 2026, 111, template)
                .await.unwrap();
            assert!(candidates.is_empty());

            Ok(())
        }

        /// Expect an unknown player to be rejected before any work
        #[tokio::test]
        async fn rejects_unknown_player() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let template = template_by_code("2nd").unwrap();

            let result = service
                .buy_candidates(seeded.user.id, 2026, 999, template)
                .await;
            assert!(matches!(
                result,
                Err(Error::TradeError(TradeError::PlayerNotFound(999)))
            ));

            Ok(())
        }
    }

    mod upgrade_candidates {
        use super::*;

        /// Expect give-round and receive-round picks to be listed, with a
        /// disabled reason when the give round is empty
        #[tokio::test]
        async fn lists_rounds_and_disables_without_give_pick() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);

            let candidates = service
                .upgrade_candidates(seeded.user.id, 2026, 111, 2, 1)
                .await.unwrap();
            assert_eq!(candidates.len(), 1);
            assert!(candidates[0].disabled_reason.is_none());
            assert_eq!(candidates[0].my_give_picks.len(), 1);
            assert_eq!(candidates[0].buyers.len(), 1);
            assert_eq!(candidates[0].buyers[0].receive_picks.len(), 1);

            // Give round the user has no pick in: candidate renders disabled.
            let candidates = service
                .upgrade_candidates(seeded.user.id, 2026, 111, 3, 1)
                .await.unwrap();
            assert!(candidates[0].disabled_reason.is_some());

            Ok(())
        }
    }

    mod prepare_offers {
        use super::*;

        fn draft(seeded: &Seeded) -> OfferDraft {
            OfferDraft {
                league_remote_id: seeded.league.remote_id.clone(),
                counterparty_fid: "0002".to_string(),
                give_player: Some(111),
                give_pick_ids: vec![seeded.my_pick_id],
                receive_player: None,
                receive_pick_ids: vec![seeded.their_pick_id],
                comments: String::new(),
            }
        }

        /// Expect exactly the checked assets to be encoded, in order
        #[tokio::test]
        async fn encodes_explicit_selection_only() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);

            let prepared = service
                .prepare_offers(seeded.user.id, 2026, &[draft(&seeded)])
                .await.unwrap();

            assert_eq!(prepared.len(), 1);
            assert_eq!(
                prepared[0].will_give_up,
                vec!["111".to_string(), "FP_0001_2026_2".to_string()]
            );
            assert_eq!(prepared[0].will_receive, vec!["FP_0002_2026_1".to_string()]);
            assert_eq!(prepared[0].offered_to, "0002");

            Ok(())
        }

        /// Expect giving a player the user does not roster to be rejected
        /// before any network call
        #[tokio::test]
        async fn rejects_unowned_player() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);

            let mut bad = draft(&seeded);
            bad.give_player = Some(222);
            let result = service.prepare_offers(seeded.user.id, 2026, &[bad]).await;

            assert!(matches!(
                result,
                Err(Error::TradeError(TradeError::NotRostered { .. }))
            ));

            Ok(())
        }

        /// Expect a pick belonging to another franchise to be rejected
        #[tokio::test]
        async fn rejects_foreign_pick() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);

            let mut bad = draft(&seeded);
            bad.give_pick_ids = vec![seeded.their_pick_id];
            let result = service.prepare_offers(seeded.user.id, 2026, &[bad]).await;

            assert!(matches!(
                result,
                Err(Error::TradeError(TradeError::PickNotAvailable(_)))
            ));

            Ok(())
        }

        /// Expect an offer with an empty side to be rejected
        #[tokio::test]
        async fn rejects_empty_side() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);

            let mut bad = draft(&seeded);
            bad.receive_pick_ids = Vec::new();
            let result = service.prepare_offers(seeded.user.id, 2026, &[bad]).await;

            assert!(matches!(
                result,
                Err(Error::TradeError(TradeError::EmptyOffer(_)))
            ));

            Ok(())
        }
    }

    mod submit_batch {
        use super::*;

        fn prepared(seeded: &Seeded) -> PreparedOffer {
            PreparedOffer {
                host: None,
                league_remote_id: seeded.league.remote_id.clone(),
                league_name: seeded.league.name.clone(),
                season: 2026,
                offered_to: "0002".to_string(),
                will_give_up: vec!["111".to_string(), "FP_0001_2026_2".to_string()],
                will_receive: vec!["FP_0002_2026_1".to_string()],
                comments: String::new(),
                expires_ts: 1_790_000_000,
            }
        }

        /// Expect a <status>OK</status> response to classify as success
        #[tokio::test]
        async fn classifies_ok_response() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            test.mock_import("tradeProposal", "<status>OK</status>", 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service
                .submit_batch(&seeded.user, vec![prepared(&seeded)])
                .await;

            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].status, crate::model::offer::OfferStatus::Ok);
            test.assert_mocks();

            Ok(())
        }

        /// Expect an <error> body to classify as failure with the remote
        /// message, without aborting the batch
        #[tokio::test]
        async fn classifies_error_response() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let seeded = seed(&test).await;

            test.mock_import("tradeProposal", "<error>Franchise not in league</error>", 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = TradeService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service
                .submit_batch(&seeded.user, vec![prepared(&seeded)])
                .await;

            assert_eq!(outcomes[0].status, crate::model::offer::OfferStatus::Error);
            assert_eq!(outcomes[0].message, "Franchise not in league");

            Ok(())
        }
    }
}
