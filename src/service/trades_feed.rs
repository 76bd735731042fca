use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{franchise::FranchiseRepository, league::LeagueRepository},
    error::Error,
    mfl::{gateway::MflGateway, locks::HostLocks, session},
    model::trades::{LeagueTradeSummary, TradePick, TradeRow, TradesFeed},
    parser::{
        pick::{normalize_fid, AssetToken},
        trades::{self, TradeDirection},
    },
};

/// Read-only sweep of open trades across the user's leagues.
///
/// Rows come straight from the remote hosts on each request and are held
/// only in the short-TTL process cache; pending trades are never persisted.
pub struct TradesFeedService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    gateway: &'a MflGateway,
    locks: &'a Arc<HostLocks>,
    cache: &'a crate::service::cache::CacheService<i32, TradesFeed>,
}

/// Plain-data unit for one league's fetch; built from the database before
/// workers dispatch so workers stay network-only.
struct FeedTarget {
    remote_id: String,
    name: String,
    season: i32,
    my_fid: Option<String>,
    host: Option<String>,
    token: Option<String>,
    team_names: HashMap<String, String>,
}

struct FeedFetch {
    target: FeedTarget,
    trades: Vec<trades::PendingTrade>,
    errors: Vec<String>,
}

impl<'a> TradesFeedService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        config: &'a Config,
        gateway: &'a MflGateway,
        locks: &'a Arc<HostLocks>,
        cache: &'a crate::service::cache::CacheService<i32, TradesFeed>,
    ) -> Self {
        Self {
            db,
            config,
            gateway,
            locks,
            cache,
        }
    }

    pub async fn open_trades(
        &self,
        user: &entity::user::Model,
        season: i32,
    ) -> Result<TradesFeed, Error> {
        if let Some(cached) = self.cache.get(&user.id) {
            return Ok(cached);
        }

        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);

        // Precompute every DB-derived input on this task.
        let mut targets = Vec::new();
        for league in league_repo.list_by_user_season(user.id, season).await? {
            let mut team_names = HashMap::new();
            for franchise in franchise_repo.list_by_league(league.id).await? {
                team_names.insert(franchise.remote_id.clone(), franchise.name.clone());
            }

            targets.push(FeedTarget {
                remote_id: league.remote_id.clone(),
                name: league.name.clone(),
                season: league.season,
                my_fid: league.franchise_id.as_deref().map(normalize_fid),
                token: session::token_for_host(user, league.host.as_deref()),
                host: league.host,
                team_names,
            });
        }

        let workers = bounded_workers(
            self.config.fetch_workers,
            targets.iter().map(|target| target.host.as_deref()),
        );
        let fetches: Vec<FeedFetch> = stream::iter(targets.into_iter().map(|target| {
            fetch_league_trades(
                self.gateway.clone(),
                self.locks.clone(),
                self.gateway.canonical_host().to_string(),
                target,
            )
        }))
        .buffer_unordered(workers)
        .collect()
        .await;

        let mut rows = Vec::new();
        let mut per_league = Vec::new();
        for fetch in fetches {
            let count = fetch.trades.len();
            for trade in &fetch.trades {
                rows.push(normalize_row(&fetch.target, trade));
            }
            per_league.push(LeagueTradeSummary {
                remote_id: fetch.target.remote_id,
                name: fetch.target.name,
                count,
                errors: fetch.errors,
            });
        }
        per_league.sort_by(|a, b| a.remote_id.cmp(&b.remote_id));

        // Received first, then sent, then unknown; newest first within each.
        rows.sort_by(|a, b| {
            direction_bucket(&a.direction)
                .cmp(&direction_bucket(&b.direction))
                .then(b.updated_at.cmp(&a.updated_at))
                .then(a.trade_id.cmp(&b.trade_id))
        });

        let feed = TradesFeed {
            rows,
            per_league,
            fetched_at: Utc::now(),
        };
        self.cache.insert(user.id, feed.clone());
        Ok(feed)
    }
}

/// Fan-out bound: the configured worker cap, further capped by the number of
/// distinct hosts (per-host calls serialize anyway).
pub(crate) fn bounded_workers<'a>(cap: usize, hosts: impl Iterator<Item = Option<&'a str>>) -> usize {
    let distinct: std::collections::BTreeSet<&str> =
        hosts.map(|host| host.unwrap_or("")).collect();
    cap.min(distinct.len()).max(1)
}

fn direction_bucket(direction: &str) -> u8 {
    match direction {
        "received" => 0,
        "sent" => 1,
        _ => 2,
    }
}

async fn fetch_league_trades(
    gateway: MflGateway,
    locks: Arc<HostLocks>,
    canonical_host: String,
    target: FeedTarget,
) -> FeedFetch {
    let host = target.host.clone().unwrap_or(canonical_host);
    let client = gateway.host(&host, target.season);

    let lock = locks.for_host(client.host());
    let _guard = lock.lock().await;

    let mut errors = Vec::new();
    let trades = match client
        .export(
            "pendingTrades",
            &[("L", &target.remote_id)],
            target.token.as_deref(),
        )
        .await
    {
        Ok(xml) => match trades::parse_pending_trades(&xml) {
            Ok(parsed) => {
                if parsed.unparseable > 0 {
                    errors.push(format!(
                        "{} trade(s) matched no known payload shape",
                        parsed.unparseable
                    ));
                }
                parsed.trades
            }
            Err(err) => {
                errors.push(format!("pendingTrades unparseable: {err}"));
                Vec::new()
            }
        },
        Err(err) => {
            errors.push(format!("pendingTrades failed: {err}"));
            Vec::new()
        }
    };

    FeedFetch {
        target,
        trades,
        errors,
    }
}

/// Flatten one trade into a display row from the viewer's perspective.
/// Unknown-direction trades keep the proposer's perspective.
fn normalize_row(target: &FeedTarget, trade: &trades::PendingTrade) -> TradeRow {
    let direction = match &target.my_fid {
        Some(my_fid) => trades::classify_direction(trade, my_fid),
        None => TradeDirection::Unknown,
    };

    let (out_side, in_side) = match direction {
        // The proposee's outgoing assets are what the proposer receives.
        TradeDirection::Received => (&trade.will_receive, &trade.will_give_up),
        TradeDirection::Sent | TradeDirection::Unknown => {
            (&trade.will_give_up, &trade.will_receive)
        }
    };

    let (players_out, picks_out) = split_side(out_side);
    let (players_in, picks_in) = split_side(in_side);

    let team_name = |fid: &str| {
        target
            .team_names
            .get(fid)
            .cloned()
            .unwrap_or_else(|| fid.to_string())
    };

    TradeRow {
        league_remote_id: target.remote_id.clone(),
        league_name: target.name.clone(),
        trade_id: trade.trade_id.clone(),
        direction: direction.as_str().to_string(),
        from_fid: trade.offered_by.clone(),
        to_fid: trade.offered_to.clone(),
        from_name: team_name(&trade.offered_by),
        to_name: team_name(&trade.offered_to),
        players_out,
        players_in,
        picks_out,
        picks_in,
        comments: trade.comments.clone(),
        updated_at: trade.proposed_at,
        expires_at: trade.expires_at,
        view_url: target.host.as_ref().map(|host| {
            format!(
                "https://{host}/{}/tradeProposals?L={}",
                target.season, target.remote_id
            )
        }),
    }
}

fn split_side(side: &[AssetToken]) -> (Vec<i64>, Vec<TradePick>) {
    let mut players = Vec::new();
    let mut picks = Vec::new();
    for token in side {
        match token {
            AssetToken::Player(id) => players.push(*id),
            AssetToken::Pick(pick) => picks.push(TradePick {
                season: pick.season,
                round: pick.round,
                original_franchise: pick.original.clone(),
            }),
        }
    }
    (players, picks)
}

#[cfg(test)]
mod tests {
    use gridiron_test_utils::prelude::*;

    use super::*;
    use crate::data::{
        franchise::FranchiseRepository, league::LeagueRepository, user::UserRepository,
    };
    use crate::service::cache::CacheService;

    const PENDING_XML: &str = r#"<pendingTrades>
        <pendingTrade trade_id="1204"
            will_receive="16584,FP_0006_2026_1,"
            will_give_up="12263,"
            offeredto="0001" offeringteam="0008"
            timestamp="1757094050" expires="1757696400"/>
        <pendingTrade trade_id="1300"
            will_receive="100," will_give_up="200,"
            offeredto="0005" offeringteam="0006"/>
    </pendingTrades>"#;

    async fn seed(test: &TestSetup) -> entity::user::Model {
        let user = UserRepository::new(&test.db)
            .create("gm@example.com", "mgr5")
            .await
            .unwrap();
        let user = UserRepository::new(&test.db)
            .store_token_bundle(user.id, "gm", "MFL_USER_ID=tok", &Default::default())
            .await
            .unwrap();

        let league = LeagueRepository::new(&test.db)
            .create(user.id, "55188", "Dynasty Sauce", 2026, Some("0001".to_string()))
            .await
            .unwrap();

        let franchises = FranchiseRepository::new(&test.db);
        franchises.ensure(league.id, "0001", Some("You")).await.unwrap();
        franchises
            .ensure(league.id, "0008", Some("Other GM"))
            .await
            .unwrap();

        user
    }

    /// Expect the viewer's trade to land in the received bucket with sides
    /// flipped to their perspective, and third-party trades in unknown
    #[tokio::test]
    async fn buckets_and_flips_perspective() -> Result<(), TestError> {
        let mut test = test_setup_with_core_tables!()?;
        let user = seed(&test).await;

        test.mock_export("pendingTrades", PENDING_XML, 1).await;

        let env = crate::test_support::env(&test.server.url());
        let cache = CacheService::new(std::time::Duration::from_secs(120), 10);
        let service =
            TradesFeedService::new(&test.db, &env.config, &env.gateway, &env.locks, &cache);

        let feed = service.open_trades(&user, 2026).await.unwrap();
        assert_eq!(feed.rows.len(), 2);

        let received = &feed.rows[0];
        assert_eq!(received.direction, "received");
        assert_eq!(received.trade_id, "1204");
        assert_eq!(received.from_name, "Other GM");
        assert_eq!(received.to_name, "You");
        // From the viewer's perspective: they give what the proposer would
        // receive.
        assert_eq!(received.players_out, vec![16584]);
        assert_eq!(received.picks_out.len(), 1);
        assert_eq!(received.players_in, vec![12263]);

        let unknown = &feed.rows[1];
        assert_eq!(unknown.direction, "unknown");
        assert_eq!(unknown.trade_id, "1300");

        assert_eq!(feed.per_league.len(), 1);
        assert_eq!(feed.per_league[0].count, 2);
        assert!(feed.per_league[0].errors.is_empty());

        Ok(())
    }

    /// Expect the second request inside the TTL to be served from cache
    #[tokio::test]
    async fn second_request_hits_cache() -> Result<(), TestError> {
        let mut test = test_setup_with_core_tables!()?;
        let user = seed(&test).await;

        test.mock_export("pendingTrades", PENDING_XML, 1).await;

        let env = crate::test_support::env(&test.server.url());
        let cache = CacheService::new(std::time::Duration::from_secs(120), 10);
        let service =
            TradesFeedService::new(&test.db, &env.config, &env.gateway, &env.locks, &cache);

        service.open_trades(&user, 2026).await.unwrap();
        service.open_trades(&user, 2026).await.unwrap();

        test.assert_mocks();

        Ok(())
    }

    /// Expect a failing league to get an error slot while others still load
    #[tokio::test]
    async fn league_error_is_scoped() -> Result<(), TestError> {
        let mut test = test_setup_with_core_tables!()?;
        let user = seed(&test).await;

        test.mock_export_status("pendingTrades", 500, 4).await;

        let env = crate::test_support::env(&test.server.url());
        let cache = CacheService::new(std::time::Duration::from_secs(120), 10);
        let service =
            TradesFeedService::new(&test.db, &env.config, &env.gateway, &env.locks, &cache);

        let feed = service.open_trades(&user, 2026).await.unwrap();
        assert!(feed.rows.is_empty());
        assert_eq!(feed.per_league.len(), 1);
        assert_eq!(feed.per_league[0].errors.len(), 1);

        Ok(())
    }
}
