use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{
        franchise::FranchiseRepository, league::LeagueRepository, player::PlayerRepository,
        roster::RosterRepository,
    },
    error::Error,
    mfl::{gateway::MflGateway, locks::HostLocks, session},
    model::live::{
        InjuredPlayer, InjuryDigest, LiveAggregate, LiveDashboard, LiveStarterRow, LiveTile,
    },
    parser::live::{self, LiveMatchup, LiveSide},
    service::cache::CacheService,
};

const SECONDS_PER_GAME: i64 = 3600;

/// Current-week scoring and injury aggregation across the user's leagues.
/// Read-only: the same host/session/fetch patterns as the sync engine, but
/// nothing is persisted; results live in the per-process caches.
pub struct LiveService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    gateway: &'a MflGateway,
    locks: &'a Arc<HostLocks>,
    live_cache: &'a CacheService<i32, LiveDashboard>,
    injury_cache: &'a CacheService<i32, InjuryDigest>,
}

struct LiveTarget {
    remote_id: String,
    name: String,
    season: i32,
    my_fid: Option<String>,
    host: Option<String>,
    token: Option<String>,
    team_names: HashMap<String, String>,
}

struct LiveFetch {
    target: LiveTarget,
    matchup: Option<LiveMatchup>,
    error: Option<String>,
}

impl<'a> LiveService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        config: &'a Config,
        gateway: &'a MflGateway,
        locks: &'a Arc<HostLocks>,
        live_cache: &'a CacheService<i32, LiveDashboard>,
        injury_cache: &'a CacheService<i32, InjuryDigest>,
    ) -> Self {
        Self {
            db,
            config,
            gateway,
            locks,
            live_cache,
            injury_cache,
        }
    }

    pub async fn dashboard(
        &self,
        user: &entity::user::Model,
        season: i32,
    ) -> Result<LiveDashboard, Error> {
        if let Some(cached) = self.live_cache.get(&user.id) {
            return Ok(cached);
        }

        let targets = self.targets(user, season).await?;

        let workers = crate::service::trades_feed::bounded_workers(
            self.config.fetch_workers,
            targets.iter().map(|target| target.host.as_deref()),
        );
        let fetches: Vec<LiveFetch> = stream::iter(targets.into_iter().map(|target| {
            fetch_live(
                self.gateway.clone(),
                self.locks.clone(),
                self.gateway.canonical_host().to_string(),
                target,
            )
        }))
        .buffer_unordered(workers)
        .collect()
        .await;

        // Resolve starter display names after workers return.
        let mut player_ids: HashSet<i64> = HashSet::new();
        for fetch in &fetches {
            if let Some(matchup) = &fetch.matchup {
                for starter in matchup.mine.starters.iter().chain(&matchup.opponent.starters) {
                    if let Ok(id) = starter.player_id.parse() {
                        player_ids.insert(id);
                    }
                }
            }
        }
        let ids: Vec<i64> = player_ids.into_iter().collect();
        let names: HashMap<i64, String> = PlayerRepository::new(self.db)
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect();

        let mut tiles: Vec<LiveTile> = fetches
            .into_iter()
            .map(|fetch| tile_from_fetch(fetch, &names))
            .collect();
        tiles.sort_by(|a, b| a.league_remote_id.cmp(&b.league_remote_id));

        let dashboard = LiveDashboard {
            aggregate: aggregate_from_tiles(&tiles),
            tiles,
            fetched_at: Utc::now(),
        };
        self.live_cache.insert(user.id, dashboard.clone());
        Ok(dashboard)
    }

    /// Injury report for every player the user rosters, aggregated across
    /// leagues that roster them.
    pub async fn injuries(
        &self,
        user: &entity::user::Model,
        season: i32,
    ) -> Result<InjuryDigest, Error> {
        if let Some(cached) = self.injury_cache.get(&user.id) {
            return Ok(cached);
        }

        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);

        // player id -> league names rostering them (user's own franchises).
        let mut rostered: HashMap<i64, Vec<String>> = HashMap::new();
        let mut targets = Vec::new();
        for league in league_repo.list_by_user_season(user.id, season).await? {
            if let Some(my_fid) = league.franchise_id.as_deref() {
                if let Some(franchise) =
                    franchise_repo.find_by_remote_id(league.id, my_fid).await?
                {
                    for entry in roster_repo.list_for_franchise(franchise.id).await? {
                        rostered
                            .entry(entry.player_id)
                            .or_default()
                            .push(league.name.clone());
                    }
                }
            }

            targets.push(LiveTarget {
                remote_id: league.remote_id.clone(),
                name: league.name.clone(),
                season: league.season,
                my_fid: None,
                token: session::token_for_host(user, league.host.as_deref()),
                host: league.host,
                team_names: HashMap::new(),
            });
        }

        let workers = crate::service::trades_feed::bounded_workers(
            self.config.fetch_workers,
            targets.iter().map(|target| target.host.as_deref()),
        );
        let canonical = self.gateway.canonical_host().to_string();
        let reports: Vec<Vec<live::InjuryRow>> =
            stream::iter(targets.into_iter().map(|target| {
                fetch_injuries(
                    self.gateway.clone(),
                    self.locks.clone(),
                    canonical.clone(),
                    target,
                )
            }))
            .buffer_unordered(workers)
            .collect()
            .await;

        // The report is league-independent data; first status seen wins.
        let mut by_player: HashMap<i64, live::InjuryRow> = HashMap::new();
        for row in reports.into_iter().flatten() {
            by_player.entry(row.player_id).or_insert(row);
        }

        let ids: Vec<i64> = by_player
            .keys()
            .copied()
            .filter(|id| rostered.contains_key(id))
            .collect();
        let names: HashMap<i64, String> = PlayerRepository::new(self.db)
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect();

        let mut rows: Vec<InjuredPlayer> = ids
            .iter()
            .map(|id| {
                let row = &by_player[id];
                let mut leagues = rostered.get(id).cloned().unwrap_or_default();
                leagues.sort();
                leagues.dedup();
                InjuredPlayer {
                    player_id: *id,
                    name: names
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| format!("Player #{id}")),
                    status: row.status.clone(),
                    details: row.details.clone(),
                    leagues,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        let digest = InjuryDigest {
            rows,
            fetched_at: Utc::now(),
        };
        self.injury_cache.insert(user.id, digest.clone());
        Ok(digest)
    }

    async fn targets(
        &self,
        user: &entity::user::Model,
        season: i32,
    ) -> Result<Vec<LiveTarget>, Error> {
        let league_repo = LeagueRepository::new(self.db);
        let franchise_repo = FranchiseRepository::new(self.db);

        let mut targets = Vec::new();
        for league in league_repo.list_by_user_season(user.id, season).await? {
            let mut team_names = HashMap::new();
            for franchise in franchise_repo.list_by_league(league.id).await? {
                team_names.insert(franchise.remote_id.clone(), franchise.name.clone());
            }

            targets.push(LiveTarget {
                remote_id: league.remote_id.clone(),
                name: league.name.clone(),
                season: league.season,
                my_fid: league.franchise_id.clone(),
                token: session::token_for_host(user, league.host.as_deref()),
                host: league.host,
                team_names,
            });
        }
        Ok(targets)
    }
}

async fn fetch_live(
    gateway: MflGateway,
    locks: Arc<HostLocks>,
    canonical_host: String,
    target: LiveTarget,
) -> LiveFetch {
    let Some(my_fid) = target.my_fid.clone() else {
        return LiveFetch {
            target,
            matchup: None,
            error: Some("no franchise selected for this league".to_string()),
        };
    };

    let host = target.host.clone().unwrap_or(canonical_host);
    let client = gateway.host(&host, target.season);

    let lock = locks.for_host(client.host());
    let _guard = lock.lock().await;

    match client
        .export(
            "liveScoring",
            &[("L", &target.remote_id)],
            target.token.as_deref(),
        )
        .await
    {
        Ok(xml) => match live::parse_live_scoring(&xml, &my_fid) {
            Ok(matchup) => LiveFetch {
                target,
                matchup,
                error: None,
            },
            Err(err) => LiveFetch {
                target,
                matchup: None,
                error: Some(format!("liveScoring unparseable: {err}")),
            },
        },
        Err(err) => {
            tracing::warn!(league = %target.remote_id, error = %err, "live scoring fetch failed");
            LiveFetch {
                target,
                matchup: None,
                error: Some(format!("liveScoring failed: {err}")),
            }
        }
    }
}

async fn fetch_injuries(
    gateway: MflGateway,
    locks: Arc<HostLocks>,
    canonical_host: String,
    target: LiveTarget,
) -> Vec<live::InjuryRow> {
    let host = target.host.clone().unwrap_or(canonical_host);
    let client = gateway.host(&host, target.season);

    let lock = locks.for_host(client.host());
    let _guard = lock.lock().await;

    match client
        .export("injuries", &[], target.token.as_deref())
        .await
    {
        Ok(xml) => live::parse_injuries(&xml).unwrap_or_else(|err| {
            tracing::warn!(league = %target.remote_id, error = %err, "injuries unparseable");
            Vec::new()
        }),
        Err(err) => {
            tracing::warn!(league = %target.remote_id, error = %err, "injuries fetch failed");
            Vec::new()
        }
    }
}

fn starter_rows(side: &LiveSide, names: &HashMap<i64, String>) -> Vec<LiveStarterRow> {
    side.starters
        .iter()
        .map(|starter| LiveStarterRow {
            name: starter
                .player_id
                .parse()
                .ok()
                .and_then(|id: i64| names.get(&id).cloned()),
            player_id: starter.player_id.clone(),
            score: starter.score,
            seconds_remaining: starter.seconds_remaining.max(0),
            minutes_remaining: starter.minutes_remaining(),
        })
        .collect()
}

fn tile_from_fetch(fetch: LiveFetch, names: &HashMap<i64, String>) -> LiveTile {
    let target = fetch.target;

    let Some(matchup) = fetch.matchup else {
        return LiveTile {
            league_remote_id: target.remote_id,
            league_name: target.name,
            week: None,
            my_name: None,
            opp_name: None,
            my_score: 0.0,
            opp_score: 0.0,
            my_progress_pct: 0,
            opp_progress_pct: 0,
            my_starters: Vec::new(),
            opp_starters: Vec::new(),
            note: Some(fetch.error.unwrap_or_else(|| "None Available".to_string())),
        };
    };

    let team_name = |fid: &str| target.team_names.get(fid).cloned();

    LiveTile {
        league_remote_id: target.remote_id,
        league_name: target.name,
        week: matchup.week,
        my_name: team_name(&matchup.mine.franchise_id),
        opp_name: team_name(&matchup.opponent.franchise_id),
        my_score: matchup.mine.score,
        opp_score: matchup.opponent.score,
        my_progress_pct: matchup.mine.progress_pct(),
        opp_progress_pct: matchup.opponent.progress_pct(),
        my_starters: starter_rows(&matchup.mine, names),
        opp_starters: starter_rows(&matchup.opponent, names),
        note: None,
    }
}

/// Cross-league totals: scores summed, progress weighted by starter
/// game-minutes.
fn aggregate_from_tiles(tiles: &[LiveTile]) -> LiveAggregate {
    let mut aggregate = LiveAggregate::default();

    let mut my_total_secs = 0i64;
    let mut my_played_secs = 0i64;
    let mut opp_total_secs = 0i64;
    let mut opp_played_secs = 0i64;

    for tile in tiles {
        aggregate.my_total_score += tile.my_score;
        aggregate.opp_total_score += tile.opp_score;

        for starter in &tile.my_starters {
            my_total_secs += SECONDS_PER_GAME;
            my_played_secs +=
                (SECONDS_PER_GAME - starter.seconds_remaining.clamp(0, SECONDS_PER_GAME)).max(0);
        }
        for starter in &tile.opp_starters {
            opp_total_secs += SECONDS_PER_GAME;
            opp_played_secs +=
                (SECONDS_PER_GAME - starter.seconds_remaining.clamp(0, SECONDS_PER_GAME)).max(0);
        }
    }

    aggregate.my_total_score = (aggregate.my_total_score * 10.0).round() / 10.0;
    aggregate.opp_total_score = (aggregate.opp_total_score * 10.0).round() / 10.0;
    if my_total_secs > 0 {
        aggregate.my_progress_pct =
            ((my_played_secs as f64 / my_total_secs as f64) * 100.0).round() as u8;
    }
    if opp_total_secs > 0 {
        aggregate.opp_progress_pct =
            ((opp_played_secs as f64 / opp_total_secs as f64) * 100.0).round() as u8;
    }

    aggregate
}
