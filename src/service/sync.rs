use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{
        draft_pick::DraftPickRepository, franchise::FranchiseRepository, league::LeagueRepository,
        player::PlayerRepository, roster::RosterRepository,
    },
    error::{transport::TransportError, Error},
    mfl::{gateway::MflGateway, locks::HostLocks},
    model::sync::{LeagueSelection, SyncOutcome, SyncStatus},
    parser::{
        assets::{self, FranchiseAssets},
        league::{self, LeagueInfo},
        pick::normalize_fid,
        standings::{self, StandingRow},
    },
};

/// Metrics for one league's asset write.
#[derive(Debug, Default)]
pub struct AssetSyncMetrics {
    pub teams_touched: u32,
    pub rosters_inserted: u32,
    pub picks_inserted: u32,
    /// Per-franchise failures; the rest of the league still syncs.
    pub franchise_errors: Vec<String>,
}

/// Plain-data token bundle precomputed on the request task so fetch workers
/// never touch the database.
struct TokenBundle {
    canonical: Option<String>,
    by_host: HashMap<String, String>,
}

impl TokenBundle {
    fn from_user(user: &entity::user::Model) -> Self {
        Self {
            canonical: user.canonical_token.clone(),
            by_host: crate::mfl::session::host_token_map(user),
        }
    }

    /// Host-scoped token preferred, canonical as fallback.
    fn for_host(&self, host: &str) -> Option<String> {
        self.by_host
            .get(host)
            .cloned()
            .or_else(|| self.canonical.clone())
    }
}

/// One league's fetch unit, also plain data.
struct FetchTarget {
    league_id: i32,
    remote_id: String,
    name: String,
    host_hint: Option<String>,
}

/// Everything one league's fetch phase produced. Consumed serially by the
/// apply phase on the request task.
struct LeagueFetch {
    league_id: i32,
    remote_id: String,
    name: String,
    info: LeagueInfo,
    assets: Vec<FranchiseAssets>,
    standings: Vec<StandingRow>,
    used_fallback: bool,
    auth_expired: bool,
    errors: Vec<String>,
}

impl LeagueFetch {
    fn empty(&self) -> bool {
        self.info.franchises.is_empty() && self.assets.is_empty() && self.standings.is_empty()
    }
}

/// Fetch one league's payloads: league info on the canonical host, then
/// assets (with the rosters + futureDraftPicks fallback chain) and standings
/// on the league's own host. Calls to one host are serialized via the host
/// lock; leagues on distinct hosts run concurrently.
async fn fetch_league(
    gateway: MflGateway,
    locks: Arc<HostLocks>,
    canonical_host: String,
    season: i32,
    tokens: Arc<TokenBundle>,
    target: FetchTarget,
) -> LeagueFetch {
    let mut fetch = LeagueFetch {
        league_id: target.league_id,
        remote_id: target.remote_id,
        name: target.name,
        info: LeagueInfo::default(),
        assets: Vec::new(),
        standings: Vec::new(),
        used_fallback: false,
        auth_expired: false,
        errors: Vec::new(),
    };

    let league_param = fetch.remote_id.clone();

    // League info: discover the league host and franchise metadata.
    {
        let client = gateway.host(&canonical_host, season);
        let lock = locks.for_host(client.host());
        let _guard = lock.lock().await;

        match client
            .export("league", &[("L", &league_param)], tokens.canonical.as_deref())
            .await
        {
            Ok(xml) => match league::parse_league_info(&xml) {
                Ok(info) => fetch.info = info,
                Err(err) => {
                    tracing::warn!(league = %fetch.remote_id, error = %err, "league info unparseable");
                    fetch.errors.push(format!("league info unparseable: {err}"));
                }
            },
            Err(TransportError::AuthExpired) => {
                fetch.auth_expired = true;
                fetch.errors.push("league info: auth expired".to_string());
            }
            Err(err) => fetch.errors.push(format!("league info failed: {err}")),
        }
    }

    // Prefer the league host for league-scoped data; it avoids cross-domain
    // auth headaches.
    let data_host = fetch
        .info
        .host
        .clone()
        .or_else(|| target.host_hint.clone())
        .unwrap_or_else(|| canonical_host.clone());
    let client = gateway.host(&data_host, season);
    let token = tokens.for_host(client.host());

    let lock = locks.for_host(client.host());
    let _guard = lock.lock().await;

    // Primary assets export.
    match client
        .export("assets", &[("L", &league_param)], token.as_deref())
        .await
    {
        Ok(xml) => match assets::parse_assets(&xml) {
            Ok(parsed) => fetch.assets = parsed,
            Err(err) => {
                tracing::warn!(league = %fetch.remote_id, error = %err, "assets unparseable");
                fetch.errors.push(format!("assets unparseable: {err}"));
            }
        },
        Err(TransportError::AuthExpired) => {
            fetch.auth_expired = true;
            fetch.errors.push("assets: auth expired".to_string());
        }
        Err(err) => fetch.errors.push(format!("assets failed: {err}")),
    }

    // Fallback chain: an explicit rejection or an all-empty payload means
    // the assets export is blocked for this league.
    if assets::all_empty(&fetch.assets) {
        fetch.used_fallback = true;
        tracing::info!(league = %fetch.remote_id, "assets blocked or empty; using rosters + futureDraftPicks fallback");

        let rosters = match client
            .export("rosters", &[("L", &league_param)], token.as_deref())
            .await
        {
            Ok(xml) => assets::parse_rosters(&xml).unwrap_or_else(|err| {
                fetch.errors.push(format!("rosters unparseable: {err}"));
                Vec::new()
            }),
            Err(err) => {
                fetch.errors.push(format!("fallback rosters failed: {err}"));
                Vec::new()
            }
        };

        let picks = match client
            .export("futureDraftPicks", &[("L", &league_param)], token.as_deref())
            .await
        {
            Ok(xml) => assets::parse_future_picks(&xml).unwrap_or_else(|err| {
                fetch
                    .errors
                    .push(format!("futureDraftPicks unparseable: {err}"));
                Default::default()
            }),
            Err(err) => {
                fetch
                    .errors
                    .push(format!("fallback futureDraftPicks failed: {err}"));
                Default::default()
            }
        };

        fetch.assets = assets::merge_fallback(rosters, picks);
    }

    // Standings.
    match client
        .export("leagueStandings", &[("L", &league_param)], token.as_deref())
        .await
    {
        Ok(xml) => match standings::parse_standings(&xml) {
            Ok(rows) => fetch.standings = rows,
            Err(err) => fetch.errors.push(format!("standings unparseable: {err}")),
        },
        Err(TransportError::AuthExpired) => {
            fetch.auth_expired = true;
            fetch.errors.push("standings: auth expired".to_string());
        }
        Err(err) => fetch.errors.push(format!("standings failed: {err}")),
    }

    fetch
}

pub struct SyncService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    gateway: &'a MflGateway,
    locks: &'a Arc<HostLocks>,
}

impl<'a> SyncService<'a> {
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

    /// Upsert franchise names/owners and the starter-requirement string.
    pub async fn sync_league_info(
        &self,
        league: &entity::league::Model,
        info: &LeagueInfo,
    ) -> Result<(), Error> {
        let franchise_repo = FranchiseRepository::new(self.db);
        let league_repo = LeagueRepository::new(self.db);

        for (fid, meta) in &info.franchises {
            let franchise = franchise_repo
                .ensure(league.id, fid, meta.name.as_deref())
                .await?;
            if meta.name.is_some() || meta.owner_name.is_some() {
                franchise_repo
                    .update_meta(franchise.id, meta.name.as_deref(), meta.owner_name.as_deref())
                    .await?;
            }
        }

        if let Some(slots) = &info.starter_slots {
            if league.starter_slots.as_deref() != Some(slots.as_str()) {
                league_repo.set_starter_slots(league.id, slots).await?;
            }
        }
        if let Some(host) = &info.host {
            if league.host.as_deref() != Some(host.as_str()) {
                league_repo.set_host(league.id, host).await?;
            }
        }

        Ok(())
    }

    /// Idempotent write of league-wide assets: per franchise, resolve the
    /// row, delete its roster/pick snapshot, and re-insert from the payload.
    /// A failing franchise is logged and recorded; the rest proceed.
    pub async fn sync_league_assets(
        &self,
        league: &entity::league::Model,
        franchises: &[FranchiseAssets],
    ) -> Result<AssetSyncMetrics, Error> {
        let franchise_repo = FranchiseRepository::new(self.db);
        let player_repo = PlayerRepository::new(self.db);
        let roster_repo = RosterRepository::new(self.db);
        let pick_repo = DraftPickRepository::new(self.db);

        let mut metrics = AssetSyncMetrics::default();

        for franchise_assets in franchises {
            if franchise_assets.franchise_id.is_empty() {
                continue;
            }

            tracing::info!(
                league = %league.remote_id,
                franchise = %franchise_assets.franchise_id,
                players = franchise_assets.players.len(),
                picks = franchise_assets.picks.len(),
                "syncing franchise assets"
            );

            let result: Result<(u32, u32), Error> = async {
                let franchise = franchise_repo
                    .ensure(league.id, &franchise_assets.franchise_id, None)
                    .await?;

                for player_id in &franchise_assets.players {
                    player_repo.ensure_placeholder(*player_id).await?;
                }

                let rosters = roster_repo
                    .replace_for_franchise(franchise.id, &franchise_assets.players)
                    .await?;
                let picks = pick_repo
                    .replace_for_franchise(franchise.id, &franchise_assets.picks)
                    .await?;

                Ok((rosters, picks))
            }
            .await;

            match result {
                Ok((rosters, picks)) => {
                    metrics.teams_touched += 1;
                    metrics.rosters_inserted += rosters;
                    metrics.picks_inserted += picks;
                }
                Err(err) => {
                    tracing::warn!(
                        league = %league.remote_id,
                        franchise = %franchise_assets.franchise_id,
                        error = %err,
                        "franchise asset sync failed; continuing with remaining franchises"
                    );
                    metrics.franchise_errors.push(format!(
                        "franchise {}: {err}",
                        franchise_assets.franchise_id
                    ));
                }
            }
        }

        Ok(metrics)
    }

    /// Apply standings rows: ensure each franchise exists (upgrading
    /// placeholder names) and update record/points/rank.
    pub async fn sync_league_standings(
        &self,
        league: &entity::league::Model,
        rows: &[StandingRow],
    ) -> Result<u32, Error> {
        let franchise_repo = FranchiseRepository::new(self.db);

        let mut updated = 0;
        for row in rows {
            let franchise = franchise_repo
                .ensure(league.id, &row.franchise_id, row.name.as_deref())
                .await?;
            franchise_repo
                .apply_standings(
                    franchise.id,
                    &row.record,
                    row.points_for,
                    row.points_against,
                    row.rank,
                )
                .await?;
            updated += 1;
        }

        Ok(updated)
    }

    /// Apply the user's league selection: delete de-selected leagues (and
    /// everything they own), create newly selected ones, refresh franchise
    /// ids. Returns the leagues that should now be synced.
    pub async fn apply_selection(
        &self,
        user_id: i32,
        season: i32,
        selections: &[LeagueSelection],
    ) -> Result<Vec<entity::league::Model>, Error> {
        let league_repo = LeagueRepository::new(self.db);
        let existing = league_repo.list_by_user_season(user_id, season).await?;

        let selected_ids: BTreeSet<&str> = selections
            .iter()
            .map(|selection| selection.remote_id.as_str())
            .collect();

        for league in &existing {
            if !selected_ids.contains(league.remote_id.as_str()) {
                if let Err(err) = league_repo.delete_with_children(league.id).await {
                    tracing::warn!(league = %league.remote_id, error = %err, "league delete failed");
                }
            }
        }

        let mut targets = Vec::new();
        for selection in selections {
            let normalized_fid = selection
                .franchise_id
                .as_deref()
                .map(str::trim)
                .filter(|fid| !fid.is_empty())
                .map(normalize_fid);

            match existing
                .iter()
                .find(|league| league.remote_id == selection.remote_id)
            {
                Some(league) => {
                    let league = if normalized_fid.is_some()
                        && league.franchise_id != normalized_fid
                    {
                        league_repo
                            .update_franchise_id(league.id, normalized_fid)
                            .await?
                    } else {
                        league.clone()
                    };
                    targets.push(league);
                }
                None => {
                    let league = league_repo
                        .create(
                            user_id,
                            &selection.remote_id,
                            &selection.name,
                            season,
                            normalized_fid,
                        )
                        .await?;
                    tracing::info!(league = %league.remote_id, season, "league linked");
                    targets.push(league);
                }
            }
        }

        Ok(targets)
    }

    /// Fetch and persist a batch of leagues.
    ///
    /// Two-phase: a concurrent fetch phase (bounded by
    /// min(configured workers, distinct hosts), serialized per host, no
    /// database access) and a serial apply phase on this task. Every league
    /// gets its own outcome; one failure never aborts the batch.
    pub async fn sync_leagues(
        &self,
        user: &entity::user::Model,
        leagues: &[entity::league::Model],
    ) -> Vec<SyncOutcome> {
        if leagues.is_empty() {
            return Vec::new();
        }

        let canonical_host = self.config.canonical_host.clone();
        let tokens = Arc::new(TokenBundle::from_user(user));

        let distinct_hosts: BTreeSet<String> = leagues
            .iter()
            .map(|league| {
                league
                    .host
                    .clone()
                    .unwrap_or_else(|| canonical_host.clone())
            })
            .collect();
        let workers = self.config.fetch_workers.min(distinct_hosts.len()).max(1);

        let fetch_futures: Vec<_> = leagues
            .iter()
            .map(|league| {
                fetch_league(
                    self.gateway.clone(),
                    self.locks.clone(),
                    canonical_host.clone(),
                    league.season,
                    tokens.clone(),
                    FetchTarget {
                        league_id: league.id,
                        remote_id: league.remote_id.clone(),
                        name: league.name.clone(),
                        host_hint: league.host.clone(),
                    },
                )
            })
            .collect();

        let fetches: Vec<LeagueFetch> = stream::iter(fetch_futures)
            .buffer_unordered(workers)
            .collect()
            .await;

        let mut outcomes = Vec::new();
        for fetch in fetches {
            outcomes.push(self.apply_fetch(fetch).await);
        }
        outcomes.sort_by(|a, b| a.league_remote_id.cmp(&b.league_remote_id));
        outcomes
    }

    async fn apply_fetch(&self, fetch: LeagueFetch) -> SyncOutcome {
        let mut outcome = SyncOutcome {
            league_remote_id: fetch.remote_id.clone(),
            league_name: fetch.name.clone(),
            status: SyncStatus::Synced,
            message: None,
            teams_touched: 0,
            rosters_inserted: 0,
            picks_inserted: 0,
            used_fallback: fetch.used_fallback,
        };

        if fetch.auth_expired && fetch.empty() {
            outcome.status = SyncStatus::AuthExpired;
            outcome.message =
                Some("Remote session expired. Please re-link your account.".to_string());
            return outcome;
        }

        if fetch.empty() && !fetch.errors.is_empty() {
            outcome.status = SyncStatus::Failed;
            outcome.message = Some(fetch.errors.join("; "));
            return outcome;
        }

        let league_repo = LeagueRepository::new(self.db);
        let league = match league_repo.get(fetch.league_id).await {
            Ok(Some(league)) => league,
            Ok(None) => {
                outcome.status = SyncStatus::Failed;
                outcome.message = Some("league row disappeared during sync".to_string());
                return outcome;
            }
            Err(err) => {
                outcome.status = SyncStatus::Failed;
                outcome.message = Some(err.to_string());
                return outcome;
            }
        };

        let mut warnings = fetch.errors.clone();

        let result: Result<(), Error> = async {
            self.sync_league_info(&league, &fetch.info).await?;

            let metrics = self.sync_league_assets(&league, &fetch.assets).await?;
            outcome.teams_touched = metrics.teams_touched;
            outcome.rosters_inserted = metrics.rosters_inserted;
            outcome.picks_inserted = metrics.picks_inserted;
            warnings.extend(metrics.franchise_errors);

            let updated = self
                .sync_league_standings(&league, &fetch.standings)
                .await?;

            league_repo
                .mark_synced(league.id, Utc::now().naive_utc())
                .await?;

            tracing::info!(
                league = %league.remote_id,
                teams = outcome.teams_touched,
                roster_rows = outcome.rosters_inserted,
                picks = outcome.picks_inserted,
                standings_updated = updated,
                used_fallback = outcome.used_fallback,
                "league synced"
            );

            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                if !warnings.is_empty() {
                    outcome.message = Some(warnings.join("; "));
                }
            }
            Err(err) => {
                tracing::warn!(league = %fetch.remote_id, error = %err, "league sync failed");
                outcome.status = SyncStatus::Failed;
                warnings.push(err.to_string());
                outcome.message = Some(warnings.join("; "));
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use gridiron_test_utils::prelude::*;

    use super::*;
    use crate::data::{
        draft_pick::DraftPickRepository, franchise::FranchiseRepository,
        league::LeagueRepository, roster::RosterRepository, user::UserRepository,
    };

    const LEAGUE_INFO_XML: &str = r#"<league id="61860" name="Dynasty Sauce">
        <franchises>
            <franchise id="0001" name="Hawks"/>
            <franchise id="0002" name="Oklahoma GMen"/>
        </franchises>
    </league>"#;

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
            </futureYearDraftPicks>
        </franchise>
    </assets>"#;

    const STANDINGS_XML: &str = r#"<leagueStandings>
        <franchise id="0002" h2hwlt="3-1-0" pf="512.5" pa="401.2"/>
        <franchise id="0001" h2hwlt="1-3-0" pf="380.0" pa="420.9"/>
    </leagueStandings>"#;

    async fn seed(test: &TestSetup) -> (entity::user::Model, entity::league::Model) {
        let user = UserRepository::new(&test.db)
            .create("gm@example.com", "mgr5")
            .await
            .unwrap();
        let user = UserRepository::new(&test.db)
            .store_token_bundle(user.id, "gm", "MFL_USER_ID=tok", &Default::default())
            .await
            .unwrap();
        let league = LeagueRepository::new(&test.db)
            .create(user.id, "61860", "Dynasty Sauce", 2026, Some("0002".to_string()))
            .await
            .unwrap();
        (user, league)
    }

    mod sync_leagues {
        use super::*;

        /// Expect the end-to-end sync to persist franchise names, roster
        /// rows, and future picks from the remote payloads
        #[tokio::test]
        async fn syncs_league_end_to_end() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            test.mock_export("league", LEAGUE_INFO_XML, 1).await;
            test.mock_export("assets", ASSETS_XML, 1).await;
            test.mock_export("leagueStandings", STANDINGS_XML, 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service.sync_leagues(&user, &[league.clone()]).await;

            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].status, crate::model::sync::SyncStatus::Synced);
            assert!(!outcomes[0].used_fallback);
            assert_eq!(outcomes[0].rosters_inserted, 3);
            assert_eq!(outcomes[0].picks_inserted, 2);
            test.assert_mocks();

            let franchise = FranchiseRepository::new(&test.db)
                .find_by_remote_id(league.id, "0002")
                .await?
                .unwrap();
            assert_eq!(franchise.name, "Oklahoma GMen");
            assert_eq!(franchise.record.as_deref(), Some("3-1-0"));
            assert_eq!(franchise.points_for, Some(513));
            assert_eq!(franchise.standing, Some(1));

            let rosters = RosterRepository::new(&test.db)
                .list_for_franchise(franchise.id)
                .await?;
            assert_eq!(rosters.len(), 3);

            let picks = DraftPickRepository::new(&test.db)
                .list_for_franchise(franchise.id)
                .await?;
            assert_eq!(picks.len(), 2);
            assert!(picks.iter().all(|p| p.season == 2026));
            assert!(picks
                .iter()
                .all(|p| p.original_franchise.as_deref() == Some("0002")));
            assert_eq!(picks[0].round, 1);
            assert_eq!(picks[1].round, 2);

            // Synced timestamp recorded.
            let league = LeagueRepository::new(&test.db)
                .get(league.id)
                .await?
                .unwrap();
            assert!(league.synced_at.is_some());

            Ok(())
        }

        /// Expect a second identical sync to leave identical row sets:
        /// sync is idempotent, not additive
        #[tokio::test]
        async fn sync_is_idempotent() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            test.mock_export("league", LEAGUE_INFO_XML, 2).await;
            test.mock_export("assets", ASSETS_XML, 2).await;
            test.mock_export("leagueStandings", STANDINGS_XML, 2).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            service.sync_leagues(&user, &[league.clone()]).await;
            service.sync_leagues(&user, &[league.clone()]).await;
            test.assert_mocks();

            let franchise = FranchiseRepository::new(&test.db)
                .find_by_remote_id(league.id, "0002")
                .await?
                .unwrap();
            let rosters = RosterRepository::new(&test.db)
                .list_for_franchise(franchise.id)
                .await?;
            let picks = DraftPickRepository::new(&test.db)
                .list_for_franchise(franchise.id)
                .await?;

            assert_eq!(rosters.len(), 3);
            assert_eq!(picks.len(), 2);

            Ok(())
        }

        /// Expect a blocked assets export to trigger the rosters +
        /// futureDraftPicks fallback exactly once, merged by franchise id
        #[tokio::test]
        async fn blocked_assets_uses_fallback_once() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            test.mock_export("league", LEAGUE_INFO_XML, 1).await;
            test.mock_export("assets", "<error>assets not allowed</error>", 1).await;
            test.mock_export(
                "rosters",
                r#"<rosters><franchise id="0002"><player id="13593"/></franchise></rosters>"#,
                1,
            ).await;
            test.mock_export(
                "futureDraftPicks",
                r#"<futureDraftPicks>
                    <franchise id="0001">
                        <futureYearDraftPicks><draftPick pick="FP_0001_2027_1"/></futureYearDraftPicks>
                    </franchise>
                </futureDraftPicks>"#,
                1,
            ).await;
            test.mock_export("leagueStandings", STANDINGS_XML, 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service.sync_leagues(&user, &[league.clone()]).await;

            assert_eq!(outcomes[0].status, crate::model::sync::SyncStatus::Synced);
            assert!(outcomes[0].used_fallback);
            test.assert_mocks();

            // Players landed from the rosters feed.
            let gmen = FranchiseRepository::new(&test.db)
                .find_by_remote_id(league.id, "0002")
                .await?
                .unwrap();
            let rosters = RosterRepository::new(&test.db)
                .list_for_franchise(gmen.id)
                .await?;
            assert_eq!(rosters.len(), 1);

            // The picks-only franchise still appears in the merge.
            let hawks = FranchiseRepository::new(&test.db)
                .find_by_remote_id(league.id, "0001")
                .await?
                .unwrap();
            let picks = DraftPickRepository::new(&test.db)
                .list_for_franchise(hawks.id)
                .await?;
            assert_eq!(picks.len(), 1);

            Ok(())
        }

        /// Expect all-empty assets (no explicit error) to also trigger the
        /// fallback path
        #[tokio::test]
        async fn empty_assets_uses_fallback() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            test.mock_export("league", LEAGUE_INFO_XML, 1).await;
            test.mock_export(
                "assets",
                r#"<assets><franchise id="0002"></franchise></assets>"#,
                1,
            ).await;
            test.mock_export(
                "rosters",
                r#"<rosters><franchise id="0002"><player id="15241"/></franchise></rosters>"#,
                1,
            ).await;
            test.mock_export("futureDraftPicks", "<futureDraftPicks/>", 1).await;
            test.mock_export("leagueStandings", STANDINGS_XML, 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service.sync_leagues(&user, &[league]).await;

            assert!(outcomes[0].used_fallback);
            test.assert_mocks();

            Ok(())
        }

        /// Expect an expired session to surface as auth_expired, leaving
        /// the prior snapshot untouched
        #[tokio::test]
        async fn auth_expiry_is_distinguished() -> Result<(), TestError> {
            let mut test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            test.mock_export_status("league", 403, 1).await;
            test.mock_export_status("assets", 403, 1).await;
            test.mock_export_status("rosters", 403, 1).await;
            test.mock_export_status("futureDraftPicks", 403, 1).await;
            test.mock_export_status("leagueStandings", 403, 1).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let outcomes = service.sync_leagues(&user, &[league.clone()]).await;

            assert_eq!(
                outcomes[0].status,
                crate::model::sync::SyncStatus::AuthExpired
            );

            let league = LeagueRepository::new(&test.db)
                .get(league.id)
                .await?
                .unwrap();
            assert!(league.synced_at.is_none());

            Ok(())
        }
    }

    mod apply_selection {
        use super::*;
        use crate::model::sync::LeagueSelection;

        /// Expect de-selected leagues to be deleted with their children and
        /// new selections to be created
        #[tokio::test]
        async fn applies_selection_changes() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let (user, league) = seed(&test).await;

            // Give the existing league a franchise with a roster row.
            let franchise = FranchiseRepository::new(&test.db)
                .ensure(league.id, "0002", Some("Oklahoma GMen"))
                .await?;
            crate::data::player::PlayerRepository::new(&test.db)
                .ensure_placeholder(13593)
                .await?;
            RosterRepository::new(&test.db)
                .replace_for_franchise(franchise.id, &[13593])
                .await?;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let targets = service
                .apply_selection(
                    user.id,
                    2026,
                    &[LeagueSelection {
                        remote_id: "55188".to_string(),
                        name: "Redraft Heroes".to_string(),
                        franchise_id: Some("3".to_string()),
                    }],
                )
                .await.unwrap();

            assert_eq!(targets.len(), 1);
            assert_eq!(targets[0].remote_id, "55188");
            assert_eq!(targets[0].franchise_id.as_deref(), Some("0003"));

            // The old league and its children are gone.
            let old = LeagueRepository::new(&test.db)
                .find_by_remote_id(user.id, "61860")
                .await?;
            assert!(old.is_none());
            let rosters = RosterRepository::new(&test.db)
                .list_for_franchise(franchise.id)
                .await?;
            assert!(rosters.is_empty());

            Ok(())
        }

        /// Expect re-selecting an existing league to update its franchise id
        #[tokio::test]
        async fn updates_franchise_id_on_reselect() -> Result<(), TestError> {
            let test = test_setup_with_core_tables!()?;
            let (user, _league) = seed(&test).await;

            let env = crate::test_support::env(&test.server.url());
            let service = SyncService::new(&test.db, &env.config, &env.gateway, &env.locks);
            let targets = service
                .apply_selection(
                    user.id,
                    2026,
                    &[LeagueSelection {
                        remote_id: "61860".to_string(),
                        name: "Dynasty Sauce".to_string(),
                        franchise_id: Some("7".to_string()),
                    }],
                )
                .await.unwrap();

            assert_eq!(targets[0].franchise_id.as_deref(), Some("0007"));

            Ok(())
        }
    }
}
