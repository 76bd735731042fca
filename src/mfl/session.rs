use std::collections::{BTreeSet, HashMap};

use sea_orm::DatabaseConnection;

use crate::{
    data::user::UserRepository,
    error::Error,
    mfl::gateway::MflGateway,
    model::session::{LinkSummary, LinkedLeague},
    parser,
};

/// Manages the user's remote sessions: one token for the canonical host,
/// plus zero-or-more per-league-host tokens discovered from the directory.
///
/// Tokens never expire client-side; staleness surfaces as an auth error on a
/// later call, at which point the account must be re-linked.
pub struct SessionService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a MflGateway,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a DatabaseConnection, gateway: &'a MflGateway) -> Self {
        Self { db, gateway }
    }

    /// Log in against the canonical host and every distinct league host.
    ///
    /// Canonical failure is fatal. A host-scoped login failure is logged and
    /// that host is simply omitted from the token map, degrading its leagues
    /// to canonical-token access.
    pub async fn link_account(
        &self,
        user_id: i32,
        username: &str,
        password: &str,
        season: i32,
    ) -> Result<LinkSummary, Error> {
        let canonical = self.gateway.canonical(season);
        let canonical_token = canonical.login(username, password).await?;

        let directory_xml = canonical
            .export("myleagues", &[], Some(&canonical_token))
            .await?;
        let leagues = match parser::league::parse_league_directory(&directory_xml) {
            Ok(leagues) => leagues,
            Err(err) => {
                tracing::warn!(error = %err, "league directory unparseable; linking with no leagues");
                Vec::new()
            }
        };

        let hosts: BTreeSet<String> = leagues
            .iter()
            .filter_map(|league| league.host.clone())
            .filter(|host| host != self.gateway.canonical_host())
            .collect();

        let mut host_tokens: HashMap<String, String> = HashMap::new();
        let mut hosts_linked = Vec::new();
        let mut hosts_failed = Vec::new();
        for host in hosts {
            match self.gateway.host(&host, season).login(username, password).await {
                Ok(token) => {
                    host_tokens.insert(host.clone(), token);
                    hosts_linked.push(host);
                }
                Err(err) => {
                    tracing::warn!(%host, error = %err, "host-scoped login failed; league degrades to canonical token");
                    hosts_failed.push(host);
                }
            }
        }

        UserRepository::new(self.db)
            .store_token_bundle(user_id, username, &canonical_token, &host_tokens)
            .await?;

        Ok(LinkSummary {
            leagues: leagues
                .into_iter()
                .map(|league| LinkedLeague {
                    remote_id: league.remote_id,
                    name: league.name,
                    season: league.season,
                    franchise_id: league.franchise_id,
                    host: league.host,
                })
                .collect(),
            hosts_linked,
            hosts_failed,
        })
    }
}

/// Decode the persisted host-token map. Tolerant of empty or malformed JSON.
pub fn host_token_map(user: &entity::user::Model) -> HashMap<String, String> {
    user.host_tokens
        .as_deref()
        .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(raw).ok())
        .unwrap_or_default()
}

/// Resolve the best available token for a host: the host-scoped token when
/// one exists, the canonical token otherwise.
pub fn token_for_host(user: &entity::user::Model, host: Option<&str>) -> Option<String> {
    if let Some(host) = host {
        let tokens = host_token_map(user);
        if let Some(token) = tokens.get(host) {
            return Some(token.clone());
        }
    }
    user.canonical_token.clone()
}

#[cfg(test)]
mod tests {
    use gridiron_test_utils::prelude::*;

    use super::*;
    use chrono::Utc;
    use crate::{data::user::UserRepository, error::transport::TransportError};

    mod link_account {
        use super::*;

        /// Expect a canonical login plus directory fetch to persist the
        /// token bundle and return the discovered leagues
        #[tokio::test]
        async fn links_and_stores_tokens() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::User)?;
            let user = UserRepository::new(&test.db)
                .create("gm@example.com", "free")
                .await?;

            test.mock_login("MFL_USER_ID=abc123", 1).await;
            test.mock_export(
                "myleagues",
                r#"<leagues>
                    <league id="55188" name="Dynasty Sauce" year="2026" franchise_id="1"/>
                </leagues>"#,
                1,
            )
            .await;

            let env = crate::test_support::env(&test.server.url());
            let service = SessionService::new(&test.db, &env.gateway);
            let summary = service
                .link_account(user.id, "gm", "hunter2", 2026)
                .await
                .unwrap();

            assert_eq!(summary.leagues.len(), 1);
            assert_eq!(summary.leagues[0].remote_id, "55188");
            assert!(summary.hosts_linked.is_empty());
            assert!(summary.hosts_failed.is_empty());
            test.assert_mocks();

            let stored = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert_eq!(stored.canonical_token.as_deref(), Some("MFL_USER_ID=abc123"));
            assert_eq!(stored.remote_username.as_deref(), Some("gm"));
            assert!(stored.tokens_refreshed_at.is_some());

            Ok(())
        }

        /// Expect canonical login failure to be fatal
        #[tokio::test]
        async fn canonical_login_failure_is_fatal() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::User)?;
            let user = UserRepository::new(&test.db)
                .create("gm@example.com", "free")
                .await?;

            test.mock_login_failure().await;

            let env = crate::test_support::env(&test.server.url());
            let service = SessionService::new(&test.db, &env.gateway);
            let result = service.link_account(user.id, "gm", "hunter2", 2026).await;

            assert!(matches!(
                result,
                Err(crate::error::Error::TransportError(
                    TransportError::LoginFailed { .. }
                ))
            ));

            let stored = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert!(stored.canonical_token.is_none());

            Ok(())
        }

        /// Expect a league-host login failure to degrade that host to
        /// canonical-token access instead of failing the link
        #[tokio::test]
        async fn host_login_failure_degrades() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::User)?;
            let user = UserRepository::new(&test.db)
                .create("gm@example.com", "free")
                .await?;

            test.mock_login("MFL_USER_ID=abc123", 1).await;
            // The league lives on a host that refuses connections.
            test.mock_export(
                "myleagues",
                r#"<leagues>
                    <league id="55188" name="Dynasty Sauce" year="2026"
                            url="http://127.0.0.1:9/2026/home/55188"/>
                </leagues>"#,
                1,
            )
            .await;

            let env = crate::test_support::env(&test.server.url());
            let service = SessionService::new(&test.db, &env.gateway);
            let summary = service
                .link_account(user.id, "gm", "hunter2", 2026)
                .await
                .unwrap();

            assert!(summary.hosts_linked.is_empty());
            assert_eq!(summary.hosts_failed, vec!["127.0.0.1:9".to_string()]);

            // The canonical token is still stored and serves that league.
            let stored = UserRepository::new(&test.db).get(user.id).await?.unwrap();
            assert_eq!(stored.canonical_token.as_deref(), Some("MFL_USER_ID=abc123"));

            Ok(())
        }
    }

    fn user_with_tokens(canonical: Option<&str>, hosts: Option<&str>) -> entity::user::Model {
        entity::user::Model {
            id: 1,
            email: "gm@example.com".to_string(),
            remote_username: None,
            plan: "free".to_string(),
            mass_offer_daily_cap: None,
            bonus_mass_offers: 0,
            canonical_token: canonical.map(str::to_string),
            host_tokens: hosts.map(str::to_string),
            tokens_refreshed_at: None,
            founder_expires_at: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    mod token_for_host {
        use super::*;

        /// Expect the host-scoped token to win when present
        #[test]
        fn prefers_host_token() {
            let user = user_with_tokens(
                Some("MFL_USER_ID=api"),
                Some(r#"{"www43.example.com":"MFL_USER_ID=www43"}"#),
            );

            let token = token_for_host(&user, Some("www43.example.com"));
            assert_eq!(token.as_deref(), Some("MFL_USER_ID=www43"));
        }

        /// Expect the canonical token when the host has no scoped login
        #[test]
        fn falls_back_to_canonical() {
            let user = user_with_tokens(Some("MFL_USER_ID=api"), Some("{}"));

            let token = token_for_host(&user, Some("www99.example.com"));
            assert_eq!(token.as_deref(), Some("MFL_USER_ID=api"));
        }

        /// Expect malformed JSON to degrade to the canonical token
        #[test]
        fn tolerates_malformed_map() {
            let user = user_with_tokens(Some("MFL_USER_ID=api"), Some("{not json"));

            let token = token_for_host(&user, Some("www43.example.com"));
            assert_eq!(token.as_deref(), Some("MFL_USER_ID=api"));
        }

        /// Expect None when the account was never linked
        #[test]
        fn none_when_unlinked() {
            let user = user_with_tokens(None, None);
            assert_eq!(token_for_host(&user, None), None);
        }
    }
}
