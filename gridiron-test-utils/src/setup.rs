use mockito::{Matcher, Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// Season used by every mocked endpoint; fixtures and tests agree on it.
pub const TEST_SEASON: i32 = 2026;

/// Shared test harness: a sqlite in-memory database plus a mockito server
/// standing in for the remote commissioner host.
pub struct TestSetup {
    pub server: ServerGuard,
    pub db: DatabaseConnection,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;
        let db = Database::connect("sqlite::memory:").await?;

        Ok(Self {
            server,
            db,
            mocks: Vec::new(),
        })
    }

    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Mock one export type with a payload, expecting `expect` requests.
    pub async fn mock_export(&mut self, type_: &str, body: &str, expect: usize) {
        let mock = self
            .server
            .mock("GET", format!("/{TEST_SEASON}/export").as_str())
            .match_query(Matcher::UrlEncoded("TYPE".into(), type_.into()))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(body)
            .expect(expect)
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Mock one export type with a bare HTTP status.
    pub async fn mock_export_status(&mut self, type_: &str, status: usize, expect: usize) {
        let mock = self
            .server
            .mock("GET", format!("/{TEST_SEASON}/export").as_str())
            .match_query(Matcher::UrlEncoded("TYPE".into(), type_.into()))
            .with_status(status)
            .expect(expect)
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Mock one import type with a payload.
    pub async fn mock_import(&mut self, type_: &str, body: &str, expect: usize) {
        let mock = self
            .server
            .mock("GET", format!("/{TEST_SEASON}/import").as_str())
            .match_query(Matcher::UrlEncoded("TYPE".into(), type_.into()))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(body)
            .expect(expect)
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Mock a successful login returning a session cookie.
    pub async fn mock_login(&mut self, cookie: &str, expect: usize) {
        let mock = self
            .server
            .mock("POST", format!("/{TEST_SEASON}/login").as_str())
            .with_status(200)
            .with_header("set-cookie", &format!("{cookie}; path=/; HttpOnly"))
            .with_body("<status>OK</status>")
            .expect(expect)
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Mock every login endpoint variant as rejected.
    pub async fn mock_login_failure(&mut self) {
        for (method, path) in [
            ("POST", "login"),
            ("POST", "account/login"),
            ("GET", "login"),
            ("GET", "account/login"),
        ] {
            let mock = self
                .server
                .mock(method, format!("/{TEST_SEASON}/{path}").as_str())
                .with_status(403)
                .create_async()
                .await;
            self.mocks.push(mock);
        }
    }

    /// Assert every mock endpoint was hit the expected number of times.
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        $crate::TestSetup::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = $crate::TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::TestError>(setup)
        }.await
    }};
}

#[macro_export]
macro_rules! test_setup_with_core_tables {
    () => {{
        $crate::test_setup_with_tables!(
            entity::prelude::User,
            entity::prelude::League,
            entity::prelude::Franchise,
            entity::prelude::Player,
            entity::prelude::RosterEntry,
            entity::prelude::DraftPick,
            entity::prelude::UsageCounter
        )
    }};
}
