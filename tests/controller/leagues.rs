use gridiron::data::user::UserRepository;
use gridiron_test_utils::prelude::*;
use serde_json::json;

use crate::util::{app, get, post_json, send};

const LEAGUE_INFO_XML: &str = r#"<league id="61860" name="Dynasty Sauce">
    <franchises>
        <franchise id="0002" name="Oklahoma GMen"/>
    </franchises>
</league>"#;

const ASSETS_XML: &str = r#"<assets>
    <franchise id="0002">
        <players><player id="13593"/><player id="15241"/></players>
        <futureYearDraftPicks>
            <draftPick pick="FP_0002_2026_1"/>
        </futureYearDraftPicks>
    </franchise>
</assets>"#;

const STANDINGS_XML: &str =
    r#"<leagueStandings><franchise id="0002" h2hwlt="2-0-0" pf="200" pa="150"/></leagueStandings>"#;

async fn seed_user(test: &TestSetup) -> entity::user::Model {
    let repo = UserRepository::new(&test.db);
    let user = repo.create("gm@example.com", "mgr5").await.unwrap();
    repo.store_token_bundle(user.id, "gm", "MFL_USER_ID=tok", &Default::default())
        .await
        .unwrap()
}

/// Expect requests without a resolvable user to get a 404
#[tokio::test]
async fn missing_user_is_not_found() -> Result<(), TestError> {
    let test = test_setup_with_core_tables!()?;

    let (status, body) = send(app(&test), get("/api/leagues?season=2026", None)).await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "User not found");

    Ok(())
}

/// Expect the selection endpoint to link, sync, and report per-league
/// outcomes, and the listing to reflect the sync
#[tokio::test]
async fn selection_syncs_and_lists() -> Result<(), TestError> {
    let mut test = test_setup_with_core_tables!()?;
    let user = seed_user(&test).await;

    test.mock_export("league", LEAGUE_INFO_XML, 1).await;
    test.mock_export("assets", ASSETS_XML, 1).await;
    test.mock_export("leagueStandings", STANDINGS_XML, 1).await;

    let body = json!({
        "season": 2026,
        "selections": [
            {"remote_id": "61860", "name": "Dynasty Sauce", "franchise_id": "2"}
        ]
    });
    let (status, outcomes) = send(
        app(&test),
        post_json("/api/leagues/selection", Some(user.id), &body),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(outcomes[0]["status"], "synced");
    assert_eq!(outcomes[0]["rosters_inserted"], 2);
    assert_eq!(outcomes[0]["picks_inserted"], 1);
    test.assert_mocks();

    let (status, leagues) = send(
        app(&test),
        get("/api/leagues?season=2026", Some(user.id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(leagues[0]["remote_id"], "61860");
    assert_eq!(leagues[0]["franchise_id"], "0002");
    assert!(!leagues[0]["synced_at"].is_null());

    let (status, listings) = send(
        app(&test),
        get("/api/leagues/61860/rosters", Some(user.id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(listings[0]["franchise_name"], "Oklahoma GMen");
    assert_eq!(listings[0]["players"].as_array().unwrap().len(), 2);
    assert_eq!(listings[0]["picks"].as_array().unwrap().len(), 1);

    Ok(())
}
