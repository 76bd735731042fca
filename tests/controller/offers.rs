use chrono::Utc;
use gridiron::data::{
    draft_pick::DraftPickRepository, franchise::FranchiseRepository, league::LeagueRepository,
    player::PlayerRepository, roster::RosterRepository, user::UserRepository,
};
use gridiron::parser::pick::PickToken;
use gridiron_test_utils::prelude::*;
use serde_json::json;

use crate::util::{app, post_json, send};

struct Seeded {
    user: entity::user::Model,
    my_pick_id: i32,
}

async fn seed(test: &TestSetup, plan: &str) -> Seeded {
    let users = UserRepository::new(&test.db);
    let user = users.create("gm@example.com", plan).await.unwrap();
    let user = users
        .store_token_bundle(user.id, "gm", "MFL_USER_ID=tok", &Default::default())
        .await
        .unwrap();

    let league = LeagueRepository::new(&test.db)
        .create(user.id, "61860", "Dynasty Sauce", 2026, Some("0001".to_string()))
        .await
        .unwrap();
    LeagueRepository::new(&test.db)
        .mark_synced(league.id, Utc::now().naive_utc())
        .await
        .unwrap();

    let franchises = FranchiseRepository::new(&test.db);
    let mine = franchises
        .ensure(league.id, "0001", Some("My Team"))
        .await
        .unwrap();
    let theirs = franchises
        .ensure(league.id, "0002", Some("Oklahoma GMen"))
        .await
        .unwrap();

    let players = PlayerRepository::new(&test.db);
    players.ensure_placeholder(111).await.unwrap();
    players.ensure_placeholder(222).await.unwrap();

    let rosters = RosterRepository::new(&test.db);
    rosters.replace_for_franchise(mine.id, &[111]).await.unwrap();
    rosters
        .replace_for_franchise(theirs.id, &[222])
        .await
        .unwrap();

    let picks = DraftPickRepository::new(&test.db);
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

    Seeded { user, my_pick_id }
}

fn send_body(seeded: &Seeded) -> serde_json::Value {
    json!({
        "season": 2026,
        "drafts": [{
            "league_remote_id": "61860",
            "counterparty_fid": "0002",
            "give_player": 111,
            "give_pick_ids": [seeded.my_pick_id],
            "receive_player": 222,
            "receive_pick_ids": [],
            "comments": ""
        }]
    })
}

/// Expect a paid user's batch to submit and report a per-offer outcome
#[tokio::test]
async fn send_submits_and_reports() -> Result<(), TestError> {
    let mut test = test_setup_with_core_tables!()?;
    let seeded = seed(&test, "mgr5").await;

    test.mock_import("tradeProposal", "<status>OK</status>", 1).await;

    let (status, result) = send(
        app(&test),
        post_json("/api/offers/send", Some(seeded.user.id), &send_body(&seeded)),
    )
    .await;

    assert_eq!(status, 200);
    assert!(result["denied"].is_null());
    assert_eq!(result["outcomes"][0]["status"], "ok");
    test.assert_mocks();

    Ok(())
}

/// Expect the free tier's second weekly send to be denied without any
/// network call
#[tokio::test]
async fn free_tier_weekly_gate() -> Result<(), TestError> {
    let mut test = test_setup_with_core_tables!()?;
    let seeded = seed(&test, "free").await;

    // Only the first batch may reach the host.
    test.mock_import("tradeProposal", "<status>OK</status>", 1).await;

    let (_, first) = send(
        app(&test),
        post_json("/api/offers/send", Some(seeded.user.id), &send_body(&seeded)),
    )
    .await;
    assert!(first["denied"].is_null());

    let (status, second) = send(
        app(&test),
        post_json("/api/offers/send", Some(seeded.user.id), &send_body(&seeded)),
    )
    .await;
    assert_eq!(status, 200);
    assert!(second["denied"]
        .as_str()
        .unwrap()
        .contains("weekly free mass offer"));
    assert!(second["outcomes"].as_array().unwrap().is_empty());
    test.assert_mocks();

    Ok(())
}

/// Expect a validation failure to reject the batch before the gate or any
/// network call
#[tokio::test]
async fn invalid_draft_is_bad_request() -> Result<(), TestError> {
    let test = test_setup_with_core_tables!()?;
    let seeded = seed(&test, "mgr5").await;

    let mut body = send_body(&seeded);
    body["drafts"][0]["give_player"] = json!(222);

    let (status, result) = send(
        app(&test),
        post_json("/api/offers/send", Some(seeded.user.id), &body),
    )
    .await;

    assert_eq!(status, 400);
    assert!(result["error"]
        .as_str()
        .unwrap()
        .contains("not on your roster"));

    Ok(())
}
