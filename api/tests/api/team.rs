use payloads::{ErrorKind, Power, requests};
use reqwest::StatusCode;

use test_helpers::{
    TEST_TEAM_CODE, assert_status_code, join_details, spawn_app,
};

#[tokio::test]
async fn join_current_leave() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let team = app.create_test_team()?;
    let alice = app.create_alice()?;

    let joined = app.join_test_team(&alice).await?;
    assert_eq!(joined.id, team.id);
    assert_eq!(joined.my_power, Power::MemoryPro);
    assert_eq!(joined.members.len(), 1);
    assert_eq!(joined.members[0].username, "alice");

    let current = app.client.current_team(Some(&alice.token)).await?;
    assert_eq!(current, joined);

    let left = app.client.leave_team(Some(&alice.token)).await?;
    assert_eq!(left.id, team.id);
    assert_eq!(left.my_power, Power::MemoryPro);
    assert!(left.members.is_empty());

    let result = app.client.current_team(Some(&alice.token)).await;
    assert_status_code(result, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn members_get_distinct_powers() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;
    let bob = app.create_bob()?;

    let bob_view = app.join_test_team(&bob).await?;
    assert_eq!(bob_view.my_power, Power::SuperRadar);
    assert_eq!(bob_view.members.len(), 2);

    let alice_view = app.client.current_team(Some(&alice.token)).await?;
    assert_eq!(alice_view.my_power, Power::MemoryPro);
    assert_eq!(alice_view.members, bob_view.members);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_test_team()?;

    let result = app.client.join_team(None, &join_details(TEST_TEAM_CODE)).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    let result = app.client.current_team(None).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_and_unknown_tokens_get_498() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;
    app.expire_token(&alice)?;

    let err = app.client.current_team(Some(&alice.token)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus(498));
    assert_eq!(err.to_string(), "Token expired or invalid");

    let forged = secrecy::SecretString::from("forged".to_string());
    let err = app.client.leave_team(Some(&forged)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus(498));
    Ok(())
}

#[tokio::test]
async fn join_failures_map_to_statuses() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let team = app.create_test_team()?;
    let alice = app.create_alice()?;

    // unknown code
    let result = app
        .client
        .join_team(Some(&alice.token), &join_details("MISSING"))
        .await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    // wrong task
    let wrong_task = requests::JoinTeam {
        code: TEST_TEAM_CODE.into(),
        task_order: 7,
    };
    let result = app.client.join_team(Some(&alice.token), &wrong_task).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // inactive team
    app.store.set_team_active(&team.id, false)?;
    let result = app
        .client
        .join_team(Some(&alice.token), &join_details(TEST_TEAM_CODE))
        .await;
    assert_status_code(result, StatusCode::GONE);

    // already in a team
    app.store.set_team_active(&team.id, true)?;
    app.join_test_team(&alice).await?;
    let result = app
        .client
        .join_team(Some(&alice.token), &join_details(TEST_TEAM_CODE))
        .await;
    assert_status_code(result, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn full_team_is_forbidden() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_test_team()?;
    for name in ["alice", "bob", "charlie"] {
        let student = app.create_student(name)?;
        app.join_test_team(&student).await?;
    }

    let dave = app.create_student("dave")?;
    let result = app
        .client
        .join_team(Some(&dave.token), &join_details(TEST_TEAM_CODE))
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_test_team()?;
    let alice = app.create_alice()?;

    let response = reqwest::Client::new()
        .post(format!("{}/teams", app.address()))
        .bearer_auth(alice.raw_token())
        .header("Content-Type", "application/json")
        .body(r#"{"code": 12}"#)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn leaving_without_a_team_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice()?;

    let result = app.client.leave_team(Some(&alice.token)).await;
    assert_status_code(result, StatusCode::NOT_FOUND);
    Ok(())
}
