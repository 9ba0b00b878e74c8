use api::faults::{Endpoint, Fault};
use hooks::{
    MemoryAuthStorage, Phase, ResolutionPolicy, TeamHook, use_team,
};
use payloads::{APIClient, ErrorKind, Power};
use std::time::Duration;

use test_helpers::{TEST_TEAM_CODE, TestStudent, join_details, spawn_app};

fn session_for(student: &TestStudent) -> MemoryAuthStorage {
    MemoryAuthStorage::with_token(student.raw_token().to_string().into())
}

#[tokio::test]
async fn join_fetch_and_leave() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let team = app.create_test_team()?;
    let alice = app.create_alice()?;
    let hook = use_team(session_for(&alice), app.client.clone());

    let joined = hook.join_team(join_details(TEST_TEAM_CODE)).await;
    let joined = joined.expect("join should succeed");
    assert_eq!(joined.id, team.id);
    assert_eq!(joined.my_power, Power::MemoryPro);
    assert_eq!(hook.data(), Some(joined.clone()));

    let current = hook.get_my_team().await;
    assert_eq!(current, Some(joined));

    let left = hook.leave_team().await.expect("leave should succeed");
    assert!(left.members.is_empty());

    let state = hook.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.phase, Phase::Succeeded);
    Ok(())
}

#[tokio::test]
async fn server_rejections_become_messages() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;
    let hook = use_team(session_for(&alice), app.client.clone());

    assert_eq!(hook.join_team(join_details(TEST_TEAM_CODE)).await, None);
    assert_eq!(hook.error().as_deref(), Some("Student already has a team"));

    assert_eq!(hook.join_team(join_details("NOSUCHTEAM")).await, None);
    assert_eq!(hook.error().as_deref(), Some("Team not found"));

    // a later success leaves the old message in place
    assert!(hook.get_my_team().await.is_some());
    assert_eq!(hook.error().as_deref(), Some("Team not found"));
    Ok(())
}

#[tokio::test]
async fn missing_and_expired_tokens() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;

    let anonymous = use_team(MemoryAuthStorage::default(), app.client.clone());
    assert_eq!(anonymous.get_my_team().await, None);
    assert_eq!(anonymous.error().as_deref(), Some("Missing authentication"));

    app.expire_token(&alice)?;
    let expired = use_team(session_for(&alice), app.client.clone());
    assert_eq!(expired.get_my_team().await, None);
    assert_eq!(expired.error().as_deref(), Some("Token expired or invalid"));
    assert_eq!(expired.state().error_kind, Some(ErrorKind::HttpStatus(498)));
    Ok(())
}

#[tokio::test]
async fn every_status_has_its_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;
    let hook = use_team(session_for(&alice), app.client.clone());

    let cases = [
        (400, "Invalid body"),
        (401, "Missing authentication"),
        (403, "Unauthorized to access this resource or team is full"),
        (404, "Team not found"),
        (409, "Student already has a team"),
        (410, "Team is not active"),
        (498, "Token expired or invalid"),
        (500, "Server error"),
        (402, "Unexpected status code"),
        (503, "Unexpected status code"),
        (201, "Unexpected status code"),
    ];
    for (code, message) in cases {
        app.plan_fault(Endpoint::Current, Fault::status(code));
        assert_eq!(hook.get_my_team().await, None, "status {code}");
        assert_eq!(hook.error().as_deref(), Some(message), "status {code}");
        assert!(!hook.loading());
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_server() -> anyhow::Result<()> {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let client = APIClient::new(format!("http://127.0.0.1:{port}"))?;
    let hook = use_team(MemoryAuthStorage::default(), client);

    assert_eq!(hook.get_my_team().await, None);
    let state = hook.state();
    assert_eq!(state.error_kind, Some(ErrorKind::NetworkFailure));
    assert_eq!(
        state.error.as_deref(),
        Some("Network error. Please check your connection.")
    );
    assert_eq!(state.phase, Phase::Failed);
    Ok(())
}

#[tokio::test]
async fn timeouts_are_network_failures() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, alice) = app.create_team_with_alice().await?;
    app.plan_fault(Endpoint::Current, Fault::delay(Duration::from_millis(500)));

    let client = APIClient::with_timeout(app.address(), Duration::from_millis(50))?;
    let hook = use_team(session_for(&alice), client);

    assert_eq!(hook.get_my_team().await, None);
    assert_eq!(hook.state().error_kind, Some(ErrorKind::NetworkFailure));
    Ok(())
}

/// Alice is in team A. She starts joining team B on a slow connection and,
/// before that finishes, leaves A. The leave lands first, then the join.
async fn join_then_leave_overlapping(
    policy: ResolutionPolicy,
) -> anyhow::Result<(Option<String>, String, String)> {
    let app = spawn_app().await;
    let (team_a, alice) = app.create_team_with_alice().await?;
    let team_b = app.create_team("Team B", "TEAMB", 1)?;
    app.plan_fault(Endpoint::Join, Fault::delay(Duration::from_millis(300)));

    let hook =
        TeamHook::with_policy(session_for(&alice), app.client.clone(), policy);
    let leave = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        hook.leave_team().await
    };
    let (joined, left) =
        tokio::join!(hook.join_team(join_details("TEAMB")), leave);

    assert_eq!(left.map(|t| t.id), Some(team_a.id));
    assert_eq!(joined.map(|t| t.id), Some(team_b.id));
    assert!(!hook.loading());
    Ok((
        hook.data().map(|t| t.name.clone()),
        team_a.name,
        team_b.name,
    ))
}

#[tokio::test]
async fn overlapping_calls_last_write_wins() -> anyhow::Result<()> {
    let (final_team, _, team_b) =
        join_then_leave_overlapping(ResolutionPolicy::LastWriteWins).await?;
    assert_eq!(final_team, Some(team_b));
    Ok(())
}

#[tokio::test]
async fn overlapping_calls_latest_call_wins() -> anyhow::Result<()> {
    let (final_team, team_a, _) =
        join_then_leave_overlapping(ResolutionPolicy::LatestCallWins).await?;
    assert_eq!(final_team, Some(team_a));
    Ok(())
}
