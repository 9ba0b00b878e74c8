use hooks::{FileAuthStorage, SessionAccessor, use_team};
use std::sync::Arc;

use test_helpers::{TEST_TEAM_CODE, join_details, spawn_app};

#[tokio::test]
async fn persisted_token_is_used_until_logout() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_test_team()?;
    let alice = app.create_alice()?;

    let dir = tempfile::tempdir()?;
    let storage = Arc::new(FileAuthStorage::new(dir.path().join("token")));
    storage
        .set_access_token(alice.raw_token().to_string().into())
        .await?;

    let hook = use_team(storage.clone(), app.client.clone());
    assert!(hook.join_team(join_details(TEST_TEAM_CODE)).await.is_some());

    // a fresh hook, as on the next app start, picks the token up from disk
    let restarted = use_team(
        FileAuthStorage::new(dir.path().join("token")),
        app.client.clone(),
    );
    assert!(restarted.get_my_team().await.is_some());

    storage.remove_access_token().await?;
    assert_eq!(hook.get_my_team().await, None);
    assert_eq!(hook.error().as_deref(), Some("Missing authentication"));
    Ok(())
}
