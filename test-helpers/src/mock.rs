//! Demo data for manual testing against the dev-server.
//!
//! The dataset covers every answer a client can get from the teams API:
//! - an open team with free powers (join succeeds)
//! - a full team (403)
//! - an inactive team (410)
//! - a student already in a team (409 on join, 200 on current/leave)
//! - a student with an expired token (498)

use crate::{TestApp, TestStudent};
use anyhow::Result;
use payloads::responses;
use tracing::info;

pub struct DevDataset {
    pub open_team: responses::Team,
    pub full_team: responses::Team,
    pub inactive_team: responses::Team,
    /// Member of the open team.
    pub alice: TestStudent,
    /// Not in any team yet.
    pub bob: TestStudent,
    /// Token has expired.
    pub mallory: TestStudent,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        info!("👥 Creating teams");
        let open_team = app.create_team("Explorers", "EXPLORE", 1)?;
        let full_team = app.create_team("Navigators", "NAVIGATE", 1)?;
        let inactive_team = app.create_team("Retired", "RETIRED", 1)?;
        app.store.set_team_active(&inactive_team.id, false)?;

        info!("👤 Creating students");
        let alice = app.create_student("alice")?;
        let bob = app.create_student("bob")?;
        let mallory = app.create_student("mallory")?;
        app.expire_token(&mallory)?;

        let join_open = crate::join_details(&open_team.code);
        app.client.join_team(Some(&alice.token), &join_open).await?;

        let join_full = crate::join_details(&full_team.code);
        for name in ["charlie", "dana", "eve"] {
            let student = app.create_student(name)?;
            app.client.join_team(Some(&student.token), &join_full).await?;
        }

        Ok(Self {
            open_team,
            full_team,
            inactive_team,
            alice,
            bob,
            mallory,
        })
    }

    pub fn print_summary(&self) {
        info!("📋 Teams (taskOrder 1):");
        info!("   open:     {}", self.open_team.code);
        info!("   full:     {}", self.full_team.code);
        info!("   inactive: {}", self.inactive_team.code);
        info!("🔑 Tokens:");
        info!("   alice (in {}): {}", self.open_team.code, self.alice.raw_token());
        info!("   bob (no team):   {}", self.bob.raw_token());
        info!("   mallory (expired): {}", self.mallory.raw_token());
    }
}
