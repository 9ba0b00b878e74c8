pub mod mock;

use api::faults::{Endpoint, Fault, FaultInjector};
use api::store::{NewTeam, TeamStore};
use api::{Config, telemetry};
use payloads::{StudentId, requests, responses};
use reqwest::StatusCode;
use secrecy::SecretString;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub const TEST_TEAM_CODE: &str = "TEAM1";
pub const TEST_TASK_ORDER: u32 = 1;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: payloads::APIClient,
    /// Direct access to the server's state, for provisioning and assertions.
    pub store: TeamStore,
    pub faults: FaultInjector,
}

/// A registered student and the token they authenticate with.
pub struct TestStudent {
    pub student_id: StudentId,
    pub username: String,
    pub token: SecretString,
    raw_token: String,
}

impl TestStudent {
    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    pub fn address(&self) -> &str {
        &self.client.address
    }

    pub fn create_team(
        &self,
        name: &str,
        code: &str,
        task_order: u32,
    ) -> anyhow::Result<responses::Team> {
        Ok(self.store.create_team(NewTeam {
            name: name.into(),
            code: code.into(),
            task_order,
            active: true,
        })?)
    }

    pub fn create_test_team(&self) -> anyhow::Result<responses::Team> {
        self.create_team("Test team", TEST_TEAM_CODE, TEST_TASK_ORDER)
    }

    pub fn create_student(&self, username: &str) -> anyhow::Result<TestStudent> {
        let student_id = self.store.create_student(username);
        let raw_token = self.store.issue_token(&student_id)?;
        Ok(TestStudent {
            student_id,
            username: username.into(),
            token: SecretString::from(raw_token.clone()),
            raw_token,
        })
    }

    pub fn create_alice(&self) -> anyhow::Result<TestStudent> {
        self.create_student("alice")
    }

    pub fn create_bob(&self) -> anyhow::Result<TestStudent> {
        self.create_student("bob")
    }

    /// Join the test team directly through the client.
    pub async fn join_test_team(
        &self,
        student: &TestStudent,
    ) -> anyhow::Result<responses::TeamWithPower> {
        let details = join_details(TEST_TEAM_CODE);
        Ok(self.client.join_team(Some(&student.token), &details).await?)
    }

    /// Create the test team with alice already in it.
    pub async fn create_team_with_alice(
        &self,
    ) -> anyhow::Result<(responses::Team, TestStudent)> {
        let team = self.create_test_team()?;
        let alice = self.create_alice()?;
        self.join_test_team(&alice).await?;
        Ok((team, alice))
    }

    pub fn expire_token(&self, student: &TestStudent) -> anyhow::Result<()> {
        Ok(self.store.expire_token(student.raw_token())?)
    }

    pub fn plan_fault(&self, endpoint: Endpoint, fault: Fault) {
        self.faults.plan(endpoint, fault);
    }
}

pub fn join_details(code: &str) -> requests::JoinTeam {
    requests::JoinTeam {
        code: code.into(),
        task_order: TEST_TASK_ORDER,
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let mut config = Config {
        ip: "127.0.0.1".into(),
        port,
    };
    let store = TeamStore::default();
    let faults = FaultInjector::default();

    let server = api::build(&mut config, store.clone(), faults.clone())
        .expect("Failed to bind test server");
    tokio::spawn(server);

    TestApp {
        port: config.port,
        client: payloads::APIClient::new(format!(
            "http://127.0.0.1:{}",
            config.port
        ))
        .expect("Failed to build client"),
        store,
        faults,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
