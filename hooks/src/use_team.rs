//! Team membership hook: join, leave and fetch the student's team while
//! tracking `{loading, error, data}` for the screen that owns it.
//!
//! Failures never escape as errors. They end up in [`RequestState::error`]
//! as the message to show, and the operation itself returns `None`.
//!
//! Calls on one hook are not serialised. With the default
//! [`ResolutionPolicy::LastWriteWins`], whichever call completes last
//! decides the final state, even if it was started first.

use payloads::{ClientError, requests, responses::TeamWithPower};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::{RequestState, SessionAccessor, TeamApi};

/// How resolutions of overlapping calls are applied to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Every resolution is applied in completion order.
    #[default]
    LastWriteWins,
    /// Only the most recently started call may touch the state; earlier
    /// calls still return their result to their own caller.
    LatestCallWins,
}

#[derive(Debug)]
enum Operation {
    Join(requests::JoinTeam),
    Leave,
    Current,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join_team",
            Self::Leave => "leave_team",
            Self::Current => "get_my_team",
        }
    }
}

pub struct TeamHook<S, A> {
    session: S,
    api: A,
    policy: ResolutionPolicy,
    state: watch::Sender<RequestState<TeamWithPower>>,
    /// Number of calls started so far; a call's generation is its position.
    generation: AtomicU64,
}

/// Team hook for one screen, with the default resolution policy.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> anyhow::Result<()> {
/// use hooks::{Environment, MemoryAuthStorage, use_team};
///
/// let env = Environment::from_env()?;
/// let team = use_team(MemoryAuthStorage::default(), env.api_client()?);
///
/// if let Some(current) = team.get_my_team().await {
///     println!("{} ({})", current.name, current.my_power);
/// } else if let Some(error) = team.state().error {
///     println!("{error}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn use_team<S, A>(session: S, api: A) -> TeamHook<S, A>
where
    S: SessionAccessor,
    A: TeamApi,
{
    TeamHook::new(session, api)
}

impl<S, A> TeamHook<S, A>
where
    S: SessionAccessor,
    A: TeamApi,
{
    pub fn new(session: S, api: A) -> Self {
        Self::with_policy(session, api, ResolutionPolicy::default())
    }

    pub fn with_policy(session: S, api: A, policy: ResolutionPolicy) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self {
            session,
            api,
            policy,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState<TeamWithPower> {
        self.state.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn data(&self) -> Option<TeamWithPower> {
        self.state.borrow().data.clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<TeamWithPower>> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub async fn join_team(
        &self,
        details: requests::JoinTeam,
    ) -> Option<TeamWithPower> {
        self.run(Operation::Join(details)).await
    }

    pub async fn leave_team(&self) -> Option<TeamWithPower> {
        self.run(Operation::Leave).await
    }

    pub async fn get_my_team(&self) -> Option<TeamWithPower> {
        self.run(Operation::Current).await
    }

    #[tracing::instrument(skip(self), fields(generation))]
    async fn run(&self, operation: Operation) -> Option<TeamWithPower> {
        // numbered under the state lock so no resolution can interleave
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.start();
        });
        tracing::Span::current().record("generation", generation);

        // fetched for every call so a refreshed token is picked up
        let token = self.session.get_access_token().await;
        let token = token.as_ref();
        let result = match &operation {
            Operation::Join(details) => self.api.join_team(token, details).await,
            Operation::Leave => self.api.leave_team(token).await,
            Operation::Current => self.api.current_team(token).await,
        };

        self.resolve(generation, operation.name(), result)
    }

    fn resolve(
        &self,
        generation: u64,
        operation: &'static str,
        result: Result<TeamWithPower, ClientError>,
    ) -> Option<TeamWithPower> {
        match result {
            Ok(team) => {
                if self.apply(generation, |state| state.succeed(team.clone())) {
                    tracing::debug!(operation, team_id = %team.id, "team loaded");
                } else {
                    tracing::debug!(operation, "newer call in flight, not applying");
                }
                Some(team)
            }
            Err(e) => {
                if self.apply(generation, |state| state.fail(e.kind())) {
                    tracing::warn!(
                        operation,
                        error = %e,
                        kind = ?e.kind(),
                        "team request failed"
                    );
                } else {
                    tracing::debug!(
                        operation,
                        error = %e,
                        "newer call in flight, not applying"
                    );
                }
                None
            }
        }
    }

    /// Write a resolution unless the policy says it is stale. The check and
    /// the write happen under the same lock as [`RequestState::start`].
    fn apply(
        &self,
        generation: u64,
        update: impl FnOnce(&mut RequestState<TeamWithPower>),
    ) -> bool {
        self.state.send_if_modified(|state| {
            if self.policy == ResolutionPolicy::LatestCallWins
                && self.generation.load(Ordering::SeqCst) != generation
            {
                return false;
            }
            update(state);
            true
        })
    }
}
