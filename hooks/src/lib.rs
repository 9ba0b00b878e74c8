pub mod auth_storage;
pub mod config;
pub mod state;
pub mod team_api;
pub mod use_team;

pub use auth_storage::{FileAuthStorage, MemoryAuthStorage, SessionAccessor};
pub use config::Environment;
pub use state::{Phase, RequestState};
pub use team_api::TeamApi;
pub use use_team::{ResolutionPolicy, TeamHook, use_team};
