mod auth_storage;
mod use_team;
