use async_trait::async_trait;
use payloads::{APIClient, ClientError, requests, responses::TeamWithPower};
use secrecy::SecretString;
use std::sync::Arc;

/// The remote team operations a [`crate::TeamHook`] drives.
///
/// Implemented by [`APIClient`]; tests substitute their own.
#[async_trait]
pub trait TeamApi: Send + Sync {
    async fn join_team(
        &self,
        token: Option<&SecretString>,
        details: &requests::JoinTeam,
    ) -> Result<TeamWithPower, ClientError>;

    async fn leave_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError>;

    async fn current_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError>;
}

#[async_trait]
impl TeamApi for APIClient {
    async fn join_team(
        &self,
        token: Option<&SecretString>,
        details: &requests::JoinTeam,
    ) -> Result<TeamWithPower, ClientError> {
        APIClient::join_team(self, token, details).await
    }

    async fn leave_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError> {
        APIClient::leave_team(self, token).await
    }

    async fn current_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError> {
        APIClient::current_team(self, token).await
    }
}

#[async_trait]
impl<T: TeamApi + ?Sized> TeamApi for Arc<T> {
    async fn join_team(
        &self,
        token: Option<&SecretString>,
        details: &requests::JoinTeam,
    ) -> Result<TeamWithPower, ClientError> {
        (**self).join_team(token, details).await
    }

    async fn leave_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError> {
        (**self).leave_team(token).await
    }

    async fn current_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<TeamWithPower, ClientError> {
        (**self).current_team(token).await
    }
}
