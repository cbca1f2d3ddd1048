//! Test backend whose queries fail with a pool timeout.
//!
//! [`FailingBackend::all`] fails every call. [`FailingBackend::profiles_down`]
//! forwards to a [`MemoryBackend`] except for profile lookups, which fail.

use async_trait::async_trait;
use uuid::Uuid;

use super::types::{Board, BoardShare, NewInvitation, ProjectMember, ProjectRole, UserProfile};
use super::{Backend, MemoryBackend, QueryError};

pub(crate) struct FailingBackend {
    inner: Option<MemoryBackend>,
}

fn down() -> QueryError {
    QueryError::Database(sqlx::Error::PoolTimedOut)
}

impl FailingBackend {
    pub(crate) fn all() -> Self {
        Self { inner: None }
    }

    pub(crate) fn profiles_down(inner: MemoryBackend) -> Self {
        Self { inner: Some(inner) }
    }

    fn inner(&self) -> Result<&MemoryBackend, QueryError> {
        self.inner.as_ref().ok_or_else(down)
    }
}

#[async_trait]
impl Backend for FailingBackend {
    async fn find_public_share(&self, token: &str) -> Result<Option<(BoardShare, Board)>, QueryError> {
        self.inner()?.find_public_share(token).await
    }

    async fn list_project_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, QueryError> {
        self.inner()?.list_project_members(project_id).await
    }

    async fn list_profiles(&self, _user_ids: &[Uuid]) -> Result<Vec<UserProfile>, QueryError> {
        Err(down())
    }

    async fn find_member_role(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<ProjectRole>, QueryError> {
        self.inner()?.find_member_role(project_id, user_id).await
    }

    async fn insert_member(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        self.inner()?.insert_member(project_id, user_id, role).await
    }

    async fn delete_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), QueryError> {
        self.inner()?.delete_member(project_id, user_id).await
    }

    async fn update_member_role(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        self.inner()?.update_member_role(project_id, user_id, role).await
    }

    async fn insert_invitation(&self, invitation: &NewInvitation) -> Result<(), QueryError> {
        self.inner()?.insert_invitation(invitation).await
    }

    async fn count_members(&self, project_id: Uuid) -> Result<i64, QueryError> {
        self.inner()?.count_members(project_id).await
    }
}
