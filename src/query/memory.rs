//! In-process implementation of [`Backend`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by tests and local runs that have no Postgres. Tables live behind one
//! `RwLock` and are seeded through the inherent `seed_*` methods; the trait
//! methods follow the same filtering and ordering rules as `PgBackend`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{Board, BoardShare, NewInvitation, ProjectMember, ProjectRole, UserProfile};
use super::{Backend, QueryError};

#[derive(Default)]
struct Tables {
    boards: HashMap<Uuid, Board>,
    shares: Vec<BoardShare>,
    members: Vec<ProjectMember>,
    profiles: HashMap<Uuid, UserProfile>,
    invitations: Vec<NewInvitation>,
}

/// Cheaply cloneable handle to a shared set of in-memory tables.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_board(&self, board: Board) {
        self.tables.write().await.boards.insert(board.id, board);
    }

    pub async fn seed_share(&self, share: BoardShare) {
        self.tables.write().await.shares.push(share);
    }

    pub async fn seed_member(&self, member: ProjectMember) {
        self.tables.write().await.members.push(member);
    }

    pub async fn seed_profile(&self, profile: UserProfile) {
        self.tables.write().await.profiles.insert(profile.id, profile);
    }

    /// Snapshot of every invitation inserted so far, in insert order.
    pub async fn invitations(&self) -> Vec<NewInvitation> {
        self.tables.read().await.invitations.clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn find_public_share(&self, token: &str) -> Result<Option<(BoardShare, Board)>, QueryError> {
        let tables = self.tables.read().await;
        let found = tables
            .shares
            .iter()
            .filter(|share| share.is_public && share.share_token == token)
            .find_map(|share| {
                tables
                    .boards
                    .get(&share.board_id)
                    .map(|board| (share.clone(), board.clone()))
            });
        Ok(found)
    }

    async fn list_project_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, QueryError> {
        let tables = self.tables.read().await;
        let mut members: Vec<ProjectMember> = tables
            .members
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.created_at);
        Ok(members)
    }

    async fn list_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>, QueryError> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.profiles.get(id).cloned())
            .collect())
    }

    async fn find_member_role(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<ProjectRole>, QueryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .map(|m| m.role))
    }

    async fn insert_member(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        let member = ProjectMember {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables.write().await.members.push(member);
        Ok(())
    }

    async fn delete_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), QueryError> {
        self.tables
            .write()
            .await
            .members
            .retain(|m| !(m.project_id == project_id && m.user_id == user_id));
        Ok(())
    }

    async fn update_member_role(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        let mut tables = self.tables.write().await;
        for member in tables
            .members
            .iter_mut()
            .filter(|m| m.project_id == project_id && m.user_id == user_id)
        {
            member.role = role;
        }
        Ok(())
    }

    async fn insert_invitation(&self, invitation: &NewInvitation) -> Result<(), QueryError> {
        self.tables.write().await.invitations.push(invitation.clone());
        Ok(())
    }

    async fn count_members(&self, project_id: Uuid) -> Result<i64, QueryError> {
        let tables = self.tables.read().await;
        let count = tables.members.iter().filter(|m| m.project_id == project_id).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}
