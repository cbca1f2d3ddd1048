//! Query client: typed table operations against the hosted backend.
//!
//! DESIGN
//! ======
//! Services talk to the backend only through [`Backend`]. Each method is one
//! remote round trip; joins that the backend cannot do for us (members with
//! profiles) are done by the caller in memory.
//!
//! `PgBackend` runs the queries on Postgres via sqlx. `MemoryBackend` keeps
//! the same tables in process for tests and local runs.

#[cfg(test)]
pub(crate) mod failing;
pub mod memory;
pub mod postgres;
pub mod types;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryBackend;
pub use postgres::PgBackend;
pub use types::{
    AccessLevel, Board, BoardShare, NewInvitation, ProjectMember, ProjectRole, UserProfile,
};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid {column} value in {table}: {value}")]
    Decode { table: &'static str, column: &'static str, value: String },
}

// =============================================================================
// BACKEND
// =============================================================================

/// Remote table operations used by the share flow and membership service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Find the share whose token matches exactly and whose `is_public` flag
    /// is set, together with the board it links to.
    async fn find_public_share(&self, token: &str) -> Result<Option<(BoardShare, Board)>, QueryError>;

    /// Membership rows for a project, oldest first.
    async fn list_project_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, QueryError>;

    /// Profiles for the given user ids. Unknown ids are skipped.
    async fn list_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>, QueryError>;

    async fn find_member_role(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<ProjectRole>, QueryError>;

    async fn insert_member(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError>;

    async fn delete_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), QueryError>;

    async fn update_member_role(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError>;

    async fn insert_invitation(&self, invitation: &NewInvitation) -> Result<(), QueryError>;

    /// Count-only query over `project_members`.
    async fn count_members(&self, project_id: Uuid) -> Result<i64, QueryError>;
}
