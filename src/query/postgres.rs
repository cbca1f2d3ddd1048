//! Postgres implementation of [`Backend`].

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::types::{AccessLevel, Board, BoardShare, NewInvitation, ProjectMember, ProjectRole, UserProfile};
use super::{Backend, QueryError};

type ShareRow = (
    Uuid,
    String,
    Uuid,
    bool,
    Option<OffsetDateTime>,
    Option<String>,
    String,
    String,
    String,
    Option<Uuid>,
    serde_json::Value,
    OffsetDateTime,
    OffsetDateTime,
);

/// Query client backed by a shared sqlx pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_role(raw: &str) -> Result<ProjectRole, QueryError> {
    ProjectRole::parse(raw).ok_or_else(|| QueryError::Decode {
        table: "project_members",
        column: "role",
        value: raw.to_owned(),
    })
}

fn decode_access_level(raw: &str) -> Result<AccessLevel, QueryError> {
    AccessLevel::parse(raw).ok_or_else(|| QueryError::Decode {
        table: "board_shares",
        column: "access_level",
        value: raw.to_owned(),
    })
}

#[async_trait]
impl Backend for PgBackend {
    async fn find_public_share(&self, token: &str) -> Result<Option<(BoardShare, Board)>, QueryError> {
        let row = sqlx::query_as::<_, ShareRow>(
            r#"SELECT s.id, s.share_token, s.board_id, s.is_public, s.expires_at, s.password_hash, s.access_level,
                      b.name, b."type", b.project_id, b.settings, b.created_at, b.updated_at
               FROM board_shares s
               JOIN boards b ON b.id = s.board_id
               WHERE s.share_token = $1 AND s.is_public = true
               LIMIT 1"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some((
            id,
            share_token,
            board_id,
            is_public,
            expires_at,
            password_hash,
            access_level,
            name,
            kind,
            project_id,
            settings,
            created_at,
            updated_at,
        )) = row
        else {
            return Ok(None);
        };

        let share = BoardShare {
            id,
            share_token,
            board_id,
            is_public,
            expires_at,
            password_hash,
            access_level: decode_access_level(&access_level)?,
        };
        let board = Board { id: board_id, name, kind, project_id, settings, created_at, updated_at };
        Ok(Some((share, board)))
    }

    async fn list_project_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, QueryError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, OffsetDateTime)>(
            "SELECT id, project_id, user_id, role, created_at
             FROM project_members
             WHERE project_id = $1
             ORDER BY created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, project_id, user_id, role, created_at)| {
                Ok(ProjectMember { id, project_id, user_id, role: decode_role(&role)?, created_at })
            })
            .collect()
    }

    async fn list_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>, QueryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, (Uuid, Option<String>, Option<String>)>(
            "SELECT id, display_name, email FROM profiles WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, display_name, email)| UserProfile { id, display_name, email })
            .collect())
    }

    async fn find_member_role(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<ProjectRole>, QueryError> {
        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2 LIMIT 1",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        role.as_deref().map(decode_role).transpose()
    }

    async fn insert_member(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        sqlx::query("INSERT INTO project_members (id, project_id, user_id, role) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), QueryError> {
        sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_member_role(&self, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Result<(), QueryError> {
        sqlx::query("UPDATE project_members SET role = $3 WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_invitation(&self, invitation: &NewInvitation) -> Result<(), QueryError> {
        sqlx::query(
            "INSERT INTO invitations (id, email, resource_type, resource_id, role, invited_by)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(&invitation.email)
        .bind(&invitation.resource_type)
        .bind(invitation.resource_id)
        .bind(invitation.role.as_str())
        .bind(invitation.invited_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_members(&self, project_id: Uuid) -> Result<i64, QueryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
