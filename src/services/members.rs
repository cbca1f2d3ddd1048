//! Project membership: member listing, role checks and invitations.
//!
//! DESIGN
//! ======
//! Members and profiles live in separate tables. Listing fetches the member
//! rows first, then the profiles for exactly those user ids, and joins the
//! two in memory through a `HashMap` keyed by user id.
//!
//! ERROR HANDLING
//! ==============
//! Every helper logs backend failures at `error` and returns a safe default
//! (empty list, `None`, `false` or `0`). Callers render whatever comes back.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::query::{Backend, NewInvitation, ProjectMember, ProjectRole, UserProfile};

#[cfg(test)]
#[path = "members_test.rs"]
mod tests;

/// Shown in assignment pickers when nothing better identifies a member.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

const INVITATION_RESOURCE_TYPE: &str = "project";

// =============================================================================
// TYPES
// =============================================================================

/// A membership row joined with the member's profile, if one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMemberWithProfile {
    #[serde(flatten)]
    pub member: ProjectMember,
    pub profile: Option<UserProfile>,
}

/// A member as offered in an assignee picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignableMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// LISTING
// =============================================================================

/// Members of `project_id`, oldest first, each with its profile.
pub async fn get_project_members(db: &dyn Backend, project_id: Uuid) -> Vec<ProjectMemberWithProfile> {
    let members = match db.list_project_members(project_id).await {
        Ok(members) => members,
        Err(e) => {
            error!(error = %e, %project_id, "failed to list project members");
            return Vec::new();
        }
    };
    if members.is_empty() {
        return Vec::new();
    }

    let user_ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
    let mut profiles: HashMap<Uuid, UserProfile> = match db.list_profiles(&user_ids).await {
        Ok(profiles) => profiles.into_iter().map(|p| (p.id, p)).collect(),
        Err(e) => {
            error!(error = %e, %project_id, "failed to load member profiles");
            HashMap::new()
        }
    };

    members
        .into_iter()
        .map(|member| {
            let profile = profiles.remove(&member.user_id);
            ProjectMemberWithProfile { member, profile }
        })
        .collect()
}

/// Members of `project_id` as assignee candidates, sorted by display name.
///
/// The name is the first non-blank of: profile display name, profile email,
/// `current_user_email` when the member is the current user, and finally
/// [`UNKNOWN_USER_NAME`].
pub async fn get_project_members_for_assignment(
    db: &dyn Backend,
    project_id: Uuid,
    current_user_id: Option<Uuid>,
    current_user_email: Option<&str>,
) -> Vec<AssignableMember> {
    let current_email = non_blank(current_user_email);

    let mut assignable: Vec<AssignableMember> = get_project_members(db, project_id)
        .await
        .into_iter()
        .map(|entry| {
            let user_id = entry.member.user_id;
            let is_current = current_user_id == Some(user_id);
            let profile_name = entry
                .profile
                .as_ref()
                .and_then(|p| non_blank(p.display_name.as_deref()));
            let profile_email = entry.profile.as_ref().and_then(|p| non_blank(p.email.as_deref()));
            let fallback_email = if is_current { current_email } else { None };

            let name = profile_name
                .or(profile_email)
                .or(fallback_email)
                .unwrap_or(UNKNOWN_USER_NAME)
                .to_owned();
            let email = profile_email.or(fallback_email).map(str::to_owned);
            AssignableMember { user_id, name, email }
        })
        .collect();

    assignable.sort_by(|a, b| a.name.cmp(&b.name));
    assignable
}

// =============================================================================
// ROLES
// =============================================================================

pub async fn get_user_project_role(db: &dyn Backend, project_id: Uuid, user_id: Uuid) -> Option<ProjectRole> {
    match db.find_member_role(project_id, user_id).await {
        Ok(role) => role,
        Err(e) => {
            error!(error = %e, %project_id, %user_id, "failed to look up member role");
            None
        }
    }
}

/// True only for owners and admins of the project.
pub async fn can_manage_project_members(db: &dyn Backend, project_id: Uuid, user_id: Uuid) -> bool {
    get_user_project_role(db, project_id, user_id)
        .await
        .is_some_and(ProjectRole::can_manage_members)
}

pub async fn is_project_member(db: &dyn Backend, project_id: Uuid, user_id: Uuid) -> bool {
    get_user_project_role(db, project_id, user_id).await.is_some()
}

// =============================================================================
// MUTATIONS
// =============================================================================

pub async fn add_project_member(db: &dyn Backend, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> bool {
    match db.insert_member(project_id, user_id, role).await {
        Ok(()) => {
            info!(%project_id, %user_id, role = role.as_str(), "project member added");
            true
        }
        Err(e) => {
            error!(error = %e, %project_id, %user_id, "failed to add project member");
            false
        }
    }
}

pub async fn remove_project_member(db: &dyn Backend, project_id: Uuid, user_id: Uuid) -> bool {
    match db.delete_member(project_id, user_id).await {
        Ok(()) => {
            info!(%project_id, %user_id, "project member removed");
            true
        }
        Err(e) => {
            error!(error = %e, %project_id, %user_id, "failed to remove project member");
            false
        }
    }
}

pub async fn update_member_role(db: &dyn Backend, project_id: Uuid, user_id: Uuid, role: ProjectRole) -> bool {
    match db.update_member_role(project_id, user_id, role).await {
        Ok(()) => {
            info!(%project_id, %user_id, role = role.as_str(), "project member role updated");
            true
        }
        Err(e) => {
            error!(error = %e, %project_id, %user_id, "failed to update member role");
            false
        }
    }
}

/// Record an invitation for `email` to join `project_id`.
///
/// No duplicate or already-member checks are made.
pub async fn create_project_invitation(
    db: &dyn Backend,
    email: &str,
    project_id: Uuid,
    role: ProjectRole,
    invited_by: Uuid,
) -> bool {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        warn!(%project_id, "refusing invitation with blank email");
        return false;
    }

    let invitation = NewInvitation {
        email,
        resource_type: INVITATION_RESOURCE_TYPE.to_owned(),
        resource_id: project_id,
        role,
        invited_by,
    };
    match db.insert_invitation(&invitation).await {
        Ok(()) => {
            info!(%project_id, %invited_by, role = role.as_str(), "project invitation created");
            true
        }
        Err(e) => {
            error!(error = %e, %project_id, "failed to create project invitation");
            false
        }
    }
}

// =============================================================================
// COUNTS
// =============================================================================

pub async fn get_project_member_count(db: &dyn Backend, project_id: Uuid) -> i64 {
    match db.count_members(project_id).await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, %project_id, "failed to count project members");
            0
        }
    }
}
