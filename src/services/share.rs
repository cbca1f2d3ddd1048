//! Shared-board access: resolve a public share link to a board.
//!
//! DESIGN
//! ======
//! A share link carries an opaque, URL-encoded token. Resolution is a single
//! lookup of a public share row joined with its board, followed by expiry
//! and password gates. The result is always one of three views; the flow
//! never returns `Err` to its caller.
//!
//! ERROR HANDLING
//! ==============
//! A missing row and a failed query read the same to the user ("invalid or
//! has expired"). Query failures are logged at `error` so they can still be
//! told apart in the logs.
//!
//! Password-protected shares store the lowercase hex SHA-256 of the password.
//! A supplied password is hashed and compared in constant time.

use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::query::{Backend, Board, BoardShare};
use crate::util::percent::percent_decode;

#[cfg(test)]
#[path = "share_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

/// User-facing reasons a share link cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShareAccessError {
    #[error("This share link is invalid or has expired.")]
    InvalidLink,
    #[error("This share link has expired.")]
    Expired,
    #[error("Failed to load shared board.")]
    Failed,
}

impl ShareAccessError {
    #[must_use]
    pub fn error_code(self) -> &'static str {
        match self {
            Self::InvalidLink => "E_SHARE_INVALID",
            Self::Expired => "E_SHARE_EXPIRED",
            Self::Failed => "E_SHARE_FAILED",
        }
    }
}

/// Everything the renderer needs to show a shared board.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LoadedShare {
    pub board: Board,
    pub share: BoardShare,
    pub is_password_protected: bool,
}

/// Outcome of resolving a share link.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareView {
    Error(ShareAccessError),
    /// The share is password protected. No board data is carried.
    PasswordRequired { incorrect: bool },
    Loaded(LoadedShare),
}

// =============================================================================
// PASSWORDS
// =============================================================================

/// Hash a share password into the stored `password_hash` format.
#[must_use]
pub fn hash_share_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

fn password_matches(password: &str, stored_hash: &str) -> bool {
    let candidate = hash_share_password(password);
    let stored = stored_hash.trim().to_ascii_lowercase();
    if candidate.len() != stored.len() {
        return false;
    }
    candidate
        .bytes()
        .zip(stored.bytes())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve `raw_token` as of `now`.
///
/// `password` is the value the viewer typed, if any. A blank password counts
/// as none.
pub async fn resolve_share_at(
    db: &dyn Backend,
    raw_token: &str,
    password: Option<&str>,
    now: OffsetDateTime,
) -> ShareView {
    let Some(token) = percent_decode(raw_token).filter(|t| !t.is_empty()) else {
        debug!("share token failed to decode");
        return ShareView::Error(ShareAccessError::InvalidLink);
    };

    let (share, board) = match db.find_public_share(&token).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            debug!("no public share for token");
            return ShareView::Error(ShareAccessError::InvalidLink);
        }
        Err(e) => {
            error!(error = %e, "share lookup failed");
            return ShareView::Error(ShareAccessError::InvalidLink);
        }
    };

    if share.expires_at.is_some_and(|expires_at| expires_at < now) {
        info!(share_id = %share.id, "share link expired");
        return ShareView::Error(ShareAccessError::Expired);
    }

    if let Some(stored_hash) = share.password_hash.as_deref() {
        let Some(password) = password.filter(|p| !p.trim().is_empty()) else {
            return ShareView::PasswordRequired { incorrect: false };
        };
        if !password_matches(password, stored_hash) {
            info!(share_id = %share.id, "incorrect share password");
            return ShareView::PasswordRequired { incorrect: true };
        }
    }

    let is_password_protected = share.password_hash.is_some();
    info!(share_id = %share.id, board_id = %board.id, "shared board loaded");
    ShareView::Loaded(LoadedShare { board, share, is_password_protected })
}

/// Resolve `raw_token` against the current UTC time.
pub async fn resolve_share(db: &dyn Backend, raw_token: &str, password: Option<&str>) -> ShareView {
    resolve_share_at(db, raw_token, password, OffsetDateTime::now_utc()).await
}

// =============================================================================
// PAGE STATE
// =============================================================================

/// Page-level state of a shared-board view.
#[derive(Debug, Clone, PartialEq)]
pub enum SharePageState {
    Loading,
    Ready(ShareView),
}

/// Drives one share link through load and password submission.
pub struct SharedBoardPage<'a> {
    db: &'a dyn Backend,
    token: String,
    state: SharePageState,
}

impl<'a> SharedBoardPage<'a> {
    pub fn new(db: &'a dyn Backend, token: impl Into<String>) -> Self {
        Self { db, token: token.into(), state: SharePageState::Loading }
    }

    #[must_use]
    pub fn state(&self) -> &SharePageState {
        &self.state
    }

    /// Resolve the link without a password.
    pub async fn load(&mut self) -> ShareView {
        self.resolve(None).await
    }

    /// Re-resolve the link with a viewer-supplied password.
    pub async fn submit_password(&mut self, password: &str) -> ShareView {
        self.resolve(Some(password)).await
    }

    async fn resolve(&mut self, password: Option<&str>) -> ShareView {
        self.state = SharePageState::Loading;
        let view = resolve_share(self.db, &self.token, password).await;
        self.state = SharePageState::Ready(view.clone());
        view
    }
}
