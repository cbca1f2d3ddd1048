use super::*;
use time::Duration;
use time::macros::datetime;
use uuid::Uuid;

use crate::query::failing::FailingBackend;
use crate::query::{AccessLevel, MemoryBackend};

const NOW: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

fn board() -> Board {
    Board {
        id: Uuid::new_v4(),
        name: "Roadmap".into(),
        kind: "whiteboard".into(),
        project_id: None,
        settings: serde_json::json!({ "grid": true }),
        created_at: NOW - Duration::days(10),
        updated_at: NOW - Duration::days(1),
    }
}

fn share(token: &str, board_id: Uuid) -> BoardShare {
    BoardShare {
        id: Uuid::new_v4(),
        share_token: token.into(),
        board_id,
        is_public: true,
        expires_at: None,
        password_hash: None,
        access_level: AccessLevel::View,
    }
}

async fn backend_with(share_row: BoardShare, board_row: Board) -> MemoryBackend {
    let db = MemoryBackend::new();
    db.seed_board(board_row).await;
    db.seed_share(share_row).await;
    db
}

async fn seeded(mutate: impl FnOnce(&mut BoardShare)) -> MemoryBackend {
    let board = board();
    let mut share = share("tok-abc", board.id);
    mutate(&mut share);
    backend_with(share, board).await
}

// =============================================================================
// resolve_share_at
// =============================================================================

#[tokio::test]
async fn public_share_loads_board() {
    let board = board();
    let share = share("tok-abc", board.id);
    let db = backend_with(share.clone(), board.clone()).await;

    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert_eq!(
        view,
        ShareView::Loaded(LoadedShare { board, share, is_password_protected: false })
    );
}

#[tokio::test]
async fn unknown_token_is_invalid_link() {
    let db = seeded(|_| {}).await;
    let view = resolve_share_at(&db, "tok-missing", None, NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::InvalidLink));
}

#[tokio::test]
async fn token_match_is_case_sensitive() {
    let db = seeded(|_| {}).await;
    let view = resolve_share_at(&db, "TOK-ABC", None, NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::InvalidLink));
}

#[tokio::test]
async fn non_public_share_is_invalid_link() {
    let db = seeded(|s| s.is_public = false).await;
    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::InvalidLink));
}

#[tokio::test]
async fn lookup_failure_is_invalid_link() {
    let view = resolve_share_at(&FailingBackend::all(), "tok-abc", None, NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::InvalidLink));
}

#[tokio::test]
async fn url_encoded_token_is_decoded_before_lookup() {
    let board = board();
    let share = share("tok abc/1", board.id);
    let db = backend_with(share, board).await;

    let view = resolve_share_at(&db, "tok%20abc%2F1", None, NOW).await;
    assert!(matches!(view, ShareView::Loaded(_)));
}

#[tokio::test]
async fn undecodable_or_empty_token_is_invalid_link() {
    let db = seeded(|_| {}).await;
    assert_eq!(
        resolve_share_at(&db, "%FF%FE", None, NOW).await,
        ShareView::Error(ShareAccessError::InvalidLink)
    );
    assert_eq!(
        resolve_share_at(&db, "", None, NOW).await,
        ShareView::Error(ShareAccessError::InvalidLink)
    );
}

#[tokio::test]
async fn share_expired_before_now_is_expired() {
    let db = seeded(|s| s.expires_at = Some(NOW - Duration::minutes(1))).await;
    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::Expired));
}

#[tokio::test]
async fn share_expiring_exactly_now_still_loads() {
    let db = seeded(|s| s.expires_at = Some(NOW)).await;
    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert!(matches!(view, ShareView::Loaded(_)));
}

#[tokio::test]
async fn future_expiry_loads() {
    let db = seeded(|s| s.expires_at = Some(NOW + Duration::days(3))).await;
    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert!(matches!(view, ShareView::Loaded(_)));
}

#[tokio::test]
async fn expiry_is_checked_before_password() {
    let db = seeded(|s| {
        s.expires_at = Some(NOW - Duration::days(1));
        s.password_hash = Some(hash_share_password("hunter2"));
    })
    .await;
    let view = resolve_share_at(&db, "tok-abc", Some("hunter2"), NOW).await;
    assert_eq!(view, ShareView::Error(ShareAccessError::Expired));
}

#[tokio::test]
async fn password_share_without_password_requires_one() {
    let db = seeded(|s| s.password_hash = Some(hash_share_password("hunter2"))).await;

    let view = resolve_share_at(&db, "tok-abc", None, NOW).await;
    assert_eq!(view, ShareView::PasswordRequired { incorrect: false });

    let view = resolve_share_at(&db, "tok-abc", Some("   "), NOW).await;
    assert_eq!(view, ShareView::PasswordRequired { incorrect: false });
}

#[tokio::test]
async fn wrong_password_is_flagged_incorrect() {
    let db = seeded(|s| s.password_hash = Some(hash_share_password("hunter2"))).await;
    let view = resolve_share_at(&db, "tok-abc", Some("hunter3"), NOW).await;
    assert_eq!(view, ShareView::PasswordRequired { incorrect: true });
}

#[tokio::test]
async fn correct_password_loads_protected_board() {
    let db = seeded(|s| s.password_hash = Some(hash_share_password("hunter2"))).await;
    let ShareView::Loaded(loaded) = resolve_share_at(&db, "tok-abc", Some("hunter2"), NOW).await else {
        panic!("expected loaded share");
    };
    assert!(loaded.is_password_protected);
    assert_eq!(loaded.board.name, "Roadmap");
}

#[tokio::test]
async fn stored_hash_case_does_not_matter() {
    let db = seeded(|s| s.password_hash = Some(hash_share_password("hunter2").to_uppercase())).await;
    let view = resolve_share_at(&db, "tok-abc", Some("hunter2"), NOW).await;
    assert!(matches!(view, ShareView::Loaded(_)));
}

// =============================================================================
// passwords and messages
// =============================================================================

#[test]
fn hash_share_password_is_hex_sha256() {
    assert_eq!(
        hash_share_password("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_ne!(hash_share_password("abc"), hash_share_password("abd"));
}

#[test]
fn password_matches_rejects_malformed_hash() {
    assert!(!password_matches("hunter2", "not-a-hash"));
    assert!(!password_matches("hunter2", ""));
}

#[test]
fn error_messages_are_user_facing() {
    assert_eq!(
        ShareAccessError::InvalidLink.to_string(),
        "This share link is invalid or has expired."
    );
    assert_eq!(ShareAccessError::Expired.to_string(), "This share link has expired.");
    assert_eq!(ShareAccessError::Failed.to_string(), "Failed to load shared board.");
    assert_eq!(ShareAccessError::Expired.error_code(), "E_SHARE_EXPIRED");
}

// =============================================================================
// SharedBoardPage
// =============================================================================

#[tokio::test]
async fn page_starts_loading_and_settles_after_load() {
    let db = seeded(|_| {}).await;
    let mut page = SharedBoardPage::new(&db, "tok-abc");
    assert_eq!(page.state(), &SharePageState::Loading);

    let view = page.load().await;
    assert!(matches!(view, ShareView::Loaded(_)));
    assert_eq!(page.state(), &SharePageState::Ready(view));
}

#[tokio::test]
async fn page_password_challenge_then_submit() {
    let db = seeded(|s| s.password_hash = Some(hash_share_password("hunter2"))).await;
    let mut page = SharedBoardPage::new(&db, "tok-abc");

    assert_eq!(page.load().await, ShareView::PasswordRequired { incorrect: false });
    assert_eq!(
        page.submit_password("wrong").await,
        ShareView::PasswordRequired { incorrect: true }
    );
    assert!(matches!(page.submit_password("hunter2").await, ShareView::Loaded(_)));
}

#[tokio::test]
async fn page_surfaces_backend_failure_as_error_view() {
    let db = FailingBackend::all();
    let mut page = SharedBoardPage::new(&db, "tok-abc");
    assert_eq!(page.load().await, ShareView::Error(ShareAccessError::InvalidLink));
}
