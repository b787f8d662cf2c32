//! Unit tests for the refresh session entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::session::{
    mask_session_id, ClientMetadata, RefreshSession, SessionStatus,
};

fn session() -> RefreshSession {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    RefreshSession::new(
        "session-abcdef".to_string(),
        "user-42".to_string(),
        created_at,
        Duration::days(7),
        ClientMetadata::new(Some("curl/8.0".to_string()), Some("10.0.0.1".to_string())),
    )
}

#[test]
fn test_new_session_is_active_until_expiry() {
    let session = session();
    assert_eq!(session.expires_at, session.created_at + Duration::days(7));
    assert_eq!(session.status_at(session.created_at), SessionStatus::Active);
    assert_eq!(
        session.status_at(session.expires_at - Duration::seconds(1)),
        SessionStatus::Active
    );
    assert_eq!(session.status_at(session.expires_at), SessionStatus::Expired);
}

#[test]
fn test_revocation_wins_over_expiry_and_keeps_first_timestamp() {
    let mut session = session();
    let first = session.created_at + Duration::hours(1);
    session.revoke_at(first);
    session.revoke_at(first + Duration::hours(1));

    assert_eq!(session.revoked_at, Some(first));
    assert_eq!(session.status_at(first), SessionStatus::Revoked);
    assert_eq!(
        session.status_at(session.expires_at + Duration::days(1)),
        SessionStatus::Revoked
    );
    assert!(session.status_at(first).is_terminal());
}

#[test]
fn test_purgeable_only_after_retention() {
    let session = session();
    let retention = Duration::days(1);
    assert!(!session.is_purgeable_at(session.expires_at, retention));
    assert!(session.is_purgeable_at(session.expires_at + retention, retention));
}

#[test]
fn test_masked_id_hides_most_of_the_identifier() {
    assert_eq!(mask_session_id("abcdefghijkl"), "abcdef...");
    assert_eq!(mask_session_id("abc"), "abc...");
    assert_eq!(session().masked_id(), "sessio...");
}

#[test]
fn test_overflowing_lifetime_is_clamped_and_never_purged() {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let session = RefreshSession::new(
        "session-forever".to_string(),
        "user-42".to_string(),
        created_at,
        Duration::MAX,
        ClientMetadata::default(),
    );

    assert_eq!(session.expires_at, chrono::DateTime::<Utc>::MAX_UTC);
    assert_eq!(session.status_at(created_at), SessionStatus::Active);
    assert!(!session.is_purgeable_at(created_at, Duration::days(1)));
    assert!(!session.is_purgeable_at(session.expires_at, Duration::seconds(1)));
}
