use recordkit_types::{RecordId, SubscriptionId, UserId};
use std::collections::HashSet;
use std::str::FromStr;

// ── RecordId ──────────────────────────────────────────────────────

#[test]
fn record_id_new_is_unique() {
    let ids: HashSet<RecordId> = (0..100).map(|_| RecordId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn record_id_new_sorts_by_creation() {
    let a = RecordId::new();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = RecordId::new();
    assert!(a < b);
}

#[test]
fn record_id_display_and_parse() {
    let id = RecordId::new();
    let parsed = RecordId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn record_id_from_str() {
    let id: RecordId = RecordId::from_str("task-42").unwrap();
    assert_eq!(id.as_str(), "task-42");
}

#[test]
fn record_id_parse_rejects_empty() {
    assert!(RecordId::parse("").is_err());
    assert!(RecordId::parse("   ").is_err());
}

#[test]
fn record_id_serde_is_transparent() {
    let id = RecordId::from_name("abc");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    let back: RecordId = serde_json::from_str("\"abc\"").unwrap();
    assert_eq!(back, id);
}

// ── UserId / SubscriptionId ───────────────────────────────────────

#[test]
fn user_id_from_conversions() {
    let a = UserId::from("_abc");
    let b = UserId::from("_abc".to_string());
    assert_eq!(a, b);
    assert_eq!(format!("{a}"), "_abc");
}

#[test]
fn subscription_id_new_is_unique() {
    assert_ne!(SubscriptionId::new(), SubscriptionId::new());
}

#[test]
fn subscription_id_parse_error_mentions_input() {
    let err = SubscriptionId::parse(" ").unwrap_err();
    assert!(err.to_string().contains("invalid identifier"));
}
