use super::*;
use crate::storage::MemoryStore;
use crate::test_support::StuckStore;

fn ann() -> Session {
    Session { token: "t1".into(), user: User { id: 7, name: "Ann".into(), email: "a@b.com".into() } }
}

fn store() -> (Arc<MemoryStore>, SessionStore) {
    let backing = Arc::new(MemoryStore::new());
    let sessions = SessionStore::new(backing.clone());
    (backing, sessions)
}

#[test]
fn empty_store_has_no_session() {
    let (_, sessions) = store();
    assert!(!sessions.has_session());
    assert_eq!(sessions.load(), None);
}

#[test]
fn save_then_load_round_trips_exact_user() {
    let (backing, sessions) = store();
    sessions.save(&ann()).unwrap();
    assert!(sessions.has_session());
    assert_eq!(sessions.load(), Some(ann()));
    assert_eq!(backing.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
    assert_eq!(backing.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":7,"nom":"Ann","email":"a@b.com"}"#));
}

#[test]
fn save_overwrites_previous_session() {
    let (_, sessions) = store();
    sessions.save(&ann()).unwrap();
    let bob = Session { token: "t2".into(), user: User { id: 8, name: "Bob".into(), email: "b@c.com".into() } };
    sessions.save(&bob).unwrap();
    assert_eq!(sessions.load(), Some(bob));
}

#[test]
fn malformed_user_record_reads_as_no_session() {
    let (backing, sessions) = store();
    backing.put_many(&[(TOKEN_KEY, "t1"), (USER_KEY, "not json")]).unwrap();
    assert_eq!(sessions.load(), None);
}

#[test]
fn token_without_user_reads_as_no_session_but_has_token() {
    let (backing, sessions) = store();
    backing.put_many(&[(TOKEN_KEY, "t1")]).unwrap();
    assert_eq!(sessions.load(), None);
    assert!(sessions.has_session());
}

#[test]
fn empty_token_is_absent() {
    let (backing, sessions) = store();
    backing.put_many(&[(TOKEN_KEY, ""), (USER_KEY, r#"{"id":1,"nom":"A","email":"e"}"#)]).unwrap();
    assert!(!sessions.has_session());
    assert_eq!(sessions.load(), None);
}

#[test]
fn clear_is_idempotent() {
    let (_, sessions) = store();
    sessions.save(&ann()).unwrap();
    sessions.clear();
    assert!(!sessions.has_session());
    sessions.clear();
    assert!(!sessions.has_session());
    assert_eq!(sessions.load(), None);
}

#[test]
fn corrupt_file_store_reads_as_no_session() {
    let path = std::env::temp_dir().join(format!("cinephile-session-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, "{{{").unwrap();
    let sessions = SessionStore::new(Arc::new(crate::storage::FileStore::new(&path)));
    assert!(!sessions.has_session());
    assert_eq!(sessions.load(), None);
}

#[test]
fn failed_removal_purges_backing_store() {
    let backing = Arc::new(StuckStore::new(false));
    let sessions = SessionStore::new(backing.clone());
    sessions.save(&ann()).unwrap();

    sessions.clear();
    assert!(!sessions.has_session());
    assert_eq!(backing.get(TOKEN_KEY).unwrap(), None);

    let restarted = SessionStore::new(backing);
    assert_eq!(restarted.load(), None);
}

#[test]
fn session_reads_absent_after_clear_even_when_storage_is_stuck() {
    let backing = Arc::new(StuckStore::new(true));
    let sessions = SessionStore::new(backing.clone());
    sessions.save(&ann()).unwrap();
    let shared = sessions.clone();

    sessions.clear();
    assert!(!sessions.has_session());
    assert_eq!(sessions.load(), None);
    assert_eq!(shared.token(), None);
    assert_eq!(backing.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));

    sessions.save(&ann()).unwrap();
    assert_eq!(shared.load(), Some(ann()));
}
