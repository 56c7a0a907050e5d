use shared::domain::SessionId;
use storage::{SessionStore, SqliteSessionStore};

#[tokio::test]
async fn reopening_a_file_database_resumes_the_same_session() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("session.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));
    let session_id = SessionId::generate();

    {
        let store = SqliteSessionStore::new(&database_url, session_id)
            .await
            .expect("db");
        store
            .set("checkout_memories", "line one\nline two")
            .await
            .expect("set");
    }

    let reopened = SqliteSessionStore::new(&database_url, session_id)
        .await
        .expect("reopen");
    assert_eq!(
        reopened.get("checkout_memories").await.expect("get").as_deref(),
        Some("line one\nline two")
    );

    let other = SqliteSessionStore::new(&database_url, SessionId::generate())
        .await
        .expect("other session");
    assert_eq!(other.get("checkout_memories").await.expect("get"), None);
}
