use ragdesk_core::config::Settings;
use ragdesk_core::constants::sessions::DEFAULT_TITLE;
use ragdesk_core::*;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.api.base_url, "http://localhost:8000");
    assert_eq!(settings.api.request_timeout_secs, 120);
    assert_eq!(settings.api.health_timeout_secs, 5);
    assert!(settings.storage.sessions_path.is_none());
    assert_eq!(settings.locale.timestamp_format, "%H:%M");
    assert!(settings.locale.error_template.contains("{error}"));
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.api.base_url = "http://rag.internal:9000".to_string();
    settings.api.request_timeout_secs = 30;
    settings.storage.sessions_path = Some(temp_dir.path().join("sessions.json"));

    settings.save_to(&config_path).unwrap();
    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.api.base_url, "http://rag.internal:9000");
    assert_eq!(loaded.api.request_timeout_secs, 30);
    assert_eq!(loaded.sessions_path(), temp_dir.path().join("sessions.json"));
}

#[test]
fn test_settings_malformed_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "api = [this is not toml").unwrap();

    let loaded = Settings::load_from(&config_path);
    assert_eq!(loaded.api.base_url, "http://localhost:8000");
}

#[test]
fn test_settings_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = Settings::load_from(&temp_dir.path().join("absent.toml"));
    assert_eq!(loaded.api.base_url, "http://localhost:8000");
}

#[test]
fn test_settings_env_override_for_base_url() {
    std::env::set_var("RAGDESK_API_URL", "http://override:8100");

    let mut settings = Settings::default();
    settings.apply_env_overrides();
    assert_eq!(settings.api.base_url, "http://override:8100");

    std::env::remove_var("RAGDESK_API_URL");
}

// ========================================================================
// JsonFileStore Tests (session/persistence.rs)
// ========================================================================

#[test]
fn test_startup_without_persisted_data() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(Box::new(JsonFileStore::new(
        temp_dir.path().join("chat_sessions.json"),
    )));

    assert_eq!(store.session_count(), 1);
    let session = store.active_session();
    assert_eq!(session.title, DEFAULT_TITLE);
    assert!(session.messages.is_empty());
    assert_eq!(store.active_session_id(), session.id);
}

#[test]
fn test_corrupt_file_recovers_with_fresh_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat_sessions.json");
    std::fs::write(&path, "{\"truncated\": ").unwrap();

    let sessions = JsonFileStore::new(&path).load();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_empty());
}

#[test]
fn test_file_store_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("chat_sessions.json");

    let mut store = SessionStore::new(Box::new(JsonFileStore::new(&path)));
    let first = store.active_session_id().to_string();
    store.append_message(&first, Message::user("事假可以請幾天？", "09:00"));
    store.append_message(
        &first,
        Message::Bot {
            content: "全年以十四日為限。".into(),
            reasoning: "article 7".into(),
            rewritten_query: Some("事假 天數".into()),
            reference_context: None,
            timestamp: "09:01".into(),
        },
    );
    store.create_session();
    let newest = store.active_session_id().to_string();

    assert!(path.exists());
    let leftovers = std::fs::read_dir(temp_dir.path().join("data"))
        .unwrap()
        .filter(|entry| entry.as_ref().unwrap().file_name() != "chat_sessions.json")
        .count();
    assert_eq!(leftovers, 0);

    let reloaded = SessionStore::new(Box::new(JsonFileStore::new(&path)));
    let ids = |s: &SessionStore| s.sessions().iter().map(|x| x.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&reloaded), ids(&store));
    assert_eq!(
        reloaded.session(&first).unwrap().messages,
        store.session(&first).unwrap().messages
    );
    assert_eq!(reloaded.sessions()[0].id, newest);
    assert_eq!(reloaded.active_session_id(), newest);
    assert_eq!(reloaded.session(&first).unwrap().title, "事假可以請幾天？");
}

#[test]
fn test_concurrent_writers_never_expose_partial_file() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat_sessions.json");
    JsonFileStore::new(&path).save(&[Session::new()]).unwrap();

    let writers_done = AtomicBool::new(false);
    let (failed_saves, bad_reads) = std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut bad_reads = 0;
            while !writers_done.load(Ordering::SeqCst) {
                let contents = std::fs::read_to_string(&path).unwrap_or_default();
                if serde_json::from_str::<Vec<Session>>(&contents).is_err() {
                    bad_reads += 1;
                }
            }
            bad_reads
        });

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let path = &path;
                scope.spawn(move || {
                    let mut sessions: Vec<Session> = (0..=w).map(|_| Session::new()).collect();
                    for round in 0..50 {
                        sessions[0]
                            .messages
                            .push(Message::user("x".repeat(200 * (round % 7 + 1)), "10:00"));
                    }
                    let store = JsonFileStore::new(path);
                    (0..50).filter(|_| store.save(&sessions).is_err()).count()
                })
            })
            .collect();

        let failed: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();
        writers_done.store(true, Ordering::SeqCst);
        (failed, reader.join().unwrap())
    });

    assert_eq!(failed_saves, 0);
    assert_eq!(bad_reads, 0);
    assert!(!JsonFileStore::new(&path).load().is_empty());
}

#[test]
fn test_file_store_reads_stored_record_layout() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat_sessions.json");
    std::fs::write(
        &path,
        r#"[
            {
                "id": "2b1f6c1e-0000-4000-8000-000000000001",
                "title": "特休假計算方式",
                "messages": [
                    {"type": "user", "content": "特休假計算方式", "timestamp": "下午03:45"},
                    {"type": "bot", "content": "依年資計算。", "rewritten_query": "特休 年資",
                     "context": "勞基法第38條", "timestamp": "下午03:45"},
                    {"type": "error", "content": "抱歉，系統目前無法回應：timeout", "timestamp": "下午03:46"}
                ],
                "createdAt": 1718000000000
            }
        ]"#,
    )
    .unwrap();

    let sessions = JsonFileStore::new(&path).load();
    assert_eq!(sessions.len(), 1);
    let messages = &sessions[0].messages;
    assert!(messages[0].is_user());
    assert!(messages[1].has_insights());
    assert!(messages[2].is_error());
}

// ========================================================================
// SessionStore invariants (session/store.rs)
// ========================================================================

#[test]
fn test_collection_never_empty_across_create_delete_sequences() {
    let slot = MemoryStore::new();
    let mut store = SessionStore::new(Box::new(slot.clone()));

    for round in 0..5 {
        let id = store.active_session_id().to_string();
        store.append_message(&id, Message::user(format!("question {round}"), "10:00"));
        store.create_session();
    }
    assert_eq!(store.session_count(), 6);

    for _ in 0..10 {
        let target = store.sessions()[store.session_count() - 1].id.clone();
        let state = store.delete_session(&target);
        assert!(!state.sessions.is_empty());
        assert!(state.session(&state.active_session_id).is_some());
    }

    assert_eq!(store.session_count(), 1);
    assert_eq!(slot.saved_sessions().unwrap().len(), 1);
}

#[test]
fn test_deleting_only_session_yields_fresh_distinct_session() {
    let mut store = SessionStore::new(Box::new(MemoryStore::new()));
    let only = store.active_session_id().to_string();
    store.append_message(&only, Message::user("hello", "10:00"));

    let state = store.delete_session(&only);
    assert_eq!(state.sessions.len(), 1);
    assert_ne!(state.sessions[0].id, only);
    assert!(state.sessions[0].messages.is_empty());
    assert_eq!(state.sessions[0].title, DEFAULT_TITLE);
}

#[test]
fn test_select_switches_active() {
    let slot = MemoryStore::new();
    let mut store = SessionStore::new(Box::new(slot.clone()));
    let first = store.active_session_id().to_string();
    store.append_message(&first, Message::user("one", "10:00"));
    store.create_session();

    let state = store.select_session(&first);
    assert_eq!(state.active_session_id, first);
    assert_eq!(state.active_session().id, first);
}

#[test]
fn test_messages_preserve_insertion_order() {
    let mut store = SessionStore::new(Box::new(MemoryStore::new()));
    let id = store.active_session_id().to_string();
    for i in 0..5 {
        store.append_message(&id, Message::user(format!("m{i}"), "10:00"));
    }
    let contents: Vec<&str> = store
        .session(&id)
        .unwrap()
        .messages
        .iter()
        .map(|m| m.content())
        .collect();
    assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
}

// ========================================================================
// ContentParser (parser.rs)
// ========================================================================

#[test]
fn test_parser_examples() {
    assert_eq!(
        parse("plain text"),
        ParsedContent {
            reasoning: String::new(),
            display_content: "plain text".into(),
        }
    );
    assert_eq!(
        parse("<think>step one</think>Final answer"),
        ParsedContent {
            reasoning: "step one".into(),
            display_content: "Final answer".into(),
        }
    );
}
