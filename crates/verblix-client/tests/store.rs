use verblix_client::error::StoreError;
use verblix_client::store::ChatSessionStore;
use verblix_core::models::conversation::{Conversation, ConversationId, Registry};
use verblix_core::models::turn::Turn;
use verblix_core::storage_keys;
use verblix_storage::objects::{FileStore, KeyValueStore, MemoryStore};
use verblix_storage::state::load_state;

fn persisted(store: &ChatSessionStore<MemoryStore>) -> Registry {
    load_state(store.storage(), storage_keys::CHATS)
        .unwrap()
        .expect("registry persisted")
}

fn assert_consistent(store: &ChatSessionStore<MemoryStore>) {
    assert!(!store.is_empty());
    assert!(store.contains(store.active()));
}

#[test]
fn fresh_store_has_one_active_conversation() {
    let store = ChatSessionStore::load(MemoryStore::new());
    assert_eq!(store.len(), 1);
    let conversation = store.active_conversation().unwrap();
    assert_eq!(conversation.title, "Chat 1");
    assert!(conversation.history.is_empty());
    assert_eq!(persisted(&store).len(), 1);
}

#[test]
fn ids_are_strictly_increasing() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let mut ids = vec![store.active().clone()];
    for _ in 0..5 {
        ids.push(store.create_conversation());
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(store.active(), ids.last().unwrap());
    assert_eq!(store.active_conversation().unwrap().title, "Chat 6");

    let listed: Vec<ConversationId> = store.conversations().into_iter().map(|c| c.id).collect();
    let mut newest_first = ids.clone();
    newest_first.reverse();
    assert_eq!(listed, newest_first);
}

#[test]
fn registry_never_empties_across_create_and_delete() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let first = store.active().clone();
    let second = store.create_conversation();
    let third = store.create_conversation();

    assert!(store.switch_active(&first));
    assert!(store.delete_conversation(&second));
    assert_consistent(&store);
    assert_eq!(store.active(), &first);

    assert!(store.delete_conversation(&first));
    assert_consistent(&store);
    assert_eq!(store.active(), &third);

    assert!(store.delete_conversation(&third));
    assert_consistent(&store);
    assert_eq!(store.len(), 1);
    assert!(!store.delete_conversation(&third));
    assert_consistent(&store);
}

#[test]
fn deleting_the_only_conversation_replaces_it() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let only = store.active().clone();

    assert!(store.delete_conversation(&only));

    assert_eq!(store.len(), 1);
    assert_ne!(store.active(), &only);
    assert!(store.active_conversation().unwrap().history.is_empty());
    let saved = persisted(&store);
    assert_eq!(saved.len(), 1);
    assert!(saved.contains_key(store.active()));
}

#[test]
fn title_is_derived_once() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let id = store.active().clone();

    store
        .append_turn(&id, Turn::user("How do I read a file line by line in Rust?"))
        .unwrap();
    let title = store.get(&id).unwrap().title.clone();
    assert_eq!(title, "How do I read a file line by l...");

    store.append_turn(&id, Turn::model("Use BufRead::lines.")).unwrap();
    store.append_turn(&id, Turn::user("Thanks")).unwrap();
    assert_eq!(store.get(&id).unwrap().title, title);

    assert!(store.clear_history(&id));
    store.append_turn(&id, Turn::user("A different first message")).unwrap();
    assert_eq!(store.get(&id).unwrap().title, title);
    assert!(persisted(&store)[&id].title_fixed);
}

#[test]
fn short_first_message_is_the_title() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let id = store.active().clone();
    store.append_turn(&id, Turn::user("hello")).unwrap();
    assert_eq!(store.get(&id).unwrap().title, "hello");
}

#[test]
fn append_never_touches_earlier_turns() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let id = store.active().clone();
    let turns = [
        Turn::user("one"),
        Turn::model("two"),
        Turn::user("three"),
        Turn::model("four"),
    ];

    for (i, turn) in turns.iter().enumerate() {
        let before = store.get(&id).unwrap().history.clone();
        assert_eq!(before.len(), i);
        store.append_turn(&id, turn.clone()).unwrap();
        let after = &store.get(&id).unwrap().history;
        assert_eq!(&after[..i], before.as_slice());
        assert_eq!(after[i], *turn);
    }
    assert_eq!(persisted(&store)[&id].history, turns.to_vec());
}

#[test]
fn append_rejects_unknown_ids_and_empty_turns() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let id = store.active().clone();

    assert_eq!(
        store.append_turn(&ConversationId::new("chat_1"), Turn::user("hi")),
        Err(StoreError::UnknownConversation("chat_1".to_string()))
    );
    assert_eq!(store.append_turn(&id, Turn::model("")), Err(StoreError::EmptyTurn));
    assert!(store.get(&id).unwrap().history.is_empty());
}

#[test]
fn switch_ignores_active_and_unknown_ids() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let active = store.active().clone();
    assert!(!store.switch_active(&active));
    assert!(!store.switch_active(&ConversationId::new("chat_42")));
    assert_eq!(store.active(), &active);
}

#[test]
fn delete_all_starts_over() {
    let mut store = ChatSessionStore::load(MemoryStore::new());
    let id = store.active().clone();
    store.append_turn(&id, Turn::user("hello")).unwrap();
    store.create_conversation();
    store.create_conversation();

    store.delete_all();

    assert_eq!(store.len(), 1);
    let conversation = store.active_conversation().unwrap();
    assert_eq!(conversation.title, "Chat 1");
    assert_eq!(persisted(&store).len(), 1);
}

#[test]
fn load_activates_the_newest_and_settles_legacy_titles() {
    let mut storage = MemoryStore::new();
    storage
        .set(
            storage_keys::CHATS,
            r#"{
                "chat_1000": {"history": [{"role": "user", "parts": [{"text": "hi"}]}], "title": "hi"},
                "chat_999": {"history": [], "title": "Chat 1"},
                "chat_2000": {"history": [], "title": "Chat 3"}
            }"#,
        )
        .unwrap();

    let mut store = ChatSessionStore::load(storage);
    assert_eq!(store.len(), 3);
    assert_eq!(store.active().as_str(), "chat_2000");
    assert!(store.get(&ConversationId::new("chat_1000")).unwrap().title_fixed);
    assert!(!store.get(&ConversationId::new("chat_2000")).unwrap().title_fixed);

    let next = store.create_conversation();
    assert!(next.created_millis() > 2000);
    assert_eq!(store.active_conversation().unwrap().title, "Chat 4");
}

#[test]
fn corrupt_data_starts_fresh() {
    let mut storage = MemoryStore::new();
    storage.set(storage_keys::CHATS, "{not json").unwrap();

    let store = ChatSessionStore::load(storage);
    assert_eq!(store.len(), 1);
    assert_eq!(store.active_conversation().unwrap().title, "Chat 1");
}

#[test]
fn storage_failures_do_not_break_the_session() {
    let mut store = ChatSessionStore::load(MemoryStore::failing());
    let id = store.active().clone();
    store.append_turn(&id, Turn::user("still works")).unwrap();
    assert_eq!(store.get(&id).unwrap().history.len(), 1);
    store.delete_all();
    assert_eq!(store.len(), 1);
}

#[test]
fn conversations_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let mut store = ChatSessionStore::load(FileStore::open(dir.path()).unwrap());
        let id = store.active().clone();
        store.append_turn(&id, Turn::user("remember me")).unwrap();
        store.append_turn(&id, Turn::model("I will.")).unwrap();
        id
    };

    let store = ChatSessionStore::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(store.active(), &id);
    let conversation: &Conversation = store.active_conversation().unwrap();
    assert_eq!(conversation.title, "remember me");
    assert_eq!(
        conversation.history,
        vec![Turn::user("remember me"), Turn::model("I will.")]
    );
}
