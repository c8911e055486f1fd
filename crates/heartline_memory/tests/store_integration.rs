//! Integration tests for the relationship stores.
//!
//! Uses tempfile::TempDir for isolated data directories. Every behavior is
//! checked against both implementations.

use heartline_core::{
    CharacterId, ContentId, DialogueEntry, Emotion, PairKey, PlayerId, RelationshipRecord,
    RelationshipTier, Speaker,
};
use heartline_memory::{JsonFileStore, MemoryStore, RelationshipStore, StoreError};

fn key(player: &str, character: CharacterId) -> PairKey {
    PairKey::new(PlayerId::new(player), character)
}

fn sample_record(character: CharacterId, level: u8) -> RelationshipRecord {
    let mut record = RelationshipRecord::new(character);
    record.affection_level = level;
    record.relationship_tier = RelationshipTier::from_affection(level);
    record.current_emotion = Emotion::Happy;
    record.conversation_count = 3;
    record.unlocked_content_ids.insert(ContentId::new("intro"));
    record
}

async fn round_trip(store: &dyn RelationshipStore) {
    let k = key("alice", CharacterId::Vex);
    assert!(store.load(&k).await.unwrap().is_none());

    let record = sample_record(CharacterId::Vex, 42);
    store.save(&k, &record).await.unwrap();
    assert_eq!(store.load(&k).await.unwrap(), Some(record.clone()));

    let mut newer = record.clone();
    newer.affection_level = 44;
    store.save(&k, &newer).await.unwrap();
    assert_eq!(store.load(&k).await.unwrap().unwrap().affection_level, 44);
}

async fn dialogue_log(store: &dyn RelationshipStore) {
    let k = key("bob", CharacterId::Juniper);
    assert!(store.recent_dialogue(&k, 10).await.unwrap().is_empty());

    for i in 0..5 {
        store
            .append_dialogue(
                &k,
                &[
                    DialogueEntry::player(format!("hello {}", i)),
                    DialogueEntry::character(format!("reply {}", i), Emotion::Nervous, 1),
                ],
            )
            .await
            .unwrap();
    }

    let recent = store.recent_dialogue(&k, 3).await.unwrap();
    assert_eq!(recent.len(), 3);
    // oldest first
    assert_eq!(recent[0].text, "reply 3");
    assert_eq!(recent[1].text, "hello 4");
    assert_eq!(recent[2].text, "reply 4");
    assert_eq!(recent[2].speaker, Speaker::Character);
    assert_eq!(recent[2].emotion, Some(Emotion::Nervous));

    assert_eq!(store.recent_dialogue(&k, 100).await.unwrap().len(), 10);
}

async fn listing_and_reset(store: &dyn RelationshipStore) {
    let carol = PlayerId::new("carol");
    store
        .save(&key("carol", CharacterId::Marlow), &sample_record(CharacterId::Marlow, 10))
        .await
        .unwrap();
    store
        .save(&key("carol", CharacterId::Vex), &sample_record(CharacterId::Vex, 70))
        .await
        .unwrap();
    store
        .save(&key("dave", CharacterId::Vex), &sample_record(CharacterId::Vex, 5))
        .await
        .unwrap();

    let listed = store.list_for_player(&carol).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.character).collect();
    assert_eq!(ids, vec![CharacterId::Vex, CharacterId::Marlow]);

    assert!(store.reset(&key("carol", CharacterId::Vex)).await.unwrap());
    assert!(!store.reset(&key("carol", CharacterId::Vex)).await.unwrap());
    assert_eq!(store.list_for_player(&carol).await.unwrap().len(), 1);

    assert_eq!(store.delete_player(&carol).await.unwrap(), 1);
    assert!(store.list_for_player(&carol).await.unwrap().is_empty());
    // other players untouched
    assert!(store.load(&key("dave", CharacterId::Vex)).await.unwrap().is_some());
}

async fn rejects_mismatched_record(store: &dyn RelationshipStore) {
    let k = key("erin", CharacterId::Vex);
    let wrong = sample_record(CharacterId::Marlow, 1);
    assert!(matches!(
        store.save(&k, &wrong).await,
        Err(StoreError::Mismatch(_))
    ));
}

#[tokio::test]
async fn test_memory_store() {
    let store = MemoryStore::new();
    round_trip(&store).await;
    dialogue_log(&store).await;
    listing_and_reset(&store).await;
    rejects_mismatched_record(&store).await;
}

#[tokio::test]
async fn test_json_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    round_trip(&store).await;
    dialogue_log(&store).await;
    listing_and_reset(&store).await;
    rejects_mismatched_record(&store).await;
}

#[tokio::test]
async fn test_json_store_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let k = key("frank", CharacterId::Marlow);
    {
        let store = JsonFileStore::new(dir.path());
        store.save(&k, &sample_record(CharacterId::Marlow, 77)).await.unwrap();
        store
            .append_dialogue(&k, &[DialogueEntry::player("see you tomorrow")])
            .await
            .unwrap();
    }
    let reopened = JsonFileStore::new(dir.path());
    let record = reopened.load(&k).await.unwrap().unwrap();
    assert_eq!(record.affection_level, 77);
    assert!(record.is_unlocked(&ContentId::new("intro")));
    assert_eq!(reopened.recent_dialogue(&k, 5).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_json_store_rejects_path_traversal() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let k = key("../../etc", CharacterId::Vex);
    assert!(matches!(
        store.load(&k).await,
        Err(StoreError::InvalidPlayer(_))
    ));
    assert!(matches!(
        store.save(&k, &sample_record(CharacterId::Vex, 1)).await,
        Err(StoreError::InvalidPlayer(_))
    ));
}

#[tokio::test]
async fn test_json_store_skips_corrupt_dialogue_lines() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let k = key("gina", CharacterId::Vex);
    store
        .append_dialogue(&k, &[DialogueEntry::player("first")])
        .await
        .unwrap();
    let log_path = dir.path().join("gina").join("vex.dialogue.jsonl");
    let mut content = std::fs::read_to_string(&log_path).unwrap();
    content.push_str("{not json\n");
    std::fs::write(&log_path, content).unwrap();
    store
        .append_dialogue(&k, &[DialogueEntry::player("second")])
        .await
        .unwrap();

    let log = store.recent_dialogue(&k, 10).await.unwrap();
    let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn test_json_store_repairs_out_of_range_save() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let k = key("hana", CharacterId::Vex);
    store.save(&k, &sample_record(CharacterId::Vex, 10)).await.unwrap();

    // Hand-edited save: level past the scale, tier that does not match it.
    let path = dir.path().join("hana").join("vex.json");
    let mut raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    raw["affection_level"] = serde_json::json!(150);
    raw["relationship_tier"] = serde_json::json!("stranger");
    std::fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

    let record = store.load(&k).await.unwrap().unwrap();
    assert_eq!(record.affection_level, 100);
    assert_eq!(record.relationship_tier, RelationshipTier::Soulmate);

    let listed = store.list_for_player(&PlayerId::new("hana")).await.unwrap();
    assert_eq!(listed[0].affection_level, 100);
    assert_eq!(listed[0].relationship_tier, RelationshipTier::Soulmate);
}
