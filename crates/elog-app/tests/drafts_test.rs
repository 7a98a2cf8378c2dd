use std::sync::Arc;

use elog_app::DraftStore;
use elog_core::entry::TagRef;
use elog_core::ports::KeyValueStorePort;
use elog_core::{Entry, EntryForm, EntryId, EntrySummary, LogbookId, TagId, Timestamp};
use elog_infra::MemoryKeyValueStore;

fn entry(id: &str) -> Entry {
    Entry {
        summary: EntrySummary {
            id: EntryId::from(id),
            logged_at: Timestamp::from_millis(1_000),
            event_at: Timestamp::from_millis(900),
            title: "Klystron trip".into(),
            logbook_id: LogbookId::from("L7"),
            tags: vec![TagRef {
                id: TagId::from("T1"),
                name: "rf".into(),
            }],
            attachments: Vec::new(),
        },
        text: "Tripped twice during fill.".into(),
    }
}

#[tokio::test]
async fn drafts_survive_a_reload() {
    let kv: Arc<dyn KeyValueStorePort> = Arc::new(MemoryKeyValueStore::new());
    let parent = entry("E1");

    let store = DraftStore::load(kv.clone()).await.unwrap();
    let mut follow_up = store.get_or_create_follow_up_draft(&parent).await;
    assert_eq!(follow_up.logbook, Some(LogbookId::from("L7")));
    assert!(follow_up.title.is_empty());

    follow_up.title = "Re: Klystron trip".into();
    store
        .update_follow_up_draft(&parent.summary.id, follow_up.clone())
        .await
        .unwrap();
    store
        .update_new_entry(EntryForm {
            title: "Shift summary".into(),
            ..EntryForm::default()
        })
        .await
        .unwrap();

    let reloaded = DraftStore::load(kv.clone()).await.unwrap();
    assert_eq!(
        reloaded.get_or_create_follow_up_draft(&parent).await,
        follow_up
    );
    assert_eq!(reloaded.new_entry_draft().await.title, "Shift summary");
    assert!(kv.load("draft-store").await.unwrap().is_some());
}

#[tokio::test]
async fn superseding_draft_starts_as_a_copy() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let store = DraftStore::load(kv).await.unwrap();
    let original = entry("E2");

    let draft = store.get_or_create_superseding_draft(&original).await;
    assert_eq!(draft.title, "Klystron trip");
    assert_eq!(draft.text, "Tripped twice during fill.");
    assert_eq!(draft.tags, vec![TagId::from("T1")]);

    let mut edited = draft.clone();
    edited.text = "Tripped three times during fill.".into();
    store
        .update_superseding_draft(&original.summary.id, edited.clone())
        .await
        .unwrap();
    assert_eq!(store.get_or_create_superseding_draft(&original).await, edited);

    store
        .discard_superseding_draft(&original.summary.id)
        .await
        .unwrap();
    assert_eq!(store.get_or_create_superseding_draft(&original).await, draft);
}
