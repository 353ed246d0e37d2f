use viewsim_core::config::StorageKey;
use viewsim_core::messages::OutboundMessage;
use viewsim_core::snapshot::ViewSnapshot;
use viewsim_core::state::{ViewMode, ViewportState};
use viewsim_core::sync::{
    HostChannel, MemoryStore, RecordingChannel, SnapshotStore, StateSynchronizer,
};

fn synchronizer() -> StateSynchronizer<MemoryStore, RecordingChannel> {
    StateSynchronizer::new(MemoryStore::new(), RecordingChannel::new(), StorageKey::default())
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[test]
fn test_memory_store_round_trip() {
    let key = StorageKey::default();
    let mut store = MemoryStore::new();
    assert!(store.load(&key).unwrap().is_none());

    let snapshot = ViewportState::default().snapshot();
    store.save(&key, &snapshot).unwrap();
    assert_eq!(store.load(&key).unwrap(), Some(snapshot));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_memory_store_keys_are_separate() {
    let mut store = MemoryStore::new();
    store
        .save(&StorageKey("a".into()), &ViewSnapshot::default())
        .unwrap();
    assert!(store.load(&StorageKey("b".into())).unwrap().is_none());
}

#[test]
fn test_memory_store_failing_saves() {
    let mut store = MemoryStore::new().fail_saves();
    assert!(store
        .save(&StorageKey::default(), &ViewSnapshot::default())
        .is_err());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_recording_channel_detached_fails() {
    let mut host = RecordingChannel::detached();
    assert!(host.send(&OutboundMessage::OpenDevTools).is_err());
    assert!(host.sent.is_empty());
}

// ---------------------------------------------------------------------------
// StateSynchronizer
// ---------------------------------------------------------------------------

#[test]
fn test_notify_changed_persists_and_forwards() {
    let mut sync = synchronizer();
    let state = ViewportState::default();
    sync.notify_changed(&state);

    assert_eq!(sync.store().save_count(), 1);
    let params: Vec<_> = sync.host().view_parameters().collect();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].mode, ViewMode::Responsive);
    assert_eq!(params[0].zoom_percent, 100);
    assert_eq!(sync.load(), Some(state.snapshot()));
}

#[test]
fn test_restore_suppresses_exactly_one_notification() {
    let mut sync = synchronizer();
    let state = ViewportState::default();
    sync.on_external_restore();
    sync.notify_changed(&state);
    assert_eq!(sync.store().save_count(), 0);
    assert!(sync.host().sent.is_empty());

    sync.notify_changed(&state);
    assert_eq!(sync.store().save_count(), 1);
    assert_eq!(sync.host().sent.len(), 1);
}

#[test]
fn test_notify_address_changed() {
    let mut sync = synchronizer();
    sync.notify_address_changed(&ViewportState::default());
    assert_eq!(sync.store().save_count(), 1);
    assert_eq!(sync.host().addresses().collect::<Vec<_>>(), ["about:blank"]);
}

#[test]
fn test_announce_does_not_persist() {
    let mut sync = synchronizer();
    sync.announce(&ViewportState::default());
    assert_eq!(sync.store().save_count(), 0);
    assert_eq!(sync.host().view_parameters().count(), 1);
}

#[test]
fn test_flush_persists_without_notifying() {
    let mut sync = synchronizer();
    sync.flush(&ViewportState::default());
    assert_eq!(sync.store().save_count(), 1);
    assert!(sync.host().sent.is_empty());
}

#[test]
fn test_failures_are_swallowed() {
    let mut sync = StateSynchronizer::new(
        MemoryStore::new().fail_saves(),
        RecordingChannel::detached(),
        StorageKey::default(),
    );
    let state = ViewportState::default();
    sync.notify_changed(&state);
    sync.notify_address_changed(&state);
    sync.flush(&state);
    assert_eq!(sync.load(), None);
}

#[test]
fn test_unreadable_record_loads_as_none() {
    let key = StorageKey::default();
    let store = MemoryStore::with_record(&key, "{broken");
    let sync = StateSynchronizer::new(store, RecordingChannel::new(), key);
    assert_eq!(sync.load(), None);
}

#[test]
fn test_into_parts_returns_collaborators() {
    let mut sync = synchronizer();
    sync.notify_changed(&ViewportState::default());
    let (store, host) = sync.into_parts();
    assert!(store.raw(&StorageKey::default()).is_some());
    assert_eq!(host.sent.len(), 1);
}
