//! Persistence and host notification of state changes.
//!
//! Neither collaborator may break the view: failures are logged and dropped.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::StorageKey;
use crate::error::{Result, ViewError};
use crate::messages::{OutboundMessage, ViewParameters};
use crate::snapshot::{self, ViewSnapshot};
use crate::state::ViewportState;

/// Storage of view snapshots, one record per key.
pub trait SnapshotStore {
    /// Stored snapshot for `key`, `None` when nothing was saved yet.
    fn load(&self, key: &StorageKey) -> Result<Option<ViewSnapshot>>;

    fn save(&mut self, key: &StorageKey, snapshot: &ViewSnapshot) -> Result<()>;
}

/// Outbound channel to the host.
pub trait HostChannel {
    fn send(&mut self, message: &OutboundMessage) -> Result<()>;
}

/// In-memory [`SnapshotStore`] holding the encoded records.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a raw record already present under `key`.
    pub fn with_record(key: &StorageKey, raw: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.records.insert(key.0.clone(), raw.into());
        store
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn raw(&self, key: &StorageKey) -> Option<&str> {
        self.records.get(&key.0).map(String::as_str)
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &StorageKey) -> Result<Option<ViewSnapshot>> {
        self.records
            .get(&key.0)
            .map(|raw| snapshot::decode(raw))
            .transpose()
    }

    fn save(&mut self, key: &StorageKey, snapshot: &ViewSnapshot) -> Result<()> {
        if self.fail_saves {
            return Err(ViewError::Store(format!("store rejected write to {key}")));
        }
        self.records.insert(key.0.clone(), snapshot::encode(snapshot)?);
        self.saves += 1;
        Ok(())
    }
}

/// [`HostChannel`] that keeps everything it was asked to send.
#[derive(Clone, Debug, Default)]
pub struct RecordingChannel {
    pub sent: Vec<OutboundMessage>,
    fail: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel whose every send fails (host detached).
    pub fn detached() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }

    pub fn view_parameters(&self) -> impl Iterator<Item = &ViewParameters> + '_ {
        self.sent.iter().filter_map(|m| match m {
            OutboundMessage::ViewParametersChanged(p) => Some(p),
            _ => None,
        })
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> + '_ {
        self.sent.iter().filter_map(|m| match m {
            OutboundMessage::AddressChanged { address } => Some(address.as_str()),
            _ => None,
        })
    }
}

impl HostChannel for RecordingChannel {
    fn send(&mut self, message: &OutboundMessage) -> Result<()> {
        if self.fail {
            return Err(ViewError::Channel("host is not attached".into()));
        }
        self.sent.push(message.clone());
        Ok(())
    }
}

/// Persists the state and reports it to the host after each change.
///
/// A restore pushed by the host arms a one-shot suppression so the
/// recompute that follows is neither persisted nor echoed back.
#[derive(Debug)]
pub struct StateSynchronizer<S, H> {
    store: S,
    host: H,
    key: StorageKey,
    suppress_next: bool,
}

impl<S: SnapshotStore, H: HostChannel> StateSynchronizer<S, H> {
    pub fn new(store: S, host: H, key: StorageKey) -> Self {
        Self {
            store,
            host,
            key,
            suppress_next: false,
        }
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Stored snapshot, or `None` when absent or unreadable.
    pub fn load(&self) -> Option<ViewSnapshot> {
        match self.store.load(&self.key) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key = %self.key, "failed to read stored view state: {e}");
                None
            }
        }
    }

    /// Arm suppression for the recompute that follows a host restore.
    pub fn on_external_restore(&mut self) {
        self.suppress_next = true;
    }

    /// Persist `state` and forward its view parameters, unless a restore
    /// suppression is armed (which this call consumes).
    pub fn notify_changed(&mut self, state: &ViewportState) {
        if std::mem::take(&mut self.suppress_next) {
            debug!("state change caused by restore, not persisting");
            return;
        }
        self.persist(state);
        self.send(&OutboundMessage::ViewParametersChanged(
            ViewParameters::from_state(state),
        ));
    }

    /// Persist `state` and report its content address.
    pub fn notify_address_changed(&mut self, state: &ViewportState) {
        self.persist(state);
        self.send(&OutboundMessage::AddressChanged {
            address: state.content_address().to_string(),
        });
    }

    /// Report the current view parameters without persisting (host attach).
    pub fn announce(&mut self, state: &ViewportState) {
        self.send(&OutboundMessage::ViewParametersChanged(
            ViewParameters::from_state(state),
        ));
    }

    /// Persist without notifying the host (teardown).
    pub fn flush(&mut self, state: &ViewportState) {
        self.persist(state);
    }

    pub fn send(&mut self, message: &OutboundMessage) {
        if let Err(e) = self.host.send(message) {
            warn!("failed to notify host: {e}");
        }
    }

    fn persist(&mut self, state: &ViewportState) {
        if let Err(e) = self.store.save(&self.key, &state.snapshot()) {
            warn!(key = %self.key, "failed to persist view state: {e}");
        }
    }

    pub fn into_parts(self) -> (S, H) {
        (self.store, self.host)
    }
}
