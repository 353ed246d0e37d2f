use std::collections::BTreeMap;

/// Keyed last-write-wins timer driven by an explicit clock.
///
/// Scheduling on a key replaces whatever was pending on it, so a burst of
/// events collapses to the final one. Each scheduled action fires at most
/// once, from [`Debouncer::take_ready`].
#[derive(Debug)]
pub struct Debouncer<K, A> {
    pending: BTreeMap<K, Pending<A>>,
}

#[derive(Debug)]
struct Pending<A> {
    action: A,
    due_ms: u64,
}

impl<K: Ord + Copy, A> Default for Debouncer<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy, A> Debouncer<K, A> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Schedule `action` to fire `delay_ms` after `now_ms`. Returns the
    /// action it superseded, if any.
    pub fn schedule(&mut self, key: K, action: A, now_ms: u64, delay_ms: u64) -> Option<A> {
        let due_ms = now_ms.saturating_add(delay_ms);
        self.pending
            .insert(key, Pending { action, due_ms })
            .map(|p| p.action)
    }

    pub fn cancel(&mut self, key: K) -> Option<A> {
        self.pending.remove(&key).map(|p| p.action)
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// Earliest time at which something becomes ready.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().map(|p| p.due_ms).min()
    }

    /// Remove and return every action due at `now_ms`, earliest first.
    pub fn take_ready(&mut self, now_ms: u64) -> Vec<(K, A)> {
        let mut due: Vec<(u64, K)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .map(|(k, p)| (p.due_ms, *k))
            .collect();
        due.sort();

        due.into_iter()
            .filter_map(|(_, key)| self.pending.remove(&key).map(|p| (key, p.action)))
            .collect()
    }
}
