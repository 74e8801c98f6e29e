//! Deferred mirror events.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::warn;

use super::MirrorEvent;

#[derive(Debug)]
struct Pending {
    seq: u64,
    event: MirrorEvent,
}

#[derive(Debug, Default)]
struct Entries {
    next_seq: u64,
    pending: HashMap<(String, i64), Pending>,
}

/// A bounded store of events that could not be mirrored.
///
/// At most one event is kept per `(index, id)`: a newer event for the same
/// record replaces the older one, since only the latest state matters to
/// the index. When full, the oldest event is dropped.
#[derive(Debug)]
pub struct Outbox {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Outbox {
    /// Creates an empty outbox holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Stores an event, replacing any older event for the same record.
    pub fn push(&self, event: MirrorEvent) {
        let mut entries = self.entries.lock();
        let seq = entries.next_seq;
        entries.next_seq += 1;

        let key = (event.index().to_string(), event.id());
        entries.pending.insert(key, Pending { seq, event });

        if entries.pending.len() > self.capacity {
            let oldest = entries
                .pending
                .iter()
                .min_by_key(|(_, p)| p.seq)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.pending.remove(&key);
                warn!(
                    index = %key.0,
                    id = key.1,
                    capacity = self.capacity,
                    "Mirror outbox full, dropped oldest deferred event"
                );
            }
        }
    }

    /// Drops the pending event for a record, if any.
    pub fn remove(&self, index: &str, id: i64) {
        self.entries.lock().pending.remove(&(index.to_string(), id));
    }

    /// Returns the pending events, oldest first, tagged with their sequence.
    pub fn snapshot(&self) -> Vec<(u64, MirrorEvent)> {
        let entries = self.entries.lock();
        let mut events: Vec<_> = entries
            .pending
            .values()
            .map(|p| (p.seq, p.event.clone()))
            .collect();
        events.sort_by_key(|(seq, _)| *seq);
        events
    }

    /// Removes a replayed event unless a newer one replaced it meanwhile.
    pub fn acknowledge(&self, seq: u64, event: &MirrorEvent) {
        let mut entries = self.entries.lock();
        let key = (event.index().to_string(), event.id());
        if entries.pending.get(&key).is_some_and(|p| p.seq == seq) {
            entries.pending.remove(&key);
        }
    }

    /// Returns true if `seq` is still the pending event for the record.
    pub fn is_current(&self, seq: u64, event: &MirrorEvent) -> bool {
        let key = (event.index().to_string(), event.id());
        self.entries
            .lock()
            .pending
            .get(&key)
            .is_some_and(|p| p.seq == seq)
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.entries.lock().pending.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newest_event_per_record_wins() {
        let outbox = Outbox::new(10);
        outbox.push(MirrorEvent::upsert("product", 1, json!({"id": 1, "name": "a"})));
        outbox.push(MirrorEvent::upsert("product", 2, json!({"id": 2})));
        outbox.push(MirrorEvent::delete("product", 1));

        assert_eq!(outbox.len(), 2);
        let events: Vec<_> = outbox.snapshot().into_iter().map(|(_, e)| e).collect();
        assert_eq!(events[0], MirrorEvent::upsert("product", 2, json!({"id": 2})));
        assert_eq!(events[1], MirrorEvent::delete("product", 1));
    }

    #[test]
    fn test_same_id_in_different_indexes_is_kept() {
        let outbox = Outbox::new(10);
        outbox.push(MirrorEvent::delete("product", 1));
        outbox.push(MirrorEvent::delete("customer", 1));
        assert_eq!(outbox.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let outbox = Outbox::new(2);
        outbox.push(MirrorEvent::delete("product", 1));
        outbox.push(MirrorEvent::delete("product", 2));
        outbox.push(MirrorEvent::delete("product", 3));

        let ids: Vec<_> = outbox.snapshot().iter().map(|(_, e)| e.id()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_acknowledge_keeps_newer_event() {
        let outbox = Outbox::new(10);
        outbox.push(MirrorEvent::delete("order", 7));
        let (seq, event) = outbox.snapshot().remove(0);

        outbox.push(MirrorEvent::upsert("order", 7, json!({"id": 7})));
        outbox.acknowledge(seq, &event);
        assert_eq!(outbox.len(), 1);

        let (seq, event) = outbox.snapshot().remove(0);
        outbox.acknowledge(seq, &event);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_is_current_tracks_replacement() {
        let outbox = Outbox::new(10);
        outbox.push(MirrorEvent::delete("customer", 2));
        let (seq, event) = outbox.snapshot().remove(0);
        assert!(outbox.is_current(seq, &event));

        outbox.push(MirrorEvent::delete("customer", 2));
        assert!(!outbox.is_current(seq, &event));

        outbox.remove("customer", 2);
        assert!(!outbox.is_current(seq, &event));
    }
}
