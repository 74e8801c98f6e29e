//! The write-then-mirror workflow.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::SearchIndex;
use crate::error::IndexResult;

use super::{MirrorConfig, MirrorEvent, MirrorOutcome, Outbox};

/// Counters and outbox size reported by [`IndexMirror::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorStatus {
    /// Index backend name.
    pub backend: String,
    /// Events applied to the index, including replays.
    pub mirrored: u64,
    /// Events that failed and were deferred.
    pub deferred: u64,
    /// Deferred events later applied by a replay.
    pub replayed: u64,
    /// Events currently waiting in the outbox.
    pub pending: usize,
}

/// Result of one replay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Events applied during this pass.
    pub replayed: usize,
    /// Events still pending afterwards.
    pub remaining: usize,
}

#[derive(Debug, Default)]
struct Counters {
    mirrored: u64,
    deferred: u64,
    replayed: u64,
}

type LaneKey = (String, i64);

/// Exclusive access to the index entry of one record.
///
/// Held across every index write for the record, so writes from inline
/// mirroring, replay and reindex never interleave.
pub struct RecordLane<'a> {
    lanes: &'a Mutex<HashMap<LaneKey, Arc<AsyncMutex<()>>>>,
    key: LaneKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RecordLane<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut lanes = self.lanes.lock();
        if lanes
            .get(&self.key)
            .is_some_and(|lane| Arc::strong_count(lane) == 1)
        {
            lanes.remove(&self.key);
        }
    }
}

/// Applies mirror events to a search index.
pub struct IndexMirror {
    index: Arc<dyn SearchIndex>,
    config: MirrorConfig,
    outbox: Outbox,
    counters: Mutex<Counters>,
    lanes: Mutex<HashMap<LaneKey, Arc<AsyncMutex<()>>>>,
}

impl std::fmt::Debug for IndexMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexMirror")
            .field("backend", &self.index.backend_kind())
            .field("config", &self.config)
            .field("pending", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

impl IndexMirror {
    /// Creates a mirror writing to `index`.
    pub fn new(index: Arc<dyn SearchIndex>, config: MirrorConfig) -> Self {
        let outbox = Outbox::new(config.outbox_capacity);
        Self {
            index,
            config,
            outbox,
            counters: Mutex::new(Counters::default()),
            lanes: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the search index behind this mirror.
    pub fn index(&self) -> &Arc<dyn SearchIndex> {
        &self.index
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Returns the outbox of deferred events.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Waits for exclusive access to the index entry of `(index, id)`.
    pub async fn lock_record(&self, index: &str, id: i64) -> RecordLane<'_> {
        let key = (index.to_string(), id);
        let lane = Arc::clone(
            self.lanes
                .lock()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        );
        RecordLane {
            lanes: &self.lanes,
            key,
            guard: Some(lane.lock_owned().await),
        }
    }

    /// Applies an event, retrying as configured.
    ///
    /// A failure never propagates: it is logged and the event is deferred to
    /// the outbox. A success supersedes any older deferred event for the
    /// same record.
    pub async fn apply(&self, event: MirrorEvent) -> MirrorOutcome {
        let _lane = self.lock_record(event.index(), event.id()).await;
        match self.apply_with_retry(&event).await {
            Ok(()) => {
                self.outbox.remove(event.index(), event.id());
                self.counters.lock().mirrored += 1;
                debug!(
                    index = event.index(),
                    id = event.id(),
                    kind = event.kind(),
                    "Mirrored to search index"
                );
                MirrorOutcome::Mirrored
            }
            Err(e) => {
                warn!(
                    index = event.index(),
                    id = event.id(),
                    kind = event.kind(),
                    error = %e,
                    "Search index write failed, deferring"
                );
                self.counters.lock().deferred += 1;
                self.outbox.push(event);
                MirrorOutcome::Deferred
            }
        }
    }

    async fn send(&self, event: &MirrorEvent) -> IndexResult<()> {
        match event {
            MirrorEvent::Upsert {
                index,
                id,
                document,
            } => self.index.upsert(index, *id, document.clone()).await,
            MirrorEvent::Delete { index, id } => self.index.delete(index, *id).await,
        }
    }

    async fn apply_with_retry(&self, event: &MirrorEvent) -> IndexResult<()> {
        let retry = &self.config.retry;
        let mut delay = retry.initial_delay;
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.send(event).await {
                Ok(()) => {
                    if attempts > 1 {
                        debug!(attempts = attempts, "Mirror succeeded after retries");
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempts > retry.max_retries {
                        return Err(e);
                    }

                    warn!(
                        attempt = attempts,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Mirror attempt failed, retrying"
                    );

                    sleep(delay).await;
                    delay = retry.next_delay(delay);
                }
            }
        }
    }

    /// Re-applies deferred events, oldest first.
    ///
    /// Stops at the first failure, leaving it and every later event pending.
    pub async fn replay_pending(&self) -> ReplayReport {
        let mut replayed = 0;

        for (seq, event) in self.outbox.snapshot() {
            let _lane = self.lock_record(event.index(), event.id()).await;
            if !self.outbox.is_current(seq, &event) {
                continue;
            }
            match self.send(&event).await {
                Ok(()) => {
                    self.outbox.acknowledge(seq, &event);
                    let mut counters = self.counters.lock();
                    counters.mirrored += 1;
                    counters.replayed += 1;
                    replayed += 1;
                }
                Err(e) => {
                    warn!(
                        index = event.index(),
                        id = event.id(),
                        error = %e,
                        "Replay of deferred event failed"
                    );
                    break;
                }
            }
        }

        let report = ReplayReport {
            replayed,
            remaining: self.outbox.len(),
        };
        if replayed > 0 {
            info!(
                replayed = report.replayed,
                remaining = report.remaining,
                "Replayed deferred mirror events"
            );
        }
        report
    }

    /// Returns the mirror counters and outbox size.
    pub fn status(&self) -> MirrorStatus {
        let counters = self.counters.lock();
        MirrorStatus {
            backend: self.index.backend_kind().to_string(),
            mirrored: counters.mirrored,
            deferred: counters.deferred,
            replayed: counters.replayed,
            pending: self.outbox.len(),
        }
    }

    /// Starts the periodic replay task, unless the interval is zero.
    pub fn spawn_replay_task(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let period = self.config.replay_interval;
        if period.is_zero() {
            return None;
        }

        let mirror = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !mirror.outbox.is_empty() {
                    mirror.replay_pending().await;
                }
            }
        }))
    }
}
