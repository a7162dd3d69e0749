//! The Program Store: document read/write/append plus the subscriber feed.
//!
//! Write granularity is the whole record; concurrent writers race and the
//! last write wins in full. After every successful write the store re-reads
//! the collection and pushes a full snapshot to all subscribers, which is the
//! only synchronization clients get.
//!
//! Subscribing returns a `tokio::sync::broadcast` receiver; dropping the
//! receiver is the unsubscribe.

use ptd_common::events::TrackerEvent;
use ptd_common::model::{EditHistory, HistoryDraft, Program};
use ptd_common::{sanitize, time, Result};
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::{error, warn};
use uuid::Uuid;

/// Store handle shared by all HTTP handlers.
pub struct ProgramStore {
    db: SqlitePool,
    event_tx: broadcast::Sender<TrackerEvent>,
}

impl ProgramStore {
    pub fn new(db: SqlitePool) -> Self {
        // Snapshots are fat; a small buffer is enough because every event
        // supersedes the previous one of its kind.
        let (event_tx, _) = broadcast::channel(64);
        Self { db, event_tx }
    }

    /// Subscribe to the snapshot feed. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.event_tx.subscribe()
    }

    /// Read the full programs collection, sanitized. Unreadable rows are
    /// logged and dropped; a bad row never aborts the read.
    pub async fn load_programs(&self) -> Result<Vec<Program>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, record FROM programs ORDER BY id")
                .fetch_all(&self.db)
                .await?;

        let mut programs = Vec::with_capacity(rows.len());
        for (id, record) in rows {
            let mut value: Value = match serde_json::from_str(&record) {
                Ok(value) => value,
                Err(e) => {
                    error!("dropping unreadable program record {}: {}", id, e);
                    continue;
                }
            };
            // The row key is authoritative for the id, as with any keyed
            // document store.
            if let Some(obj) = value.as_object_mut() {
                obj.insert("id".to_string(), Value::String(id.clone()));
            }
            match sanitize::sanitize_program(&value) {
                Ok(program) => programs.push(program),
                Err(e) => error!("dropping invalid program record {}: {}", id, e),
            }
        }
        Ok(programs)
    }

    /// Read the full audit trail, newest first.
    pub async fn load_history(&self) -> Result<Vec<EditHistory>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, record FROM history ORDER BY data_hora DESC, id DESC")
                .fetch_all(&self.db)
                .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, record) in rows {
            match serde_json::from_str::<EditHistory>(&record) {
                Ok(mut entry) => {
                    entry.id = id;
                    entries.push(entry);
                }
                Err(e) => error!("dropping unreadable history record {}: {}", id, e),
            }
        }
        Ok(entries)
    }

    /// Replace-at-key write of a full program record, then push a fresh
    /// programs snapshot to all subscribers.
    pub async fn write_program(&self, program: &Program) -> Result<()> {
        let record = serde_json::to_string(program)?;
        sqlx::query(
            "INSERT INTO programs (id, record) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET record = excluded.record",
        )
        .bind(&program.id)
        .bind(&record)
        .execute(&self.db)
        .await?;

        self.push_programs().await;
        Ok(())
    }

    /// Generate-key-and-insert append of one audit entry, then push a fresh
    /// history snapshot. Entries are immutable once written.
    pub async fn append_history(&self, draft: HistoryDraft) -> Result<EditHistory> {
        let entry = EditHistory::from_draft(draft, Uuid::new_v4().to_string());
        let record = serde_json::to_string(&entry)?;
        sqlx::query("INSERT INTO history (id, record, data_hora) VALUES (?, ?, ?)")
            .bind(&entry.id)
            .bind(&record)
            .bind(&entry.data_hora)
            .execute(&self.db)
            .await?;

        self.push_history().await;
        Ok(entry)
    }

    /// Initial snapshots delivered to a subscriber on connect.
    pub async fn initial_events(&self) -> Vec<TrackerEvent> {
        let mut events = Vec::with_capacity(2);
        match self.load_programs().await {
            Ok(programs) => events.push(TrackerEvent::ProgramsSnapshot {
                timestamp: time::now(),
                programs,
            }),
            Err(e) => warn!("failed to load programs for initial snapshot: {}", e),
        }
        match self.load_history().await {
            Ok(entries) => events.push(TrackerEvent::HistorySnapshot {
                timestamp: time::now(),
                entries,
            }),
            Err(e) => warn!("failed to load history for initial snapshot: {}", e),
        }
        events
    }

    async fn push_programs(&self) {
        match self.load_programs().await {
            Ok(programs) => {
                // No receivers is fine
                let _ = self.event_tx.send(TrackerEvent::ProgramsSnapshot {
                    timestamp: time::now(),
                    programs,
                });
            }
            Err(e) => warn!("failed to load programs for snapshot push: {}", e),
        }
    }

    async fn push_history(&self) {
        match self.load_history().await {
            Ok(entries) => {
                let _ = self.event_tx.send(TrackerEvent::HistorySnapshot {
                    timestamp: time::now(),
                    entries,
                });
            }
            Err(e) => warn!("failed to load history for snapshot push: {}", e),
        }
    }
}
