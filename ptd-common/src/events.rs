//! Event types pushed to store subscribers.
//!
//! The store mirrors data to clients by pushing the full collection on every
//! change; subscribers re-render from the snapshot. There are no incremental
//! deltas on the feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EditHistory, Program};

/// Tracker event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackerEvent {
    /// Full programs collection, pushed after every program write
    ProgramsSnapshot {
        timestamp: DateTime<Utc>,
        programs: Vec<Program>,
    },

    /// Full audit trail, newest first, pushed after every history append
    HistorySnapshot {
        timestamp: DateTime<Utc>,
        entries: Vec<EditHistory>,
    },
}

impl TrackerEvent {
    /// Event name used on the SSE wire.
    pub fn event_type(&self) -> &'static str {
        match self {
            TrackerEvent::ProgramsSnapshot { .. } => "ProgramsSnapshot",
            TrackerEvent::HistorySnapshot { .. } => "HistorySnapshot",
        }
    }
}
