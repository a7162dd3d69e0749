//! Audit-trail records.
//!
//! `EditHistory` entries are append-only: created exactly once at write time,
//! never mutated or deleted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One immutable audit record for a single field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditHistory {
    /// Store-assigned key.
    pub id: String,
    /// Acting user name at the time of the change.
    pub usuario: String,
    pub program_id: String,
    /// Program name snapshot (the program may be renamed later).
    pub program_name: String,
    /// Wire name of the changed field.
    pub campo: String,
    pub valor_anterior: Value,
    pub valor_novo: Value,
    pub data_hora: String,
}

impl Default for EditHistory {
    fn default() -> Self {
        EditHistory {
            id: String::new(),
            usuario: String::new(),
            program_id: String::new(),
            program_name: String::new(),
            campo: String::new(),
            valor_anterior: Value::Null,
            valor_novo: Value::Null,
            data_hora: String::new(),
        }
    }
}

/// An audit record produced by the diff engine, before the store assigns
/// its key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDraft {
    pub usuario: String,
    pub program_id: String,
    pub program_name: String,
    pub campo: String,
    pub valor_anterior: Value,
    pub valor_novo: Value,
    pub data_hora: String,
}

impl EditHistory {
    pub fn from_draft(draft: HistoryDraft, id: String) -> Self {
        EditHistory {
            id,
            usuario: draft.usuario,
            program_id: draft.program_id,
            program_name: draft.program_name,
            campo: draft.campo,
            valor_anterior: draft.valor_anterior,
            valor_novo: draft.valor_novo,
            data_hora: draft.data_hora,
        }
    }
}
