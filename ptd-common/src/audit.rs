//! Audit-diff update pipeline.
//!
//! One partial update runs through here: field-level deltas against the last
//! known snapshot become draft history entries, the payload is merged over the
//! snapshot, the merged record is sanitized, percentages are recomputed when a
//! checklist changed, and the last-update stamp is set.
//!
//! The engine does not persist anything; the store writes the merged program
//! and appends the drafts one at a time, with no transactional rollback if an
//! append fails partway.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::metrics;
use crate::model::{HistoryDraft, Program};
use crate::sanitize::{self, truthy};
use crate::session::SessionContext;
use crate::time;

/// Checklist keys are excluded from per-field diffing; a checklist edit
/// surfaces in the trail only through the derived percentage fields.
pub const CAMPOS_CHECKLIST: [&str; 3] = ["checklist", "checklistCGProg", "checklistSintese"];

/// Recorded as the previous value when the prior field was absent or falsy.
pub const VALOR_NAO_DEFINIDO: &str = "Não definido";

/// Result of applying one update payload.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The merged, sanitized program to persist.
    pub program: Program,
    /// Draft audit entries, in payload-key iteration order, all sharing the
    /// update's single timestamp.
    pub entries: Vec<HistoryDraft>,
}

/// Diff an update payload against the old snapshot and produce the merged
/// program plus its audit entries.
///
/// Only top-level payload keys are considered. Stage ladders are not checked
/// for monotonicity: any transition, including backward, is accepted.
pub fn apply_update(
    old: &Program,
    updates: &Map<String, Value>,
    session: &SessionContext,
    now: DateTime<Utc>,
) -> Result<UpdateOutcome> {
    let old_value = serde_json::to_value(old)?;
    let Value::Object(mut merged) = old_value else {
        return Err(Error::Internal(
            "program snapshot did not serialize to an object".to_string(),
        ));
    };

    let data_hora = time::iso_datetime(now);
    let mut entries = Vec::new();

    for (campo, valor_novo) in updates {
        let excluded = CAMPOS_CHECKLIST.contains(&campo.as_str());
        if !excluded && merged.get(campo) != Some(valor_novo) {
            entries.push(HistoryDraft {
                usuario: session.usuario.clone(),
                program_id: old.id.clone(),
                program_name: old.nome.clone(),
                campo: campo.clone(),
                valor_anterior: match merged.get(campo) {
                    Some(anterior) if truthy(anterior) => anterior.clone(),
                    _ => Value::String(VALOR_NAO_DEFINIDO.to_string()),
                },
                valor_novo: valor_novo.clone(),
                data_hora: data_hora.clone(),
            });
        }
        merged.insert(campo.clone(), valor_novo.clone());
    }

    // Percentages are recomputed only when the payload touches a checklist;
    // unrelated edits leave the stored values untouched.
    let recompute = ["checklist", "checklistCGProg"]
        .iter()
        .any(|key| updates.get(*key).map(truthy).unwrap_or(false));

    let mut program = sanitize::sanitize_program(&Value::Object(merged))?;
    if recompute {
        program.percentual_conclusao =
            metrics::percentual_conclusao(&program.checklist, &program.checklist_cgprog);
        program.percentual_cgprog = metrics::percentual_cgprog(&program.checklist_cgprog);
    }

    // Stamped on every update, whether or not any watched field changed.
    program.data_ultima_atualizacao = data_hora;

    Ok(UpdateOutcome { program, entries })
}
