//! Derived completion metrics.
//!
//! Pure functions; the update pipeline decides when they run (only when a
//! payload touches a checklist), the stored percentages are authoritative the
//! rest of the time.

use crate::model::{ChecklistItem, EtapaDocumento, Program, StatusCGProg, StatusGT};

fn percent(completed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i64
}

fn completed(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|item| item.concluido).count()
}

/// Overall completion: completed items over total items across the GT and
/// CGProg checklists together. Zero when both are empty.
pub fn percentual_conclusao(checklist: &[ChecklistItem], checklist_cgprog: &[ChecklistItem]) -> i64 {
    percent(
        completed(checklist) + completed(checklist_cgprog),
        checklist.len() + checklist_cgprog.len(),
    )
}

/// CGProg completion: restricted to the CGProg checklist alone.
pub fn percentual_cgprog(checklist_cgprog: &[ChecklistItem]) -> i64 {
    percent(completed(checklist_cgprog), checklist_cgprog.len())
}

// Stage weights for the overview counters: a concluded stage contributes a
// sixth of 100 (16.66), a stage underway half of that.
const PESO_CONCLUIDO: f64 = 16.66;
const PESO_EM_ANDAMENTO: f64 = 8.33;

fn peso_status_gt(status: StatusGT) -> f64 {
    match status {
        StatusGT::Concluido => PESO_CONCLUIDO,
        StatusGT::EmAtividade => PESO_EM_ANDAMENTO,
        StatusGT::NaoNomeado => 0.0,
    }
}

fn peso_status_cgprog(status: StatusCGProg) -> f64 {
    match status {
        StatusCGProg::Ativo => PESO_CONCLUIDO,
        StatusCGProg::Instituido => PESO_EM_ANDAMENTO,
        StatusCGProg::NaoInstituido => 0.0,
    }
}

fn peso_etapa(etapa: EtapaDocumento) -> f64 {
    match etapa {
        EtapaDocumento::Concluido => PESO_CONCLUIDO,
        EtapaDocumento::EmAndamento => PESO_EM_ANDAMENTO,
        EtapaDocumento::NaoIniciado => 0.0,
    }
}

/// Stage-weighted progress over the six stage ladders, 0..=100. Used by the
/// dashboard overview, independent of the checklist percentages.
pub fn progresso_etapas(program: &Program) -> i64 {
    let total = peso_status_gt(program.status_gt)
        + peso_etapa(program.documento_sintese)
        + peso_etapa(program.parecer_tecnico)
        + peso_status_cgprog(program.status_cgprog)
        + peso_etapa(program.carta_compromisso_elaborada)
        + peso_etapa(program.carta_compromisso_analisada);
    total.round() as i64
}
