//! Aggregate dashboard counters

use axum::extract::State;
use axum::Json;
use ptd_common::metrics;
use ptd_common::model::{EtapaDocumento, StatusCGProg, StatusGT, Tipo};
use serde::Serialize;

use crate::api::ApiError;
use crate::AppState;

/// Overview counters for the dashboard landing page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_programas: usize,
    pub top_down: usize,
    pub bottom_up: usize,
    /// Working groups that reached the concluded rung.
    pub gts_concluidos: usize,
    /// Steering committees currently active.
    pub cgprogs_ativos: usize,
    /// Programs at 100 stage-weighted progress.
    pub programas_concluidos: usize,
    /// Programs strictly between 0 and 100.
    pub programas_em_andamento: usize,
    /// Programs still at 0.
    pub programas_nao_iniciados: usize,
    /// Mean stage-weighted progress, rounded.
    pub media_conclusao: i64,
    pub documentos_sintese_concluidos: usize,
    pub pareceres_tecnicos_concluidos: usize,
    pub cartas_elaboradas_concluidas: usize,
    pub cartas_analisadas_concluidas: usize,
}

/// GET /api/overview
pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let programs = state.store.load_programs().await?;
    let total = programs.len();

    let progresso: Vec<i64> = programs.iter().map(metrics::progresso_etapas).collect();
    let media_conclusao = if total > 0 {
        (progresso.iter().sum::<i64>() as f64 / total as f64).round() as i64
    } else {
        0
    };

    Ok(Json(OverviewResponse {
        total_programas: total,
        top_down: programs.iter().filter(|p| p.tipo == Tipo::TopDown).count(),
        bottom_up: programs.iter().filter(|p| p.tipo == Tipo::BottomUp).count(),
        gts_concluidos: programs
            .iter()
            .filter(|p| p.status_gt == StatusGT::Concluido)
            .count(),
        cgprogs_ativos: programs
            .iter()
            .filter(|p| p.status_cgprog == StatusCGProg::Ativo)
            .count(),
        programas_concluidos: progresso.iter().filter(|&&v| v == 100).count(),
        programas_em_andamento: progresso.iter().filter(|&&v| v > 0 && v < 100).count(),
        programas_nao_iniciados: progresso.iter().filter(|&&v| v == 0).count(),
        media_conclusao,
        documentos_sintese_concluidos: programs
            .iter()
            .filter(|p| p.documento_sintese == EtapaDocumento::Concluido)
            .count(),
        pareceres_tecnicos_concluidos: programs
            .iter()
            .filter(|p| p.parecer_tecnico == EtapaDocumento::Concluido)
            .count(),
        cartas_elaboradas_concluidas: programs
            .iter()
            .filter(|p| p.carta_compromisso_elaborada == EtapaDocumento::Concluido)
            .count(),
        cartas_analisadas_concluidas: programs
            .iter()
            .filter(|p| p.carta_compromisso_analisada == EtapaDocumento::Concluido)
            .count(),
    }))
}
