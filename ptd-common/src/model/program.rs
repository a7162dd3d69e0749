//! The Program record and its stage enums.
//!
//! Wire encoding is the store's camelCase JSON; every enum is a closed set
//! and deserializes only from its wire values. Arbitrary inbound documents
//! go through [`crate::sanitize`] instead of plain deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::templates;
use crate::time;

/// Program classification, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tipo {
    #[default]
    #[serde(rename = "top-down")]
    TopDown,
    #[serde(rename = "bottom-up")]
    BottomUp,
}

impl Tipo {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "top-down" => Some(Self::TopDown),
            "bottom-up" => Some(Self::BottomUp),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::TopDown => "top-down",
            Self::BottomUp => "bottom-up",
        }
    }
}

/// Working-group maturity ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusGT {
    #[default]
    #[serde(rename = "nao-nomeado")]
    NaoNomeado,
    #[serde(rename = "em-atividade")]
    EmAtividade,
    #[serde(rename = "concluido")]
    Concluido,
}

impl StatusGT {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "nao-nomeado" => Some(Self::NaoNomeado),
            "em-atividade" => Some(Self::EmAtividade),
            "concluido" => Some(Self::Concluido),
            _ => None,
        }
    }
}

/// Steering-committee maturity ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusCGProg {
    #[default]
    #[serde(rename = "nao-instituido")]
    NaoInstituido,
    #[serde(rename = "instituido")]
    Instituido,
    #[serde(rename = "ativo")]
    Ativo,
}

impl StatusCGProg {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "nao-instituido" => Some(Self::NaoInstituido),
            "instituido" => Some(Self::Instituido),
            "ativo" => Some(Self::Ativo),
            _ => None,
        }
    }
}

/// Three-state ladder shared by the document stages (synthesis document,
/// technical opinion, commitment letter drafted/reviewed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EtapaDocumento {
    #[default]
    #[serde(rename = "nao-iniciado")]
    NaoIniciado,
    #[serde(rename = "em-andamento")]
    EmAndamento,
    #[serde(rename = "concluido")]
    Concluido,
}

impl EtapaDocumento {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "nao-iniciado" => Some(Self::NaoIniciado),
            "em-andamento" => Some(Self::EmAndamento),
            "concluido" => Some(Self::Concluido),
            _ => None,
        }
    }
}

/// Status of a free-form CGProg sub-activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AtividadeStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pendente,
    #[serde(rename = "em-andamento")]
    EmAndamento,
    #[serde(rename = "concluida")]
    Concluida,
}

impl AtividadeStatus {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pendente" => Some(Self::Pendente),
            "em-andamento" => Some(Self::EmAndamento),
            "concluida" => Some(Self::Concluida),
            _ => None,
        }
    }
}

/// One entry of a program checklist.
///
/// `prazo_dias` is derived from the two dates on sanitization and is never
/// trusted from inbound data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: i64,
    pub descricao: String,
    pub concluido: bool,
    pub data_inicio: String,
    pub data_conclusao: String,
    pub prazo_dias: i64,
}

/// Free-form CGProg sub-activity. Shallowly validated only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CGProgActivity {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub status: AtividadeStatus,
    pub percentual: i64,
}

/// The central entity: one institutional program and its stage state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub nome: String,
    pub tipo: Tipo,
    pub coordenador: String,
    #[serde(rename = "pontoFocalSGPG")]
    pub ponto_focal_sgpg: String,
    #[serde(rename = "membrosGT")]
    pub membros_gt: i64,
    #[serde(rename = "dataGT")]
    pub data_gt: String,
    #[serde(rename = "dataCGProg")]
    pub data_cgprog: String,
    #[serde(rename = "statusGT")]
    pub status_gt: StatusGT,
    #[serde(rename = "statusCGProg")]
    pub status_cgprog: StatusCGProg,
    pub documento_sintese: EtapaDocumento,
    pub parecer_tecnico: EtapaDocumento,
    pub carta_compromisso_elaborada: EtapaDocumento,
    pub carta_compromisso_analisada: EtapaDocumento,
    #[serde(rename = "validacaoCPA")]
    pub validacao_cpa: bool,
    /// Derived; recomputed by the update pipeline, never authored directly.
    pub percentual_conclusao: i64,
    /// Derived; restricted to the CGProg checklist.
    #[serde(rename = "percentualCGProg")]
    pub percentual_cgprog: i64,
    pub cgprog_atividades: Vec<CGProgActivity>,
    pub checklist: Vec<ChecklistItem>,
    #[serde(rename = "checklistCGProg")]
    pub checklist_cgprog: Vec<ChecklistItem>,
    pub checklist_sintese: Vec<ChecklistItem>,
    /// Stamped by the store-write path on every update.
    pub data_ultima_atualizacao: String,
}

/// Seed fields accepted when creating a program. Everything else starts at
/// its initial value with the checklists instantiated from the templates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProgram {
    pub nome: Option<String>,
    pub tipo: Option<Tipo>,
    pub coordenador: Option<String>,
    #[serde(rename = "pontoFocalSGPG")]
    pub ponto_focal_sgpg: Option<String>,
}

impl Program {
    /// Create a new program with a timestamp-derived id, defaulted
    /// descriptive fields and all three checklists from the fixed templates.
    pub fn create(seed: NewProgram, created_at: DateTime<Utc>) -> Self {
        Program {
            id: created_at.timestamp_millis().to_string(),
            nome: non_empty(seed.nome).unwrap_or_else(|| "Novo Programa".to_string()),
            tipo: seed.tipo.unwrap_or_default(),
            coordenador: non_empty(seed.coordenador).unwrap_or_else(|| "A designar".to_string()),
            ponto_focal_sgpg: non_empty(seed.ponto_focal_sgpg)
                .unwrap_or_else(|| "A designar".to_string()),
            data_gt: time::iso_date(created_at),
            checklist: templates::initial_checklist(),
            checklist_cgprog: templates::initial_checklist_cgprog(),
            checklist_sintese: templates::initial_checklist_sintese(),
            ..Program::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
