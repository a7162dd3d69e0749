//! Program and audit-trail data models

pub mod history;
pub mod program;
pub mod templates;

pub use history::{EditHistory, HistoryDraft};
pub use program::{
    AtividadeStatus, CGProgActivity, ChecklistItem, EtapaDocumento, NewProgram, Program,
    StatusCGProg, StatusGT, Tipo,
};
