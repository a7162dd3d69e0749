//! Inbound record sanitization.
//!
//! Documents arriving from the shared store are untrusted: hand-edited rows,
//! imports from older schema revisions and concurrent writers all end up in
//! the same collections. Everything read back is normalized here before any
//! other code touches it.
//!
//! The contract is "never throw, always coerce": each field independently
//! resolves to a safe default on any malformed value. The single exception is
//! a record that is not a JSON object at all, which fails because there is no
//! identity to recover.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::error;

use crate::error::{Error, Result};
use crate::model::{
    templates, AtividadeStatus, CGProgActivity, ChecklistItem, EtapaDocumento, Program,
    StatusCGProg, StatusGT, Tipo,
};

/// Length cap for program and item descriptions.
pub const MAX_DESCRICAO: usize = 500;
/// Length cap for person-name fields.
pub const MAX_NOME_PESSOA: usize = 200;

/// Placeholder description for a null checklist item.
pub const ITEM_INVALIDO: &str = "Item inválido";
/// Fallback program name for records missing one.
pub const PROGRAMA_SEM_NOME: &str = "Programa sem nome";

/// JavaScript-style truthiness, used wherever the original store's clients
/// relied on `||` / `Boolean()` coercion: null, false, 0, NaN and the empty
/// string are falsy; arrays and objects are always truthy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_string(value: Option<&Value>, max_len: usize, fallback: &str) -> String {
    let coerced = match value {
        Some(v) if truthy(v) => match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            // No sane string form for compound values.
            _ => fallback.to_string(),
        },
        _ => fallback.to_string(),
    };
    coerced.chars().take(max_len).collect()
}

fn coerce_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}

fn coerce_i64(value: Option<&Value>) -> i64 {
    coerce_f64(value) as i64
}

/// Percentage fields: numeric parse, clamp to [0, 100].
fn coerce_percent(value: Option<&Value>) -> i64 {
    coerce_f64(value).clamp(0.0, 100.0).round() as i64
}

fn coerce_bool(value: Option<&Value>) -> bool {
    value.map(truthy).unwrap_or(false)
}

fn coerce_enum<T: Default>(value: Option<&Value>, parse: fn(&str) -> Option<T>) -> T {
    value
        .and_then(Value::as_str)
        .and_then(parse)
        .unwrap_or_default()
}

/// Accept a date string only on a `YYYY-MM-DD` digit-prefix match; anything
/// else (wrong type, malformed, empty) sanitizes to the empty string.
///
/// This is a shape check, not a calendar check: `"2024-13-99xyz"` passes.
pub fn sanitize_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if has_date_prefix(s) => s.clone(),
        _ => String::new(),
    }
}

fn has_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// Days between start and completion, clamped at zero. Zero when either date
/// is missing or not calendrically parseable (shape-valid garbage like
/// `"2024-13-99"` lands here).
pub fn prazo_dias(data_inicio: &str, data_conclusao: &str) -> i64 {
    let (Some(inicio), Some(fim)) = (parse_date(data_inicio), parse_date(data_conclusao)) else {
        return 0;
    };
    (fim - inicio).num_days().max(0)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
}

/// Sanitize one checklist item. A null/absent item becomes the placeholder
/// item; otherwise every field is coerced independently and `prazoDias` is
/// recomputed from the sanitized dates, never trusted from the input.
pub fn sanitize_checklist_item(value: &Value) -> ChecklistItem {
    if !truthy(value) {
        return ChecklistItem {
            id: 0,
            descricao: ITEM_INVALIDO.to_string(),
            concluido: false,
            data_inicio: String::new(),
            data_conclusao: String::new(),
            prazo_dias: 0,
        };
    }

    let obj = value.as_object();
    let get = |key: &str| obj.and_then(|m| m.get(key));

    let data_inicio = sanitize_date(get("dataInicio"));
    let data_conclusao = sanitize_date(get("dataConclusao"));

    ChecklistItem {
        id: coerce_i64(get("id")),
        descricao: coerce_string(get("descricao"), MAX_DESCRICAO, ""),
        concluido: coerce_bool(get("concluido")),
        prazo_dias: prazo_dias(&data_inicio, &data_conclusao),
        data_inicio,
        data_conclusao,
    }
}

/// Shallow sanitization of a CGProg sub-activity: per-field coercion only,
/// no cross-field validation.
pub fn sanitize_atividade(value: &Value) -> CGProgActivity {
    let obj = value.as_object();
    let get = |key: &str| obj.and_then(|m| m.get(key));

    CGProgActivity {
        id: coerce_string(get("id"), MAX_NOME_PESSOA, ""),
        nome: coerce_string(get("nome"), MAX_DESCRICAO, ""),
        descricao: coerce_string(get("descricao"), MAX_DESCRICAO, ""),
        status: coerce_enum(get("status"), AtividadeStatus::from_wire),
        percentual: coerce_percent(get("percentual")),
    }
}

fn sanitize_checklist(value: Option<&Value>) -> Vec<ChecklistItem> {
    match value {
        Some(Value::Array(items)) => items.iter().map(sanitize_checklist_item).collect(),
        _ => Vec::new(),
    }
}

/// Produce a well-formed [`Program`] from an arbitrary untyped record.
///
/// Fails only when the record is not a JSON object (no identity to recover);
/// every other malformation resolves to the field's defined default.
pub fn sanitize_program(value: &Value) -> Result<Program> {
    let Some(obj) = value.as_object() else {
        return Err(Error::InvalidInput(
            "program record missing required identity (not an object)".to_string(),
        ));
    };
    let get = |key: &str| obj.get(key);

    // checklistSintese is the asymmetric one: absent means the full template,
    // not an empty list, so every program carries the synthesis checklist.
    let checklist_sintese = match get("checklistSintese") {
        Some(Value::Array(items)) => items.iter().map(sanitize_checklist_item).collect(),
        _ => templates::initial_checklist_sintese(),
    };

    let cgprog_atividades = match get("cgprogAtividades") {
        Some(Value::Array(items)) => items.iter().map(sanitize_atividade).collect(),
        _ => Vec::new(),
    };

    Ok(Program {
        id: coerce_string(get("id"), MAX_DESCRICAO, ""),
        nome: coerce_string(get("nome"), MAX_DESCRICAO, PROGRAMA_SEM_NOME),
        tipo: coerce_enum(get("tipo"), Tipo::from_wire),
        coordenador: coerce_string(get("coordenador"), MAX_NOME_PESSOA, ""),
        ponto_focal_sgpg: coerce_string(get("pontoFocalSGPG"), MAX_NOME_PESSOA, ""),
        membros_gt: coerce_i64(get("membrosGT")),
        data_gt: sanitize_date(get("dataGT")),
        data_cgprog: sanitize_date(get("dataCGProg")),
        status_gt: coerce_enum(get("statusGT"), StatusGT::from_wire),
        status_cgprog: coerce_enum(get("statusCGProg"), StatusCGProg::from_wire),
        documento_sintese: coerce_enum(get("documentoSintese"), EtapaDocumento::from_wire),
        parecer_tecnico: coerce_enum(get("parecerTecnico"), EtapaDocumento::from_wire),
        carta_compromisso_elaborada: coerce_enum(
            get("cartaCompromissoElaborada"),
            EtapaDocumento::from_wire,
        ),
        carta_compromisso_analisada: coerce_enum(
            get("cartaCompromissoAnalisada"),
            EtapaDocumento::from_wire,
        ),
        validacao_cpa: coerce_bool(get("validacaoCPA")),
        percentual_conclusao: coerce_percent(get("percentualConclusao")),
        percentual_cgprog: coerce_percent(get("percentualCGProg")),
        cgprog_atividades,
        checklist: sanitize_checklist(get("checklist")),
        checklist_cgprog: sanitize_checklist(get("checklistCGProg")),
        checklist_sintese,
        data_ultima_atualizacao: sanitize_date(get("dataUltimaAtualizacao")),
    })
}

/// Sanitize a whole collection: non-object entries are filtered out first,
/// then each record is sanitized with per-item failures logged and dropped.
/// A bad record never aborts the batch.
pub fn sanitize_programs(value: &Value) -> Vec<Program> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| match sanitize_program(v) {
            Ok(program) => Some(program),
            Err(e) => {
                error!("dropping invalid program record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_program_is_an_error() {
        assert!(sanitize_program(&Value::Null).is_err());
        assert!(sanitize_program(&json!("programa")).is_err());
        assert!(sanitize_program(&json!(42)).is_err());
        assert!(sanitize_program(&json!([])).is_err());
    }

    #[test]
    fn test_bogus_enum_maps_to_default_never_errors() {
        let program = sanitize_program(&json!({"id": "1", "statusGT": "bogus"})).unwrap();
        assert_eq!(program.status_gt, StatusGT::NaoNomeado);

        let program = sanitize_program(&json!({"id": "1", "statusGT": 7})).unwrap();
        assert_eq!(program.status_gt, StatusGT::NaoNomeado);

        let program = sanitize_program(&json!({"id": "1", "tipo": "sideways"})).unwrap();
        assert_eq!(program.tipo, Tipo::TopDown);
    }

    #[test]
    fn test_string_fields_truncated_and_defaulted() {
        let long = "x".repeat(600);
        let program = sanitize_program(&json!({"id": "1", "nome": long})).unwrap();
        assert_eq!(program.nome.chars().count(), MAX_DESCRICAO);

        let program = sanitize_program(&json!({"id": "1", "nome": ""})).unwrap();
        assert_eq!(program.nome, PROGRAMA_SEM_NOME);

        let program = sanitize_program(&json!({"id": "1"})).unwrap();
        assert_eq!(program.nome, PROGRAMA_SEM_NOME);
        assert_eq!(program.coordenador, "");
    }

    #[test]
    fn test_percent_clamped() {
        let program =
            sanitize_program(&json!({"id": "1", "percentualConclusao": 250, "percentualCGProg": -3}))
                .unwrap();
        assert_eq!(program.percentual_conclusao, 100);
        assert_eq!(program.percentual_cgprog, 0);

        let program =
            sanitize_program(&json!({"id": "1", "percentualConclusao": "abc"})).unwrap();
        assert_eq!(program.percentual_conclusao, 0);
    }

    #[test]
    fn test_date_shape_check_not_calendar_check() {
        // Shape-valid but calendrically nonsense: accepted as-is.
        let program = sanitize_program(&json!({"id": "1", "dataGT": "2024-13-99xyz"})).unwrap();
        assert_eq!(program.data_gt, "2024-13-99xyz");

        let program = sanitize_program(&json!({"id": "1", "dataGT": "13/99/2024"})).unwrap();
        assert_eq!(program.data_gt, "");

        let program = sanitize_program(&json!({"id": "1", "dataGT": 20240101})).unwrap();
        assert_eq!(program.data_gt, "");
    }

    #[test]
    fn test_null_checklist_item_becomes_placeholder() {
        let item = sanitize_checklist_item(&Value::Null);
        assert_eq!(item.id, 0);
        assert_eq!(item.descricao, ITEM_INVALIDO);
        assert!(!item.concluido);
        assert_eq!(item.prazo_dias, 0);
    }

    #[test]
    fn test_prazo_recomputed_from_dates() {
        let item = sanitize_checklist_item(&json!({
            "id": 1,
            "descricao": "Estudo",
            "dataInicio": "2024-01-01",
            "dataConclusao": "2024-01-11",
            "prazoDias": 999
        }));
        // Never trusted from input.
        assert_eq!(item.prazo_dias, 10);
    }

    #[test]
    fn test_prazo_clamped_when_end_before_start() {
        let item = sanitize_checklist_item(&json!({
            "id": 1,
            "dataInicio": "2024-01-11",
            "dataConclusao": "2024-01-01"
        }));
        assert_eq!(item.prazo_dias, 0);
    }

    #[test]
    fn test_prazo_zero_on_shape_valid_calendar_garbage() {
        let item = sanitize_checklist_item(&json!({
            "id": 1,
            "dataInicio": "2024-13-99",
            "dataConclusao": "2024-13-99"
        }));
        assert_eq!(item.data_inicio, "2024-13-99");
        assert_eq!(item.prazo_dias, 0);
    }

    #[test]
    fn test_checklist_sintese_defaults_to_template() {
        let program = sanitize_program(&json!({"id": "1"})).unwrap();
        assert_eq!(program.checklist, Vec::new());
        assert_eq!(program.checklist_cgprog, Vec::new());
        // Asymmetric on purpose: every program carries the synthesis checklist.
        assert_eq!(program.checklist_sintese, templates::initial_checklist_sintese());

        // An explicitly empty list stays empty.
        let program = sanitize_program(&json!({"id": "1", "checklistSintese": []})).unwrap();
        assert!(program.checklist_sintese.is_empty());
    }

    #[test]
    fn test_batch_drops_non_objects_preserving_order() {
        let batch = json!([
            {"id": "a", "nome": "Primeiro"},
            null,
            {"id": "c", "nome": "Terceiro"}
        ]);
        let programs = sanitize_programs(&batch);
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].id, "a");
        assert_eq!(programs[1].id, "c");
    }

    #[test]
    fn test_batch_of_non_array_is_empty() {
        assert!(sanitize_programs(&json!({"id": "a"})).is_empty());
        assert!(sanitize_programs(&Value::Null).is_empty());
    }

    #[test]
    fn test_sanitization_is_idempotent() {
        let messy = json!({
            "id": 1702000000,
            "nome": "  Programa Leite  ",
            "tipo": "bottom-up",
            "coordenador": 42,
            "statusGT": "em-atividade",
            "documentoSintese": "wat",
            "validacaoCPA": "sim",
            "percentualConclusao": "55.4",
            "membrosGT": "7",
            "checklist": [
                {"id": "1", "descricao": "Estudo", "concluido": 1,
                 "dataInicio": "2024-01-01", "dataConclusao": "2024-01-03"},
                null
            ],
            "cgprogAtividades": [{"id": "a1", "status": "em-andamento", "percentual": 40}]
        });

        let first = sanitize_program(&messy).unwrap();
        let second = sanitize_program(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_checklist_item_coercions() {
        let item = sanitize_checklist_item(&json!({
            "id": "3",
            "descricao": 12,
            "concluido": "yes"
        }));
        assert_eq!(item.id, 3);
        assert_eq!(item.descricao, "12");
        assert!(item.concluido);
    }
}
