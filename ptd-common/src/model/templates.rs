//! Fixed checklist templates.
//!
//! Every program carries these three checklists; a new program gets all of
//! them instantiated with items numbered from 1 and nothing completed.

use crate::model::ChecklistItem;

/// GT (working group) checklist template.
pub const CHECKLIST_GT: [&str; 14] = [
    "Estudo GT prévio",
    "Estudo da programação de PD&I",
    "Alinhamento com coordenador do GT",
    "Alinhamento com GT",
    "Indicação de projetos (GT)",
    "Indicação de ativos (GT)",
    "Consulta à GIPDI/SIPDI sobre dados necessários dos projetos",
    "Consulta à GGPJ/SQA sobre dados necessários dos ativos",
    "Elaboração e alimentação da base de dados do programa (GT)",
    "Elaboração do Relatório do Programa (Looker Studio)",
    "Elaboração do Documento Síntese do Programa (GT)",
    "Parecer acerca do Documento Síntese (GGPP)",
    "Parecer acerca da implementação do Programa de PD&I (CPA)",
    "Nomeação do CGPROG (DEPD)",
];

/// CGProg (steering committee) checklist template.
pub const CHECKLIST_CGPROG: [&str; 10] = [
    "Definição das Linhas Temáticas",
    "Alinhamento de Conteúdo (Projetos/LT)",
    "Indicação do Objetivo Geral",
    "Desdobramento em Metas",
    "Proposição de Ações (Eixos Analíticos)",
    "Detalhamento das Ações (Recursos/Responsáveis)",
    "Redação da Carta de Compromisso",
    "Inclusão e Assinatura no SEI",
    "Emissão de Parecer Consultivo (GGPD/GGPP)",
    "Deliberação do CPA",
];

/// Synthesis-document section checklist template.
pub const CHECKLIST_SINTESE: [&str; 11] = [
    "1. Título do Programa (Claro, objetivo e breve; Palavras-chave relevantes)",
    "2. Propósito do Programa (preliminar) (Razão da existência; Missão ou motivação fundamental; Impacto se desejado; A ser reafirmado ou refinado)",
    "3. Estado da arte (técnico-científico) (Panorama atual; Avanços tecnológicos; Tendências; Gaps de pesquisa)",
    "4. Importância socioeconômica do tema (Abrangência geográfica; Produtores envolvidos; Representantes das partes interessadas; Importância do tema para o público-alvo)",
    "5. Capacidade da Embrapa no desenvolvimento do Programa (Projetos; Tecnologias; Equipes, parceiros e recursos financeiros)",
    "6. Contribuição da Embrapa para o desenvolvimento da cadeia produtiva ou do tema (Soluções de inovação; Tecnologias; Resultados)",
    "7. Aspectos regulatórios (Legislação relacionada ao tema)",
    "8. Desafios e Oportunidades (Análise SWOT/FOFA) (Pontos fortes; Pontos fracos; Ameaças; Oportunidades)",
    "9. Linhas Temáticas (Estratégias para superação de fraquezas e ameaças e aproveitamento de oportunidades)",
    "10. Propósito consolidado (Reafirmação/refinamento do propósito inicial)",
    "11. Indicação do CGProg (Coordenador; Membros)",
];

fn instantiate(descriptions: &[&str]) -> Vec<ChecklistItem> {
    descriptions
        .iter()
        .enumerate()
        .map(|(index, descricao)| ChecklistItem {
            id: index as i64 + 1,
            descricao: (*descricao).to_string(),
            concluido: false,
            data_inicio: String::new(),
            data_conclusao: String::new(),
            prazo_dias: 0,
        })
        .collect()
}

pub fn initial_checklist() -> Vec<ChecklistItem> {
    instantiate(&CHECKLIST_GT)
}

pub fn initial_checklist_cgprog() -> Vec<ChecklistItem> {
    instantiate(&CHECKLIST_CGPROG)
}

pub fn initial_checklist_sintese() -> Vec<ChecklistItem> {
    instantiate(&CHECKLIST_SINTESE)
}
