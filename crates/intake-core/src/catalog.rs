//! Fixed option catalogs for the closed-answer questions.
//!
//! Each question has its own small code space ("1", "2", ...). Codes are
//! matched verbatim against already-normalized input; there is no fuzzy
//! matching and the tables never change at runtime.

use intake_types::error::ValidationError;

use std::fmt;

/// The questions whose answers come from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    PropertyType,
    Area,
    Service,
    ServiceUrgency,
    ContactConsent,
}

/// One selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// What the user types.
    pub code: &'static str,
    /// Normalized value stored in the record.
    pub value: &'static str,
    /// How the option is shown in the prompt.
    pub display: &'static str,
}

const fn entry(code: &'static str, value: &'static str, display: &'static str) -> CatalogEntry {
    CatalogEntry {
        code,
        value,
        display,
    }
}

const PROPERTY_TYPES: &[CatalogEntry] = &[
    entry("1", "casa", "Casa"),
    entry("2", "departamento", "Departamento"),
    entry("3", "local comercial", "Local Comercial"),
    entry("4", "local industrial", "Local Industrial"),
    entry("5", "otro", "Otro"),
];

const AREAS: &[CatalogEntry] = &[
    entry("1", "0-50 m²", "0-50 m²"),
    entry("2", "51-100 m²", "51-100 m²"),
    entry("3", "101-200 m²", "101-200 m²"),
    entry("4", "más de 200 m²", "Más de 200 m²"),
];

const SERVICES: &[CatalogEntry] = &[
    entry("1", "desinsectación integral", "Desinsectación Integral"),
    entry("2", "fumigación de mercaderías", "Fumigación de mercaderías"),
    entry("3", "control y monitoreo de roedores", "Control y Monitoreo de Roedores"),
    entry("4", "desinfección de ambientes", "Desinfección de ambientes"),
    entry("5", "limpieza de cisterna/reservorios", "Limpieza de Cisterna/Reservorios"),
    entry("6", "limpieza de pozos sépticos", "Limpieza de Pozos Sépticos"),
    entry("7", "mantenimiento de trampas de grasa", "Mantenimiento de Trampas de Grasa"),
    entry("8", "otro servicio", "Otro servicio"),
];

const SERVICE_URGENCIES: &[CatalogEntry] = &[
    entry("1", "preventivo", "Preventivo (mantenimiento regular)"),
    entry("2", "correctivo", "Correctivo (solución a problema existente)"),
];

const CONTACT_OPTIONS: &[CatalogEntry] = &[
    entry("1", "sí, por favor", "Sí, por favor"),
    entry("2", "no, gracias", "No, gracias"),
];

impl QuestionKind {
    /// The options of this question, in display order.
    pub fn entries(self) -> &'static [CatalogEntry] {
        match self {
            QuestionKind::PropertyType => PROPERTY_TYPES,
            QuestionKind::Area => AREAS,
            QuestionKind::Service => SERVICES,
            QuestionKind::ServiceUrgency => SERVICE_URGENCIES,
            QuestionKind::ContactConsent => CONTACT_OPTIONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::PropertyType => "property type",
            QuestionKind::Area => "area",
            QuestionKind::Service => "service",
            QuestionKind::ServiceUrgency => "service urgency",
            QuestionKind::ContactConsent => "contact consent",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the stored value for `code` in the catalog of `question`.
pub fn resolve(question: QuestionKind, code: &str) -> Result<&'static str, ValidationError> {
    question
        .entries()
        .iter()
        .find(|e| e.code == code)
        .map(|e| e.value)
        .ok_or_else(|| ValidationError::UnknownOption {
            question: question.to_string(),
            code: code.to_string(),
        })
}

/// Render the numbered option list shown under a question.
pub fn render_options(question: QuestionKind) -> String {
    question
        .entries()
        .iter()
        .map(|e| format!("{}. {}", e.code, e.display))
        .collect::<Vec<_>>()
        .join("\n")
}
