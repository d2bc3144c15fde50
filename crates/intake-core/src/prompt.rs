//! User-facing message texts.
//!
//! Closed-set prompts are assembled from the catalogs so the listed options
//! always match what `catalog::resolve` accepts.

use intake_types::conversation::ConversationState;

use crate::catalog::{render_options, QuestionKind};

pub const GREETING: &str = "👋 ¡Buenos días/tardes/noches!\n\nBienvenido/a a Econtrol Saneamiento Ambiental.\n\n¿Podría indicarme su nombre completo?";

pub const ASK_DISTRICT: &str = "📍 ¿En qué distrito se encuentra ubicado/a?";

pub const THANK_YOU: &str =
    "✅ ¡Gracias por su solicitud!\n\nNos pondremos en contacto en el menor tiempo posible.";

pub const RETRY_LATER: &str =
    "⚠️ Hubo un error guardando sus datos. Por favor, inténtelo más tarde.";

fn question_header(question: QuestionKind) -> &'static str {
    match question {
        QuestionKind::PropertyType => "🏡 ¿Qué tipo de local es?",
        QuestionKind::Area => "📐 ¿Cuántos metros cuadrados tiene su inmueble?",
        QuestionKind::Service => "⚙️ ¿Qué servicio necesita?",
        QuestionKind::ServiceUrgency => "⚠️ ¿El servicio es Preventivo o Correctivo?",
        QuestionKind::ContactConsent => "📞 ¿Desea que un asesor le contacte?",
    }
}

/// Full prompt for a closed-set question: header plus numbered options.
pub fn question_prompt(question: QuestionKind) -> String {
    format!("{}\n\n{}", question_header(question), render_options(question))
}

/// The question a session sitting in `state` is waiting on.
///
/// `Start` has no pending question; the greeting is what moves a session
/// into `Name`.
pub fn pending_prompt(state: ConversationState) -> Option<String> {
    match state {
        ConversationState::Start => None,
        ConversationState::Name => Some(GREETING.to_string()),
        ConversationState::District => Some(ASK_DISTRICT.to_string()),
        ConversationState::PropertyType => Some(question_prompt(QuestionKind::PropertyType)),
        ConversationState::Area => Some(question_prompt(QuestionKind::Area)),
        ConversationState::Service => Some(question_prompt(QuestionKind::Service)),
        ConversationState::ServiceType => Some(question_prompt(QuestionKind::ServiceUrgency)),
        ConversationState::Contact => Some(question_prompt(QuestionKind::ContactConsent)),
    }
}
