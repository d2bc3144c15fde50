//! Operator monitor page.
//!
//! Server-rendered HTML listing every transcript, refreshed by the browser
//! every 10 seconds, with one reply form per user.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;

use intake_types::transcript::{Direction, TranscriptEntry};

use crate::http::error::AppError;
use crate::http::handlers::conversation::SendRequest;
use crate::state::AppState;

const REFRESH_SECS: u32 = 10;

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; background: #000; color: #fff; padding: 20px; }
.chat { display: flex; flex-direction: column; max-width: 600px; margin-bottom: 30px; }
.chat-header { font-weight: bold; margin-top: 20px; }
.row { clear: both; }
.bubble { border-radius: 10px; padding: 10px; max-width: 80%; margin: 5px 0; clear: both; white-space: pre-wrap; }
.client { background: #373A3C; float: left; }
.bot { background: #25D366; float: right; }
.timestamp { font-size: 0.7em; color: gray; margin-left: 10px; }
.reply { margin-top: 10px; display: flex; gap: 10px; clear: both; }
.reply input[type=text] { padding: 10px; width: 100%; max-width: 400px; }
.reply button { padding: 10px 15px; background: #25D366; color: #fff; border: none; border-radius: 5px; cursor: pointer; }
"#;

/// GET /monitor - Render all conversations.
pub async fn monitor_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let conversations = state.service.list_conversations().await?;
    Ok(Html(render_page(&conversations)))
}

/// POST /monitor/send - Reply form target; redirects back to the page.
///
/// A failed delivery is logged and simply does not show up in the transcript.
pub async fn monitor_send(
    State(state): State<AppState>,
    Form(request): Form<SendRequest>,
) -> Result<Redirect, AppError> {
    let (to, message) = request.validate()?;
    if let Err(e) = state.service.send_manual(&to, &message).await {
        tracing::warn!(user_id = %to, error = %e, "manual send from monitor failed");
    }
    Ok(Redirect::to("/monitor"))
}

pub fn render_page(conversations: &BTreeMap<String, Vec<TranscriptEntry>>) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"{REFRESH_SECS}\">\n\
         <title>Monitor de Conversaciones</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h2>Monitor de Conversaciones</h2>\n"
    );

    if conversations.is_empty() {
        html.push_str("<p>Sin conversaciones todavía.</p>\n");
    }

    for (user_id, entries) in conversations {
        let user = escape_html(user_id);
        let _ = write!(
            html,
            "<div class=\"chat\">\n<div class=\"chat-header\">Cliente: {user}</div>\n"
        );
        for entry in entries {
            let class = match entry.direction {
                Direction::Inbound => "client",
                Direction::Outbound => "bot",
            };
            let time = entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S");
            let _ = write!(
                html,
                "<div class=\"row\"><div class=\"bubble {class}\">{}</div>\
                 <small class=\"timestamp\">{time}</small></div>\n",
                escape_html(&entry.text)
            );
        }
        let _ = write!(
            html,
            "<form class=\"reply\" action=\"/monitor/send\" method=\"POST\">\n\
             <input type=\"hidden\" name=\"to\" value=\"{user}\">\n\
             <input type=\"text\" name=\"message\" placeholder=\"Escribe tu mensaje...\">\n\
             <button type=\"submit\">Enviar</button>\n</form>\n</div>\n"
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
