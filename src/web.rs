//! Web form for the translation pipeline.
//!
//! One page with a source-language select, a textarea and an optional agent
//! trace. The same controller also backs a small JSON API.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app_controller::{CREDENTIALS_HINT, Controller, FAILURE_NOTICE, InputStats};
use crate::errors::AppError;
use crate::language_utils::{LanguagePair, SUPPORTED_LANGUAGES};
use crate::translation::{PipelineResult, PipelineStatus};

const FOOTER: &str = "Three agents work in turn: a translator drafts, a critic checks the draft \
    against a fixed checklist, and a reviewer reflects on the critique and makes the final call.";

/// Fields posted by the HTML form
#[derive(Debug, Deserialize)]
pub struct TranslateForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_language: String,
    /// Present when the trace checkbox is ticked
    pub show_trace: Option<String>,
    /// `swap` flips the direction without translating
    pub action: Option<String>,
}

/// JSON body for `POST /api/translate`
#[derive(Debug, Deserialize)]
pub struct ApiTranslateRequest {
    pub text: String,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub hint: Option<String>,
}

/// Build the router around a shared controller
pub fn build_app(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/translate", post(translate_form))
        .route("/api/translate", post(translate_api))
        .route("/health", get(health))
        .with_state(controller)
}

/// Bind and serve until the process is stopped
pub async fn serve(controller: Arc<Controller>, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind web server to {}", bind_address))?;
    info!("Web form listening on http://{}", bind_address);

    axum::serve(listener, build_app(controller))
        .await
        .context("Web server error")?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn index(State(controller): State<Arc<Controller>>) -> Html<String> {
    let pair = LanguagePair::from_source(&controller.config().source_language).unwrap_or_default();
    Html(render_page(&Page::new(pair)))
}

async fn translate_form(
    State(controller): State<Arc<Controller>>,
    Form(form): Form<TranslateForm>,
) -> impl IntoResponse {
    let mut pair = LanguagePair::from_source(&form.source_language).unwrap_or_default();
    let show_trace = form.show_trace.is_some();

    if form.action.as_deref() == Some("swap") {
        pair = pair.swapped();
        let page = Page {
            text: form.text,
            show_trace,
            ..Page::new(pair)
        };
        return (StatusCode::OK, Html(render_page(&page)));
    }

    let outcome = controller.translate(&form.text, &pair.source, &pair.target).await;
    let (status, outcome) = match outcome {
        Ok(result) => (StatusCode::OK, Outcome::Done(Box::new(result))),
        Err(AppError::Input(e)) => (StatusCode::BAD_REQUEST, Outcome::Warning(e.to_string())),
        Err(e) => {
            warn!("Web form run failed: {}", e);
            (StatusCode::BAD_GATEWAY, Outcome::Failed)
        }
    };

    let page = Page {
        text: form.text,
        show_trace,
        outcome: Some(outcome),
        ..Page::new(pair)
    };
    (status, Html(render_page(&page)))
}

async fn translate_api(
    State(controller): State<Arc<Controller>>,
    payload: Result<Json<ApiTranslateRequest>, JsonRejection>,
) -> Result<Json<PipelineResult>, (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected API request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: rejection.body_text(),
                hint: Some("Send a JSON object with a \"text\" field".to_string()),
            }),
        )
    })?;
    let config = controller.config();
    let source = request.source_language.unwrap_or_else(|| config.source_language.clone());
    let target = request.target_language.unwrap_or_else(|| config.target_language.clone());

    controller
        .translate(&request.text, &source, &target)
        .await
        .map(Json)
        .map_err(|e| match e {
            AppError::Input(input) => (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: input.to_string(),
                    hint: None,
                }),
            ),
            other => (
                StatusCode::BAD_GATEWAY,
                Json(ApiError {
                    error: format!("{}: {}", FAILURE_NOTICE, other),
                    hint: Some(CREDENTIALS_HINT.to_string()),
                }),
            ),
        })
}

enum Outcome {
    Done(Box<PipelineResult>),
    Warning(String),
    Failed,
}

struct Page {
    pair: LanguagePair,
    text: String,
    show_trace: bool,
    outcome: Option<Outcome>,
}

impl Page {
    fn new(pair: LanguagePair) -> Self {
        Self {
            pair,
            text: String::new(),
            show_trace: false,
            outcome: None,
        }
    }
}

/// Escape text for inclusion in HTML content and attribute values
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_page(page: &Page) -> String {
    let stats = InputStats::of(&page.text);
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Reflective Translator</title>\n</head>\n<body>\n<h1>Reflective Translator</h1>\n",
    );
    html.push_str("<form method=\"post\" action=\"/translate\">\n");

    html.push_str("<label for=\"source_language\">From</label>\n<select id=\"source_language\" name=\"source_language\">\n");
    for lang in SUPPORTED_LANGUAGES {
        let selected = if lang == page.pair.source { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{0}\"{1}>{0}</option>", lang, selected);
    }
    html.push_str("</select>\n");
    let _ = writeln!(html, "<span>To <strong>{}</strong></span>", html_escape(&page.pair.target));
    html.push_str("<button type=\"submit\" name=\"action\" value=\"swap\">Swap</button>\n");

    let _ = writeln!(
        html,
        "<textarea name=\"text\" rows=\"8\" cols=\"80\">{}</textarea>",
        html_escape(&page.text)
    );
    let _ = writeln!(
        html,
        "<p class=\"stats\">Characters: {} | Words: {}</p>",
        stats.characters, stats.words
    );
    let checked = if page.show_trace { " checked" } else { "" };
    let _ = writeln!(
        html,
        "<label><input type=\"checkbox\" name=\"show_trace\" value=\"on\"{}> Show agent trace</label>",
        checked
    );
    html.push_str("<button type=\"submit\" name=\"action\" value=\"translate\">Translate</button>\n</form>\n");

    match &page.outcome {
        Some(Outcome::Done(result)) => render_result(&mut html, result, page.show_trace),
        Some(Outcome::Warning(message)) => {
            let _ = writeln!(html, "<p class=\"warning\">{}</p>", html_escape(message));
        }
        Some(Outcome::Failed) => {
            let _ = writeln!(
                html,
                "<p class=\"error\">{}</p>\n<p class=\"hint\">{}</p>",
                FAILURE_NOTICE, CREDENTIALS_HINT
            );
        }
        None => {}
    }

    let _ = writeln!(html, "<footer>{}</footer>\n</body>\n</html>", FOOTER);
    html
}

fn render_result(html: &mut String, result: &PipelineResult, show_trace: bool) {
    let banner = match result.status {
        PipelineStatus::Accepted => "<p class=\"status accepted\">Accepted: the reviewer kept the draft.</p>",
        PipelineStatus::Revised => "<p class=\"status revised\">Revised: the reviewer improved the draft.</p>",
    };
    html.push_str("<section class=\"result\">\n<h2>Translation</h2>\n");
    let _ = writeln!(html, "<div class=\"translation\">{}</div>", html_escape(result.final_translation()));
    html.push_str(banner);
    html.push('\n');
    let _ = writeln!(
        html,
        "<p class=\"meta\">{} ms | {}</p>",
        result.duration_ms,
        html_escape(&result.usage.summary())
    );

    if show_trace {
        html.push_str("<details open>\n<summary>Agent trace</summary>\n<h3>Draft</h3>\n");
        let _ = writeln!(html, "<pre>{}</pre>", html_escape(&result.draft));

        html.push_str("<h3>Feedback</h3>\n<ul>\n");
        for (label, passed) in result.feedback.report.checks.labelled() {
            let mark = if passed { "pass" } else { "fail" };
            let _ = writeln!(html, "<li>{}: {}</li>", label, mark);
        }
        html.push_str("</ul>\n");
        let _ = writeln!(
            html,
            "<p>{} ({})</p>",
            html_escape(&result.feedback.report.feedback),
            result.feedback.report.decision
        );

        html.push_str("<h3>Review</h3>\n");
        let _ = writeln!(
            html,
            "<p>{} ({})</p>\n</details>",
            html_escape(&result.verdict.feedback),
            result.verdict.decision
        );
    }
    html.push_str("</section>\n");
}
