//! Axum route handlers for the analysis form and API.

use askama::Template;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::{ACCEPT, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Form, Json,
};
use bytes::Bytes;
use tracing::{error, info, warn};

use crate::analysis::input::{resolve_field, FormInput, UrlEncodedBody, JOB_DESCRIPTION, RESUME};
use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalyzeJsonBody};
use crate::analysis::prompts::build_prompt;
use crate::errors::AppError;
use crate::llm_client::{LlmError, MODEL};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub model: &'static str,
}

#[derive(Template)]
#[template(path = "analysis.html")]
pub struct AnalysisTemplate {
    pub analysis: Option<String>,
    pub error: Option<String>,
}

/// How `/analyze` renders its outcome, picked from the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

impl ResponseFormat {
    /// HTML only when `text/html` is listed explicitly and weighted above JSON.
    /// JSON's weight comes from `application/json`, else `application/*`, else `*/*`.
    /// Ties go to JSON.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let Some(accept) = accept else {
            return ResponseFormat::Json;
        };

        let mut html = None;
        let (mut json, mut application_any, mut any) = (None, None, None);
        for (media_type, quality) in accept.split(',').filter_map(media_range) {
            let slot = match media_type.as_str() {
                "text/html" => &mut html,
                "application/json" => &mut json,
                "application/*" => &mut application_any,
                "*/*" => &mut any,
                _ => continue,
            };
            slot.get_or_insert(quality);
        }

        let html = html.unwrap_or(0.0);
        let json = json.or(application_any).or(any).unwrap_or(0.0);
        if html > 0.0 && html > json {
            ResponseFormat::Html
        } else {
            ResponseFormat::Json
        }
    }

    fn respond(self, outcome: Result<AnalysisResult, AppError>) -> Response {
        match (self, outcome) {
            (ResponseFormat::Json, Ok(result)) => Json(result).into_response(),
            (ResponseFormat::Json, Err(err)) => err.into_response(),
            (ResponseFormat::Html, Ok(result)) => AnalysisTemplate {
                analysis: Some(result.analysis),
                error: None,
            }
            .into_response(),
            (ResponseFormat::Html, Err(err)) => (
                err.status(),
                AnalysisTemplate {
                    analysis: None,
                    error: Some(err.public_message()),
                },
            )
                .into_response(),
        }
    }
}

/// Splits one `Accept` entry into its lowercased media type and `q` weight (default 1).
fn media_range(entry: &str) -> Option<(String, f32)> {
    let mut params = entry.split(';');
    let media_type = params.next()?.trim().to_ascii_lowercase();
    if media_type.is_empty() {
        return None;
    }

    let quality = params
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, value)| value.trim().parse::<f32>().ok())
        .unwrap_or(1.0);

    Some((media_type, quality))
}

/// GET /
pub async fn handle_index() -> IndexTemplate {
    IndexTemplate { model: MODEL }
}

/// POST /analyze
///
/// Accepts multipart (with optional PDF/DOCX uploads), urlencoded, or JSON bodies.
/// Answers in JSON unless the client asked for HTML.
pub async fn handle_analyze(State(state): State<AppState>, request: Request) -> Response {
    let format = ResponseFormat::from_accept(
        request
            .headers()
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok()),
    );

    let outcome = analyze(&state, request).await;
    format.respond(outcome)
}

async fn analyze(state: &AppState, request: Request) -> Result<AnalysisResult, AppError> {
    let form = read_form(request).await;

    let resume = resolve_field(&form, RESUME).await;
    let job_description = resolve_field(&form, JOB_DESCRIPTION).await;
    let analysis_request = AnalysisRequest::new(&resume, &job_description)?;

    let (system_prompt, user_prompt) = build_prompt(
        &analysis_request.resume,
        &analysis_request.job_description,
    );

    let analysis = state
        .llm
        .complete(&system_prompt, &user_prompt)
        .await
        .map_err(|e| {
            match &e {
                LlmError::Api { status, .. } => {
                    error!(status, "Completion provider rejected the request: {e}")
                }
                _ => error!("Completion request failed: {e}"),
            }
            AppError::Llm(e.to_string())
        })?;

    info!(
        resume_chars = analysis_request.resume.len(),
        job_description_chars = analysis_request.job_description.len(),
        analysis_chars = analysis.len(),
        "Analysis completed"
    );

    Ok(AnalysisResult { analysis })
}

/// Collects the submitted fields according to `Content-Type`. Never fails: anything
/// unreadable becomes an empty form.
async fn read_form(request: Request) -> FormInput {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        return match Multipart::from_request(request, &()).await {
            Ok(multipart) => FormInput::from_multipart(multipart).await,
            Err(e) => {
                warn!("Rejected multipart body: {e}");
                FormInput::default()
            }
        };
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        return match Form::<UrlEncodedBody>::from_request(request, &()).await {
            Ok(Form(body)) => FormInput::inline(body.resume, body.job_desc),
            Err(e) => {
                warn!("Rejected form body: {e}");
                FormInput::default()
            }
        };
    }

    // Anything else is read as JSON; a bad body counts as an empty object
    let body = match Bytes::from_request(request, &()).await {
        Ok(bytes) => serde_json::from_slice::<AnalyzeJsonBody>(&bytes).unwrap_or_default(),
        Err(e) => {
            warn!("Failed to read request body: {e}");
            AnalyzeJsonBody::default()
        }
    };
    FormInput::inline(body.resume, body.job_description)
}
