pub mod analysis;
pub mod charts;

use axum::{http::StatusCode, routing::get, Json, Router};
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{Config, TriggerPolicy};
use crate::error::AnalysisError;
use crate::models::AnalysisRequest;
use crate::render::Language;
use crate::state::AppState;

pub const DEFAULT_TICKER: &str = "AAPL";
const DEFAULT_LOOKBACK_DAYS: i64 = 3 * 365;

/// Raw query parameters. Everything arrives as text so a malformed value
/// gets the same JSON error body as any other failure.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/analysis", get(analysis::get_analysis))
        .route("/charts/trend", get(charts::get_trend_chart))
        .route("/charts/returns", get(charts::get_returns_chart));

    Router::new().nest("/api", api_routes).with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// Parse an optional parameter; blank counts as absent.
fn optional<T: FromStr>(
    name: &str,
    raw: Option<String>,
    language: Language,
) -> Result<Option<T>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| bad_request(language.invalid_param(name, value))),
    }
}

/// Fill in defaults and apply the trigger policy.
/// The ticker is normalized but otherwise passed through untouched, as are the dates.
pub(crate) fn resolve(
    query: AnalysisQuery,
    config: &Config,
    today: NaiveDate,
) -> Result<(AnalysisRequest, Language), ApiError> {
    // An unknown language is reported in the configured one
    let language = optional("lang", query.lang, config.language)?.unwrap_or(config.language);
    let start: Option<NaiveDate> = optional("start", query.start, language)?;
    let end: Option<NaiveDate> = optional("end", query.end, language)?;

    let ticker = query
        .ticker
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty());
    let ticker = match (ticker, config.trigger) {
        (Some(t), _) => t,
        (None, TriggerPolicy::Automatic) => DEFAULT_TICKER.to_string(),
        (None, TriggerPolicy::Manual) => return Err(bad_request(language.prompt().to_string())),
    };

    let end = end.unwrap_or(today);
    let start = start.unwrap_or(today - Duration::days(DEFAULT_LOOKBACK_DAYS));

    Ok((AnalysisRequest { ticker, start, end }, language))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn error_response(language: Language, err: &AnalysisError) -> ApiError {
    let status = match err {
        AnalysisError::EmptyInput { .. } => StatusCode::NOT_FOUND,
        AnalysisError::DataSource(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::InvalidWindow(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: language.error_message(err),
        }),
    )
}
