use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::{error_response, resolve, today, AnalysisQuery, ApiError};
use crate::render::{Labels, SVG_CONTENT_TYPE};
use crate::services::analysis_service::{run_analysis, Analysis};
use crate::state::AppState;

#[derive(Clone, Copy)]
enum ChartKind {
    Trend,
    Returns,
}

pub async fn get_trend_chart(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Response, ApiError> {
    chart(state, query, ChartKind::Trend).await
}

pub async fn get_returns_chart(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Response, ApiError> {
    chart(state, query, ChartKind::Returns).await
}

async fn chart(state: AppState, query: AnalysisQuery, kind: ChartKind) -> Result<Response, ApiError> {
    let (request, language) = resolve(query, &state.config, today())?;

    let analysis: Analysis = run_analysis(state.source.as_ref(), &state.engine, &request)
        .await
        .map_err(|e| error_response(language, &e))?;

    let labels = Labels::new(
        language,
        analysis.series.ticker(),
        analysis.indicators.short_window,
        analysis.indicators.long_window,
    );
    let svg = match kind {
        ChartKind::Trend => state.renderer.trend_svg(&analysis, &labels),
        ChartKind::Returns => state.renderer.returns_svg(&analysis, &labels),
    };

    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}
