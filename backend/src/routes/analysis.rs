use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::{error_response, resolve, today, AnalysisQuery, ApiError};
use crate::models::PriceBar;
use crate::render::Labels;
use crate::services::analysis_service::run_analysis;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub labels: Labels,
    pub bars: Vec<PriceBar>,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub daily_return: Vec<Option<f64>>,
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let (request, language) = resolve(query, &state.config, today())?;

    let analysis = run_analysis(state.source.as_ref(), &state.engine, &request)
        .await
        .map_err(|e| error_response(language, &e))?;

    let series = &analysis.series;
    let indicators = &analysis.indicators;
    let labels = Labels::new(
        language,
        series.ticker(),
        indicators.short_window,
        indicators.long_window,
    );

    Ok(Json(AnalysisResponse {
        ticker: series.ticker().to_string(),
        start: request.start,
        end: request.end,
        short_window: indicators.short_window,
        long_window: indicators.long_window,
        labels,
        bars: series.bars().to_vec(),
        dates: series.dates(),
        closes: series.closes(),
        ma_short: indicators.ma_short.values(),
        ma_long: indicators.ma_long.values(),
        daily_return: indicators.daily_return.values(),
    }))
}
