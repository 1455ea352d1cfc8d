use tracing::{error, info, warn};

use crate::data_source::DataSource;
use crate::error::AnalysisError;
use crate::indicators::{IndicatorEngine, Indicators};
use crate::models::AnalysisRequest;
use crate::series::TimeSeries;

/// Everything one request produces, handed to the chart renderer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: TimeSeries,
    pub indicators: Indicators,
}

/// fetch -> TimeSeries -> indicators. One attempt, no retries.
pub async fn run_analysis(
    source: &dyn DataSource,
    engine: &IndicatorEngine,
    request: &AnalysisRequest,
) -> Result<Analysis, AnalysisError> {
    info!(
        ticker = %request.ticker,
        start = %request.start,
        end = %request.end,
        "Running analysis"
    );

    let bars = source
        .fetch(&request.ticker, request.start, request.end)
        .await
        .map_err(|e| {
            error!(ticker = %request.ticker, "Failed to fetch bars: {}", e);
            e
        })?;

    let series = TimeSeries::new(request.ticker.clone(), bars).map_err(|e| {
        warn!(ticker = %request.ticker, "No bars for requested range");
        e
    })?;

    let indicators = engine.compute(&series);
    info!(
        ticker = %request.ticker,
        bars = series.bars().len(),
        first = %series.first_date(),
        last = %series.last_date(),
        "Analysis complete"
    );

    Ok(Analysis { series, indicators })
}
