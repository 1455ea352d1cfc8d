use std::sync::Arc;

use crate::config::Config;
use crate::data_source::DataSource;
use crate::error::AnalysisError;
use crate::indicators::IndicatorEngine;
use crate::render::{ChartRenderer, ChartStyle};

/// Shared by every request. Nothing in here is mutated after startup, so
/// concurrent analyses never see each other.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn DataSource>,
    pub engine: IndicatorEngine,
    pub renderer: Arc<ChartRenderer>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn DataSource>) -> Result<Self, AnalysisError> {
        let engine = IndicatorEngine::new(config.short_window, config.long_window)?;
        Ok(Self {
            config: Arc::new(config),
            source,
            engine,
            renderer: Arc::new(ChartRenderer::new(ChartStyle::default())),
        })
    }
}
