use chrono::NaiveDate;

use super::{DailyReturn, SMA};
use crate::error::AnalysisError;
use crate::series::TimeSeries;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Values aligned one-to-one with the source series' dates.
/// `None` marks a position that cannot be computed, never a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    points: Vec<SeriesPoint>,
}

impl DerivedSeries {
    fn aligned(dates: &[NaiveDate], values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        let points = dates
            .iter()
            .zip(values)
            .map(|(&date, value)| SeriesPoint { date, value })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    pub short_window: usize,
    pub long_window: usize,
    pub ma_short: DerivedSeries,
    pub ma_long: DerivedSeries,
    pub daily_return: DerivedSeries,
}

/// Stateless transform from a [`TimeSeries`] to its moving averages and
/// daily returns. Windows count bars, so date gaps shorten nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEngine {
    short_window: usize,
    long_window: usize,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl IndicatorEngine {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, AnalysisError> {
        for window in [short_window, long_window] {
            if window == 0 {
                return Err(AnalysisError::InvalidWindow(window));
            }
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn compute(&self, series: &TimeSeries) -> Indicators {
        let dates = series.dates();
        let closes = series.closes();

        let ma_short = SMA::new(self.short_window).calculate(&closes);
        let ma_long = SMA::new(self.long_window).calculate(&closes);
        let daily_return = DailyReturn::calculate(&closes);

        Indicators {
            short_window: self.short_window,
            long_window: self.long_window,
            ma_short: DerivedSeries::aligned(&dates, ma_short),
            ma_long: DerivedSeries::aligned(&dates, ma_long),
            daily_return: DerivedSeries::aligned(&dates, daily_return),
        }
    }
}
