use chrono::NaiveDate;

use crate::error::AnalysisError;
use crate::models::PriceBar;

/// Date-ordered daily bars for one ticker.
///
/// The data source is trusted to deliver bars sorted ascending with unique
/// dates; missing trading days are simply absent, never synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl TimeSeries {
    /// Fails with [`AnalysisError::EmptyInput`] when there is nothing to analyze,
    /// which is what an unknown ticker or a range without trading days produces.
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, AnalysisError> {
        let ticker = ticker.into();
        if bars.is_empty() {
            return Err(AnalysisError::EmptyInput { ticker });
        }
        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_empty_bars_rejected() {
        let err = TimeSeries::new("ZZZZ", Vec::new()).unwrap_err();
        match err {
            AnalysisError::EmptyInput { ticker } => assert_eq!(ticker, "ZZZZ"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_bar_is_valid() {
        let series = TimeSeries::new("AAPL", vec![PriceBar::new(day(1), 170.0)]).unwrap();
        assert_eq!(series.bars().len(), 1);
        assert_eq!(series.first_date(), series.last_date());
    }

    #[test]
    fn test_accessors_keep_order() {
        // Weekend gap between the 1st and the 4th stays a gap
        let bars = vec![
            PriceBar::new(day(1), 10.0),
            PriceBar::new(day(4), 11.0),
            PriceBar::new(day(5), 12.5),
        ];
        let series = TimeSeries::new("MSFT", bars).unwrap();

        assert_eq!(series.ticker(), "MSFT");
        assert_eq!(series.dates(), vec![day(1), day(4), day(5)]);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.5]);
        assert_eq!(series.first_date(), day(1));
        assert_eq!(series.last_date(), day(5));
    }
}
