use chrono::NaiveDate;
use serde::Serialize;

pub type Ticker = String;

/// One trading day as delivered by a data source.
/// Only `date` and `close` feed the indicators; the rest is carried along.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<u64>,
}

#[cfg(test)]
impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }
}

/// What the caller asks for: one ticker over `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
}
