use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::DataSource;
use crate::error::DataSourceError;
use crate::models::PriceBar;

// Yahoo reports unknown symbols with this code; treat it as "no bars"
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Daily bars from Yahoo Finance's chart endpoint, adjusted for splits and
/// dividends.
pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooFinanceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataSourceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DataSourceError::Request(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DataSourceError::Request(format!(
                "Invalid base URL {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("stock-trends/0.1")
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The ticker is a single path segment, percent-encoded.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut()
            .append_pair("period1", &midnight_utc(start).to_string())
            .append_pair("period2", &midnight_utc(end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "div,split");
        url
    }
}

#[async_trait]
impl DataSource for YahooFinanceClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataSourceError> {
        let url = self.chart_url(ticker, start, end);
        debug!(%url, "requesting chart");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error payloads come with 4xx statuses but still carry a chart body
        match parse_chart(&body) {
            Ok(bars) => Ok(bars),
            Err(DataSourceError::Parse(_)) if !status.is_success() => Err(
                DataSourceError::Request(format!("{} returned {}", url, status)),
            ),
            Err(e) => Err(e),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Turn a chart response body into sorted, date-unique bars.
fn parse_chart(body: &str) -> Result<Vec<PriceBar>, DataSourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| DataSourceError::Parse(format!("Failed to parse chart: {}", e)))?;

    if let Some(err) = envelope.chart.error {
        if err.code == NOT_FOUND_CODE {
            return Ok(Vec::new());
        }
        let description = err.description.unwrap_or_default();
        return Err(DataSourceError::Provider(format!("{}: {}", err.code, description)));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let at = |values: &Vec<Option<f64>>, i: usize| values.get(i).copied().flatten();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(raw_close) = at(&quote.close, i) else {
            continue;
        };
        let close = at(&adjclose, i).unwrap_or(raw_close);
        let ratio = if raw_close != 0.0 { close / raw_close } else { 1.0 };

        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| DataSourceError::Parse(format!("Invalid timestamp {}", ts)))?
            .date_naive();

        bars.push(PriceBar {
            date,
            close,
            open: at(&quote.open, i).map(|v| v * ratio),
            high: at(&quote.high, i).map(|v| v * ratio),
            low: at(&quote.low, i).map(|v| v * ratio),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    // Sort by date (ascending); a repeated date keeps the later bar
    bars.sort_by_key(|b| b.date);
    let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match unique.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => unique.push(bar),
        }
    }

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-02 and 2024-01-03 at 09:30 New York (UTC-5)
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "AAPL", "gmtoffset": -18000 },
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open":   [187.15, 184.22, null],
                        "high":   [188.44, 185.88, null],
                        "low":    [183.89, 183.43, null],
                        "close":  [185.64, 184.25, null],
                        "volume": [82488700, 58414500, null]
                    }],
                    "adjclose": [{ "adjclose": [184.29, 182.91, null] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_uses_adjusted_close() {
        let bars = parse_chart(BODY).unwrap();

        assert_eq!(bars.len(), 2, "null row is skipped");
        assert_eq!(bars[0].date, date(2024, 1, 2));
        assert_eq!(bars[1].date, date(2024, 1, 3));
        assert_eq!(bars[0].close, 184.29);
        assert_eq!(bars[0].volume, Some(82488700));

        let ratio = 184.29 / 185.64;
        let open = bars[0].open.unwrap();
        assert!((open - 187.15 * ratio).abs() < 1e-9);
    }

    #[test]
    fn test_parse_falls_back_to_raw_close() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704153600],
            "indicators":{"quote":[{"close":[10.5]}]}}],"error":null}}"#;
        let bars = parse_chart(body).unwrap();

        assert_eq!(bars, vec![PriceBar::new(date(2024, 1, 2), 10.5)]);
    }

    #[test]
    fn test_gmtoffset_moves_the_trading_date() {
        // 2024-01-03 02:00 UTC is still 2024-01-02 in New York
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},
            "timestamp":[1704247200],
            "indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#;
        let bars = parse_chart(body).unwrap();

        assert_eq!(bars[0].date, date(2024, 1, 2));
    }

    #[test]
    fn test_parse_sorts_and_dedups() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704240000, 1704153600, 1704243600],
            "indicators":{"quote":[{"close":[2.0, 1.0, 3.0]}]}}],"error":null}}"#;
        let bars = parse_chart(body).unwrap();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 3.0]);
        assert_eq!(bars[1].date, date(2024, 1, 3));
    }

    #[test]
    fn test_empty_range_has_no_bars() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "indicators":{"quote":[{}],"adjclose":[{}]}}],"error":null}}"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_symbol_has_no_bars() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn test_provider_error_keeps_message() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request",
            "description":"Invalid input - start date cannot be after end date"}}}"#;
        let err = parse_chart(body).unwrap_err();

        match err {
            DataSourceError::Provider(msg) => {
                assert!(msg.contains("start date cannot be after end date"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_chart("<html>rate limited</html>"),
            Err(DataSourceError::Parse(_))
        ));
    }

    #[test]
    fn test_chart_url() {
        let client =
            YahooFinanceClient::new("https://example.test/", Duration::from_secs(1)).unwrap();
        let url = client.chart_url("AAPL", date(2024, 1, 1), date(2024, 2, 1));

        assert_eq!(
            url.as_str(),
            "https://example.test/v8/finance/chart/AAPL?period1=1704067200&period2=1706745600&interval=1d&events=div%2Csplit"
        );
    }

    #[test]
    fn test_chart_url_encodes_ticker() {
        let client =
            YahooFinanceClient::new("https://example.test", Duration::from_secs(1)).unwrap();
        let url = client.chart_url("BRK/B?x#y", date(2024, 1, 1), date(2024, 2, 1));

        assert_eq!(url.path(), "/v8/finance/chart/BRK%2FB%3Fx%23y");
        assert_eq!(url.fragment(), None);
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["period1", "period2", "interval", "events"]);
    }

    #[test]
    fn test_chart_url_keeps_base_path() {
        let client =
            YahooFinanceClient::new("http://localhost:8080/yahoo/", Duration::from_secs(1))
                .unwrap();
        let url = client.chart_url("MSFT", date(2024, 1, 1), date(2024, 2, 1));

        assert_eq!(url.path(), "/yahoo/v8/finance/chart/MSFT");
    }

    #[test]
    fn test_bad_base_url_rejected() {
        assert!(matches!(
            YahooFinanceClient::new("not a url", Duration::from_secs(1)),
            Err(DataSourceError::Request(_))
        ));
    }
}
