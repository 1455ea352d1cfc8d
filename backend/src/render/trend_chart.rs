use chrono::NaiveDate;

use super::{escape, ChartStyle, Frame, Labels};
use crate::services::analysis_service::Analysis;

const PRICE_GRID_LINES: usize = 5;
const DATE_TICKS: usize = 6;

pub(super) fn render(style: &ChartStyle, analysis: &Analysis, labels: &Labels) -> String {
    let frame = Frame::new(style.trend_width, style.trend_height);
    let series = &analysis.series;
    let indicators = &analysis.indicators;

    let dates = series.dates();
    let closes: Vec<(NaiveDate, Option<f64>)> = series
        .bars()
        .iter()
        .map(|b| (b.date, Some(b.close)))
        .collect();
    let ma_short: Vec<(NaiveDate, Option<f64>)> = indicators
        .ma_short
        .points()
        .iter()
        .map(|p| (p.date, p.value))
        .collect();
    let ma_long: Vec<(NaiveDate, Option<f64>)> = indicators
        .ma_long
        .points()
        .iter()
        .map(|p| (p.date, p.value))
        .collect();

    // Scale on everything that will be drawn
    let (mut min_price, mut max_price) = closes
        .iter()
        .chain(&ma_short)
        .chain(&ma_long)
        .filter_map(|(_, v)| v.as_ref())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if (max_price - min_price).abs() < 0.01 {
        min_price -= 0.5;
        max_price += 0.5;
    }
    let price_range = max_price - min_price;

    let first = series.first_date();
    let span_days = (series.last_date() - first).num_days();
    let x_of = |date: NaiveDate| {
        if span_days == 0 {
            frame.left + frame.plot_width() / 2.0
        } else {
            let t = (date - first).num_days() as f64 / span_days as f64;
            frame.left + t * frame.plot_width()
        }
    };
    let y_of = |price: f64| frame.bottom - ((price - min_price) / price_range) * frame.plot_height();

    let mut svg = frame.open_svg();
    svg.push_str(&frame.title(&labels.trend_title));

    // Horizontal grid lines with price labels
    for i in 0..PRICE_GRID_LINES {
        let fraction = i as f64 / (PRICE_GRID_LINES - 1) as f64;
        let y = frame.top + fraction * frame.plot_height();
        let price = max_price - fraction * price_range;
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n",
            frame.left, frame.right,
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#666\" text-anchor=\"end\">{:.2}</text>\n",
            frame.left - 10.0,
            y + 4.0,
            price,
        ));
    }

    // Vertical grid lines at evenly spaced bars
    for idx in tick_indices(dates.len(), DATE_TICKS) {
        let x = x_of(dates[idx]);
        svg.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n",
            frame.top, frame.bottom,
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#666\" text-anchor=\"middle\">{}</text>\n",
            frame.bottom + 20.0,
            dates[idx].format("%Y-%m-%d"),
        ));
    }

    svg.push_str(&frame.axes());
    svg.push_str(&frame.y_axis_label(&labels.price_axis));

    let lines = [
        (&closes, &style.close_color, None, "0.8"),
        (&ma_short, &style.ma_short_color, Some("8 5"), "1"),
        (&ma_long, &style.ma_long_color, Some("8 5"), "1"),
    ];
    for (values, color, dash, opacity) in lines {
        let points = values.iter().map(|&(d, v)| (x_of(d), v.map(y_of)));
        let path = line_path(points);
        if path.is_empty() {
            continue;
        }
        let dash_attr = dash
            .map(|d| format!(" stroke-dasharray=\"{}\"", d))
            .unwrap_or_default();
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-opacity=\"{}\"{}/>\n",
            path,
            escape(color),
            opacity,
            dash_attr,
        ));
    }

    svg.push_str(&legend(&frame, style, labels));
    svg.push_str("</svg>\n");
    svg
}

/// SVG path data. An undefined value lifts the pen, so warmup periods and
/// anomalies show as gaps rather than drops to zero.
fn line_path(points: impl IntoIterator<Item = (f64, Option<f64>)>) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (x, y) in points {
        match y {
            Some(y) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!("{} {:.2} {:.2}", cmd, x, y));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path
}

fn tick_indices(len: usize, ticks: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    if len <= ticks {
        return (0..len).collect();
    }
    let mut indices: Vec<usize> = (0..ticks).map(|i| i * (len - 1) / (ticks - 1)).collect();
    indices.dedup();
    indices
}

fn legend(frame: &Frame, style: &ChartStyle, labels: &Labels) -> String {
    let x = frame.left + 15.0;
    let y = frame.top + 10.0;
    let entries = [
        (&labels.close, &style.close_color, None),
        (&labels.ma_short, &style.ma_short_color, Some("8 5")),
        (&labels.ma_long, &style.ma_long_color, Some("8 5")),
    ];

    let mut out = format!(
        "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"260\" height=\"{:.1}\" fill=\"white\" fill-opacity=\"0.85\" stroke=\"#ccc\"/>\n",
        entries.len() as f64 * 22.0 + 10.0,
    );
    for (i, (label, color, dash)) in entries.iter().enumerate() {
        let row = y + 18.0 + i as f64 * 22.0;
        let dash_attr = dash
            .map(|d| format!(" stroke-dasharray=\"{}\"", d))
            .unwrap_or_default();
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"{}/>\n",
            x + 10.0,
            row - 4.0,
            x + 40.0,
            row - 4.0,
            escape(color),
            dash_attr,
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{row:.1}\" font-size=\"13\">{}</text>\n",
            x + 50.0,
            escape(label),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorEngine;
    use crate::models::PriceBar;
    use crate::render::Language;
    use crate::series::TimeSeries;
    use chrono::Duration;

    fn analysis(closes: &[f64], short: usize, long: usize) -> Analysis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Duration::days(i as i64), c))
            .collect();
        let series = TimeSeries::new("AAPL", bars).unwrap();
        let indicators = IndicatorEngine::new(short, long).unwrap().compute(&series);
        Analysis { series, indicators }
    }

    #[test]
    fn test_line_path_breaks_on_undefined() {
        let path = line_path(vec![
            (0.0, None),
            (1.0, Some(5.0)),
            (2.0, Some(6.0)),
            (3.0, None),
            (4.0, Some(7.0)),
        ]);
        assert_eq!(path, "M 1.00 5.00 L 2.00 6.00 M 4.00 7.00");
    }

    #[test]
    fn test_line_path_all_undefined() {
        assert!(line_path(vec![(0.0, None), (1.0, None)]).is_empty());
    }

    #[test]
    fn test_tick_indices() {
        assert_eq!(tick_indices(0, 6), Vec::<usize>::new());
        assert_eq!(tick_indices(3, 6), vec![0, 1, 2]);
        assert_eq!(tick_indices(11, 6), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_trend_chart_draws_defined_lines() {
        let a = analysis(&[10.0, 20.0, 15.0, 30.0, 25.0], 3, 200);
        let labels = Labels::new(Language::En, "AAPL", 3, 200);
        let svg = render(&ChartStyle::default(), &a, &labels);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("AAPL Price Trend"));
        assert!(svg.contains("3-Day Moving Average"));
        // close and the short MA are drawn, the 200-bar MA has no points
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_trend_chart_single_bar() {
        let a = analysis(&[42.0], 50, 200);
        let labels = Labels::new(Language::Es, "AAPL", 50, 200);
        let svg = render(&ChartStyle::default(), &a, &labels);

        assert!(svg.contains("Tendencia del Precio de AAPL"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_ticker_is_escaped() {
        let a = analysis(&[1.0, 2.0], 1, 2);
        let labels = Labels::new(Language::En, "<script>", 1, 2);
        let svg = render(&ChartStyle::default(), &a, &labels);

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt; Price Trend"));
    }
}
