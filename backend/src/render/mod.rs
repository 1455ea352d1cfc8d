//! SVG rendering of an [`Analysis`]: the price trend with its moving averages
//! and the distribution of daily returns.
//!
//! Everything here is presentation. Colors, sizes and labels are passed in;
//! nothing in this module feeds back into the computed series.

pub mod histogram;
pub mod labels;
mod returns_chart;
mod trend_chart;

use crate::services::analysis_service::Analysis;

pub use histogram::histogram;
pub use labels::{Labels, Language};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub trend_width: f64,
    pub trend_height: f64,
    pub returns_width: f64,
    pub returns_height: f64,
    pub close_color: String,
    pub ma_short_color: String,
    pub ma_long_color: String,
    pub histogram_color: String,
    pub bins: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            trend_width: 1200.0,
            trend_height: 600.0,
            returns_width: 900.0,
            returns_height: 450.0,
            close_color: "#1f77b4".to_string(),
            ma_short_color: "#ff7f0e".to_string(),
            ma_long_color: "#2ca02c".to_string(),
            histogram_color: "purple".to_string(),
            bins: 50,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Close price plus both moving averages.
    pub fn trend_svg(&self, analysis: &Analysis, labels: &Labels) -> String {
        trend_chart::render(&self.style, analysis, labels)
    }

    /// Histogram of the defined daily returns.
    pub fn returns_svg(&self, analysis: &Analysis, labels: &Labels) -> String {
        returns_chart::render(&self.style, analysis, labels)
    }
}

/// Margins around the plotting area, shared by both charts.
#[derive(Debug, Clone, Copy)]
struct Frame {
    width: f64,
    height: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            left: 90.0,
            right: width - 40.0,
            top: 60.0,
            bottom: height - 70.0,
        }
    }

    fn plot_width(&self) -> f64 {
        self.right - self.left
    }

    fn plot_height(&self) -> f64 {
        self.bottom - self.top
    }

    fn open_svg(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n<rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n",
            w = self.width,
            h = self.height,
        )
    }

    fn title(&self, text: &str) -> String {
        format!(
            "<text x=\"{:.1}\" y=\"32\" font-size=\"20\" text-anchor=\"middle\">{}</text>\n",
            self.width / 2.0,
            escape(text),
        )
    }

    fn x_axis_label(&self, text: &str) -> String {
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
            self.left + self.plot_width() / 2.0,
            self.height - 18.0,
            escape(text),
        )
    }

    fn y_axis_label(&self, text: &str) -> String {
        let y = self.top + self.plot_height() / 2.0;
        format!(
            "<text x=\"22\" y=\"{y:.1}\" font-size=\"14\" text-anchor=\"middle\" transform=\"rotate(-90 22 {y:.1})\">{}</text>\n",
            escape(text),
        )
    }

    fn axes(&self) -> String {
        format!(
            "<line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#333\" stroke-width=\"1\"/>\n<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#333\" stroke-width=\"1\"/>\n",
            l = self.left,
            r = self.right,
            t = self.top,
            b = self.bottom,
        )
    }
}

/// Tickers and labels arrive from user input.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("A&B <x> \"q\""), "A&amp;B &lt;x&gt; &quot;q&quot;");
        assert_eq!(escape("Media Móvil"), "Media Móvil");
    }

    #[test]
    fn test_frame_bounds() {
        let frame = Frame::new(900.0, 450.0);
        assert!(frame.plot_width() > 0.0);
        assert!(frame.plot_height() > 0.0);
        assert!(frame.open_svg().starts_with("<svg"));
    }
}
