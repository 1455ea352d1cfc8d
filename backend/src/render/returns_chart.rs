use super::{escape, histogram, ChartStyle, Frame, Labels};
use crate::services::analysis_service::Analysis;

const VALUE_TICKS: usize = 5;
const COUNT_TICKS: usize = 5;

pub(super) fn render(style: &ChartStyle, analysis: &Analysis, labels: &Labels) -> String {
    let frame = Frame::new(style.returns_width, style.returns_height);
    let returns: Vec<f64> = analysis.indicators.daily_return.defined().collect();
    let hist = histogram(&returns, style.bins);

    let mut svg = frame.open_svg();
    svg.push_str(&frame.title(&labels.returns_title));

    if let (Some(&lo), Some(&hi)) = (hist.edges.first(), hist.edges.last()) {
        let max_count = hist.max_count().max(1) as f64;
        let x_of = |v: f64| frame.left + (v - lo) / (hi - lo) * frame.plot_width();
        let h_of = |count: usize| count as f64 / max_count * frame.plot_height();

        // Count grid
        for i in 0..COUNT_TICKS {
            let fraction = i as f64 / (COUNT_TICKS - 1) as f64;
            let y = frame.bottom - fraction * frame.plot_height();
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n",
                frame.left, frame.right,
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#666\" text-anchor=\"end\">{:.0}</text>\n",
                frame.left - 10.0,
                y + 4.0,
                fraction * max_count,
            ));
        }

        for (i, &count) in hist.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let x0 = x_of(hist.edges[i]);
            let x1 = x_of(hist.edges[i + 1]);
            let h = h_of(count);
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"0.6\" stroke=\"white\" stroke-width=\"0.5\"/>\n",
                x0,
                frame.bottom - h,
                (x1 - x0).max(0.5),
                h,
                escape(&style.histogram_color),
            ));
        }

        for i in 0..VALUE_TICKS {
            let value = lo + (hi - lo) * i as f64 / (VALUE_TICKS - 1) as f64;
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#666\" text-anchor=\"middle\">{:.3}</text>\n",
                x_of(value),
                frame.bottom + 20.0,
                value,
            ));
        }
    }

    svg.push_str(&frame.axes());
    svg.push_str(&frame.x_axis_label(&labels.return_axis));
    svg.push_str(&frame.y_axis_label(&labels.count_axis));
    svg.push_str("</svg>\n");
    svg
}
