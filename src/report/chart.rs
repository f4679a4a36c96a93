//! Bar charts of feature importance with error bars

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pipeline::ImportanceRanking;

/// Anything that can draw a labelled bar chart with symmetric error bars
pub trait ChartRenderer {
    fn render_bar_chart(&mut self, labels: &[String], values: &[f64], error_bars: &[f64])
        -> Result<()>;
}

/// Chart series for a ranking: labels are rank positions, values and error
/// bars follow rank order.
pub fn chart_series(ranking: &ImportanceRanking) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let labels = ranking.features.iter().map(|f| f.rank.to_string()).collect();
    let values = ranking.features.iter().map(|f| f.importance).collect();
    let errors = ranking.features.iter().map(|f| f.std).collect();
    (labels, values, errors)
}

/// Draw `ranking` with `renderer`
pub fn render_ranking<C: ChartRenderer + ?Sized>(
    renderer: &mut C,
    ranking: &ImportanceRanking,
) -> Result<()> {
    let (labels, values, errors) = chart_series(ranking);
    renderer.render_bar_chart(&labels, &values, &errors)
}

fn check_series(labels: &[String], values: &[f64], error_bars: &[f64]) -> Result<()> {
    if labels.len() != values.len() || values.len() != error_bars.len() {
        anyhow::bail!(
            "Chart series lengths differ: {} labels, {} values, {} error bars",
            labels.len(),
            values.len(),
            error_bars.len()
        );
    }
    if let Some(v) = values
        .iter()
        .chain(error_bars)
        .find(|v| !v.is_finite() || **v < 0.0)
    {
        anyhow::bail!("Chart values must be finite and non-negative, got {}", v);
    }
    Ok(())
}

/// Largest bar end including its error bar, 1.0 for an all-zero series
fn scale_max(values: &[f64], error_bars: &[f64]) -> f64 {
    let max = values
        .iter()
        .zip(error_bars)
        .map(|(v, e)| v + e)
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Horizontal unicode bars written to any `Write`
pub struct TextBarChart<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> TextBarChart<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 40 }
    }

    /// Width in characters of the longest bar
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TextBarChart<W> {
    fn render_bar_chart(
        &mut self,
        labels: &[String],
        values: &[f64],
        error_bars: &[f64],
    ) -> Result<()> {
        check_series(labels, values, error_bars)?;

        let max = scale_max(values, error_bars);
        let width = self.width;
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let cells = |x: f64| ((x / max) * width as f64).round() as usize;

        for ((label, &value), &err) in labels.iter().zip(values).zip(error_bars) {
            let bar = cells(value);
            let whisker = cells(value + err).saturating_sub(bar);
            let tail = if whisker > 0 {
                format!("{}┤", "─".repeat(whisker - 1))
            } else {
                String::new()
            };
            let pad = width.saturating_sub(bar + whisker);

            writeln!(
                self.out,
                "    {:>lw$} │{}{}{} {:.3} ± {:.3}",
                label,
                "█".repeat(bar),
                tail,
                " ".repeat(pad),
                value,
                err,
                lw = label_width
            )
            .context("Failed to write chart")?;
        }
        self.out.flush().context("Failed to flush chart output")?;
        Ok(())
    }
}

/// Vertical bar chart written to a standalone SVG file
pub struct SvgBarChart {
    path: PathBuf,
    title: String,
    width: f64,
    height: f64,
}

impl SvgBarChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: "Feature importance".to_string(),
            width: 640.0,
            height: 400.0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the SVG document
    pub fn to_svg(&self, labels: &[String], values: &[f64], error_bars: &[f64]) -> String {
        const MARGIN_LEFT: f64 = 56.0;
        const MARGIN_RIGHT: f64 = 16.0;
        const MARGIN_TOP: f64 = 40.0;
        const MARGIN_BOTTOM: f64 = 48.0;

        let plot_w = self.width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = self.height - MARGIN_TOP - MARGIN_BOTTOM;
        let base_y = MARGIN_TOP + plot_h;
        let max = scale_max(values, error_bars);
        let y_of = |v: f64| base_y - (v / max) * plot_h;

        let slot = plot_w / labels.len().max(1) as f64;
        let bar_w = slot * 0.6;

        let mut svg = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="white"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="24" font-family="sans-serif" font-size="16" text-anchor="middle">{}</text>"#,
            self.width / 2.0,
            xml_escape(&self.title)
        );

        // Axes and y ticks
        let _ = writeln!(
            svg,
            r#"  <line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{base:.1}" stroke="black"/>"#,
            x = MARGIN_LEFT,
            top = MARGIN_TOP,
            base = base_y
        );
        let _ = writeln!(
            svg,
            r#"  <line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="black"/>"#,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            y = base_y
        );
        for i in 0..=4 {
            let v = max * i as f64 / 4.0;
            let y = y_of(v);
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{:.2}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                v
            );
        }

        for (i, ((label, &value), &err)) in labels.iter().zip(values).zip(error_bars).enumerate() {
            let cx = MARGIN_LEFT + slot * (i as f64 + 0.5);
            let top = y_of(value);
            let _ = writeln!(
                svg,
                r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#4682b4"/>"##,
                cx - bar_w / 2.0,
                top,
                bar_w,
                base_y - top
            );

            if err > 0.0 {
                let hi = y_of(value + err);
                let lo = y_of((value - err).max(0.0));
                let cap = bar_w / 4.0;
                let _ = writeln!(
                    svg,
                    r#"  <path d="M{l:.1},{hi:.1}H{r:.1}M{cx:.1},{hi:.1}V{lo:.1}M{l:.1},{lo:.1}H{r:.1}" stroke="black" fill="none"/>"#,
                    l = cx - cap,
                    r = cx + cap,
                    cx = cx,
                    hi = hi,
                    lo = lo
                );
            }

            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="middle">{}</text>"#,
                cx,
                base_y + 18.0,
                xml_escape(label)
            );
        }

        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="middle">Rank</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            self.height - 10.0
        );
        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgBarChart {
    fn render_bar_chart(
        &mut self,
        labels: &[String],
        values: &[f64],
        error_bars: &[f64],
    ) -> Result<()> {
        check_series(labels, values, error_bars)?;
        let svg = self.to_svg(labels, values, error_bars);
        std::fs::write(&self.path, svg)
            .with_context(|| format!("Failed to write chart to {}", self.path.display()))?;
        Ok(())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> (Vec<String>, Vec<f64>, Vec<f64>) {
        (
            vec!["1".to_string(), "2".to_string()],
            vec![0.75, 0.25],
            vec![0.05, 0.0],
        )
    }

    #[test]
    fn test_text_chart_scales_to_largest_bar() {
        let (labels, values, errors) = series();
        let mut chart = TextBarChart::new(Vec::new()).with_width(20);
        chart.render_bar_chart(&labels, &values, &errors).unwrap();

        let text = String::from_utf8(chart.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        // 0.75 / 0.80 * 20 = 18.75 -> 19 cells, whisker ends at 20
        assert_eq!(lines[0].matches('█').count(), 19);
        assert!(lines[0].contains('┤'));
        assert!(lines[0].ends_with("0.750 ± 0.050"));
        assert_eq!(lines[1].matches('█').count(), 6);
        assert!(!lines[1].contains('┤'));
    }

    #[test]
    fn test_text_chart_rejects_mismatched_series() {
        let mut chart = TextBarChart::new(Vec::new());
        let err = chart
            .render_bar_chart(&["1".to_string()], &[0.5, 0.5], &[0.0, 0.0])
            .unwrap_err();
        assert!(err.to_string().contains("lengths differ"));
    }

    #[test]
    fn test_all_zero_series_draws_empty_bars() {
        let mut chart = TextBarChart::new(Vec::new());
        chart
            .render_bar_chart(&["1".to_string()], &[0.0], &[0.0])
            .unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        assert!(!text.contains('█'));
    }

    #[test]
    fn test_svg_has_bar_per_value() {
        let (labels, values, errors) = series();
        let svg = SvgBarChart::new("unused.svg")
            .with_title("A & B")
            .to_svg(&labels, &values, &errors);

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("fill=\"#4682b4\"").count(), 2);
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("A &amp; B"));
    }
}
