use crate::Result;
use crate::config::RasterConfig;
use crate::render::{ChartRenderer, LineChart, finite_runs, value_range};
use anyhow::Context;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

// Span used when every value is the same.
const FLAT_SPAN: f64 = 1.0;
// Fraction of each axis span added as headroom on both sides.
const PAD: f64 = 0.05;

/// PNG line charts through plotters' bitmap backend. Never opens a window.
pub struct RasterRenderer {
    config: RasterConfig,
}

impl RasterRenderer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }
}

impl ChartRenderer for RasterRenderer {
    fn render(&self, chart: &LineChart, out: &Path) -> Result<()> {
        let cfg = &self.config;
        let font = cfg.font_family.as_str();
        debug!(path = %out.display(), title = %chart.title, "rendering raster chart");

        let root = BitMapBackend::new(out, (cfg.width, cfg.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_lo, x_hi) = padded(thread_range(&chart.threads));
        let (y_lo, y_hi) = padded(value_range(chart, FLAT_SPAN));

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, (font, cfg.title_font_size))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        ctx.configure_mesh()
            .x_labels(chart.threads.len().max(2))
            .x_desc(chart.x_desc.as_str())
            .y_desc(chart.y_desc.as_str())
            .x_label_formatter(&|x| thread_label(*x))
            .y_label_formatter(&|y| format!("{:.2}", y))
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.05))
            .label_style((font, cfg.label_font_size))
            .axis_desc_style((font, cfg.label_font_size))
            .draw()?;

        for series in &chart.series {
            let color = RGBColor(series.color.0, series.color.1, series.color.2);

            // Legend entry even if the series has no points.
            ctx.draw_series(LineSeries::new(
                std::iter::empty::<(f64, f64)>(),
                color.stroke_width(2),
            ))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            for run in finite_runs(&series.values) {
                let points: Vec<(f64, f64)> = run
                    .iter()
                    .map(|&(idx, v)| (f64::from(chart.threads[idx]), v))
                    .collect();
                ctx.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
                ctx.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
            }
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((font, cfg.label_font_size))
            .draw()?;

        root.present()
            .with_context(|| format!("write chart {}", out.display()))?;
        println!("Saved {}", out.display());
        Ok(())
    }
}

fn thread_range(threads: &[u32]) -> (f64, f64) {
    let lo = threads.iter().copied().min().map_or(0.0, f64::from);
    let hi = threads.iter().copied().max().map_or(1.0, f64::from);
    (lo, hi)
}

/// Whole thread counts only; fractional tick positions stay blank.
fn thread_label(x: f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{}", x.round() as i64)
    } else {
        String::new()
    }
}

/// Widen `(lo, hi)` by `PAD` of its span, treating a zero span as one.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = if hi > lo { hi - lo } else { 1.0 };
    (lo - span * PAD, hi + span * PAD)
}
