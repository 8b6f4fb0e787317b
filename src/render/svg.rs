use crate::Result;
use crate::config::VectorConfig;
use crate::render::{ChartRenderer, LineChart, finite_runs, value_range};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::debug;

const LEGEND_WIDTH: f64 = 170.0;
const LEGEND_ROW: f64 = 20.0;

/// Standalone SVG documents assembled as text, with our own axis scaling.
pub struct VectorRenderer {
    config: VectorConfig,
}

impl VectorRenderer {
    pub fn new(config: VectorConfig) -> Self {
        Self { config }
    }

    /// Build the SVG document for `chart`.
    pub fn to_svg(&self, chart: &LineChart) -> String {
        let cfg = &self.config;
        let width = f64::from(cfg.width);
        let height = f64::from(cfg.height);
        let margin = f64::from(cfg.margin);
        let plot_w = width - 2.0 * margin;
        let plot_h = height - 2.0 * margin;
        let bottom = height - margin;
        let right = width - margin;

        let (lo, hi) = value_range(chart, cfg.flat_span);
        let n = chart.threads.len();
        let x_step = plot_w / if n > 1 { (n - 1) as f64 } else { 1.0 };

        let x_pos = |idx: usize| margin + x_step * idx as f64;
        // SVG origin is top-left.
        let y_pos = |v: f64| margin + plot_h - (v - lo) / (hi - lo) * plot_h;

        let font = escape(&cfg.font_family);
        let text = |x: f64, y: f64, anchor: &str, size: u32, body: &str| {
            format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="{}" font-family="{}" font-size="{}">{}</text>"#,
                x,
                y,
                anchor,
                font,
                size,
                escape(body)
            )
        };

        let mut svg = vec![
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
                cfg.width, cfg.height
            ),
            r#"<rect width="100%" height="100%" fill="white"/>"#.to_string(),
            text(width / 2.0, 28.0, "middle", 18, &chart.title),
            line(margin, margin, margin, bottom, "black"),
            line(margin, bottom, right, bottom, "black"),
            text(margin - 10.0, margin - 10.0, "end", 12, &chart.y_desc),
            text(width / 2.0, height - 10.0, "middle", 12, &chart.x_desc),
        ];

        for i in 0..=cfg.y_ticks {
            let val = lo + (hi - lo) * f64::from(i) / f64::from(cfg.y_ticks);
            let y = y_pos(val);
            svg.push(line(margin - 5.0, y, margin, y, "black"));
            svg.push(text(margin - 8.0, y + 4.0, "end", 10, &format!("{:.2}", val)));
            svg.push(line(margin, y, right, y, "#ddd"));
        }

        for (idx, t) in chart.threads.iter().enumerate() {
            let x = x_pos(idx);
            svg.push(line(x, bottom, x, bottom + 5.0, "black"));
            svg.push(text(x, bottom + 18.0, "middle", 10, &t.to_string()));
        }

        let points: Vec<(String, Vec<Vec<(f64, f64)>>)> = chart
            .series
            .iter()
            .map(|s| {
                let runs: Vec<Vec<(f64, f64)>> = finite_runs(&s.values)
                    .into_iter()
                    .map(|run| run.into_iter().map(|(i, v)| (x_pos(i), y_pos(v))).collect())
                    .collect();
                (s.color.hex(), runs)
            })
            .collect();

        // Lines first so every marker sits on top.
        for (color, runs) in &points {
            for run in runs.iter().filter(|r| r.len() > 1) {
                let coords: Vec<String> =
                    run.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
                svg.push(format!(
                    r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                    color,
                    coords.join(" ")
                ));
            }
        }
        for (color, runs) in &points {
            for (x, y) in runs.iter().flatten() {
                svg.push(format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                    x, y, color
                ));
            }
        }

        let legend_x = right - LEGEND_WIDTH;
        let legend_y = margin;
        svg.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.0}" height="{:.0}" fill="white" stroke="black"/>"#,
            legend_x,
            legend_y,
            LEGEND_WIDTH,
            10.0 + LEGEND_ROW * chart.series.len() as f64
        ));
        for (row, s) in chart.series.iter().enumerate() {
            let y = legend_y + 15.0 + LEGEND_ROW * row as f64;
            svg.push(format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>"#,
                legend_x + 10.0,
                y,
                legend_x + 30.0,
                y,
                s.color.hex()
            ));
            svg.push(text(legend_x + 40.0, y + 4.0, "start", 12, &s.label));
        }

        svg.push("</svg>".to_string());
        svg.join("\n")
    }
}

impl ChartRenderer for VectorRenderer {
    fn render(&self, chart: &LineChart, out: &Path) -> Result<()> {
        debug!(path = %out.display(), title = %chart.title, "rendering svg chart");
        fs::write(out, self.to_svg(chart))
            .with_context(|| format!("write chart {}", out.display()))?;
        println!("Saved {}", out.display());
        Ok(())
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) -> String {
    format!(
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" />"#,
        x1, y1, x2, y2, stroke
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
