//! Line chart rendering: thread count on x, seconds on y, one line per series.

pub mod raster;
pub mod svg;

pub use raster::RasterRenderer;
pub use svg::VectorRenderer;

use crate::Result;
use crate::log::Implementation;
use crate::model::Series;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub fn implementation_color(implementation: Implementation) -> Rgb {
    match implementation {
        Implementation::Original => Rgb(0x1f, 0x77, 0xb4),
        Implementation::Mutex => Rgb(0xd6, 0x27, 0x28),
        Implementation::Spinlock => Rgb(0x2c, 0xa0, 0x2c),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: Rgb,
    /// Aligned with [`LineChart::threads`]; NaN marks a missing point.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub threads: Vec<u32>,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    /// Chart over a built series, colored per implementation.
    pub fn from_series(
        title: impl Into<String>,
        series: &Series,
        label: impl Fn(Implementation) -> String,
    ) -> Self {
        Self {
            title: title.into(),
            x_desc: "Threads".to_string(),
            y_desc: "Time (s)".to_string(),
            threads: series.threads.clone(),
            series: series
                .lines
                .iter()
                .map(|(imp, values)| ChartSeries {
                    label: label(*imp),
                    color: implementation_color(*imp),
                    values: values.clone(),
                })
                .collect(),
        }
    }

    fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
    }
}

/// Writes exactly one file per call and reports it on stdout.
pub trait ChartRenderer {
    fn render(&self, chart: &LineChart, out: &Path) -> Result<()>;
}

/// (min, max) over finite values. A zero span is widened by `flat_span`;
/// no finite values at all gives `(0, 1)`.
pub(crate) fn value_range(chart: &LineChart, flat_span: f64) -> (f64, f64) {
    let (lo, hi) = chart
        .finite_values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo, hi + flat_span);
    }
    (lo, hi)
}

/// Maximal runs of consecutive finite values, as (index, value).
pub(crate) fn finite_runs(values: &[f64]) -> Vec<Vec<(usize, f64)>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for (idx, &v) in values.iter().enumerate() {
        if v.is_finite() {
            run.push((idx, v));
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}
