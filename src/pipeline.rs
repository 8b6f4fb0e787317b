//! The two plotting runs: parse, build series, render.

use crate::Result;
use crate::config::{RasterConfig, VectorConfig};
use crate::error::PlotError;
use crate::log::{Implementation, MergeStrategy, parse_log_file};
use crate::model::{Metric, build_series};
use crate::render::{ChartRenderer, LineChart, RasterRenderer, VectorRenderer};
use std::path::{Path, PathBuf};

pub const RASTER_LOG: &str = "timing_output_with_spin.txt";
pub const VECTOR_LOG: &str = "timing_output.txt";
pub const VECTOR_OUT: &str = "timing_plot.svg";

/// Implementations compared in the SVG chart.
const VECTOR_IMPLEMENTATIONS: [Implementation; 2] =
    [Implementation::Original, Implementation::Mutex];

#[derive(Debug, Clone)]
pub struct RasterJob {
    pub log: PathBuf,
    pub out_dir: PathBuf,
    pub config: RasterConfig,
}

#[derive(Debug, Clone)]
pub struct VectorJob {
    pub log: PathBuf,
    pub out: PathBuf,
    pub metric: Metric,
    pub config: VectorConfig,
}

/// Insert, retrieve and total PNG charts over every implementation.
/// Repeated measurements under one header overwrite each other.
pub fn run_raster(job: &RasterJob) -> Result<Vec<PathBuf>> {
    let log = parse_log_file(&job.log, MergeStrategy::Overwrite)?;

    // Build every chart before writing any, so a bad log leaves no partial output.
    let charts = Metric::ALL
        .into_iter()
        .map(|metric| -> Result<(Metric, LineChart)> {
            let series = build_series(&log, &Implementation::ALL, metric)
                .ok_or_else(|| empty_data(&job.log))?;
            let chart = LineChart::from_series(metric.title(), &series, |i| i.label().to_string());
            Ok((metric, chart))
        })
        .collect::<Result<Vec<_>>>()?;

    let renderer = RasterRenderer::new(job.config.clone());
    let mut written = Vec::with_capacity(charts.len());
    for (metric, chart) in charts {
        let out = job.out_dir.join(format!("timing_{}.png", metric.slug()));
        renderer.render(&chart, &out)?;
        written.push(out);
    }
    Ok(written)
}

/// One SVG chart of `job.metric`, original vs mutex.
/// Repeated measurements under one header are summed.
pub fn run_vector(job: &VectorJob) -> Result<PathBuf> {
    let log = parse_log_file(&job.log, MergeStrategy::Accumulate)?;
    let series = build_series(&log, &VECTOR_IMPLEMENTATIONS, job.metric)
        .ok_or_else(|| empty_data(&job.log))?;

    let title = format!("Hashtable {} runtime vs. thread count", job.metric.keyword());
    let chart = LineChart::from_series(title, &series, vector_label);

    VectorRenderer::new(job.config.clone()).render(&chart, &job.out)?;
    Ok(job.out.clone())
}

fn empty_data(log: &Path) -> PlotError {
    PlotError::EmptyData {
        path: log.to_path_buf(),
    }
}

fn vector_label(implementation: Implementation) -> String {
    match implementation {
        Implementation::Original => "Original (unsafe)".to_string(),
        other => other.label().to_string(),
    }
}

/// Parsed timings as pretty JSON: implementation -> threads -> phase -> seconds.
pub fn dump(log: &Path, strategy: MergeStrategy) -> Result<String> {
    let parsed = parse_log_file(log, strategy)?;
    Ok(serde_json::to_string_pretty(&parsed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const LOG: &str = "\
--- original t=1 ---
Inserted 100 keys in 0.10 seconds
Retrieved 100/100 keys in 0.05 seconds
--- mutex t=1 ---
Inserted 100 keys in 0.20 seconds
Retrieved 100/100 keys in 0.08 seconds
--- original t=2 ---
Inserted 100 keys in 0.06 seconds
Retrieved 50/100 keys in 0.03 seconds
Retrieved 50/100 keys in 0.03 seconds
--- mutex t=2 ---
Inserted 100 keys in 0.25 seconds
Retrieved 100/100 keys in 0.09 seconds
";

    fn vector_job(dir: &Path, log: &str) -> VectorJob {
        VectorJob {
            log: dir.join(log),
            out: dir.join(VECTOR_OUT),
            metric: Metric::Retrieve,
            config: VectorConfig::default(),
        }
    }

    fn raster_job(dir: &Path, log: &str) -> RasterJob {
        RasterJob {
            log: dir.join(log),
            out_dir: dir.to_path_buf(),
            config: RasterConfig::default(),
        }
    }

    fn plot_error(err: &anyhow::Error) -> Option<&PlotError> {
        err.downcast_ref::<PlotError>()
    }

    #[test]
    fn vector_run_writes_titled_svg() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(VECTOR_LOG), LOG).unwrap();

        let out = run_vector(&vector_job(dir.path(), VECTOR_LOG)).unwrap();
        let svg = fs::read_to_string(&out).unwrap();

        assert!(svg.contains(">Hashtable Retrieved runtime vs. thread count</text>"));
        assert!(svg.contains(">Original (unsafe)</text>"));
        assert!(svg.contains(">Mutex</text>"));
        assert!(!svg.contains("Spinlock"));
        // Accumulated: original t=2 retrieve is 0.06, so the range is 0.05..0.09.
        assert!(svg.contains(">0.05</text>"));
        assert!(svg.contains(">0.09</text>"));
    }

    #[test]
    fn vector_run_honours_metric() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(VECTOR_LOG), LOG).unwrap();

        let job = VectorJob {
            metric: Metric::Total,
            ..vector_job(dir.path(), VECTOR_LOG)
        };
        let svg = fs::read_to_string(run_vector(&job).unwrap()).unwrap();
        assert!(svg.contains(">Hashtable Total runtime vs. thread count</text>"));
    }

    #[test]
    fn raster_run_writes_three_pngs_in_metric_order() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("charts");
        fs::create_dir(&out_dir).unwrap();
        fs::write(
            dir.path().join(RASTER_LOG),
            format!(
                "{}--- spinlock t=1 ---\n\
                 Inserted 100 keys in 0.12 seconds\n\
                 Retrieved 100/100 keys in 0.06 seconds\n\
                 --- spinlock t=4 ---\n\
                 Inserted 100 keys in 0.04 seconds\n",
                LOG
            ),
        )
        .unwrap();

        let job = RasterJob {
            out_dir: out_dir.clone(),
            ..raster_job(dir.path(), RASTER_LOG)
        };
        let written = run_raster(&job).unwrap();

        let expected: Vec<PathBuf> = ["timing_insert.png", "timing_retrieve.png", "timing_total.png"]
            .iter()
            .map(|name| out_dir.join(name))
            .collect();
        assert_eq!(written, expected);

        let mut on_disk: Vec<PathBuf> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        on_disk.sort();
        let mut sorted = expected.clone();
        sorted.sort();
        assert_eq!(on_disk, sorted);

        for path in &expected {
            let bytes = fs::read(path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
        }
    }

    #[test]
    fn missing_log_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();

        let job = vector_job(dir.path(), "absent.txt");
        let err = run_vector(&job).unwrap_err();
        assert!(matches!(plot_error(&err), Some(PlotError::MissingInput { .. })));
        assert!(!job.out.exists());

        let err = run_raster(&raster_job(dir.path(), "absent.txt")).unwrap_err();
        assert!(matches!(plot_error(&err), Some(PlotError::MissingInput { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn log_without_data_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "starting benchmark\n--- mutex t=4 ---\n").unwrap();

        let job = vector_job(dir.path(), "empty.txt");
        let err = run_vector(&job).unwrap_err();
        match plot_error(&err) {
            Some(PlotError::EmptyData { path }) => assert_eq!(path, &job.log),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!job.out.exists());

        let err = run_raster(&raster_job(dir.path(), "empty.txt")).unwrap_err();
        assert!(matches!(plot_error(&err), Some(PlotError::EmptyData { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn vector_run_needs_original_or_mutex_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(VECTOR_LOG),
            "--- spinlock t=2 ---\nRetrieved 1/1 keys in 0.5 seconds\n",
        )
        .unwrap();
        let err = run_vector(&vector_job(dir.path(), VECTOR_LOG)).unwrap_err();
        assert!(matches!(plot_error(&err), Some(PlotError::EmptyData { .. })));
    }

    #[test]
    fn dump_reports_nested_timings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RASTER_LOG);
        fs::write(&path, LOG).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&dump(&path, MergeStrategy::Overwrite).unwrap()).unwrap();
        assert_eq!(json["original"]["1"]["insert"], serde_json::json!(0.10));
        assert_eq!(json["original"]["2"]["retrieve"], serde_json::json!(0.03));
        assert_eq!(json["mutex"]["2"]["insert"], serde_json::json!(0.25));
        assert!(json.get("spinlock").is_none());

        let json: serde_json::Value =
            serde_json::from_str(&dump(&path, MergeStrategy::Accumulate).unwrap()).unwrap();
        assert_eq!(json["original"]["2"]["retrieve"], serde_json::json!(0.06));
    }
}
