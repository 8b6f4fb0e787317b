//! Rendering settings, passed explicitly to the renderers.
//!
//! JSON shape (every field optional):
//! {
//!   "raster": { "width": 1200, "height": 600, "font_family": "sans-serif",
//!               "title_font_size": 24, "label_font_size": 16 },
//!   "vector": { "width": 720, "height": 420, "margin": 60, "y_ticks": 5,
//!               "flat_span": 1.0, "font_family": "Arial" }
//! }

use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub raster: RasterConfig,
    pub vector: VectorConfig,
}

/// PNG output through plotters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        // 8x4 inches at 150 dpi.
        Self {
            width: 1200,
            height: 600,
            font_family: "sans-serif".to_string(),
            title_font_size: 24,
            label_font_size: 16,
        }
    }
}

/// Hand-built SVG output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VectorConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    /// Number of intervals on the value axis; labels are drawn at `y_ticks + 1` levels.
    pub y_ticks: u32,
    /// Added to the value range when all values are equal.
    pub flat_span: f64,
    pub font_family: String,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 420,
            margin: 60,
            y_ticks: 5,
            flat_span: 1.0,
            font_family: "Arial".to_string(),
        }
    }
}

impl RenderConfig {
    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: RenderConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let v = &self.vector;
        if v.width <= 2 * v.margin || v.height <= 2 * v.margin {
            anyhow::bail!(
                "vector canvas {}x{} leaves no room inside margin {}",
                v.width,
                v.height,
                v.margin
            );
        }
        if v.y_ticks == 0 {
            anyhow::bail!("vector.y_ticks must be at least 1");
        }
        if !(v.flat_span.is_finite() && v.flat_span > 0.0) {
            anyhow::bail!("vector.flat_span must be a positive number, got {}", v.flat_span);
        }
        if self.raster.width == 0 || self.raster.height == 0 {
            anyhow::bail!("raster size must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(RenderConfig::load(None).unwrap(), RenderConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, r#"{ "vector": { "width": 1000, "font_family": "Helvetica" } }"#).unwrap();

        let config = RenderConfig::load(Some(&path)).unwrap();
        assert_eq!(config.vector.width, 1000);
        assert_eq!(config.vector.font_family, "Helvetica");
        assert_eq!(config.vector.height, 420);
        assert_eq!(config.raster, RasterConfig::default());
    }

    #[test]
    fn rejects_unknown_fields_and_bad_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");

        fs::write(&path, r#"{ "vector": { "colour": "red" } }"#).unwrap();
        assert!(RenderConfig::load(Some(&path)).is_err());

        fs::write(&path, r#"{ "vector": { "margin": 400 } }"#).unwrap();
        assert!(RenderConfig::load(Some(&path)).is_err());

        fs::write(&path, r#"{ "vector": { "flat_span": 0.0 } }"#).unwrap();
        assert!(RenderConfig::load(Some(&path)).is_err());
    }
}
