//! The point-of-interest dataset consumed by the annotation pipeline.
//!
//! Every top-level key is optional; an absent key means an empty list, not
//! an error. A structurally malformed entry (wrong type, missing `coord`)
//! is fatal for the run.

use serde::Deserialize;

use crate::error::{AnnotateError, AnnotateResult};
use crate::geometry::Point;

/// Dataset loaded from the POI JSON document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub portal_stones: Vec<PortalStone>,
    #[serde(default)]
    pub steddings: Vec<Stedding>,
    #[serde(default)]
    pub rivers: Vec<River>,
    #[serde(default)]
    pub nations: Vec<Nation>,
}

/// A portal stone marker (icon only, no label).
#[derive(Debug, Clone, Deserialize)]
pub struct PortalStone {
    pub coord: [f64; 2],
}

/// A stedding marker: icon plus a label beneath it.
#[derive(Debug, Clone, Deserialize)]
pub struct Stedding {
    pub coord: [f64; 2],
    #[serde(default)]
    pub label: String,
}

/// A river label (no icon).
#[derive(Debug, Clone, Deserialize)]
pub struct River {
    pub coord: [f64; 2],
    #[serde(default)]
    pub label: String,
}

/// A national border polyline.
#[derive(Debug, Clone, Deserialize)]
pub struct Nation {
    #[serde(default)]
    pub border: Vec<[f64; 2]>,
    /// Color spec (`rgb(r,g,b)`); the default is deliberately unparseable
    /// so a missing color renders as the fallback red.
    #[serde(default = "default_color_spec")]
    pub color: String,
    #[serde(default)]
    pub closed: bool,
}

fn default_color_spec() -> String {
    "rgba(255,0,0,1)".to_string()
}

impl Dataset {
    /// Parse a dataset from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load a dataset from a file.
    pub fn from_file(path: &str) -> AnnotateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnnotateError::AssetRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
            .map_err(|e| AnnotateError::DatasetParse(format!("{path}: {e}")))
    }
}

impl PortalStone {
    pub fn point(&self) -> Point {
        self.coord.into()
    }
}

impl Stedding {
    pub fn point(&self) -> Point {
        self.coord.into()
    }
}

impl River {
    pub fn point(&self) -> Point {
        self.coord.into()
    }
}

impl Nation {
    /// Border vertices as points, in traversal order.
    pub fn border_points(&self) -> Vec<Point> {
        self.border.iter().map(|&c| c.into()).collect()
    }
}
