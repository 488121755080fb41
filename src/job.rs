//! # Job Driver
//!
//! Runs the whole pipeline from a JSON job description: composite the
//! visible layers, then build the report from the composite and legend.
//!
//! ## Example
//!
//! ```
//! use analysekarte::job::Job;
//!
//! let json = r##"{
//!     "visibleLayers": ["basis.png", "wald.png"],
//!     "legendData": [
//!         {"label": "Wald", "icon": null, "color": "#228B22", "line": false},
//!         {"label": "Fluss", "color": "#0000FF", "line": true}
//!     ]
//! }"##;
//!
//! let job = Job::from_json(json).unwrap();
//! assert_eq!(job.visible_layers.len(), 2);
//! assert_eq!(job.legend_data.len(), 2);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::compositor::{self, DEFAULT_MAP_PATH};
use crate::error::{ReportError, Result};
use crate::legend::LegendEntry;
use crate::report::{self, DEFAULT_REPORT_PATH, DEFAULT_TITLE};

/// A job description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Layer paths, bottom first.
    pub visible_layers: Vec<PathBuf>,
    #[serde(default)]
    pub legend_data: Vec<LegendEntry>,
}

/// Where a job writes its results.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutputs {
    pub map_path: PathBuf,
    pub report_path: PathBuf,
    pub title: String,
}

impl Default for JobOutputs {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Files written by a successful job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobArtifacts {
    pub map: PathBuf,
    pub report: PathBuf,
}

impl Job {
    /// Parse a job from JSON text.
    pub fn from_json(json: &str) -> Result<Job> {
        serde_json::from_str(json).map_err(|e| ReportError::Validation(format!("invalid job: {}", e)))
    }

    /// Read and parse a job file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Job> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Composite the layers, then build the report.
    pub fn run(&self, outputs: &JobOutputs) -> Result<JobArtifacts> {
        info!(
            "running job: {} layer(s), {} legend entries",
            self.visible_layers.len(),
            self.legend_data.len()
        );
        let map = compositor::combine(&self.visible_layers, &outputs.map_path)?;
        let report = report::build(&map, &self.legend_data, &outputs.report_path, &outputs.title)?;
        Ok(JobArtifacts { map, report })
    }
}
