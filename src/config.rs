//! Migration settings
//!
//! One JSON file describes the field, the usage idioms and the file lists.
//! Every section falls back to the plot-view defaults when a key is missing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PatchError, Result};

/// The field being migrated from a bare type to `Option<bare>`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub name: String,
    /// Type token before migration, e.g. `String`
    pub bare_type: String,
    /// Default expression before migration, e.g. `String::new()`
    pub empty_value: String,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            name: "data_source_id".to_string(),
            bare_type: "String".to_string(),
            empty_value: "String::new()".to_string(),
        }
    }
}

impl FieldSpec {
    pub fn wrapped_type(&self) -> String {
        format!("Option<{}>", self.bare_type)
    }

    /// Canonical post-migration declaration, including the trailing comma
    pub fn declaration(&self) -> String {
        format!("pub {}: {},", self.name, self.wrapped_type())
    }

    /// Canonical post-migration initializer, including the trailing comma
    pub fn initializer(&self) -> String {
        format!("{}: None,", self.name)
    }
}

/// Names appearing in the call-site idioms
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageSettings {
    /// Receiver expression through which the field is accessed
    pub access_path: String,
    /// Binding introduced by the `if let Some(..)` lookup rewrite
    pub lookup_binding: String,
    /// Identifier assigned to the field by setters
    pub assigned_ident: String,
}

impl Default for UsageSettings {
    fn default() -> Self {
        Self {
            access_path: "self.config".to_string(),
            lookup_binding: "source_id".to_string(),
            assigned_ident: "source_id".to_string(),
        }
    }
}

/// Trailing-comma repair for one record in one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparatorFix {
    pub file: String,
    pub record: String,
    pub field: String,
}

/// Target of the single-file `fix-assignments` command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentFix {
    pub path: PathBuf,
    pub receiver: String,
}

impl Default for AssignmentFix {
    fn default() -> Self {
        Self {
            path: PathBuf::from("crates/dv-app/src/view_builder.rs"),
            receiver: "view.config".to_string(),
        }
    }
}

/// Everything one migration run needs to know
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub directory: PathBuf,
    pub extension: String,
    /// Records are recognized by a name ending in this suffix
    pub record_suffix: String,
    pub field: FieldSpec,
    pub usage: UsageSettings,
    /// Files whose record gets the field injected when absent
    pub inject_files: Vec<String>,
    pub excluded_files: Vec<String>,
    pub separator_fix: Option<SeparatorFix>,
    /// Files checked by `verify`
    pub verify_files: Vec<String>,
    pub assignment_fix: AssignmentFix,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("crates/dv-views/src/plots"),
            extension: "rs".to_string(),
            record_suffix: "Config".to_string(),
            field: FieldSpec::default(),
            usage: UsageSettings::default(),
            inject_files: to_strings(&[
                "sankey.rs",
                "treemap.rs",
                "sunburst.rs",
                "network.rs",
                "time_analysis.rs",
                "candlestick.rs",
                "stream.rs",
            ]),
            excluded_files: to_strings(&["mod.rs", "utils.rs"]),
            separator_fix: Some(SeparatorFix {
                file: "polar.rs".to_string(),
                record: "PolarPlot".to_string(),
                field: "config".to_string(),
            }),
            verify_files: to_strings(&[
                "anomaly.rs",
                "bar.rs",
                "box_plot.rs",
                "candlestick.rs",
                "contour.rs",
                "correlation.rs",
                "distribution.rs",
                "geo.rs",
                "heatmap.rs",
                "histogram.rs",
                "line.rs",
                "network.rs",
                "parallel_coordinates.rs",
                "polar.rs",
                "radar.rs",
                "sankey.rs",
                "scatter.rs",
                "scatter3d.rs",
                "stream.rs",
                "sunburst.rs",
                "surface3d.rs",
                "time_analysis.rs",
                "treemap.rs",
                "violin.rs",
            ]),
            assignment_fix: AssignmentFix::default(),
        }
    }
}

impl MigrationConfig {
    pub fn needs_injection(&self, file_name: &str) -> bool {
        self.inject_files.iter().any(|f| f == file_name)
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_files.iter().any(|f| f == file_name)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Load a config file. Missing keys fall back to the defaults above.
pub fn load_migration_config(path: &Path) -> Result<MigrationConfig> {
    let bytes = fs::read(path).map_err(|e| PatchError::io(path, e))?;
    serde_json::from_slice::<MigrationConfig>(&bytes).map_err(|e| PatchError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn save_migration_config(path: &Path, cfg: &MigrationConfig) -> Result<()> {
    let json = serde_json::to_vec_pretty(cfg).map_err(|e| PatchError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PatchError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| PatchError::io(path, e))
}
