//! File driver
//!
//! Enumerates candidate files directly inside the configured directory,
//! runs the pipeline on each one in turn, and writes back only the files
//! whose content changed.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::MigrationConfig;
use crate::error::Result;
use crate::semantic_patch::{MigrationEngine, SourceUnit};

#[derive(Debug, Clone, Copy, Default)]
pub struct DriverOptions {
    /// Print a diff for each changed file instead of writing it
    pub dry_run: bool,
}

/// Outcome of one driver run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: usize,
    /// Files that were (or, in a dry run, would be) rewritten
    pub modified: Vec<PathBuf>,
}

impl RunSummary {
    pub fn modified_count(&self) -> usize {
        self.modified.len()
    }
}

/// Files directly inside `config.directory` with the configured extension,
/// minus the excluded names, sorted by file name
pub fn collect_candidates(config: &MigrationConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&config.directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == config.extension);
        if has_extension && !config.is_excluded(name) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Run the pipeline over every candidate file and print the progress report
pub fn run(config: &MigrationConfig, options: DriverOptions) -> Result<RunSummary> {
    let files = collect_candidates(config)?;
    tracing::info!(
        directory = %config.directory.display(),
        candidates = files.len(),
        dry_run = options.dry_run,
        "starting migration"
    );

    let mut engine = MigrationEngine::new(config.clone())?;
    let mut summary = RunSummary::default();

    for path in files {
        let name = display_name(&path);
        println!("Processing {}...", name);

        let mut unit = SourceUnit::load(&path)?;
        let report = engine.apply(&mut unit)?;
        summary.processed += 1;

        for outcome in report.outcomes().iter().filter(|o| o.matches > 0) {
            tracing::debug!(file = %name, rule = %outcome.rule, matches = outcome.matches, "rule applied");
        }

        if !unit.is_changed() {
            println!("  · unchanged");
            continue;
        }

        if options.dry_run {
            println!("{}", diffy::create_patch(unit.original(), &unit.content));
            println!("  ✓ Would fix type issues");
        } else {
            unit.persist()?;
            println!("  ✓ Fixed type issues");
        }
        summary.modified.push(path);
    }

    if options.dry_run {
        println!("\nWould fix {} files", summary.modified_count());
    } else {
        println!("\nFixed {} files", summary.modified_count());
    }
    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;
    use std::fs;
    use tempfile::TempDir;

    const BARE: &str = "pub struct HeatmapConfig {\n    pub data_source_id: String,\n}\n\nimpl Default for HeatmapConfig {\n    fn default() -> Self {\n        Self {\n            data_source_id: String::new(),\n        }\n    }\n}\n";
    const MIGRATED: &str = "pub struct LineConfig {\n    pub data_source_id: Option<String>,\n}\n";

    fn setup() -> (TempDir, MigrationConfig) {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("heatmap.rs"), BARE).unwrap();
        fs::write(dir.join("line.rs"), MIGRATED).unwrap();
        fs::write(dir.join("mod.rs"), BARE).unwrap();
        fs::write(dir.join("utils.rs"), BARE).unwrap();
        fs::write(dir.join("notes.md"), BARE).unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("deep.rs"), BARE).unwrap();

        let config = MigrationConfig {
            directory: dir.to_path_buf(),
            ..Default::default()
        };
        (temp_dir, config)
    }

    #[test]
    fn test_candidates_filtered_and_sorted() {
        let (_temp_dir, config) = setup();
        let names: Vec<_> = collect_candidates(&config)
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();

        assert_eq!(names, vec!["heatmap.rs", "line.rs"]);
    }

    #[test]
    fn test_run_writes_only_changed_files() {
        let (temp_dir, config) = setup();
        let summary = run(&config, DriverOptions::default()).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.modified, vec![temp_dir.path().join("heatmap.rs")]);

        let heatmap = fs::read_to_string(temp_dir.path().join("heatmap.rs")).unwrap();
        assert!(heatmap.contains("pub data_source_id: Option<String>,"));
        assert!(heatmap.contains("data_source_id: None,"));
        assert_eq!(fs::read_to_string(temp_dir.path().join("line.rs")).unwrap(), MIGRATED);
        // Excluded and nested files are never touched
        assert_eq!(fs::read_to_string(temp_dir.path().join("mod.rs")).unwrap(), BARE);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("nested").join("deep.rs")).unwrap(),
            BARE
        );
    }

    #[test]
    fn test_second_run_modifies_nothing() {
        let (_temp_dir, config) = setup();
        run(&config, DriverOptions::default()).unwrap();
        let summary = run(&config, DriverOptions::default()).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.modified_count(), 0);
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let (temp_dir, config) = setup();
        let summary = run(&config, DriverOptions { dry_run: true }).unwrap();

        assert_eq!(summary.modified_count(), 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("heatmap.rs")).unwrap(), BARE);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = MigrationConfig {
            directory: temp_dir.path().join("does-not-exist"),
            ..Default::default()
        };

        assert!(matches!(
            run(&config, DriverOptions::default()),
            Err(PatchError::Walk(_))
        ));
    }
}
