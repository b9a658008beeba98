//! Wraps fallback assignments to the migrated field in `Some(...)`
//!
//! `<receiver>.<field> = id.clone().unwrap_or_else(|| { ... });` still yields
//! the bare type after the migration. The fix wraps the right-hand side.

use std::fs;
use std::path::Path;

use crate::error::{PatchError, Result};
use crate::semantic_patch::{fallback_assignment, substitute};

/// Rewrite every fallback assignment in `path` and write the file back.
///
/// The file is written even when nothing matched.
pub fn fix_fallback_assignments(path: &Path, field: &str, receiver: &str) -> Result<usize> {
    let re = fallback_assignment(field, receiver)?;
    let mut content = fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;

    let count = substitute(&mut content, &re, |caps| {
        format!("{}Some({});", &caps["lhs"], &caps["rhs"])
    });

    fs::write(path, &content).map_err(|e| PatchError::io(path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!("Fixed {} ({} assignments)", name, count);
    tracing::debug!(file = %path.display(), matches = count, "fallback assignments rewritten");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const BUILDER: &str = r#"fn build(&self, view: &mut View, data_source_id: &Option<String>) {
    view.config.data_source_id = data_source_id.clone().unwrap_or_else(|| {
        self.data_sources.first().map(|(id, _)| id.clone()).unwrap_or_default()
    });
    view.config.data_source_id = data_source_id.clone().or_else(|| {
        self.data_sources.first().map(|(id, _)| id.clone())
    });
}
"#;

    #[test]
    fn test_wraps_fallback_assignment() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("view_builder.rs");
        fs::write(&path, BUILDER).unwrap();

        let count = fix_fallback_assignments(&path, "data_source_id", "view.config").unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert_eq!(count, 1);
        assert!(content.contains(
            "view.config.data_source_id = Some(data_source_id.clone().unwrap_or_else(|| {\n        self.data_sources.first().map(|(id, _)| id.clone()).unwrap_or_default()\n    }));"
        ));
        // `or_else` already yields an Option and is left as it was
        assert!(content.contains("view.config.data_source_id = data_source_id.clone().or_else(|| {"));
    }

    #[test]
    fn test_second_pass_matches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("view_builder.rs");
        fs::write(&path, BUILDER).unwrap();

        fix_fallback_assignments(&path, "data_source_id", "view.config").unwrap();
        let once = fs::read_to_string(&path).unwrap();
        let count = fix_fallback_assignments(&path, "data_source_id", "view.config").unwrap();

        assert_eq!(count, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn test_writes_even_without_matches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("view_builder.rs");
        fs::write(&path, "fn nothing() {}\n").unwrap();

        let past = SystemTime::now() - Duration::from_secs(24 * 60 * 60);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let count = fix_fallback_assignments(&path, "data_source_id", "view.config").unwrap();

        assert_eq!(count, 0);
        assert!(fs::metadata(&path).unwrap().modified().unwrap() > past);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn nothing() {}\n");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = fix_fallback_assignments(
            &temp_dir.path().join("absent.rs"),
            "data_source_id",
            "view.config",
        );
        assert!(matches!(result, Err(PatchError::Io { .. })));
    }
}
