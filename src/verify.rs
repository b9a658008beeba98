//! Post-migration check that every listed file declares the wrapped field

use std::fs;
use std::io::ErrorKind;

use crate::config::MigrationConfig;
use crate::error::{PatchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Migrated,
    Missing,
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub entries: Vec<(String, FileStatus)>,
}

impl VerifyReport {
    pub fn all_good(&self) -> bool {
        self.entries.iter().all(|(_, s)| *s == FileStatus::Migrated)
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, s)| *s != FileStatus::Migrated)
            .map(|(name, _)| name.as_str())
    }
}

/// Read each file in `verify_files` and look for `pub <field>: Option<T>`
pub fn verify_files(config: &MigrationConfig) -> Result<VerifyReport> {
    let field = &config.field;
    let needle = format!("pub {}: {}", field.name, field.wrapped_type());
    let mut report = VerifyReport::default();

    for name in &config.verify_files {
        let path = config.directory.join(name);
        let status = match fs::read_to_string(&path) {
            Ok(content) if content.contains(&needle) => FileStatus::Migrated,
            Ok(_) => FileStatus::Missing,
            Err(e) if e.kind() == ErrorKind::NotFound => FileStatus::NotFound,
            Err(e) => return Err(PatchError::io(&path, e)),
        };

        match status {
            FileStatus::Migrated => {
                println!("✓ {}: Has {} {}", name, field.wrapped_type(), field.name)
            }
            FileStatus::Missing => println!("✗ {}: Missing proper {}", name, field.name),
            FileStatus::NotFound => println!("✗ {}: File not found", name),
        }
        report.entries.push((name.clone(), status));
    }

    if report.all_good() {
        println!("\n✓ All files have proper {} configuration", field.name);
    } else {
        println!("\n✗ Some files need fixes");
    }
    tracing::debug!(
        directory = %config.directory.display(),
        checked = report.entries.len(),
        failed = report.failures().count(),
        "verification finished"
    );
    Ok(report)
}
