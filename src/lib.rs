pub mod assignment_fix;
pub mod config;
pub mod driver;
pub mod error;
pub mod semantic_patch;
pub mod tree_sitter;
pub mod verify;

pub use config::{load_migration_config, MigrationConfig};
pub use driver::{run, DriverOptions, RunSummary};
pub use error::{PatchError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr. `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "fieldpatch=debug,fieldpatch_lib=debug"
    } else {
        "fieldpatch=info,fieldpatch_lib=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
