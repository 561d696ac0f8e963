// rewrite/src/logger.rs
//! Logger setup for the CLI.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialises `env_logger`.
///
/// With `Some(level)` the workspace crates log at exactly that level and
/// `RUST_LOG` is ignored for them; with `None`, `RUST_LOG` decides and the
/// default is `warn`. Calling it more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_module("rewrite", level);
        builder.filter_module("rewrite_core", level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
