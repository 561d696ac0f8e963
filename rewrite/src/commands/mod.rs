// rewrite/src/commands/mod.rs
//! Command implementations and the dispatcher used by `main`.

pub mod apply;
pub mod check;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
/// LDAP `unwillingToPerform`.
pub const EXIT_UNWILLING: i32 = 53;

/// Runs the selected command and returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Apply(cmd) => apply::run_apply(cmd, cli.quiet),
        Commands::Check(cmd) => check::run_check(cmd, cli.quiet),
    }
}
