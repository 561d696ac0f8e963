//! `check` command: compile a configuration and list what it defines.

use anyhow::{Context, Result};
use std::io::{self, Write};

use rewrite_core::config::RewriteConfig;
use rewrite_core::Rewriter;

use super::EXIT_SUCCESS;
use crate::cli::CheckCommand;
use crate::ui::output_format::{success_msg, warn_msg};

pub fn run_check(cmd: &CheckCommand, quiet: bool) -> Result<i32> {
    let config = RewriteConfig::load_from_file(&cmd.config)
        .with_context(|| format!("Failed to load configuration {}", cmd.config.display()))?;
    let rewriter = Rewriter::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for ctx in rewriter.contexts() {
        writeln!(out, "{}\t{} rule(s)", ctx.name(), ctx.len())?;
    }
    let mut aliases: Vec<_> = rewriter.aliases().iter().collect();
    aliases.sort();
    for (alias, target) in aliases {
        writeln!(out, "{}\t-> {}", alias, target)?;
    }
    out.flush()?;

    if !quiet {
        if !rewriter.is_enabled() {
            warn_msg("The rewrite engine is disabled in this configuration.");
        }
        success_msg(format!(
            "Configuration OK: {} context(s), {} alias(es), {} rule(s).",
            rewriter.contexts().len(),
            rewriter.aliases().len(),
            config.rule_count()
        ));
    }
    Ok(EXIT_SUCCESS)
}
