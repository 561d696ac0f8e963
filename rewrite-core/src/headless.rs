// rewrite-core/src/headless.rs
//! `headless.rs`
//! Convenience wrapper for one-shot rewriting without keeping a `Rewriter`
//! around: build the engine from a configuration, run one input, done.

use anyhow::{Context, Result};

use crate::chain::ChainOutcome;
use crate::config::RewriteConfig;
use crate::rewriter::Rewriter;

/// Rewrites `input` with the context named `context` from `config`.
///
/// # Arguments
///
/// * `config` - A validated configuration (see `RewriteConfig::from_yaml_str`).
/// * `context` - Context name or alias; unknown names fall back to `default`.
/// * `input` - The string to rewrite.
pub fn headless_rewrite_string(config: &RewriteConfig, context: &str, input: &str) -> Result<ChainOutcome> {
    let rewriter = Rewriter::from_config(config).context("Failed to build rewriter from configuration")?;
    let outcome = rewriter
        .rewrite(context, input)
        .with_context(|| format!("Failed to rewrite '{}' with context '{}'", input, context))?;
    Ok(outcome)
}
