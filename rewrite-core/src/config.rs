//! Configuration management for `rewrite-core`.
//!
//! This module defines the YAML representation of a rewrite setup: engine
//! switch, pass limits, lookup maps and the named contexts with their rules.
//! It handles deserialization and validation; turning a validated config into
//! a working engine is `Rewriter::from_config`.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::maps::LookupMaps;
use crate::operation::DEFAULT_MAX_PASSES;

/// One rule: a pattern, its replacement template and a flag string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleConfig {
    /// POSIX regular expression matched against the input.
    pub pattern: String,
    /// Replacement template (`%1`, `%%`, `%{map(arg)}`).
    pub replacement: String,
    /// Flag characters, e.g. `":@"` or `"G{2}"`.
    pub flags: String,
    /// Free-form note, not used by the engine.
    pub description: Option<String>,
}

/// A named context: either a list of rules or an alias of another context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    pub name: String,
    pub alias: Option<String>,
    pub rules: Vec<RuleConfig>,
}

/// Represents the top-level configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// When false, every rewrite returns its input unchanged.
    pub enabled: bool,
    /// Global ceiling on match attempts per rewrite.
    pub max_passes: u32,
    /// Default per-rule limit, overridable with the `M{N}` flag.
    pub max_passes_per_rule: u32,
    /// Named lookup tables available to replacement templates.
    pub maps: LookupMaps,
    /// Contexts in declaration order.
    pub contexts: Vec<ContextConfig>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_passes: DEFAULT_MAX_PASSES,
            max_passes_per_rule: DEFAULT_MAX_PASSES,
            maps: LookupMaps::default(),
            contexts: Vec::new(),
        }
    }
}

impl RewriteConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rewrite configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded {} context(s) from file {}.", config.contexts.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: RewriteConfig = serde_yml::from_str(text).context("Invalid rewrite configuration YAML")?;
        validate_config(&config)?;
        debug!(
            "Parsed configuration: {} context(s), {} map(s), {} total rule(s)",
            config.contexts.len(),
            config.maps.len(),
            config.rule_count()
        );
        Ok(config)
    }

    /// Total number of rules across all contexts.
    pub fn rule_count(&self) -> usize {
        self.contexts.iter().map(|c| c.rules.len()).sum()
    }
}

/// Validates context names and aliases, reporting every problem at once.
fn validate_config(config: &RewriteConfig) -> Result<()> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for ctx in &config.contexts {
        if ctx.name.trim().is_empty() {
            errors.push("A context has an empty `name` field.".to_string());
        } else if !names.insert(ctx.name.as_str()) {
            errors.push(format!("Duplicate context name found: '{}'.", ctx.name));
        }
        if ctx.alias.is_some() && !ctx.rules.is_empty() {
            errors.push(format!("Context '{}' is an alias and cannot define rules.", ctx.name));
        }
        for (i, rule) in ctx.rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                errors.push(format!("Rule {} of context '{}' has an empty `pattern` field.", i, ctx.name));
            }
        }
    }

    for ctx in &config.contexts {
        let Some(target) = ctx.alias.as_deref() else { continue };
        match config.contexts.iter().find(|c| c.name == target) {
            None => errors.push(format!("Context '{}' aliases unknown context '{}'.", ctx.name, target)),
            Some(t) if t.alias.is_some() => errors.push(format!(
                "Context '{}' aliases '{}', which is itself an alias.",
                ctx.name, target
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Rewrite configuration validation failed:\n{}", errors.join("\n")))
    }
}
