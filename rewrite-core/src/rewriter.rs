//! rewriter.rs - The top-level rewrite engine.
//!
//! A `Rewriter` owns a set of named rule contexts (plus aliases pointing at
//! them), the global and per-rule pass limits, the lookup maps used by
//! replacement templates, and the substitution engine rules are compiled with.
//! It is built once and then shared read-only; every call to
//! [`Rewriter::rewrite`] gets its own `OperationContext`.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::collections::HashMap;

use crate::chain::{run_chain, ChainOutcome};
use crate::config::RewriteConfig;
use crate::context::RuleContext;
use crate::engine::SubstitutionEngine;
use crate::engines::template::TemplateEngine;
use crate::errors::{CompileError, RewriteError};
use crate::maps::LookupMaps;
use crate::operation::{OperationContext, DEFAULT_MAX_PASSES};

/// Name of the context used when a requested context does not exist.
pub const DEFAULT_CONTEXT: &str = "default";

#[derive(Debug)]
pub struct Rewriter {
    enabled: bool,
    max_passes: u32,
    max_passes_per_rule: u32,
    contexts: Vec<RuleContext>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    maps: LookupMaps,
    engine: Box<dyn SubstitutionEngine>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Rewriter {
    pub fn new() -> Self {
        Self::with_engine(Box::new(TemplateEngine))
    }

    /// Creates a rewriter compiling replacements with `engine`.
    pub fn with_engine(engine: Box<dyn SubstitutionEngine>) -> Self {
        Self {
            enabled: true,
            max_passes: DEFAULT_MAX_PASSES,
            max_passes_per_rule: DEFAULT_MAX_PASSES,
            contexts: Vec::new(),
            index: HashMap::new(),
            aliases: HashMap::new(),
            maps: LookupMaps::new(),
            engine,
        }
    }

    /// Builds a rewriter from a validated configuration.
    ///
    /// Every rule is compiled; if any fails, all failures are reported together
    /// and no rewriter is returned.
    pub fn from_config(config: &RewriteConfig) -> Result<Self> {
        let mut rewriter = Self::new().with_limits(config.max_passes, config.max_passes_per_rule);
        rewriter.set_enabled(config.enabled);
        rewriter.set_maps(config.maps.clone());

        let mut compilation_errors = Vec::new();

        for ctx in config.contexts.iter().filter(|c| c.alias.is_none()) {
            if let Err(e) = rewriter.add_context(&ctx.name) {
                compilation_errors.push(e.to_string());
                continue;
            }
            for (i, rule) in ctx.rules.iter().enumerate() {
                if let Err(e) = rewriter.compile_rule(&ctx.name, &rule.pattern, &rule.replacement, &rule.flags) {
                    compilation_errors.push(format!("Context '{}', rule {}: {}", ctx.name, i, e));
                }
            }
        }

        for ctx in &config.contexts {
            if let Some(target) = ctx.alias.as_deref() {
                if let Err(e) = rewriter.add_alias(&ctx.name, target) {
                    compilation_errors.push(e.to_string());
                }
            }
        }

        if !compilation_errors.is_empty() {
            return Err(anyhow!(
                "Failed to compile {} rewrite rule(s):\n{}",
                compilation_errors.len(),
                compilation_errors.join("\n")
            ));
        }

        info!(
            "Rewriter ready: {} context(s), {} alias(es)",
            rewriter.contexts.len(),
            rewriter.aliases.len()
        );
        Ok(rewriter)
    }

    /// Sets the global ceiling and the default per-rule limit. Both are
    /// clamped to at least 1 and the per-rule limit never exceeds the ceiling.
    pub fn with_limits(mut self, max_passes: u32, max_passes_per_rule: u32) -> Self {
        self.set_limits(max_passes, max_passes_per_rule);
        self
    }

    pub fn set_limits(&mut self, max_passes: u32, max_passes_per_rule: u32) {
        self.max_passes = max_passes.max(1);
        self.max_passes_per_rule = max_passes_per_rule.clamp(1, self.max_passes);
        debug!(
            "Rewrite limits set: {} pass(es) per operation, {} per rule",
            self.max_passes, self.max_passes_per_rule
        );
    }

    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    pub fn max_passes_per_rule(&self) -> u32 {
        self.max_passes_per_rule
    }

    /// Turns the engine on or off. A disabled engine returns every input unchanged.
    pub fn set_enabled(&mut self, enabled: bool) {
        info!("Rewrite engine {}", if enabled { "enabled" } else { "disabled" });
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_maps(&mut self, maps: LookupMaps) {
        self.maps = maps;
    }

    pub fn maps(&self) -> &LookupMaps {
        &self.maps
    }

    /// Creates an empty context. Names are unique across contexts and aliases.
    pub fn add_context(&mut self, name: &str) -> Result<&mut RuleContext, CompileError> {
        if self.index.contains_key(name) || self.aliases.contains_key(name) {
            return Err(CompileError::DuplicateContext(name.to_string()));
        }
        debug!("Adding rewrite context '{}'", name);
        self.index.insert(name.to_string(), self.contexts.len());
        self.contexts.push(RuleContext::new(name));
        let last = self.contexts.len() - 1;
        Ok(&mut self.contexts[last])
    }

    /// Makes `alias` resolve to the existing context `target`.
    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<(), CompileError> {
        if self.index.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(CompileError::DuplicateContext(alias.to_string()));
        }
        if !self.index.contains_key(target) {
            return Err(CompileError::UnknownContext(target.to_string()));
        }
        debug!("Adding rewrite context alias '{}' -> '{}'", alias, target);
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(())
    }

    /// Compiles a rule and appends it to the context named `context`.
    pub fn compile_rule(
        &mut self,
        context: &str,
        pattern: &str,
        replacement: &str,
        flags: &str,
    ) -> Result<(), CompileError> {
        let idx = *self
            .index
            .get(context)
            .ok_or_else(|| CompileError::UnknownContext(context.to_string()))?;
        let per_rule = self.max_passes_per_rule;
        self.contexts[idx].compile_rule_with(self.engine.as_ref(), pattern, replacement, flags, per_rule)?;
        Ok(())
    }

    /// Looks up a context by name or alias.
    pub fn context(&self, name: &str) -> Option<&RuleContext> {
        let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.index.get(name).map(|&i| &self.contexts[i])
    }

    /// All contexts in the order they were added.
    pub fn contexts(&self) -> &[RuleContext] {
        &self.contexts
    }

    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Rewrites `input` with the context named `context`, falling back to the
    /// `default` context when no such context exists.
    pub fn rewrite(&self, context: &str, input: &str) -> Result<ChainOutcome, RewriteError> {
        let mut op = OperationContext::new(self.max_passes).with_maps(&self.maps);
        self.rewrite_with(context, input, &mut op)
    }

    /// Like [`Rewriter::rewrite`], with a caller-supplied operation context.
    pub fn rewrite_with(
        &self,
        context: &str,
        input: &str,
        op: &mut OperationContext<'_>,
    ) -> Result<ChainOutcome, RewriteError> {
        if !self.enabled {
            return Ok(ChainOutcome::Unchanged);
        }

        let Some(ctx) = self.context(context).or_else(|| {
            debug!("Rewrite context '{}' not found, trying '{}'", context, DEFAULT_CONTEXT);
            self.context(DEFAULT_CONTEXT)
        }) else {
            debug!("No rewrite context for '{}': input left unchanged", context);
            return Ok(ChainOutcome::Unchanged);
        };

        let outcome = run_chain(ctx, input, op)?;
        debug!(
            "Context '{}' rewrote '{}' -> {:?} in {} pass(es)",
            ctx.name(),
            input,
            outcome,
            op.total_passes()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> Rewriter {
        let mut rw = Rewriter::new();
        rw.add_context("default").unwrap();
        rw.compile_rule("default", "^(.+),dc=example,dc=com$", "%1,dc=example,dc=org", "")
            .unwrap();
        rw.add_context("bind").unwrap();
        rw.compile_rule("bind", "^cn=admin", "x", "#").unwrap();
        rw.add_alias("searchBase", "default").unwrap();
        rw
    }

    #[test]
    fn test_alias_and_fallback() {
        let rw = rewriter();
        let expected = ChainOutcome::Rewritten("uid=a,dc=example,dc=org".to_string());
        assert_eq!(rw.rewrite("searchBase", "uid=a,dc=example,dc=com").unwrap(), expected);
        assert_eq!(rw.rewrite("nonexistent", "uid=a,dc=example,dc=com").unwrap(), expected);
        assert_eq!(rw.rewrite("bind", "cn=admin,o=x").unwrap(), ChainOutcome::Unwilling);
    }

    #[test]
    fn test_no_default_context_leaves_input() {
        let mut rw = Rewriter::new();
        rw.add_context("only").unwrap();
        assert_eq!(rw.rewrite("other", "x").unwrap(), ChainOutcome::Unchanged);
    }

    #[test]
    fn test_disabled_engine() {
        let mut rw = rewriter();
        rw.set_enabled(false);
        assert_eq!(rw.rewrite("default", "uid=a,dc=example,dc=com").unwrap(), ChainOutcome::Unchanged);
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let mut rw = rewriter();
        assert!(matches!(rw.add_context("default"), Err(CompileError::DuplicateContext(_))));
        assert!(matches!(rw.add_context("searchBase"), Err(CompileError::DuplicateContext(_))));
        assert!(matches!(rw.add_alias("x", "missing"), Err(CompileError::UnknownContext(_))));
        assert!(matches!(
            rw.compile_rule("missing", "a", "b", ""),
            Err(CompileError::UnknownContext(_))
        ));
    }

    #[test]
    fn test_limits_are_clamped() {
        let rw = Rewriter::new().with_limits(5, 50);
        assert_eq!(rw.max_passes(), 5);
        assert_eq!(rw.max_passes_per_rule(), 5);
        let rw = Rewriter::new().with_limits(0, 0);
        assert_eq!(rw.max_passes(), 1);
        assert_eq!(rw.max_passes_per_rule(), 1);
    }

    #[test]
    fn test_per_rule_default_from_rewriter() {
        let mut rw = Rewriter::new().with_limits(10, 3);
        rw.add_context("default").unwrap();
        rw.compile_rule("default", "^(.*)$", "%1x", "").unwrap();
        assert_eq!(rw.context("default").unwrap().rules()[0].max_passes(), 3);
        assert_eq!(rw.rewrite("default", "").unwrap(), ChainOutcome::Rewritten("xxx".to_string()));
    }

    #[test]
    fn test_maps_reach_templates() {
        let mut rw = Rewriter::new();
        let mut maps = LookupMaps::new();
        maps.insert("people", "alice", "bob");
        rw.set_maps(maps);
        rw.add_context("default").unwrap();
        rw.compile_rule("default", "^uid=([^,]+)$", "uid=%{people(%1)}", ":").unwrap();
        assert_eq!(rw.rewrite("default", "uid=alice").unwrap(), ChainOutcome::Rewritten("uid=bob".to_string()));
        assert!(matches!(rw.rewrite("default", "uid=carol"), Err(RewriteError::SubstitutionFailed(_))));
    }
}
