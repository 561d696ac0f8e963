//! Rewrite rules: compilation, control-flow actions and execution.
//!
//! A `Rule` is built once from a `(pattern, replacement, flags)` triple by
//! `compiler`, owned by exactly one `RuleContext`, and applied to strings by
//! `executor`. After compilation a rule is never mutated, so it can be shared
//! between any number of concurrent rewrites.

pub mod action;
pub mod compiler;
pub mod executor;
pub mod pattern;

use regex::Regex;

pub use action::Action;
pub use compiler::{parse_flags, RuleFlags};
pub use executor::RewriteOutcome;

use crate::engine::SubstitutionHandle;

/// Whether a matching rule is re-applied to its own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    /// Re-apply until the pattern stops matching or a pass limit is hit.
    #[default]
    Recurse,
    /// Apply at most once.
    ExecOnce,
}

/// A compiled rewrite rule.
#[derive(Debug)]
pub struct Rule {
    pattern: String,
    replacement: String,
    flags: String,
    regex: Regex,
    substitution: SubstitutionHandle,
    case_sensitive: bool,
    extended: bool,
    mode: ExecutionMode,
    max_passes: u32,
    actions: Vec<Action>,
}

impl Rule {
    /// The pattern source text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The replacement template source text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// The flag string the rule was compiled with.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn substitution(&self) -> &SubstitutionHandle {
        &self.substitution
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True for POSIX extended syntax, false for basic syntax.
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn has_action(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// True when the rule carries the ignore-errors action.
    pub fn ignores_errors(&self) -> bool {
        self.has_action(Action::IgnoreErrors)
    }
}
