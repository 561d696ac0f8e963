// rewrite-core/src/lib.rs
//! # Rewrite Core Library
//!
//! `rewrite-core` is a rule-based, recursive string rewriting engine. Given an
//! input string and an ordered chain of pattern/replacement rules, it matches a
//! regular expression, computes a substitution and optionally re-applies the
//! same rule to its own output, bounded by per-rule and global pass limits.
//! It is meant for rewriting distinguished names and similar protocol strings.
//!
//! ## Modules
//!
//! * `rules`: `Rule` compilation from `(pattern, replacement, flags)`, the
//!   regex adapter, control-flow `Action`s and the per-rule executor.
//! * `context`: `RuleContext`, a named ordered chain of rules.
//! * `chain`: the chain driver that runs a context and interprets actions.
//! * `operation`: `OperationContext`, the per-rewrite pass counter.
//! * `engine`: the `SubstitutionEngine` / `Substitution` traits.
//! * `engines`: concrete substitution engines (`template`).
//! * `maps`: lookup tables used by `%{map(key)}` in templates.
//! * `rewriter`: `Rewriter`, named contexts, aliases, limits and maps together.
//! * `config`: YAML configuration.
//! * `headless`: one-shot helper.
//! * `errors`: `CompileError` and `RewriteError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use rewrite_core::{ChainOutcome, Rewriter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut rewriter = Rewriter::new();
//!     rewriter.add_context("default")?;
//!     rewriter.compile_rule("default", "^(.+),dc=example,dc=com$", "%1,dc=example,dc=org", "")?;
//!
//!     let outcome = rewriter.rewrite("default", "uid=alice,dc=example,dc=com")?;
//!     assert_eq!(outcome, ChainOutcome::Rewritten("uid=alice,dc=example,dc=org".to_string()));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Building rules fails with `CompileError`; rewriting fails with
//! `RewriteError`. Configuration loading uses `anyhow::Error`. Running out of
//! passes is never an error.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod chain;
pub mod config;
pub mod context;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod maps;
pub mod operation;
pub mod rewriter;
pub mod rules;

/// Re-exports the configuration types.
pub use config::{ContextConfig, RewriteConfig, RuleConfig};

/// Re-exports the error types.
pub use errors::{CompileError, RewriteError};

/// Re-exports the rule types and the per-rule outcome.
pub use rules::{Action, ExecutionMode, RewriteOutcome, Rule};

pub use chain::{run_chain, ChainOutcome};
pub use context::RuleContext;
pub use engine::{Substitution, SubstitutionEngine, SubstitutionHandle};
pub use engines::template::TemplateEngine;
pub use headless::headless_rewrite_string;
pub use maps::LookupMaps;
pub use operation::{OperationContext, DEFAULT_MAX_PASSES};
pub use rewriter::{Rewriter, DEFAULT_CONTEXT};
