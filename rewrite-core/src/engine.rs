// rewrite-core/src/engine.rs
//! Defines the substitution engine traits.
//!
//! A rule does not know how its replacement text is produced. It owns a
//! compiled [`Substitution`] created by a [`SubstitutionEngine`] when the rule
//! is compiled, and calls it with the captured groups every time the rule's
//! pattern matches. This keeps the template language pluggable; the default
//! implementation lives in `engines::template`.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use crate::errors::{CompileError, RewriteError};
use crate::operation::OperationContext;

/// A compiled replacement template.
///
/// Implementations must be pure with respect to `self`: rules are shared
/// read-only between concurrent rewrites.
pub trait Substitution: Send + Sync + fmt::Debug {
    /// Produces the replacement text.
    ///
    /// # Arguments
    /// * `groups` - Captured groups in order, `groups[0]` being the whole
    ///   match. `None` marks a group that did not participate.
    /// * `op` - The operation context of the current rewrite, giving access to
    ///   lookup maps.
    fn apply(&self, groups: &[Option<&str>], op: &OperationContext<'_>) -> Result<String, RewriteError>;

    /// The template source this substitution was compiled from.
    fn template(&self) -> &str;
}

/// Owned handle to a compiled substitution, held exclusively by one rule.
pub type SubstitutionHandle = Box<dyn Substitution>;

/// Compiles replacement templates into substitutions.
pub trait SubstitutionEngine: Send + Sync + fmt::Debug {
    fn compile(&self, template: &str) -> Result<SubstitutionHandle, CompileError>;
}
