//! errors.rs - Custom error types for the rewrite-core library.
//!
//! Two families of errors exist. `CompileError` is raised while a rule chain is
//! being built (bad pattern, bad flag argument, bad replacement template) and is
//! meant to be treated as a configuration error by the caller. `RewriteError` is
//! raised while a string is being rewritten.
//!
//! Running out of pass budget is not an error: it ends recursion silently and
//! the last successful result is kept.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Errors raised while compiling a rule or assembling a rewriter.
///
/// Non-exhaustive: match with a wildcard arm.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompileError {
    #[error("Failed to compile rewrite pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rewrite pattern length ({0}) exceeds maximum allowed ({1})")]
    PatternLengthExceeded(usize, usize),

    #[error("Unsupported construct in pattern '{pattern}': {reason}")]
    UnsupportedPattern { pattern: String, reason: String },

    #[error("Malformed argument for flag '{flag}' at offset {position} in flag string '{flags}'")]
    MalformedFlag {
        flags: String,
        flag: char,
        position: usize,
    },

    #[error("User code 0 is reserved for success and cannot be attached to a rule (flags '{0}')")]
    ZeroUserCode(String),

    #[error("Invalid replacement template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Rewrite context '{0}' does not exist")]
    UnknownContext(String),

    #[error("Rewrite context '{0}' is already defined")]
    DuplicateContext(String),
}

/// Errors raised while applying a rule or running a rule chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RewriteError {
    #[error("Substitution failed: {0}")]
    SubstitutionFailed(String),

    #[error("Jump of {offset} from rule {rule} leaves a chain of {len} rule(s)")]
    JumpOutOfRange { rule: usize, offset: i32, len: usize },
}
