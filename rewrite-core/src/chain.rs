//! chain.rs - Runs a rule context against a string.
//!
//! The driver walks the rules of a context with a cursor. After a rule
//! matches, its actions are looked at together, highest precedence first:
//! `Unwilling`, then `UserCode`, then `Stop`, then `Goto`. A rule that fails
//! while carrying `IgnoreErrors` is treated as if it had not matched.
//!
//! The walk ends early once the operation's global pass ceiling is reached,
//! which also bounds backward and zero-length jumps.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use serde::Serialize;

use crate::context::RuleContext;
use crate::errors::RewriteError;
use crate::operation::OperationContext;
use crate::rules::{Action, RewriteOutcome, Rule};

/// Final result of running a whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ChainOutcome {
    /// No rule matched; the input stands as it is.
    Unchanged,
    /// At least one rule matched; the rewritten string.
    Rewritten(String),
    /// A matching rule refused the operation.
    Unwilling,
    /// A matching rule aborted the chain with this code.
    UserCode(i32),
}

impl ChainOutcome {
    /// The resulting string, falling back to `input` when nothing changed.
    /// Refusals and user codes have no string.
    pub fn into_string(self, input: &str) -> Option<String> {
        match self {
            ChainOutcome::Unchanged => Some(input.to_string()),
            ChainOutcome::Rewritten(s) => Some(s),
            ChainOutcome::Unwilling | ChainOutcome::UserCode(_) => None,
        }
    }
}

enum Step {
    Next,
    Jump(i32),
    Stop,
    Finish(ChainOutcome),
}

/// Runs every rule of `context` over `input`.
pub fn run_chain(
    context: &RuleContext,
    input: &str,
    op: &mut OperationContext<'_>,
) -> Result<ChainOutcome, RewriteError> {
    let len = context.len();
    let mut current: Option<String> = None;
    let mut cursor: usize = 0;

    debug!("Running context '{}' ({} rule(s)) on '{}'", context.name(), len, input);

    while cursor < len {
        if op.is_exhausted() {
            warn!(
                "Context '{}' stopped at rule {}: pass budget of {} exhausted",
                context.name(),
                cursor,
                op.max_passes()
            );
            break;
        }
        let Some(rule) = context.get(cursor) else { break };
        let subject = current.as_deref().unwrap_or(input);

        let outcome = match rule.apply(subject, op) {
            Ok(outcome) => outcome,
            Err(e) if rule.ignores_errors() => {
                debug!("Ignoring error from rule {} ('{}'): {}", cursor, rule.pattern(), e);
                RewriteOutcome::NoMatch
            }
            Err(e) => return Err(e),
        };

        let step = match outcome {
            RewriteOutcome::NoMatch => Step::Next,
            RewriteOutcome::Matched(result) => {
                current = Some(result);
                decide(rule)
            }
        };

        match step {
            Step::Next => cursor += 1,
            Step::Jump(offset) => {
                let target = cursor as i64 + i64::from(offset);
                if target < 0 || target > len as i64 {
                    return Err(RewriteError::JumpOutOfRange { rule: cursor, offset, len });
                }
                debug!("Rule {} jumps {} to rule {}", cursor, offset, target);
                cursor = target as usize;
            }
            Step::Stop => break,
            Step::Finish(outcome) => return Ok(outcome),
        }
    }

    Ok(match current {
        Some(result) => ChainOutcome::Rewritten(result),
        None => ChainOutcome::Unchanged,
    })
}

/// Picks the control-flow step for a rule that just matched.
fn decide(rule: &Rule) -> Step {
    let actions = rule.actions();
    if !actions.is_empty() {
        let flags: Vec<String> = actions.iter().map(Action::to_string).collect();
        debug!("Rule '{}' matched with action(s) [{}]", rule.pattern(), flags.join(" "));
    }

    if actions.contains(&Action::Unwilling) {
        debug!("Rule '{}' matched: unwilling to perform", rule.pattern());
        return Step::Finish(ChainOutcome::Unwilling);
    }
    if let Some(code) = actions.iter().find_map(|a| match a {
        Action::UserCode(code) => Some(*code),
        _ => None,
    }) {
        debug!("Rule '{}' matched: user code {}", rule.pattern(), code);
        return Step::Finish(ChainOutcome::UserCode(code));
    }
    if actions.contains(&Action::Stop) {
        debug!("Rule '{}' matched: stop", rule.pattern());
        return Step::Stop;
    }
    if let Some(offset) = actions.iter().find_map(|a| match a {
        Action::Goto(offset) => Some(*offset),
        _ => None,
    }) {
        return Step::Jump(offset);
    }
    Step::Next
}
