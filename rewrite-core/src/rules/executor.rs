//! executor.rs - Applies a single rule to a string.
//!
//! A recursing rule is re-applied to its own output until its pattern stops
//! matching, the rule has performed `max_passes` substitutions, or the
//! operation's global ceiling is reached. Every match attempt, successful or
//! not, is counted against the global ceiling, so a call makes at most
//! `rule.max_passes` attempts and the whole operation can never loop.
//!
//! License: MIT OR APACHE 2.0

use log::trace;

use super::{pattern, ExecutionMode, Rule};
use crate::errors::RewriteError;
use crate::operation::OperationContext;

/// Result of applying one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The pattern did not match the input at all.
    NoMatch,
    /// The pattern matched at least once; the string after the last substitution.
    Matched(String),
}

impl Rule {
    /// Applies this rule to `input`, counting passes in `op`.
    pub fn apply(&self, input: &str, op: &mut OperationContext<'_>) -> Result<RewriteOutcome, RewriteError> {
        let mut current: Option<String> = None;
        let mut passes: u32 = 0;

        loop {
            let subject = current.as_deref().unwrap_or(input);
            op.record_pass();
            trace!(
                target: "rewrite_core::rule",
                "==> apply rule='{}' string='{}' [{} pass(es)]",
                self.pattern, subject, passes + 1
            );

            let Some(spans) = pattern::find(&self.regex, subject, pattern::MAX_MATCH) else {
                return Ok(match current {
                    Some(result) => RewriteOutcome::Matched(result),
                    None => RewriteOutcome::NoMatch,
                });
            };

            let groups: Vec<Option<&str>> = spans
                .iter()
                .map(|span| span.map(|(start, end)| &subject[start..end]))
                .collect();
            let result = self.substitution.apply(&groups, op)?;
            passes += 1;

            let again = self.mode == ExecutionMode::Recurse
                && !op.is_exhausted()
                && passes < self.max_passes;
            if !again {
                return Ok(RewriteOutcome::Matched(result));
            }
            current = Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::DEFAULT_MAX_PASSES;

    #[test]
    fn test_end_to_end_suffix_rewrite() {
        let rule = Rule::compile("^(.+),dc=example,dc=com$", "%1,dc=example,dc=org", "", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        let outcome = rule.apply("uid=alice,dc=example,dc=com", &mut op).unwrap();
        assert_eq!(outcome, RewriteOutcome::Matched("uid=alice,dc=example,dc=org".to_string()));
        assert_eq!(op.total_passes(), 2);
    }

    #[test]
    fn test_no_match() {
        let rule = Rule::compile("^cn=", "x", "", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        let input = "uid=alice";
        assert_eq!(rule.apply(input, &mut op).unwrap(), RewriteOutcome::NoMatch);
        assert_eq!(input, "uid=alice");
        assert_eq!(op.total_passes(), 1);
    }

    #[test]
    fn test_per_rule_limit_bounds_attempts() {
        // Always matches and always grows: only the limit stops it.
        let rule = Rule::compile("^(.*)$", "%1x", "M{3}", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        let outcome = rule.apply("a", &mut op).unwrap();
        assert_eq!(outcome, RewriteOutcome::Matched("axxx".to_string()));
        assert_eq!(op.total_passes(), 3);
    }

    #[test]
    fn test_max_passes_one_applies_once() {
        let rule = Rule::compile("a", "aa", "M{1}", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        assert_eq!(rule.apply("a", &mut op).unwrap(), RewriteOutcome::Matched("aa".to_string()));
        assert_eq!(op.total_passes(), 1);
    }

    #[test]
    fn test_exec_once_never_reapplies() {
        for flags in [":", "#"] {
            let rule = Rule::compile("a", "aa", flags, DEFAULT_MAX_PASSES).unwrap();
            let mut op = OperationContext::default();
            assert_eq!(rule.apply("a", &mut op).unwrap(), RewriteOutcome::Matched("aa".to_string()));
            assert_eq!(op.total_passes(), 1);
        }
    }

    #[test]
    fn test_global_ceiling_shared_across_rules() {
        let rule = Rule::compile("^(.*)$", "%1x", "", 1000).unwrap();
        let mut op = OperationContext::new(5);
        assert_eq!(rule.apply("", &mut op).unwrap(), RewriteOutcome::Matched("xxxxx".to_string()));
        assert_eq!(op.total_passes(), 5);
        // Budget is spent: the next rule gets a single attempt.
        assert_eq!(rule.apply("", &mut op).unwrap(), RewriteOutcome::Matched("x".to_string()));
        assert_eq!(op.total_passes(), 6);
    }

    #[test]
    fn test_identical_output_keeps_recursing() {
        let rule = Rule::compile("a", "a", "M{4}", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        assert_eq!(rule.apply("a", &mut op).unwrap(), RewriteOutcome::Matched("a".to_string()));
        assert_eq!(op.total_passes(), 4);
    }

    #[test]
    fn test_substitution_error_propagates() {
        let rule = Rule::compile("(.+)", "%{missing(%1)}", "I", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        assert!(matches!(rule.apply("x", &mut op), Err(RewriteError::SubstitutionFailed(_))));
    }

    #[test]
    fn test_unmatched_group_substitutes_empty() {
        let rule = Rule::compile("^(a)?b$", "[%1]", ":", DEFAULT_MAX_PASSES).unwrap();
        let mut op = OperationContext::default();
        assert_eq!(rule.apply("b", &mut op).unwrap(), RewriteOutcome::Matched("[]".to_string()));
    }
}
