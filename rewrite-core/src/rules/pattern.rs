//! pattern.rs - Regex adapter for rewrite rules.
//!
//! Rules are written in POSIX regular expression syntax, either extended
//! (the default) or basic. Extended patterns reach the `regex` crate with only
//! their bracket expressions rewritten. Basic patterns are translated into the
//! extended dialect first: the grouping and interval operators are
//! backslash-escaped in basic syntax and the bare characters are literals.
//!
//! Matching follows the semantics of the `regex` crate (leftmost-first), which
//! agrees with POSIX leftmost-longest for the anchored patterns rewrite rules
//! are normally written with.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::errors::CompileError;

/// Maximum allowed length for a rewrite pattern string.
pub const MAX_PATTERN_LENGTH: usize = 4096;

/// Maximum number of capture groups (including the whole match) reported
/// by [`find`]. Template references can address `%0` through `%9`.
pub const MAX_MATCH: usize = 11;

/// A capture span as `(start, end)` byte offsets; `None` when the group did
/// not participate in the match.
pub type Span = Option<(usize, usize)>;

/// Compiles `pattern` with the requested case handling and dialect.
pub fn compile(pattern: &str, case_sensitive: bool, extended: bool) -> Result<Regex, CompileError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(CompileError::PatternLengthExceeded(pattern.len(), MAX_PATTERN_LENGTH));
    }

    let source = if extended {
        translate_extended(pattern)?
    } else {
        let translated = translate_basic(pattern)?;
        debug!("Basic pattern '{}' translated to '{}'", pattern, translated);
        translated
    };

    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|source| CompileError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Runs `regex` against `input` and returns up to `max_groups` capture spans,
/// or `None` when the pattern does not match.
pub fn find(regex: &Regex, input: &str, max_groups: usize) -> Option<Vec<Span>> {
    let caps = regex.captures(input)?;
    Some(
        caps.iter()
            .take(max_groups)
            .map(|m| m.map(|m| (m.start(), m.end())))
            .collect(),
    )
}

/// Translates a POSIX extended regular expression for the `regex` crate.
///
/// Operators outside brackets are shared by both syntaxes and are copied as
/// written; only bracket expressions are rewritten.
pub fn translate_extended(pattern: &str) -> Result<String, CompileError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                out.push('\\');
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
            }
            '[' => i = translate_bracket(pattern, &chars, i, &mut out)?,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Translates a POSIX basic regular expression into the syntax understood by
/// the `regex` crate.
///
/// GNU extensions `\+`, `\?` and `\|` are honoured. Back-references cannot be
/// expressed and are rejected.
pub fn translate_basic(pattern: &str) -> Result<String, CompileError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    // True where a `*` would have nothing to repeat and is therefore literal.
    let mut at_expr_start = true;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    return Err(unsupported(pattern, "trailing backslash"));
                };
                i += 2;
                match next {
                    '(' => {
                        out.push('(');
                        at_expr_start = true;
                        if chars.get(i) == Some(&'^') {
                            out.push('^');
                            i += 1;
                        }
                        continue;
                    }
                    ')' | '{' | '}' | '+' | '?' => out.push(next),
                    '|' => {
                        out.push('|');
                        at_expr_start = true;
                        continue;
                    }
                    '1'..='9' => {
                        return Err(unsupported(pattern, "back-references are not supported"));
                    }
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            '(' | ')' | '{' | '}' | '|' | '+' | '?' => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            '*' if at_expr_start => {
                out.push_str("\\*");
                i += 1;
            }
            '^' if i == 0 => {
                out.push('^');
                i += 1;
                continue;
            }
            '^' => {
                out.push_str("\\^");
                i += 1;
            }
            '$' => {
                let anchors = i + 1 == chars.len()
                    || (chars.get(i + 1) == Some(&'\\') && chars.get(i + 2) == Some(&')'));
                out.push_str(if anchors { "$" } else { "\\$" });
                i += 1;
            }
            '[' => {
                i = translate_bracket(pattern, &chars, i, &mut out)?;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
        at_expr_start = false;
    }

    Ok(out)
}

/// Copies a bracket expression starting at `chars[start] == '['` and returns
/// the index after the closing `]`.
///
/// Inside POSIX brackets only `]` (when not first), `-` (between two items)
/// and `[:class:]` are special. Every other member is escaped so the `regex`
/// crate cannot read it as a nested class, an escape or a set operation
/// (`&&`, `--`, `~~`).
fn translate_bracket(
    pattern: &str,
    chars: &[char],
    start: usize,
    out: &mut String,
) -> Result<usize, CompileError> {
    let mut i = start + 1;
    out.push('[');

    if chars.get(i) == Some(&'^') {
        out.push('^');
        i += 1;
    }
    let first = i;

    while i < chars.len() {
        let c = chars[i];
        if c == ']' && i > first {
            out.push(']');
            return Ok(i + 1);
        }
        if c == '[' && matches!(chars.get(i + 1), Some(':') | Some('.') | Some('=')) {
            let delim = chars[i + 1];
            let close = (i + 2..chars.len().saturating_sub(1))
                .find(|&j| chars[j] == delim && chars[j + 1] == ']')
                .ok_or_else(|| unsupported(pattern, "unterminated character class"))?;
            if delim != ':' {
                return Err(unsupported(pattern, "collating elements are not supported"));
            }
            out.extend(&chars[i..close + 2]);
            i = close + 2;
            continue;
        }

        push_bracket_member(out, c);
        match (chars.get(i + 1), chars.get(i + 2)) {
            (Some('-'), Some(&end)) if end != ']' => {
                out.push('-');
                push_bracket_member(out, end);
                i += 3;
            }
            _ => i += 1,
        }
    }

    Err(unsupported(pattern, "unterminated bracket expression"))
}

fn push_bracket_member(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '-' | '^' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

fn unsupported(pattern: &str, reason: &str) -> CompileError {
    CompileError::UnsupportedPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
