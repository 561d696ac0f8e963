//! compiler.rs - Compiles `(pattern, replacement, flags)` triples into rules.
//!
//! The flag string is read one character at a time, left to right:
//!
//! | flag | effect |
//! |------|--------|
//! | `C`  | honor case (matching is case-insensitive by default) |
//! | `R`  | POSIX basic syntax instead of extended |
//! | `:`  | apply the rule once, never recurse |
//! | `@`  | stop the chain after this rule matches |
//! | `#`  | refuse the operation when this rule matches (implies `:`) |
//! | `G{N}` | jump `N` rules after this rule matches |
//! | `U{N}` | abort the chain with user code `N` after this rule matches |
//! | `M{N}` | allow at most `N` passes of this rule (`N < 1` means 1) |
//! | `I`  | a substitution error on this rule is not fatal |
//!
//! Unknown characters are skipped. Braced numbers follow `strtol` base-0
//! conventions: optional sign, `0x` for hex, a leading `0` for octal.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use super::{pattern, Action, ExecutionMode, Rule};
use crate::engine::SubstitutionEngine;
use crate::engines::template::TemplateEngine;
use crate::errors::CompileError;

pub const FLAG_HONOR_CASE: char = 'C';
pub const FLAG_BASIC_REGEX: char = 'R';
pub const FLAG_EXEC_ONCE: char = ':';
pub const FLAG_STOP: char = '@';
pub const FLAG_UNWILLING: char = '#';
pub const FLAG_GOTO: char = 'G';
pub const FLAG_USER: char = 'U';
pub const FLAG_MAX_PASSES: char = 'M';
pub const FLAG_IGNORE_ERR: char = 'I';

/// The settings derived from a flag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFlags {
    pub case_sensitive: bool,
    pub extended: bool,
    pub mode: ExecutionMode,
    pub max_passes: u32,
    pub actions: Vec<Action>,
}

impl RuleFlags {
    fn defaults(default_max_passes: u32) -> Self {
        Self {
            case_sensitive: false,
            extended: true,
            mode: ExecutionMode::Recurse,
            max_passes: default_max_passes.max(1),
            actions: Vec::new(),
        }
    }
}

/// Parses a flag string. `default_max_passes` applies unless `M{N}` overrides it.
pub fn parse_flags(flags: &str, default_max_passes: u32) -> Result<RuleFlags, CompileError> {
    let chars: Vec<char> = flags.chars().collect();
    let mut parsed = RuleFlags::defaults(default_max_passes);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            FLAG_HONOR_CASE => parsed.case_sensitive = true,
            FLAG_BASIC_REGEX => parsed.extended = false,
            FLAG_EXEC_ONCE => parsed.mode = ExecutionMode::ExecOnce,
            FLAG_STOP => parsed.actions.push(Action::Stop),
            FLAG_UNWILLING => {
                parsed.mode = ExecutionMode::ExecOnce;
                parsed.actions.push(Action::Unwilling);
            }
            flag @ (FLAG_GOTO | FLAG_USER) => {
                let (value, close) = parse_braced_int(flags, &chars, i)?;
                if flag == FLAG_GOTO {
                    parsed.actions.push(Action::Goto(value));
                } else if value == 0 {
                    return Err(CompileError::ZeroUserCode(flags.to_string()));
                } else {
                    parsed.actions.push(Action::UserCode(value));
                }
                i = close;
            }
            FLAG_MAX_PASSES => {
                let (value, close) = parse_braced_int(flags, &chars, i)?;
                parsed.max_passes = u32::try_from(value.max(1)).unwrap_or(1);
                i = close;
            }
            FLAG_IGNORE_ERR => parsed.actions.push(Action::IgnoreErrors),
            other => debug!("Ignoring unknown rewrite flag '{}' in '{}'", other, flags),
        }
        i += 1;
    }

    Ok(parsed)
}

/// Parses `{N}` right after the flag at `chars[at]`. Returns the value and the
/// index of the closing brace.
fn parse_braced_int(flags: &str, chars: &[char], at: usize) -> Result<(i32, usize), CompileError> {
    let malformed = || CompileError::MalformedFlag {
        flags: flags.to_string(),
        flag: chars[at],
        position: at,
    };

    if chars.get(at + 1) != Some(&'{') {
        return Err(malformed());
    }

    let mut i = at + 2;
    while chars.get(i).is_some_and(|c| c.is_ascii_whitespace()) {
        i += 1;
    }

    let negative = match chars.get(i) {
        Some('-') => {
            i += 1;
            true
        }
        Some('+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let hex_prefix = chars.get(i) == Some(&'0')
        && matches!(chars.get(i + 1), Some('x') | Some('X'))
        && chars.get(i + 2).is_some_and(|c| c.is_ascii_hexdigit());
    let radix = if hex_prefix {
        i += 2;
        16
    } else if chars.get(i) == Some(&'0') {
        8
    } else {
        10
    };

    let digits_start = i;
    let mut value: i64 = 0;
    while let Some(d) = chars.get(i).and_then(|c| c.to_digit(radix)) {
        value = value
            .checked_mul(i64::from(radix))
            .and_then(|v| v.checked_add(i64::from(d)))
            .filter(|v| *v <= i64::from(i32::MAX) + 1)
            .ok_or_else(malformed)?;
        i += 1;
    }
    if i == digits_start || chars.get(i) != Some(&'}') {
        return Err(malformed());
    }

    let value = if negative { -value } else { value };
    let value = i32::try_from(value).map_err(|_| malformed())?;
    Ok((value, i))
}

impl Rule {
    /// Compiles a rule using the default template engine.
    pub fn compile(
        pattern: &str,
        replacement: &str,
        flags: &str,
        default_max_passes: u32,
    ) -> Result<Rule, CompileError> {
        Self::compile_with(&TemplateEngine, pattern, replacement, flags, default_max_passes)
    }

    /// Compiles a rule, compiling the replacement with `engine`.
    ///
    /// Nothing is retained on failure: every intermediate value is dropped.
    pub fn compile_with(
        engine: &dyn SubstitutionEngine,
        pattern: &str,
        replacement: &str,
        flags: &str,
        default_max_passes: u32,
    ) -> Result<Rule, CompileError> {
        debug!(
            target: "rewrite_core::rule",
            "Compiling rule pattern='{}' replacement='{}' flags='{}'",
            pattern, replacement, flags
        );

        let substitution = engine.compile(replacement)?;
        let parsed = parse_flags(flags, default_max_passes)?;
        let regex = pattern::compile(pattern, parsed.case_sensitive, parsed.extended)?;

        debug!(
            target: "rewrite_core::rule",
            "Rule '{}' compiled successfully ({:?}, max {} pass(es), {} action(s)).",
            pattern,
            parsed.mode,
            parsed.max_passes,
            parsed.actions.len()
        );

        Ok(Rule {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            flags: flags.to_string(),
            regex,
            substitution,
            case_sensitive: parsed.case_sensitive,
            extended: parsed.extended,
            mode: parsed.mode,
            max_passes: parsed.max_passes,
            actions: parsed.actions,
        })
    }
}
