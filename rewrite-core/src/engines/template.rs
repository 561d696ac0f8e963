// rewrite-core/src/engines/template.rs
//! The default `SubstitutionEngine`: a small `%`-escaped template language.
//!
//! Syntax:
//!
//! * `%0` .. `%9` - text of a captured group (`%0` is the whole match). A
//!   group that did not participate expands to the empty string.
//! * `%%` - a literal `%`.
//! * `%{name(arg)}` - the value stored under key `arg` in lookup map `name`.
//!   `arg` is itself a template and may reference groups or other maps. The
//!   argument ends at the first `)` that is immediately followed by `}`.
//!
//! Any other use of `%` is a compile error.
//!
//! License: MIT OR APACHE 2.0

use log::trace;

use crate::engine::{Substitution, SubstitutionEngine, SubstitutionHandle};
use crate::errors::{CompileError, RewriteError};
use crate::operation::OperationContext;

/// Escape character of the template language.
pub const ESCAPE: char = '%';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Group(usize),
    Map { name: String, arg: Vec<Part> },
}

/// Compiles templates written in the `%` syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateEngine;

impl SubstitutionEngine for TemplateEngine {
    fn compile(&self, template: &str) -> Result<SubstitutionHandle, CompileError> {
        Ok(Box::new(CompiledTemplate::compile(template)?))
    }
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    parts: Vec<Part>,
}

impl CompiledTemplate {
    pub fn compile(template: &str) -> Result<Self, CompileError> {
        let chars: Vec<char> = template.chars().collect();
        let mut parser = Parser { template, chars: &chars, pos: 0 };
        let parts = parser.parse_parts(false)?;
        Ok(Self {
            source: template.to_string(),
            parts,
        })
    }
}

impl Substitution for CompiledTemplate {
    fn apply(&self, groups: &[Option<&str>], op: &OperationContext<'_>) -> Result<String, RewriteError> {
        let mut out = String::new();
        expand(&self.parts, groups, op, &mut out)?;
        Ok(out)
    }

    fn template(&self) -> &str {
        &self.source
    }
}

fn expand(
    parts: &[Part],
    groups: &[Option<&str>],
    op: &OperationContext<'_>,
    out: &mut String,
) -> Result<(), RewriteError> {
    for part in parts {
        match part {
            Part::Literal(text) => out.push_str(text),
            Part::Group(n) => out.push_str(groups.get(*n).copied().flatten().unwrap_or("")),
            Part::Map { name, arg } => {
                let mut key = String::new();
                expand(arg, groups, op, &mut key)?;
                let maps = op.maps().ok_or_else(|| {
                    RewriteError::SubstitutionFailed(format!("no lookup maps available for map '{}'", name))
                })?;
                if !maps.contains_map(name) {
                    return Err(RewriteError::SubstitutionFailed(format!("unknown map '{}'", name)));
                }
                let value = maps.lookup(name, &key).ok_or_else(|| {
                    RewriteError::SubstitutionFailed(format!("no entry for '{}' in map '{}'", key, name))
                })?;
                trace!("Map '{}' resolved '{}' to '{}'", name, key, value);
                out.push_str(value);
            }
        }
    }
    Ok(())
}

struct Parser<'t> {
    template: &'t str,
    chars: &'t [char],
    pos: usize,
}

impl Parser<'_> {
    /// Parses until the end of input, or, inside a map argument, until the
    /// closing `)}` (which is left for the caller to consume).
    fn parse_parts(&mut self, in_arg: bool) -> Result<Vec<Part>, CompileError> {
        let mut parts = Vec::new();
        let mut literal = String::new();

        while let Some(&c) = self.chars.get(self.pos) {
            if in_arg && c == ')' && self.chars.get(self.pos + 1) == Some(&'}') {
                break;
            }
            if c != ESCAPE {
                literal.push(c);
                self.pos += 1;
                continue;
            }

            match self.chars.get(self.pos + 1) {
                Some(&ESCAPE) => {
                    literal.push(ESCAPE);
                    self.pos += 2;
                }
                Some(d) if d.is_ascii_digit() => {
                    flush(&mut literal, &mut parts);
                    parts.push(Part::Group(d.to_digit(10).unwrap_or(0) as usize));
                    self.pos += 2;
                }
                Some('{') => {
                    flush(&mut literal, &mut parts);
                    self.pos += 2;
                    parts.push(self.parse_map()?);
                }
                Some(other) => {
                    return Err(self.error(format!("unknown escape '%{}'", other)));
                }
                None => return Err(self.error("dangling '%' at end of template")),
            }
        }

        if in_arg && self.pos >= self.chars.len() {
            return Err(self.error("unterminated map invocation"));
        }
        flush(&mut literal, &mut parts);
        Ok(parts)
    }

    fn parse_map(&mut self) -> Result<Part, CompileError> {
        let start = self.pos;
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '(' => break,
                '}' | ESCAPE => return Err(self.error("map invocation needs an argument list")),
                _ => self.pos += 1,
            }
        }
        if self.pos >= self.chars.len() {
            return Err(self.error("unterminated map invocation"));
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.trim().is_empty() {
            return Err(self.error("empty map name"));
        }
        self.pos += 1; // '('
        let arg = self.parse_parts(true)?;
        self.pos += 2; // ')}'
        Ok(Part::Map {
            name: name.trim().to_string(),
            arg,
        })
    }

    fn error(&self, reason: impl Into<String>) -> CompileError {
        CompileError::InvalidTemplate {
            template: self.template.to_string(),
            reason: reason.into(),
        }
    }
}

fn flush(literal: &mut String, parts: &mut Vec<Part>) {
    if !literal.is_empty() {
        parts.push(Part::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::LookupMaps;

    fn render(template: &str, groups: &[Option<&str>]) -> Result<String, RewriteError> {
        let compiled = CompiledTemplate::compile(template).unwrap();
        compiled.apply(groups, &OperationContext::default())
    }

    #[test]
    fn test_group_references() {
        let out = render("%1,dc=example,dc=org", &[Some("uid=a,dc=x"), Some("uid=a")]).unwrap();
        assert_eq!(out, "uid=a,dc=example,dc=org");
    }

    #[test]
    fn test_missing_and_unmatched_groups_expand_empty() {
        assert_eq!(render("[%1][%5]", &[Some("x"), None]).unwrap(), "[][]");
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(render("100%%", &[Some("")]).unwrap(), "100%");
    }

    #[test]
    fn test_invalid_templates() {
        for bad in ["%", "%x", "%{", "%{map}", "%{(x)}", "%{m(x)"] {
            assert!(
                matches!(CompiledTemplate::compile(bad), Err(CompileError::InvalidTemplate { .. })),
                "template {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_map_lookup() {
        let mut maps = LookupMaps::new();
        maps.insert("people", "alice", "bob");
        let op = OperationContext::default().with_maps(&maps);
        let compiled = CompiledTemplate::compile("uid=%{people(%1)})").unwrap();
        let out = compiled.apply(&[Some("alice"), Some("alice")], &op).unwrap();
        assert_eq!(out, "uid=bob)");
    }

    #[test]
    fn test_nested_map_lookup() {
        let mut maps = LookupMaps::new();
        maps.insert("inner", "a", "b");
        maps.insert("outer", "b", "c");
        let op = OperationContext::default().with_maps(&maps);
        let compiled = CompiledTemplate::compile("%{outer(%{inner(%0)})}").unwrap();
        assert_eq!(compiled.apply(&[Some("a")], &op).unwrap(), "c");
    }

    #[test]
    fn test_map_failures() {
        let mut maps = LookupMaps::new();
        maps.insert("people", "alice", "bob");
        let compiled = CompiledTemplate::compile("%{people(%0)}").unwrap();

        let no_maps = OperationContext::default();
        assert!(matches!(
            compiled.apply(&[Some("alice")], &no_maps),
            Err(RewriteError::SubstitutionFailed(_))
        ));

        let op = OperationContext::default().with_maps(&maps);
        assert!(matches!(
            compiled.apply(&[Some("carol")], &op),
            Err(RewriteError::SubstitutionFailed(_))
        ));

        let unknown = CompiledTemplate::compile("%{nobody(%0)}").unwrap();
        assert!(matches!(
            unknown.apply(&[Some("alice")], &op),
            Err(RewriteError::SubstitutionFailed(_))
        ));
    }

    #[test]
    fn test_engine_trait_compiles_templates() {
        let handle = TemplateEngine.compile("%0!").unwrap();
        assert_eq!(handle.template(), "%0!");
        assert_eq!(handle.apply(&[Some("hi")], &OperationContext::default()).unwrap(), "hi!");
    }
}
