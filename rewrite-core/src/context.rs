//! Rule contexts: named, ordered rewrite chains.
//!
//! Rules are appended at configuration time and evaluated in insertion order.
//! The context owns its rules; neighbours are addressed by index.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::engine::SubstitutionEngine;
use crate::engines::template::TemplateEngine;
use crate::errors::CompileError;
use crate::rules::Rule;

/// A named, ordered chain of rules.
#[derive(Debug)]
pub struct RuleContext {
    name: String,
    rules: Vec<Rule>,
}

impl RuleContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiles a rule with the default template engine and appends it.
    pub fn compile_rule(
        &mut self,
        pattern: &str,
        replacement: &str,
        flags: &str,
        default_max_passes: u32,
    ) -> Result<&Rule, CompileError> {
        self.compile_rule_with(&TemplateEngine, pattern, replacement, flags, default_max_passes)
    }

    /// Compiles a rule with `engine` and appends it. On error the context is
    /// left unchanged.
    pub fn compile_rule_with(
        &mut self,
        engine: &dyn SubstitutionEngine,
        pattern: &str,
        replacement: &str,
        flags: &str,
        default_max_passes: u32,
    ) -> Result<&Rule, CompileError> {
        let rule = Rule::compile_with(engine, pattern, replacement, flags, default_max_passes)?;
        Ok(self.push(rule))
    }

    /// Appends an already compiled rule at the tail.
    pub fn push(&mut self, rule: Rule) -> &Rule {
        debug!("Appending rule '{}' to context '{}' at position {}", rule.pattern(), self.name, self.rules.len());
        self.rules.push(rule);
        &self.rules[self.rules.len() - 1]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn first(&self) -> Option<&Rule> {
        self.rules.first()
    }

    pub fn last(&self) -> Option<&Rule> {
        self.rules.last()
    }

    /// Index of the rule before `index`, if any.
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        index.checked_sub(1).filter(|i| *i < self.rules.len())
    }

    /// Index of the rule after `index`, if any.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        index.checked_add(1).filter(|i| *i < self.rules.len())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleContext {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
