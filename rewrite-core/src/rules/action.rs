//! Control-flow actions a matched rule requests from the chain driver.

/// An action attached to a rule. Actions are only considered after the rule
/// matched (or, for `IgnoreErrors`, after it failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Stop processing further rules and keep the current result.
    Stop,
    /// Refuse the whole operation.
    Unwilling,
    /// Move the chain cursor by this many rules (may be negative).
    Goto(i32),
    /// Abort the chain with a caller-defined result code.
    UserCode(i32),
    /// Treat a substitution failure on this rule as a non-match.
    IgnoreErrors,
}

impl Action {
    /// Flag character introducing this action in a flag string.
    pub fn flag_char(&self) -> char {
        match self {
            Action::Stop => '@',
            Action::Unwilling => '#',
            Action::Goto(_) => 'G',
            Action::UserCode(_) => 'U',
            Action::IgnoreErrors => 'I',
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Goto(n) | Action::UserCode(n) => write!(f, "{}{{{}}}", self.flag_char(), n),
            _ => write!(f, "{}", self.flag_char()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_flag_syntax() {
        assert_eq!(Action::Stop.to_string(), "@");
        assert_eq!(Action::Unwilling.to_string(), "#");
        assert_eq!(Action::IgnoreErrors.to_string(), "I");
        assert_eq!(Action::Goto(-2).to_string(), "G{-2}");
        assert_eq!(Action::UserCode(49).to_string(), "U{49}");
    }
}
