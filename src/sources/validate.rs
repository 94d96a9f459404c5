//! Brace and character-class validation for glob patterns.
use super::SourceError;

struct ValidationState {
    depth: i32,
    in_class: bool,
    last_open_pos: Option<usize>,
    escaped: bool,
}

impl ValidationState {
    const fn new() -> Self {
        Self {
            depth: 0,
            in_class: false,
            last_open_pos: None,
            escaped: false,
        }
    }

    #[expect(
        clippy::missing_const_for_fn,
        reason = "mutating runtime state; const would not improve clarity"
    )]
    fn process_escape(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return true;
        }
        if ch == '\\' && cfg!(unix) {
            self.escaped = true;
            return true;
        }
        false
    }

    #[expect(
        clippy::missing_const_for_fn,
        reason = "mutating runtime state; const would not improve clarity"
    )]
    fn process_character_class(&mut self, ch: char) -> bool {
        match (self.in_class, ch) {
            (true, ']') => {
                self.in_class = false;
                true
            }
            (true, _) => true,
            (false, '[') => {
                self.in_class = true;
                true
            }
            _ => false,
        }
    }

    fn process_brace(&mut self, ch: char, pos: usize, pattern: &str) -> Result<(), SourceError> {
        match ch {
            '{' => {
                self.depth += 1;
                self.last_open_pos = Some(pos);
                Ok(())
            }
            '}' if self.depth == 0 => Err(SourceError::UnmatchedBrace {
                pattern: pattern.to_owned(),
                character: ch,
                position: pos,
            }),
            '}' => {
                self.depth -= 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn validate_final_state(&self, pattern: &str) -> Result<(), SourceError> {
        if self.depth == 0 {
            return Ok(());
        }
        Err(SourceError::UnmatchedBrace {
            pattern: pattern.to_owned(),
            character: '{',
            position: self.last_open_pos.unwrap_or(0),
        })
    }
}

/// Reject patterns whose braces do not pair up outside character classes.
pub(super) fn validate_brace_matching(pattern: &str) -> Result<(), SourceError> {
    let mut state = ValidationState::new();

    for (pos, ch) in pattern.char_indices() {
        if state.process_escape(ch) {
            continue;
        }
        if state.process_character_class(ch) {
            continue;
        }
        state.process_brace(ch, pos, pattern)?;
    }

    state.validate_final_state(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("src/*.go")]
    #[case("{a}")]
    #[case("{{}}")]
    #[case("[{]x")]
    fn balanced_patterns_pass(#[case] pattern: &str) {
        assert!(validate_brace_matching(pattern).is_ok(), "{pattern}");
    }

    #[test]
    fn unmatched_closing_brace_reports_position() {
        let err = validate_brace_matching("foo}").expect_err("unmatched brace");
        assert_eq!(
            err,
            SourceError::UnmatchedBrace {
                pattern: "foo}".into(),
                character: '}',
                position: 3,
            }
        );
    }

    #[test]
    fn unclosed_brace_reports_last_open_position() {
        let err = validate_brace_matching("{a}{b").expect_err("unclosed brace");
        assert!(err.to_string().contains("position 3"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn escaped_braces_do_not_affect_depth() {
        assert!(validate_brace_matching("\\{foo\\}").is_ok());
    }
}
