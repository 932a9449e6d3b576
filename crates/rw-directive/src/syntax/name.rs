//! Directive names.
//!
//! A name starts with any character that is not whitespace, a line ending
//! or punctuation, and continues with the same set plus `-` and `_`. It may
//! not end in `-` or `_`.

use crate::character::{is_line_ending, is_unicode_punctuation, is_unicode_whitespace};
use crate::event::{DirectiveKind, TokenType};
use crate::tokenizer::{Step, Tokenizer, run};

#[derive(Debug)]
enum State {
    Start,
    Inside,
}

/// Scan a name into a [`TokenType::Name`] token.
pub(crate) fn name(t: &mut Tokenizer<'_>, kind: DirectiveKind) -> bool {
    run(t, State::Start, |t, state| step(t, state, kind))
}

fn step(t: &mut Tokenizer<'_>, state: State, kind: DirectiveKind) -> Step<State> {
    match state {
        State::Start => match t.current() {
            Some(c) if !ends_name(c) && !is_unicode_punctuation(c) => {
                t.enter(TokenType::Name(kind));
                t.consume();
                Step::Next(State::Inside)
            }
            _ => Step::Nok,
        },
        State::Inside => match t.current() {
            Some(c) if !ends_name(c) && (!is_unicode_punctuation(c) || c == '-' || c == '_') => {
                t.consume();
                Step::Next(State::Inside)
            }
            _ => {
                t.exit(TokenType::Name(kind));
                if matches!(t.previous(), Some('-' | '_')) {
                    Step::Nok
                } else {
                    Step::Ok
                }
            }
        },
    }
}

fn ends_name(c: char) -> bool {
    is_line_ending(c) || is_unicode_whitespace(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tests::{first_text, with_tokenizer};

    fn scan(input: &str) -> Option<String> {
        with_tokenizer(input, |t| {
            if t.attempt(|t| name(t, DirectiveKind::Leaf)) {
                first_text(t, TokenType::Name(DirectiveKind::Leaf)).map(str::to_owned)
            } else {
                None
            }
        })
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(scan("note"), Some("note".to_owned()));
    }

    #[test]
    fn test_name_stops_at_punctuation() {
        assert_eq!(scan("note[x]"), Some("note".to_owned()));
        assert_eq!(scan("note{x}"), Some("note".to_owned()));
        assert_eq!(scan("a:b"), Some("a".to_owned()));
        assert_eq!(scan("a.b"), Some("a".to_owned()));
    }

    #[test]
    fn test_name_stops_at_whitespace() {
        assert_eq!(scan("note more"), Some("note".to_owned()));
        assert_eq!(scan("note\nmore"), Some("note".to_owned()));
    }

    #[test]
    fn test_inner_dash_and_underscore() {
        assert_eq!(scan("my-note_2"), Some("my-note_2".to_owned()));
    }

    #[test]
    fn test_trailing_separator_fails() {
        assert_eq!(scan("note-"), None);
        assert_eq!(scan("note_"), None);
        assert_eq!(scan("a-b-"), None);
        assert_eq!(scan("note- x"), None);
    }

    #[test]
    fn test_invalid_start() {
        assert_eq!(scan(""), None);
        assert_eq!(scan(" note"), None);
        assert_eq!(scan("\nnote"), None);
        assert_eq!(scan("-note"), None);
        assert_eq!(scan("_note"), None);
        assert_eq!(scan("[note]"), None);
    }

    #[test]
    fn test_unicode_name() {
        assert_eq!(scan("café[x]"), Some("café".to_owned()));
        assert_eq!(scan("日本"), Some("日本".to_owned()));
    }

    #[test]
    fn test_combining_marks_stay_in_name() {
        assert_eq!(scan("cafe\u{301}[x]"), Some("cafe\u{301}".to_owned()));
        assert_eq!(scan("नमस्ते"), Some("नमस्ते".to_owned()));
        assert_eq!(scan("a\u{200d}b"), Some("a\u{200d}b".to_owned()));
    }

    #[test]
    fn test_failure_rolls_back() {
        with_tokenizer("ab-", |t| {
            assert!(!t.attempt(|t| name(t, DirectiveKind::Text)));
            assert_eq!(t.current(), Some('a'));
            assert!(t.last_event().is_none());
        });
    }
}
