//! Attribute lists: `{#id .class key="value"}`.
//!
//! Supports id and class shorthands, bare names, and values that are
//! double-quoted, single-quoted or unquoted.

use crate::character::{is_line_ending, is_line_ending_or_space, is_space_or_tab};
use crate::event::{DirectiveKind, TokenType};
use crate::syntax::space::{space, whitespace};
use crate::tokenizer::{Step, Tokenizer, run};

#[derive(Clone, Copy, Debug)]
enum Shorthand {
    Id,
    Class,
}

impl Shorthand {
    fn token(self) -> TokenType {
        match self {
            Self::Id => TokenType::AttributeId,
            Self::Class => TokenType::AttributeClass,
        }
    }

    fn value(self) -> TokenType {
        match self {
            Self::Id => TokenType::AttributeIdValue,
            Self::Class => TokenType::AttributeClassValue,
        }
    }
}

#[derive(Debug)]
enum State {
    Start,
    Between,
    ShortcutStart(Shorthand),
    ShortcutStartAfter(Shorthand),
    Shortcut(Shorthand),
    Name,
    NameAfter,
    ValueBefore,
    ValueUnquoted,
    ValueQuotedStart,
    ValueQuotedBetween,
    ValueQuoted,
    ValueQuotedAfter,
    End,
}

struct AttributesScanner {
    kind: DirectiveKind,
    disallow_eol: bool,
    quote: char,
}

/// Scan an attribute list starting at `{`.
pub(crate) fn attributes(t: &mut Tokenizer<'_>, kind: DirectiveKind, disallow_eol: bool) -> bool {
    let mut scanner = AttributesScanner {
        kind,
        disallow_eol,
        quote: '"',
    };
    run(t, State::Start, |t, state| scanner.step(t, state))
}

impl AttributesScanner {
    fn step(&mut self, t: &mut Tokenizer<'_>, state: State) -> Step<State> {
        match state {
            State::Start => {
                if t.current() != Some('{') {
                    return Step::Nok;
                }
                t.enter(TokenType::Attributes(self.kind));
                marker(t, TokenType::AttributesMarker);
                Step::Next(State::Between)
            }
            State::Between => match t.current() {
                Some('#') => Step::Next(State::ShortcutStart(Shorthand::Id)),
                Some('.') => Step::Next(State::ShortcutStart(Shorthand::Class)),
                Some(c) if c == ':' || c == '_' || c.is_ascii_alphabetic() => {
                    t.enter(TokenType::Attribute);
                    t.enter(TokenType::AttributeName);
                    t.consume();
                    Step::Next(State::Name)
                }
                Some(c) if self.skippable(c) => {
                    self.skip(t);
                    Step::Next(State::Between)
                }
                _ => Step::Next(State::End),
            },
            State::ShortcutStart(shorthand) => {
                t.enter(TokenType::Attribute);
                t.enter(shorthand.token());
                marker(t, TokenType::AttributeShorthandMarker);
                Step::Next(State::ShortcutStartAfter(shorthand))
            }
            State::ShortcutStartAfter(shorthand) => match t.current() {
                None | Some('"' | '#' | '\'' | '.' | '<' | '=' | '>' | '`' | '}') => Step::Nok,
                Some(c) if is_line_ending_or_space(c) => Step::Nok,
                Some(_) => {
                    t.enter(shorthand.value());
                    t.consume();
                    Step::Next(State::Shortcut(shorthand))
                }
            },
            State::Shortcut(shorthand) => match t.current() {
                None | Some('"' | '\'' | '<' | '=' | '>' | '`') => Step::Nok,
                Some(c) if matches!(c, '#' | '.' | '}') || is_line_ending_or_space(c) => {
                    t.exit(shorthand.value());
                    t.exit(shorthand.token());
                    t.exit(TokenType::Attribute);
                    Step::Next(State::Between)
                }
                Some(_) => {
                    t.consume();
                    Step::Next(State::Shortcut(shorthand))
                }
            },
            State::Name => match t.current() {
                Some(c) if matches!(c, '-' | '.' | ':' | '_') || c.is_ascii_alphanumeric() => {
                    t.consume();
                    Step::Next(State::Name)
                }
                _ => {
                    t.exit(TokenType::AttributeName);
                    if t.current().is_some_and(|c| self.skippable(c)) {
                        self.skip(t);
                    }
                    Step::Next(State::NameAfter)
                }
            },
            State::NameAfter => {
                if t.current() == Some('=') {
                    marker(t, TokenType::AttributeInitializerMarker);
                    Step::Next(State::ValueBefore)
                } else {
                    t.exit(TokenType::Attribute);
                    Step::Next(State::Between)
                }
            }
            State::ValueBefore => match t.current() {
                None | Some('<' | '=' | '>' | '`' | '}') => Step::Nok,
                Some(c) if is_line_ending(c) && self.disallow_eol => Step::Nok,
                Some(c @ ('"' | '\'')) => {
                    t.enter(TokenType::AttributeValueLiteral);
                    marker(t, TokenType::AttributeValueMarker);
                    self.quote = c;
                    Step::Next(State::ValueQuotedStart)
                }
                Some(c) if is_line_ending_or_space(c) => {
                    self.skip(t);
                    Step::Next(State::ValueBefore)
                }
                Some(_) => {
                    t.enter(TokenType::AttributeValue);
                    t.enter(TokenType::AttributeValueData);
                    t.consume();
                    Step::Next(State::ValueUnquoted)
                }
            },
            State::ValueUnquoted => match t.current() {
                None | Some('"' | '\'' | '<' | '=' | '>' | '`') => Step::Nok,
                Some(c) if c == '}' || is_line_ending_or_space(c) => {
                    t.exit(TokenType::AttributeValueData);
                    t.exit(TokenType::AttributeValue);
                    t.exit(TokenType::Attribute);
                    Step::Next(State::Between)
                }
                Some(_) => {
                    t.consume();
                    Step::Next(State::ValueUnquoted)
                }
            },
            State::ValueQuotedStart => {
                if t.current() == Some(self.quote) {
                    marker(t, TokenType::AttributeValueMarker);
                    t.exit(TokenType::AttributeValueLiteral);
                    t.exit(TokenType::Attribute);
                    Step::Next(State::ValueQuotedAfter)
                } else {
                    t.enter(TokenType::AttributeValue);
                    Step::Next(State::ValueQuotedBetween)
                }
            }
            State::ValueQuotedBetween => match t.current() {
                None => Step::Nok,
                Some(c) if c == self.quote => {
                    t.exit(TokenType::AttributeValue);
                    Step::Next(State::ValueQuotedStart)
                }
                Some(c) if is_line_ending(c) => {
                    if self.disallow_eol {
                        return Step::Nok;
                    }
                    marker(t, TokenType::LineEnding);
                    Step::Next(State::ValueQuotedBetween)
                }
                Some(_) => {
                    t.enter(TokenType::AttributeValueData);
                    Step::Next(State::ValueQuoted)
                }
            },
            State::ValueQuoted => match t.current() {
                Some(c) if c != self.quote && !is_line_ending(c) => {
                    t.consume();
                    Step::Next(State::ValueQuoted)
                }
                _ => {
                    t.exit(TokenType::AttributeValueData);
                    Step::Next(State::ValueQuotedBetween)
                }
            },
            State::ValueQuotedAfter => match t.current() {
                Some(c) if c == '}' || is_line_ending_or_space(c) => Step::Next(State::Between),
                _ => Step::Nok,
            },
            State::End => {
                if t.current() != Some('}') {
                    return Step::Nok;
                }
                marker(t, TokenType::AttributesMarker);
                t.exit(TokenType::Attributes(self.kind));
                Step::Ok
            }
        }
    }

    /// Whitespace allowed between attributes.
    fn skippable(&self, c: char) -> bool {
        if self.disallow_eol {
            is_space_or_tab(c)
        } else {
            is_line_ending_or_space(c)
        }
    }

    fn skip(&self, t: &mut Tokenizer<'_>) {
        if self.disallow_eol {
            space(t, TokenType::Whitespace, None);
        } else {
            whitespace(t);
        }
    }
}

/// Emit a one-character token.
fn marker(t: &mut Tokenizer<'_>, token_type: TokenType) {
    t.enter(token_type);
    t.consume();
    t.exit(token_type);
}
