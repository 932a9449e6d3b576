//! Bracketed labels: `[...]`.
//!
//! Labels may be empty, may contain balanced brackets, and support `\[`,
//! `\]` and `\\` escapes. Content is emitted as one text chunk per line so
//! it can be tokenized as inline content later.

use crate::character::is_line_ending;
use crate::event::{DirectiveKind, TokenType};
use crate::tokenizer::{Step, Tokenizer, run};

/// Maximum number of characters inside a label.
pub(crate) const LABEL_SIZE_MAX: usize = 999;

/// Maximum depth of unclosed `[` inside a label.
pub(crate) const LABEL_BALANCE_MAX: usize = 32;

#[derive(Debug)]
enum State {
    Start,
    AfterStart,
    LineStart,
    Data,
    DataEscape,
    AtClose,
}

struct LabelScanner {
    kind: DirectiveKind,
    disallow_eol: bool,
    size: usize,
    balance: usize,
}

/// Scan a label starting at `[`.
///
/// With `disallow_eol`, a line ending inside the label fails the label.
pub(crate) fn label(t: &mut Tokenizer<'_>, kind: DirectiveKind, disallow_eol: bool) -> bool {
    let mut scanner = LabelScanner {
        kind,
        disallow_eol,
        size: 0,
        balance: 0,
    };
    run(t, State::Start, |t, state| scanner.step(t, state))
}

impl LabelScanner {
    fn step(&mut self, t: &mut Tokenizer<'_>, state: State) -> Step<State> {
        match state {
            State::Start => {
                if t.current() != Some('[') {
                    return Step::Nok;
                }
                t.enter(TokenType::Label(self.kind));
                marker(t);
                Step::Next(State::AfterStart)
            }
            State::AfterStart => {
                if t.current() == Some(']') {
                    marker(t);
                    t.exit(TokenType::Label(self.kind));
                    return Step::Ok;
                }
                t.enter(TokenType::LabelString);
                Step::Next(State::LineStart)
            }
            State::LineStart => {
                if t.current() == Some(']') && self.balance == 0 {
                    return Step::Next(State::AtClose);
                }
                t.enter(TokenType::ChunkText);
                Step::Next(State::Data)
            }
            State::Data => self.data(t),
            State::DataEscape => {
                if matches!(t.current(), Some('[' | ']' | '\\')) {
                    self.consume(t);
                }
                Step::Next(State::Data)
            }
            State::AtClose => {
                t.exit(TokenType::LabelString);
                marker(t);
                t.exit(TokenType::Label(self.kind));
                Step::Ok
            }
        }
    }

    fn data(&mut self, t: &mut Tokenizer<'_>) -> Step<State> {
        if self.size > LABEL_SIZE_MAX {
            return Step::Nok;
        }

        match t.current() {
            None => Step::Nok,
            Some('[') => {
                self.balance += 1;
                if self.balance > LABEL_BALANCE_MAX {
                    return Step::Nok;
                }
                self.consume(t);
                Step::Next(State::Data)
            }
            Some(']') if self.balance == 0 => {
                t.exit(TokenType::ChunkText);
                Step::Next(State::AtClose)
            }
            Some(']') => {
                self.balance -= 1;
                self.consume(t);
                Step::Next(State::Data)
            }
            Some(c) if is_line_ending(c) => {
                if self.disallow_eol {
                    return Step::Nok;
                }
                self.consume(t);
                t.exit(TokenType::ChunkText);
                Step::Next(State::LineStart)
            }
            Some('\\') => {
                self.consume(t);
                Step::Next(State::DataEscape)
            }
            Some(_) => {
                self.consume(t);
                Step::Next(State::Data)
            }
        }
    }

    fn consume(&mut self, t: &mut Tokenizer<'_>) {
        t.consume();
        self.size += 1;
    }
}

fn marker(t: &mut Tokenizer<'_>) {
    t.enter(TokenType::LabelMarker);
    t.consume();
    t.exit(TokenType::LabelMarker);
}
