//! Leaf directives: `::name[label]{attributes}` on a line of their own.

use crate::character::{MARKER, is_line_ending};
use crate::event::{DirectiveKind, TokenType};
use crate::syntax::attributes::attributes;
use crate::syntax::label::label;
use crate::syntax::name::name;
use crate::syntax::space::space;
use crate::tokenizer::{Step, Tokenizer, run};

const KIND: DirectiveKind = DirectiveKind::Leaf;

#[derive(Debug)]
enum State {
    Start,
    Inside,
    AfterName,
    AfterLabel,
    AfterAttributes,
    End,
}

/// Recognize a leaf directive starting at its first marker.
pub(crate) fn leaf(t: &mut Tokenizer<'_>) -> bool {
    run(t, State::Start, step)
}

fn step(t: &mut Tokenizer<'_>, state: State) -> Step<State> {
    match state {
        State::Start => {
            if t.current() != Some(MARKER) {
                return Step::Nok;
            }
            t.enter(TokenType::Directive(KIND));
            t.enter(TokenType::LeafSequence);
            t.consume();
            Step::Next(State::Inside)
        }
        State::Inside => {
            if t.current() != Some(MARKER) {
                return Step::Nok;
            }
            t.consume();
            t.exit(TokenType::LeafSequence);
            if name(t, KIND) {
                Step::Next(State::AfterName)
            } else {
                Step::Nok
            }
        }
        State::AfterName => {
            if t.current() == Some('[') {
                t.attempt(|t| label(t, KIND, true));
            }
            Step::Next(State::AfterLabel)
        }
        State::AfterLabel => {
            if t.current() == Some('{') {
                t.attempt(|t| attributes(t, KIND, true));
            }
            Step::Next(State::AfterAttributes)
        }
        State::AfterAttributes => {
            space(t, TokenType::Whitespace, None);
            Step::Next(State::End)
        }
        State::End => match t.current() {
            None => {
                t.exit(TokenType::Directive(KIND));
                Step::Ok
            }
            Some(c) if is_line_ending(c) => {
                t.exit(TokenType::Directive(KIND));
                Step::Ok
            }
            Some(_) => Step::Nok,
        },
    }
}
