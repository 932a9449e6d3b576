//! Text directives: inline `:name[label]{attributes}`.

use crate::character::MARKER;
use crate::event::{DirectiveKind, EventKind, TokenType};
use crate::syntax::attributes::attributes;
use crate::syntax::label::label;
use crate::syntax::name::name;
use crate::tokenizer::{Step, Tokenizer, run};

const KIND: DirectiveKind = DirectiveKind::Text;

#[derive(Debug)]
enum State {
    Start,
    AfterName,
    AfterLabel,
    End,
}

/// Whether a text directive may start at the cursor.
///
/// A marker directly after another marker is part of that run, unless the
/// earlier one was escaped.
pub(crate) fn previous(t: &Tokenizer<'_>) -> bool {
    t.previous() != Some(MARKER)
        || t.last_event().is_some_and(|event| {
            event.kind == EventKind::Exit && event.token_type == TokenType::CharacterEscape
        })
}

/// Recognize a text directive starting at its marker.
pub(crate) fn text(t: &mut Tokenizer<'_>) -> bool {
    run(t, State::Start, step)
}

fn step(t: &mut Tokenizer<'_>, state: State) -> Step<State> {
    match state {
        State::Start => {
            if t.current() != Some(MARKER) {
                return Step::Nok;
            }
            t.enter(TokenType::Directive(KIND));
            t.enter(TokenType::TextMarker);
            t.consume();
            t.exit(TokenType::TextMarker);
            if name(t, KIND) {
                Step::Next(State::AfterName)
            } else {
                Step::Nok
            }
        }
        State::AfterName => match t.current() {
            Some(MARKER) => Step::Nok,
            Some('[') => {
                t.attempt(|t| label(t, KIND, false));
                Step::Next(State::AfterLabel)
            }
            _ => Step::Next(State::AfterLabel),
        },
        State::AfterLabel => {
            if t.current() == Some('{') {
                t.attempt(|t| attributes(t, KIND, false));
            }
            Step::Next(State::End)
        }
        State::End => {
            t.exit(TokenType::Directive(KIND));
            Step::Ok
        }
    }
}
