//! Container directives: fenced blocks.
//!
//! ```markdown
//! :::name[label]{attributes}
//! content
//! :::
//! ```
//!
//! The opening fence needs at least three markers. A closing fence needs
//! at least as many markers as the opening one; shorter runs are content.
//! Without a closing fence the container runs to the end of input.

use crate::character::{FENCE_SEQUENCE_SIZE_MIN, MARKER, TAB_SIZE, is_line_ending};
use crate::event::{DirectiveKind, TokenType};
use crate::syntax::attributes::attributes;
use crate::syntax::label::label;
use crate::syntax::name::name;
use crate::syntax::space::space;
use crate::tokenizer::{Step, Tokenizer, run};

const KIND: DirectiveKind = DirectiveKind::Container;

/// Opening fence measurements, referenced while scanning for the close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Fence {
    /// Number of markers in the opening sequence.
    size: usize,
    /// Columns of indentation before the opening sequence.
    indent: usize,
}

#[derive(Debug)]
enum State {
    Start,
    SequenceOpen,
    AfterName,
    AfterLabel,
    AfterAttributes,
    OpenAfter,
    ContentStart,
    LineStart,
    ChunkStart,
    ContentContinue,
    AfterContent,
    After,
}

struct ContainerScanner {
    fence: Fence,
    /// Original line of the chunk being scanned.
    chunk_line: usize,
    chunk_lazy: bool,
}

/// Recognize a container directive starting at its first marker.
pub(crate) fn container(t: &mut Tokenizer<'_>) -> bool {
    let indent = t.column();
    let mut scanner = ContainerScanner {
        fence: Fence { size: 0, indent },
        chunk_line: 0,
        chunk_lazy: false,
    };
    run(t, State::Start, |t, state| scanner.step(t, state))
}

impl ContainerScanner {
    fn step(&mut self, t: &mut Tokenizer<'_>, state: State) -> Step<State> {
        match state {
            State::Start => {
                if t.current() != Some(MARKER) {
                    return Step::Nok;
                }
                t.enter(TokenType::Directive(KIND));
                t.enter(TokenType::ContainerFence);
                t.enter(TokenType::ContainerSequence);
                Step::Next(State::SequenceOpen)
            }
            State::SequenceOpen => {
                if t.current() == Some(MARKER) {
                    t.consume();
                    self.fence.size += 1;
                    return Step::Next(State::SequenceOpen);
                }
                if self.fence.size < FENCE_SEQUENCE_SIZE_MIN {
                    return Step::Nok;
                }
                t.exit(TokenType::ContainerSequence);
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
                Step::Next(State::OpenAfter)
            }
            State::OpenAfter => {
                t.exit(TokenType::ContainerFence);
                match t.current() {
                    None => Step::Next(State::After),
                    Some(c) if is_line_ending(c) => {
                        if t.interrupt {
                            return Step::Ok;
                        }
                        t.enter(TokenType::LineEnding);
                        t.consume();
                        t.exit(TokenType::LineEnding);
                        Step::Next(State::ContentStart)
                    }
                    Some(_) => Step::Nok,
                }
            }
            State::ContentStart => {
                if t.current().is_none() {
                    return Step::Next(State::After);
                }
                t.enter(TokenType::ContainerContent);
                Step::Next(State::LineStart)
            }
            State::LineStart => {
                let fence = self.fence;
                if t.attempt(|t| closing_fence(t, fence)) {
                    return Step::Next(State::AfterContent);
                }
                if fence.indent > 0 {
                    space(t, TokenType::LinePrefix, Some(fence.indent + 1));
                }
                Step::Next(State::ChunkStart)
            }
            State::ChunkStart => {
                if t.current().is_none() {
                    return Step::Next(State::AfterContent);
                }
                self.chunk_line = t.line();
                self.chunk_lazy = t.is_lazy(self.chunk_line);
                t.enter(self.chunk());
                Step::Next(State::ContentContinue)
            }
            State::ContentContinue => match t.current() {
                None => {
                    self.claim(t);
                    Step::Next(State::AfterContent)
                }
                Some(c) if is_line_ending(c) => {
                    t.consume();
                    self.claim(t);
                    Step::Next(State::LineStart)
                }
                Some(_) => {
                    t.consume();
                    Step::Next(State::ContentContinue)
                }
            },
            State::AfterContent => {
                t.exit(TokenType::ContainerContent);
                Step::Next(State::After)
            }
            State::After => {
                t.exit(TokenType::Directive(KIND));
                Step::Ok
            }
        }
    }

    fn chunk(&self) -> TokenType {
        TokenType::ChunkDocument {
            lazy: self.chunk_lazy,
        }
    }

    /// Close the current chunk and take ownership of its line.
    fn claim(&self, t: &mut Tokenizer<'_>) {
        t.exit(self.chunk());
        t.mark_non_lazy(self.chunk_line);
    }
}

/// Probe for a closing fence at the start of a content line.
fn closing_fence(t: &mut Tokenizer<'_>, fence: Fence) -> bool {
    let max = t.options.code_indented.then_some(TAB_SIZE);
    space(t, TokenType::LinePrefix, max);

    t.enter(TokenType::ContainerFence);
    t.enter(TokenType::ContainerSequence);
    let mut size = 0;
    while t.current() == Some(MARKER) {
        t.consume();
        size += 1;
    }
    if size < fence.size {
        return false;
    }
    t.exit(TokenType::ContainerSequence);
    space(t, TokenType::Whitespace, None);

    match t.current() {
        None => {}
        Some(c) if is_line_ending(c) => {}
        Some(_) => return false,
    }
    t.exit(TokenType::ContainerFence);
    true
}
