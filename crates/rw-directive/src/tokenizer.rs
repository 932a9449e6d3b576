//! Character cursor and token emission.
//!
//! The [`Tokenizer`] is the host side of the recognizers: it walks one
//! source buffer, records enter/exit events, and supports speculative
//! parsing through [`Tokenizer::attempt`] and [`Tokenizer::check`], both of
//! which roll every change back when the construct does not match.

use std::collections::HashMap;

use crate::character::{advance_column, is_line_ending};
use crate::event::{Event, EventKind, SourceId, TokenType};
use crate::options::ParseOptions;

/// Result of one state transition.
#[derive(Debug)]
pub(crate) enum Step<S> {
    /// Continue in the given state.
    Next(S),
    /// The construct matched.
    Ok,
    /// The construct did not match.
    Nok,
}

/// Drive a state machine until it matches or fails.
pub(crate) fn run<S>(
    t: &mut Tokenizer<'_>,
    start: S,
    mut step: impl FnMut(&mut Tokenizer<'_>, S) -> Step<S>,
) -> bool {
    let mut state = start;
    loop {
        match step(t, state) {
            Step::Next(next) => state = next,
            Step::Ok => return true,
            Step::Nok => return false,
        }
    }
}

/// Registry of lazy continuation lines, keyed by original line number.
///
/// A line marked lazy could also be claimed by an enclosing construct.
/// Container directives mark every line they claim as non-lazy.
#[derive(Debug, Default, Clone)]
pub struct LazyLines {
    lines: HashMap<usize, bool>,
}

impl LazyLines {
    /// Whether `line` is currently marked lazy.
    #[must_use]
    pub fn is_lazy(&self, line: usize) -> bool {
        self.lines.get(&line).copied().unwrap_or(false)
    }

    /// Current registry entry for `line`, if any.
    #[must_use]
    pub fn get(&self, line: usize) -> Option<bool> {
        self.lines.get(&line).copied()
    }

    /// Set the registry entry for `line`, returning the previous one.
    pub fn set(&mut self, line: usize, lazy: bool) -> Option<bool> {
        self.lines.insert(line, lazy)
    }

    fn restore(&mut self, line: usize, previous: Option<bool>) {
        match previous {
            Some(lazy) => {
                self.lines.insert(line, lazy);
            }
            None => {
                self.lines.remove(&line);
            }
        }
    }
}

/// Saved tokenizer position for rollback.
struct Snapshot {
    index: usize,
    line_index: usize,
    previous: Option<char>,
    events: usize,
    stack: Vec<usize>,
    journal: usize,
}

/// Cursor over one source buffer that emits events.
pub(crate) struct Tokenizer<'a> {
    text: &'a str,
    source: SourceId,
    /// Original line number of each line in `text`.
    lines: &'a [usize],
    index: usize,
    line_index: usize,
    previous: Option<char>,
    events: Vec<Event>,
    /// Indices of enter events whose token is still open.
    stack: Vec<usize>,
    lazy: &'a mut LazyLines,
    /// Previous registry values, undone on rollback.
    journal: Vec<(usize, Option<bool>)>,
    /// Set while checking whether a construct interrupts a paragraph.
    pub(crate) interrupt: bool,
    pub(crate) options: &'a ParseOptions,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(
        text: &'a str,
        source: SourceId,
        lines: &'a [usize],
        lazy: &'a mut LazyLines,
        options: &'a ParseOptions,
    ) -> Self {
        Self {
            text,
            source,
            lines,
            index: 0,
            line_index: 0,
            previous: None,
            events: Vec::new(),
            stack: Vec::new(),
            lazy,
            journal: Vec::new(),
            interrupt: false,
            options,
        }
    }

    /// Character under the cursor, `None` at end of input.
    pub(crate) fn current(&self) -> Option<char> {
        self.text[self.index..].chars().next()
    }

    /// Last consumed character.
    pub(crate) fn previous(&self) -> Option<char> {
        self.previous
    }

    /// Original line number of the cursor.
    pub(crate) fn line(&self) -> usize {
        match self.lines.get(self.line_index) {
            Some(&line) => line,
            None => {
                let last = self.lines.last().copied().unwrap_or(1);
                last + self.line_index + 1 - self.lines.len().max(1)
            }
        }
    }

    /// Column of the cursor in its line, with tabs expanded.
    pub(crate) fn column(&self) -> usize {
        let before = &self.text[..self.index];
        let start = before.rfind(is_line_ending).map_or(0, |at| at + 1);
        before[start..].chars().fold(0, advance_column)
    }

    /// Consume the current character. A `\r\n` pair is consumed as one.
    pub(crate) fn consume(&mut self) {
        debug_assert!(self.index < self.text.len(), "cannot consume at end of input");
        let Some(c) = self.current() else {
            return;
        };
        self.index += c.len_utf8();
        let mut last = c;
        if c == '\r' && self.current() == Some('\n') {
            self.index += 1;
            last = '\n';
        }
        if is_line_ending(c) {
            self.line_index += 1;
        }
        self.previous = Some(last);
    }

    /// Open a token at the cursor.
    pub(crate) fn enter(&mut self, token_type: TokenType) {
        self.stack.push(self.events.len());
        self.events.push(Event {
            kind: EventKind::Enter,
            token_type,
            source: self.source,
            start: self.index,
            end: self.index,
            line: self.line(),
        });
    }

    /// Close the innermost open token, which must be of `token_type`.
    pub(crate) fn exit(&mut self, token_type: TokenType) {
        debug_assert!(!self.stack.is_empty(), "exit {token_type:?} without open token");
        let Some(open) = self.stack.pop() else {
            return;
        };
        let enter = &mut self.events[open];
        debug_assert!(
            enter.token_type.same_token(token_type),
            "exit {token_type:?} does not match open {:?}",
            enter.token_type
        );
        enter.end = self.index;
        let exit = Event {
            kind: EventKind::Exit,
            token_type: enter.token_type,
            end: self.index,
            ..*enter
        };
        self.events.push(exit);
    }

    /// Run `f`; if it fails, undo everything it did.
    pub(crate) fn attempt(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let snapshot = self.snapshot();
        let ok = f(self);
        if !ok {
            self.restore(snapshot);
        }
        ok
    }

    /// Run `f` and undo everything it did, reporting whether it matched.
    pub(crate) fn check(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let snapshot = self.snapshot();
        let ok = f(self);
        self.restore(snapshot);
        ok
    }

    /// Run `f` in interrupt mode.
    pub(crate) fn interrupting(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let saved = self.interrupt;
        self.interrupt = true;
        let ok = f(self);
        self.interrupt = saved;
        ok
    }

    /// Most recent event.
    pub(crate) fn last_event(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Text of an event's span in this tokenizer's buffer.
    pub(crate) fn slice(&self, event: &Event) -> &'a str {
        &self.text[event.start..event.end]
    }

    pub(crate) fn is_lazy(&self, line: usize) -> bool {
        self.lazy.is_lazy(line)
    }

    /// Record that a container owns `line`.
    pub(crate) fn mark_non_lazy(&mut self, line: usize) {
        let previous = self.lazy.set(line, false);
        self.journal.push((line, previous));
    }

    /// Finish tokenizing and hand over the events.
    pub(crate) fn finish(self) -> Vec<Event> {
        debug_assert!(self.stack.is_empty(), "unclosed tokens: {:?}", self.stack);
        self.events
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            index: self.index,
            line_index: self.line_index,
            previous: self.previous,
            events: self.events.len(),
            stack: self.stack.clone(),
            journal: self.journal.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.index = snapshot.index;
        self.line_index = snapshot.line_index;
        self.previous = snapshot.previous;
        self.events.truncate(snapshot.events);
        self.stack = snapshot.stack;
        while self.journal.len() > snapshot.journal {
            if let Some((line, previous)) = self.journal.pop() {
                self.lazy.restore(line, previous);
            }
        }
    }
}
