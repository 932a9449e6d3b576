//! Reference host engine.
//!
//! A deliberately small block and inline grammar that gives the directive
//! recognizers somewhere to run: paragraphs, blank lines, character
//! escapes and plain text. Content nested in paragraphs, labels and
//! containers is tokenized in a second pass over its own buffer, so the
//! final event list is flat and properly nested.

use crate::character::{MARKER, TAB_SIZE, is_line_ending};
use crate::event::{Event, SourceId, TokenType};
use crate::options::ParseOptions;
use crate::syntax::container::container;
use crate::syntax::leaf::leaf;
use crate::syntax::space::space;
use crate::syntax::text::{self, text};
use crate::tokenizer::{LazyLines, Tokenizer};

/// Parses documents into a directive-aware event stream.
///
/// # Example
///
/// ```
/// use rw_directive::{EventKind, Parser, TokenType};
///
/// let parsed = Parser::new().parse("::hr");
/// let first = &parsed.events()[0];
/// assert_eq!(first.kind, EventKind::Enter);
/// assert!(matches!(first.token_type, TokenType::Directive(_)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: ParseOptions,
    lazy: LazyLines,
}

impl Parser {
    /// Create a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            lazy: LazyLines::default(),
        }
    }

    /// Mark an original line (1-indexed) as a lazy continuation.
    ///
    /// Embedding hosts use this for lines an enclosing construct could also
    /// claim. Each parse starts from a copy of these marks.
    #[must_use]
    pub fn mark_lazy(mut self, line: usize) -> Self {
        self.lazy.set(line, true);
        self
    }

    /// Parse a whole document.
    #[must_use]
    pub fn parse(&self, input: &str) -> Parsed {
        let mut document = Document {
            sources: Vec::new(),
            lazy: self.lazy.clone(),
            options: &self.options,
        };
        let lines = (1..=input.split('\n').count()).collect();
        let root = document.push(input.to_owned(), lines);
        let events = document.tokenize(root, Content::Flow);
        tracing::debug!(events = events.len(), sources = document.sources.len(), "Parsed document");

        Parsed {
            sources: document.sources,
            events,
            lazy: document.lazy,
        }
    }
}

/// Result of [`Parser::parse`].
///
/// Owns every buffer the events point into.
#[derive(Clone, Debug)]
pub struct Parsed {
    sources: Vec<Source>,
    events: Vec<Event>,
    lazy: LazyLines,
}

impl Parsed {
    /// All events in document order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Text covered by an event.
    #[must_use]
    pub fn slice(&self, event: &Event) -> &str {
        self.sources
            .get(event.source.0)
            .and_then(|source| source.text.get(event.start..event.end))
            .unwrap_or_default()
    }

    /// Lazy-line registry after parsing.
    ///
    /// Lines claimed by a container directive are marked non-lazy.
    #[must_use]
    pub fn lazy_lines(&self) -> &LazyLines {
        &self.lazy
    }
}

#[derive(Clone, Debug)]
struct Source {
    text: String,
    /// Original line number of each line in `text`.
    lines: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Content {
    /// Blocks: blank lines, directives, paragraphs.
    Flow,
    /// Inline text with escapes and text directives.
    Inline,
}

struct Document<'a> {
    sources: Vec<Source>,
    lazy: LazyLines,
    options: &'a ParseOptions,
}

impl Document<'_> {
    fn push(&mut self, text: String, lines: Vec<usize>) -> SourceId {
        self.sources.push(Source { text, lines });
        SourceId(self.sources.len() - 1)
    }

    fn tokenize(&mut self, id: SourceId, content: Content) -> Vec<Event> {
        let events = {
            let source = &self.sources[id.0];
            let mut t = Tokenizer::new(&source.text, id, &source.lines, &mut self.lazy, self.options);
            match content {
                Content::Flow => flow(&mut t),
                Content::Inline => inline(&mut t),
            }
            t.finish()
        };
        self.subtokenize(events)
    }

    /// Replace the chunks under every wrapper with their tokenized content.
    fn subtokenize(&mut self, events: Vec<Event>) -> Vec<Event> {
        let mut result = Vec::with_capacity(events.len());
        let mut index = 0;

        while index < events.len() {
            let event = events[index];
            let Some(content) = nested_content(event) else {
                result.push(event);
                index += 1;
                continue;
            };

            let close = matching_exit(&events, index);
            let mut text = String::new();
            let mut lines = Vec::new();
            let mut rest = Vec::new();
            let mut child = index + 1;
            while child < close {
                let end = matching_exit(&events, child);
                let enter = events[child];
                if enter.token_type.is_chunk() {
                    let source = &self.sources[enter.source.0];
                    text.push_str(&source.text[enter.start..enter.end]);
                    lines.push(enter.line);
                } else if enter.token_type != TokenType::LinePrefix {
                    rest.extend_from_slice(&events[child..=end]);
                }
                child = end + 1;
            }

            let id = self.push(text, lines);
            result.push(event);
            result.extend(self.tokenize(id, content));
            result.extend(rest);
            result.push(events[close]);
            index = close + 1;
        }

        result
    }
}

/// Content type of the chunks a wrapper token holds.
fn nested_content(event: Event) -> Option<Content> {
    if !event.is_enter() {
        return None;
    }
    match event.token_type {
        TokenType::Paragraph | TokenType::LabelString => Some(Content::Inline),
        TokenType::ContainerContent => Some(Content::Flow),
        _ => None,
    }
}

fn matching_exit(events: &[Event], open: usize) -> usize {
    let mut depth = 0usize;
    for (index, event) in events.iter().enumerate().skip(open) {
        if event.is_enter() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return index;
            }
        }
    }
    events.len() - 1
}

fn flow(t: &mut Tokenizer<'_>) {
    while t.current().is_some() {
        if t.check(blank_line) {
            space(t, TokenType::Whitespace, None);
            line_ending(t);
            continue;
        }

        let directive = t.attempt(|t| {
            block_prefix(t);
            t.current() == Some(MARKER) && block_directive(t)
        });
        if directive {
            line_ending(t);
        } else {
            paragraph(t);
        }
    }
}

/// Indentation before a block directive. With indented code enabled a full
/// tab stop makes the line code, so the prefix stays below it.
fn block_prefix(t: &mut Tokenizer<'_>) {
    let max = t.options.code_indented.then_some(TAB_SIZE);
    space(t, TokenType::LinePrefix, max);
}

/// Try a container, then a leaf directive.
fn block_directive(t: &mut Tokenizer<'_>) -> bool {
    let constructs = t.options.constructs;
    if constructs.container && t.attempt(container) {
        tracing::trace!(line = t.line(), "Container directive");
        return true;
    }
    if constructs.leaf && t.attempt(leaf) {
        tracing::trace!(line = t.line(), "Leaf directive");
        return true;
    }
    false
}

fn blank_line(t: &mut Tokenizer<'_>) -> bool {
    space(t, TokenType::Whitespace, None);
    t.current().is_none_or(is_line_ending)
}

fn line_ending(t: &mut Tokenizer<'_>) {
    if t.current().is_some_and(is_line_ending) {
        t.enter(TokenType::LineEnding);
        t.consume();
        t.exit(TokenType::LineEnding);
    }
}

fn paragraph(t: &mut Tokenizer<'_>) {
    space(t, TokenType::LinePrefix, None);
    t.enter(TokenType::Paragraph);
    loop {
        t.enter(TokenType::ChunkText);
        while let Some(c) = t.current() {
            t.consume();
            if is_line_ending(c) {
                break;
            }
        }
        t.exit(TokenType::ChunkText);

        if t.current().is_none() || t.check(blank_line) || t.check(interrupts) {
            break;
        }
        space(t, TokenType::LinePrefix, None);
    }
    t.exit(TokenType::Paragraph);
}

/// Whether a block directive starts on this line and ends the paragraph.
fn interrupts(t: &mut Tokenizer<'_>) -> bool {
    block_prefix(t);
    t.current() == Some(MARKER) && t.interrupting(block_directive)
}

fn inline(t: &mut Tokenizer<'_>) {
    let text_enabled = t.options.constructs.text;
    while let Some(c) = t.current() {
        match c {
            '\\' if t.attempt(character_escape) => {}
            MARKER if text_enabled && text::previous(t) && t.attempt(text) => {
                tracing::trace!(line = t.line(), "Text directive");
            }
            c if is_line_ending(c) => line_ending(t),
            _ => data(t),
        }
    }
}

fn character_escape(t: &mut Tokenizer<'_>) -> bool {
    t.enter(TokenType::CharacterEscape);
    t.consume();
    if !t.current().is_some_and(|c| c.is_ascii_punctuation()) {
        return false;
    }
    t.consume();
    t.exit(TokenType::CharacterEscape);
    true
}

/// Plain text up to the next character that may start something else.
fn data(t: &mut Tokenizer<'_>) {
    t.enter(TokenType::Data);
    t.consume();
    while let Some(c) = t.current() {
        if c == '\\' || c == MARKER || is_line_ending(c) {
            break;
        }
        t.consume();
    }
    t.exit(TokenType::Data);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event::{DirectiveKind, EventKind};

    /// Text of every enter event of `token_type`.
    fn texts_of(parsed: &Parsed, token_type: TokenType) -> Vec<String> {
        parsed
            .events()
            .iter()
            .filter(|e| e.is_enter() && e.token_type == token_type)
            .map(|e| parsed.slice(e).to_owned())
            .collect()
    }

    fn count(parsed: &Parsed, token_type: TokenType) -> usize {
        parsed
            .events()
            .iter()
            .filter(|e| e.is_enter() && e.token_type.same_token(token_type))
            .count()
    }

    fn assert_balanced(parsed: &Parsed) {
        let mut stack = Vec::new();
        for event in parsed.events() {
            match event.kind {
                EventKind::Enter => stack.push(event.token_type),
                EventKind::Exit => {
                    let open = stack.pop();
                    assert_eq!(open, Some(event.token_type), "unbalanced at {event:?}");
                }
            }
        }
        assert!(stack.is_empty(), "unclosed: {stack:?}");
    }

    #[test]
    fn test_paragraph_text() {
        let parsed = Parser::new().parse("hello\nworld");
        assert_balanced(&parsed);
        assert_eq!(texts_of(&parsed, TokenType::Data), vec!["hello", "world"]);
        assert_eq!(count(&parsed, TokenType::Paragraph), 1);
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        let parsed = Parser::new().parse("a\n\nb\n");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Paragraph), 2);
    }

    #[test]
    fn test_container_content_is_flow() {
        let parsed = Parser::new().parse(":::note\nhello\n:::");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Paragraph), 1);
        assert_eq!(texts_of(&parsed, TokenType::Data), vec!["hello"]);
        assert_eq!(count(&parsed, TokenType::ContainerFence), 2);
        assert_eq!(count(&parsed, TokenType::ChunkDocument { lazy: false }), 0);
    }

    #[test]
    fn test_nested_directive_in_container() {
        let parsed = Parser::new().parse(":::out\n::in\n:::");
        assert_balanced(&parsed);
        assert_eq!(
            texts_of(&parsed, TokenType::Name(DirectiveKind::Container)),
            vec!["out"]
        );
        assert_eq!(texts_of(&parsed, TokenType::Name(DirectiveKind::Leaf)), vec!["in"]);
    }

    #[test]
    fn test_text_directive_in_paragraph() {
        let parsed = Parser::new().parse("a :b[c]{.d} e");
        assert_balanced(&parsed);
        assert_eq!(texts_of(&parsed, TokenType::Name(DirectiveKind::Text)), vec!["b"]);
        assert_eq!(texts_of(&parsed, TokenType::Data), vec!["a ", "c", " e"]);
    }

    #[test]
    fn test_label_content_is_inline() {
        let parsed = Parser::new().parse("::a[x :y z]");
        assert_balanced(&parsed);
        assert_eq!(texts_of(&parsed, TokenType::Name(DirectiveKind::Text)), vec!["y"]);
    }

    #[test]
    fn test_leaf_interrupts_paragraph() {
        let parsed = Parser::new().parse("text\n::hr\nmore");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Paragraph), 2);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Leaf)), 1);
    }

    #[test]
    fn test_container_interrupts_paragraph() {
        let parsed = Parser::new().parse("text\n:::note\nx\n:::");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Container)), 1);
    }

    #[test]
    fn test_failed_directive_is_paragraph() {
        let parsed = Parser::new().parse("::not a directive");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Leaf)), 0);
        assert_eq!(count(&parsed, TokenType::Paragraph), 1);
    }

    #[test]
    fn test_escaped_marker_allows_text_directive() {
        let parsed = Parser::new().parse(r"\::b");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::CharacterEscape), 1);
        assert_eq!(texts_of(&parsed, TokenType::Name(DirectiveKind::Text)), vec!["b"]);
    }

    #[test]
    fn test_marker_run_blocks_text_directive() {
        let parsed = Parser::new().parse("a::b");
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Text)), 0);
    }

    #[test]
    fn test_disabled_constructs() {
        let mut options = ParseOptions::default();
        options.constructs.leaf = false;
        options.constructs.text = false;
        let parsed = Parser::with_options(options).parse("::hr\n\na :b");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Leaf)), 0);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Text)), 0);
    }

    #[test]
    fn test_tab_indented_fence_is_not_a_directive() {
        let input = "\t:::note\n\tx\n\t:::";
        let parsed = Parser::new().parse(input);
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Container)), 0);
        assert_eq!(count(&parsed, TokenType::Paragraph), 1);

        let options = ParseOptions::default().with_code_indented(false);
        let parsed = Parser::with_options(options).parse(input);
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Container)), 1);
        assert_eq!(texts_of(&parsed, TokenType::Data), vec!["x"]);
    }

    #[test]
    fn test_tab_indented_leaf_does_not_interrupt() {
        let parsed = Parser::new().parse("text\n\t::hr");
        assert_balanced(&parsed);
        assert_eq!(count(&parsed, TokenType::Directive(DirectiveKind::Leaf)), 0);
        assert_eq!(count(&parsed, TokenType::Paragraph), 1);
    }

    #[test]
    fn test_nested_lines_keep_original_numbers() {
        let parsed = Parser::new().parse("intro\n\n:::note\n\n::in\n:::");
        let leaf = parsed
            .events()
            .iter()
            .find(|e| e.token_type == TokenType::Directive(DirectiveKind::Leaf))
            .map(|e| e.line);
        assert_eq!(leaf, Some(5));
    }

    #[test]
    fn test_lazy_marks_are_cleared_for_claimed_lines() {
        let parsed = Parser::new().mark_lazy(2).mark_lazy(9).parse(":::note\na\n:::");
        assert_eq!(parsed.lazy_lines().get(2), Some(false));
        assert!(parsed.lazy_lines().is_lazy(9));
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = Parser::new().parse(":::note\r\nhello\r\n:::\r\n");
        assert_balanced(&parsed);
        assert_eq!(texts_of(&parsed, TokenType::Data), vec!["hello"]);
        assert_eq!(count(&parsed, TokenType::ContainerFence), 2);
    }
}
