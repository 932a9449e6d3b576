//! One-pass compiler from events to rendered text.
//!
//! The compiler walks the event stream front to back, keeping one frame
//! per open directive. When a directive closes, its record is handed to
//! the registered handlers, which write into the shared [`Output`].

mod directive;
mod handler;
mod output;

pub use directive::{Attributes, Directive};
pub use handler::{Handler, Handlers, Outcome, WILDCARD};
pub use output::Output;

use std::borrow::Cow;

use crate::error::{CompileError, HandlerError};
use crate::event::{DirectiveKind, Event, EventKind, TokenType};
use crate::options::ParseOptions;
use crate::parser::{Parsed, Parser};

/// Parses documents and renders directives through handlers.
///
/// Text outside directives is copied through with `&`, `<` and `>`
/// escaped, so labels and content reach handlers as HTML. A directive no handler
/// accepts renders nothing; for block directives the line ending after it
/// is dropped as well.
///
/// # Example
///
/// ```
/// use rw_directive::{DirectiveCompiler, Outcome};
///
/// let mut compiler = DirectiveCompiler::new().with("abbr", |directive, output| {
///     let title = directive.attribute("title").unwrap_or_default();
///     output.push(&format!("{} ({title})", directive.label.as_deref().unwrap_or_default()));
///     Ok(Outcome::Handled)
/// });
///
/// let html = compiler.compile(r#"Use :abbr[TLS]{title="Transport Layer Security"}."#).unwrap();
/// assert_eq!(html, "Use TLS (Transport Layer Security).\n");
/// ```
#[derive(Debug, Default)]
pub struct DirectiveCompiler {
    parser: Parser,
    handlers: Handlers,
}

impl DirectiveCompiler {
    /// Create a compiler with default options and no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom parse options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.parser = Parser::with_options(options);
        self
    }

    /// Use a custom parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the handler registry.
    #[must_use]
    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Register a closure for `name`. [`WILDCARD`] sets the fallback.
    #[must_use]
    pub fn with<F>(mut self, name: &str, handler: F) -> Self
    where
        F: FnMut(&Directive, &mut Output) -> Result<Outcome, HandlerError> + 'static,
    {
        self.handlers.insert(name, handler);
        self
    }

    /// Register a [`Handler`] for `name`. [`WILDCARD`] sets the fallback.
    #[must_use]
    pub fn with_handler<H: Handler + 'static>(mut self, name: &str, handler: H) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Parse and compile a document.
    ///
    /// A failing handler stops the pass. Its error comes back as
    /// [`CompileError::Handler`] with the directive name, and the error the
    /// handler returned is available unchanged through
    /// [`std::error::Error::source`].
    pub fn compile(&mut self, input: &str) -> Result<String, CompileError> {
        let parsed = self.parser.parse(input);
        self.compile_parsed(&parsed)
    }

    /// Compile an already parsed document.
    pub fn compile_parsed(&mut self, parsed: &Parsed) -> Result<String, CompileError> {
        compile(parsed, &mut self.handlers)
    }
}

/// Compile `parsed` with `handlers`.
///
/// Handler errors are returned as in [`DirectiveCompiler::compile`].
pub fn compile(parsed: &Parsed, handlers: &mut Handlers) -> Result<String, CompileError> {
    let line_ending = parsed
        .events()
        .iter()
        .find(|event| event.token_type == TokenType::LineEnding)
        .map_or("\n", |event| parsed.slice(event));

    let mut pass = Pass {
        parsed,
        handlers,
        output: Output::with_line_ending(line_ending),
        stack: Vec::new(),
        directives: 0,
    };
    for event in parsed.events() {
        pass.event(event)?;
    }
    if !pass.stack.is_empty() {
        return Err(CompileError::Unclosed {
            open: pass.stack.len(),
        });
    }

    tracing::debug!(directives = pass.directives, "Compiled document");
    pass.output.finish()
}

/// A directive under construction.
#[derive(Debug)]
struct Frame {
    directive: Directive,
    /// Entries of the attribute list being read.
    attributes: Option<Vec<(String, String)>>,
    fences: usize,
}

struct Pass<'a> {
    parsed: &'a Parsed,
    handlers: &'a mut Handlers,
    output: Output,
    stack: Vec<Frame>,
    directives: usize,
}

impl Pass<'_> {
    fn event(&mut self, event: &Event) -> Result<(), CompileError> {
        let parsed = self.parsed;
        let text = parsed.slice(event);
        match (event.kind, event.token_type) {
            (EventKind::Enter, TokenType::Directive(kind)) => self.stack.push(Frame {
                directive: Directive::new(kind, String::new()),
                attributes: None,
                fences: 0,
            }),
            (EventKind::Exit, TokenType::Directive(_)) => self.exit_directive()?,
            (EventKind::Exit, TokenType::Name(_)) => self.top()?.directive.name = text.to_owned(),

            (EventKind::Enter, TokenType::Label(_)) => self.output.buffer(),
            (EventKind::Exit, TokenType::Label(_)) => {
                let label = self.output.resume()?;
                self.top()?.directive.label = Some(label);
            }

            (EventKind::Enter, TokenType::Attributes(_)) => {
                self.output.buffer();
                self.top()?.attributes = Some(Vec::new());
            }
            (EventKind::Exit, TokenType::AttributeIdValue) => {
                self.entries()?.push(("id".to_owned(), decode(text)));
            }
            (EventKind::Exit, TokenType::AttributeClassValue) => {
                self.entries()?.push(("class".to_owned(), decode(text)));
            }
            (EventKind::Exit, TokenType::AttributeName) => {
                self.entries()?.push((text.to_owned(), String::new()));
            }
            (EventKind::Exit, TokenType::AttributeValue) => {
                let entry = self.entries()?.last_mut().ok_or(CompileError::MissingAttributes)?;
                entry.1 = decode(text);
            }
            (EventKind::Exit, TokenType::Attributes(_)) => {
                self.output.resume()?;
                let frame = self.top()?;
                let entries = frame.attributes.take().ok_or(CompileError::MissingAttributes)?;
                frame.directive.attributes = Some(directive::merge(entries));
            }

            (EventKind::Enter, TokenType::ContainerContent) => self.output.buffer(),
            (EventKind::Exit, TokenType::ContainerContent) => {
                let content = self.output.resume()?;
                self.top()?.directive.content = Some(content);
            }
            (EventKind::Exit, TokenType::ContainerFence) => {
                let frame = self.top()?;
                frame.fences += 1;
                if frame.fences == 1 {
                    self.output.slurp_one_line_ending();
                }
            }

            (EventKind::Exit, TokenType::Data) => self.output.push(&encode(text)),
            (EventKind::Exit, TokenType::CharacterEscape) => {
                self.output.push(&encode(text.get(1..).unwrap_or_default()));
            }
            (EventKind::Exit, TokenType::LineEnding) => self.output.source_line_ending(text),
            (EventKind::Exit, TokenType::Paragraph) => self.output.line_ending_if_needed(),
            _ => {}
        }
        Ok(())
    }

    fn exit_directive(&mut self) -> Result<(), CompileError> {
        let frame = self.stack.pop().ok_or(CompileError::EmptyStack)?;
        let directive = frame.directive;
        if directive.name.is_empty() {
            return Err(CompileError::MissingName {
                kind: directive.kind,
            });
        }
        self.directives += 1;

        let handled = self
            .handlers
            .dispatch(&directive, &mut self.output)
            .map_err(|source| CompileError::Handler {
                name: directive.name.clone(),
                source,
            })?;
        if !handled {
            tracing::debug!(name = %directive.name, kind = ?directive.kind, "Unhandled directive");
            if directive.kind != DirectiveKind::Text {
                self.output.slurp_one_line_ending();
            }
        }
        Ok(())
    }

    fn top(&mut self) -> Result<&mut Frame, CompileError> {
        self.stack.last_mut().ok_or(CompileError::EmptyStack)
    }

    fn entries(&mut self) -> Result<&mut Vec<(String, String)>, CompileError> {
        self.top()?
            .attributes
            .as_mut()
            .ok_or(CompileError::MissingAttributes)
    }
}

/// Escape document text for HTML. Handler output is written as is.
fn encode(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Decode character references in an attribute value.
fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event::SourceId;

    /// Compile `input`, recording every directive through the fallback.
    fn collect(input: &str) -> (String, Vec<Directive>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut compiler = DirectiveCompiler::new().with(WILDCARD, move |directive, _| {
            sink.borrow_mut().push(directive.clone());
            Ok(Outcome::Declined)
        });
        let output = compiler.compile(input).unwrap();
        let directives = seen.borrow().clone();
        (output, directives)
    }

    fn event(kind: EventKind, token_type: TokenType) -> Event {
        Event {
            kind,
            token_type,
            source: SourceId(0),
            start: 0,
            end: 0,
            line: 1,
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let (output, directives) = collect("hello\nworld\n\nagain");
        assert_eq!(output, "hello\nworld\n\nagain\n");
        assert!(directives.is_empty());
    }

    #[test]
    fn test_character_escape() {
        let (output, _) = collect(r"a \* b \q");
        assert_eq!(output, "a * b \\q\n");
    }

    #[test]
    fn test_text_is_html_escaped() {
        let (output, _) = collect(r"a < b & \<i\> c");
        assert_eq!(output, "a &lt; b &amp; &lt;i&gt; c\n");
    }

    #[test]
    fn test_label_markup_is_escaped_but_handler_output_is_not() {
        let mut compiler = DirectiveCompiler::new().with("kbd", |directive, output| {
            output.push(&format!("<kbd>{}</kbd>", directive.label.as_deref().unwrap_or_default()));
            Ok(Outcome::Handled)
        });
        let output = compiler
            .compile(r":kbd[<img src=x onerror=alert(1)>] and \<b\>")
            .unwrap();
        assert_eq!(
            output,
            "<kbd>&lt;img src=x onerror=alert(1)&gt;</kbd> and &lt;b&gt;\n"
        );
    }

    #[test]
    fn test_bare_directive_has_no_label_or_attributes() {
        let (_, directives) = collect("::hr");
        assert_eq!(directives, vec![Directive::new(DirectiveKind::Leaf, "hr")]);
    }

    #[test]
    fn test_empty_label_and_attributes_are_present() {
        let (_, directives) = collect("::hr[]{}");
        assert_eq!(directives[0].label.as_deref(), Some(""));
        assert_eq!(directives[0].attributes, Some(Attributes::new()));
    }

    #[test]
    fn test_attributes_are_merged_and_decoded() {
        let (_, directives) = collect(r#"::x{.a #one .b id=two title="&lt;T&gt;" data-x}"#);
        let attributes = directives[0].attributes.clone().unwrap();
        assert_eq!(
            attributes.into_iter().collect::<Vec<_>>(),
            vec![
                ("class".to_owned(), "a b".to_owned()),
                ("id".to_owned(), "two".to_owned()),
                ("title".to_owned(), "<T>".to_owned()),
                ("data-x".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn test_label_is_rendered_inline() {
        let (output, directives) = collect(r"see :a[b \* :c[d]] end");
        assert_eq!(output, "see  end\n");
        let names: Vec<&str> = directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(directives[1].label.as_deref(), Some("b * "));
    }

    #[test]
    fn test_unhandled_block_slurps_line_ending() {
        let (output, _) = collect("::hr\nafter");
        assert_eq!(output, "after\n");
        let (output, _) = collect(":::note\nbody\n:::\nafter");
        assert_eq!(output, "after\n");
    }

    #[test]
    fn test_handled_container() {
        let mut compiler = DirectiveCompiler::new().with("note", |directive, output| {
            output.push("<aside>\n");
            output.push(directive.content.as_deref().unwrap_or_default());
            output.push("</aside>");
            Ok(Outcome::Unspecified)
        });
        let output = compiler.compile(":::note\nhello\n:::\nafter").unwrap();
        assert_eq!(output, "<aside>\nhello\n</aside>\nafter\n");
    }

    #[test]
    fn test_nested_containers() {
        let (_, directives) = collect("::::outer\n:::inner\nx\n:::\n::::");
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].name, "inner");
        assert_eq!(directives[0].content.as_deref(), Some("x\n"));
        assert_eq!(directives[1].name, "outer");
        assert_eq!(directives[1].content.as_deref(), Some(""));
    }

    #[test]
    fn test_nested_handled_output_lands_in_parent_content() {
        let mut compiler = DirectiveCompiler::new()
            .with("inner", |_, output| {
                output.push("[inner]");
                Ok(Outcome::Handled)
            })
            .with("outer", |directive, output| {
                output.push(&format!("<{}>", directive.content.as_deref().unwrap_or_default()));
                Ok(Outcome::Handled)
            });
        let output = compiler.compile("::::outer\n:::inner\n:::\n::::").unwrap();
        assert_eq!(output, "<[inner]\n>");
    }

    #[test]
    fn test_handler_error() {
        let mut compiler = DirectiveCompiler::new().with("x", |_, _| Err("nope".into()));
        let error = compiler.compile("::x").unwrap_err();
        assert!(matches!(error, CompileError::Handler { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_handler_error_is_kept_as_source() {
        let mut compiler = DirectiveCompiler::new()
            .with("x", |_, _| Err(Box::new(std::fmt::Error) as HandlerError));
        let error = compiler.compile("::x").unwrap_err();
        let source = std::error::Error::source(&error).unwrap();
        assert!(source.is::<std::fmt::Error>());
    }

    #[test]
    fn test_crlf_line_ending_is_reused() {
        let (output, _) = collect("a\r\nb");
        assert_eq!(output, "a\r\nb\r\n");
    }

    #[test]
    fn test_exit_without_open_directive() {
        let parsed = Parser::new().parse("");
        let mut handlers = Handlers::new();
        let mut pass = Pass {
            parsed: &parsed,
            handlers: &mut handlers,
            output: Output::new(),
            stack: Vec::new(),
            directives: 0,
        };
        let exit = event(EventKind::Exit, TokenType::Directive(DirectiveKind::Leaf));
        assert!(matches!(pass.event(&exit), Err(CompileError::EmptyStack)));
    }

    #[test]
    fn test_directive_without_name() {
        let parsed = Parser::new().parse("");
        let mut handlers = Handlers::new();
        let mut pass = Pass {
            parsed: &parsed,
            handlers: &mut handlers,
            output: Output::new(),
            stack: Vec::new(),
            directives: 0,
        };
        let kind = TokenType::Directive(DirectiveKind::Text);
        pass.event(&event(EventKind::Enter, kind)).unwrap();
        assert!(matches!(
            pass.event(&event(EventKind::Exit, kind)),
            Err(CompileError::MissingName {
                kind: DirectiveKind::Text
            })
        ));
    }

    #[test]
    fn test_attribute_outside_list() {
        let parsed = Parser::new().parse("");
        let mut handlers = Handlers::new();
        let mut pass = Pass {
            parsed: &parsed,
            handlers: &mut handlers,
            output: Output::new(),
            stack: Vec::new(),
            directives: 0,
        };
        pass.event(&event(EventKind::Enter, TokenType::Directive(DirectiveKind::Leaf)))
            .unwrap();
        assert!(matches!(
            pass.event(&event(EventKind::Exit, TokenType::AttributeName)),
            Err(CompileError::MissingAttributes)
        ));
    }
}
