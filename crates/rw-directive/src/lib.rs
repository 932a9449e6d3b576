//! Directive syntax for RW markdown.
//!
//! Recognizes three directive forms and compiles them through named
//! handlers:
//!
//! - container: `:::name[label]{attributes}` ... `:::`
//! - leaf: `::name[label]{attributes}` on its own line
//! - text: `:name[label]{attributes}` inside a paragraph
//!
//! # Architecture
//!
//! Parsing and compiling are separate passes connected by a flat list of
//! [`Event`]s:
//!
//! - [`Parser`] runs the recognizers inside a small host grammar
//!   (paragraphs, blank lines, escapes) and produces a [`Parsed`] document.
//! - [`compile`] walks the events once, builds a [`Directive`] record for
//!   every directive, and dispatches it to [`Handlers`].
//!
//! [`DirectiveCompiler`] wraps both passes.
//!
//! # Example
//!
//! ```
//! use rw_directive::{DirectiveCompiler, Outcome, html};
//!
//! let mut compiler = DirectiveCompiler::new()
//!     .with("kbd", html::element("kbd"))
//!     .with("*", |directive, output| {
//!         output.push(&format!("[{}]", directive.name));
//!         Ok(Outcome::Handled)
//!     });
//!
//! let out = compiler.compile("Press :kbd[Ctrl+C] or :other.").unwrap();
//! assert_eq!(out, "Press <kbd>Ctrl+C</kbd> or [other].\n");
//! ```

mod character;
mod compile;
mod error;
mod event;
pub mod html;
mod options;
mod parser;
mod syntax;
mod tokenizer;

pub use compile::{
    Attributes, Directive, DirectiveCompiler, Handler, Handlers, Outcome, Output, WILDCARD,
    compile,
};
pub use error::{CompileError, HandlerError};
pub use event::{DirectiveKind, Event, EventKind, SourceId, TokenType};
pub use options::{ConfigError, Constructs, ParseOptions};
pub use parser::{Parsed, Parser};
pub use tokenizer::LazyLines;
