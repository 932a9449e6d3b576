//! Handler registry.

use std::collections::HashMap;
use std::fmt;

use super::directive::Directive;
use super::output::Output;
use crate::error::HandlerError;

/// Registry key that matches any directive without its own handler.
pub const WILDCARD: &str = "*";

/// What a handler did with a directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The handler said nothing; counts as handled.
    #[default]
    Unspecified,
    /// The handler rendered the directive.
    Handled,
    /// The handler refused; the next handler in line gets a chance.
    Declined,
}

impl Outcome {
    /// Whether this outcome stops dispatch.
    #[must_use]
    pub fn is_handled(self) -> bool {
        self != Self::Declined
    }
}

/// Renders directives of one name.
///
/// Implemented for every `FnMut(&Directive, &mut Output) -> Result<Outcome, HandlerError>`.
///
/// # Example
///
/// ```
/// use rw_directive::{Directive, Handler, HandlerError, Outcome, Output};
///
/// struct Kbd;
///
/// impl Handler for Kbd {
///     fn handle(&mut self, directive: &Directive, output: &mut Output) -> Result<Outcome, HandlerError> {
///         output.push("<kbd>");
///         output.push(directive.label.as_deref().unwrap_or_default());
///         output.push("</kbd>");
///         Ok(Outcome::Handled)
///     }
/// }
/// ```
pub trait Handler {
    fn handle(&mut self, directive: &Directive, output: &mut Output)
    -> Result<Outcome, HandlerError>;
}

impl<F> Handler for F
where
    F: FnMut(&Directive, &mut Output) -> Result<Outcome, HandlerError>,
{
    fn handle(
        &mut self,
        directive: &Directive,
        output: &mut Output,
    ) -> Result<Outcome, HandlerError> {
        self(directive, output)
    }
}

/// Handlers by directive name, plus one fallback.
///
/// # Example
///
/// ```
/// use rw_directive::{Handlers, Outcome};
///
/// let handlers = Handlers::new()
///     .with("note", |_, output| {
///         output.push("[note]");
///         Ok(Outcome::Handled)
///     })
///     .with("*", |_, _| Ok(Outcome::Declined));
/// assert!(handlers.contains("note"));
/// assert!(handlers.has_fallback());
/// ```
#[derive(Default)]
pub struct Handlers {
    named: HashMap<String, Box<dyn Handler>>,
    fallback: Option<Box<dyn Handler>>,
}

impl Handlers {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure for `name`. [`WILDCARD`] sets the fallback.
    #[must_use]
    pub fn with<F>(self, name: &str, handler: F) -> Self
    where
        F: FnMut(&Directive, &mut Output) -> Result<Outcome, HandlerError> + 'static,
    {
        self.with_handler(name, handler)
    }

    /// Register a [`Handler`] for `name`. [`WILDCARD`] sets the fallback.
    #[must_use]
    pub fn with_handler<H: Handler + 'static>(mut self, name: &str, handler: H) -> Self {
        self.insert(name, handler);
        self
    }

    /// Register a handler, replacing any previous one for `name`.
    pub fn insert<H: Handler + 'static>(&mut self, name: &str, handler: H) {
        if name == WILDCARD {
            self.fallback = Some(Box::new(handler));
        } else {
            self.named.insert(name.to_owned(), Box::new(handler));
        }
    }

    /// Whether a handler is registered under exactly `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Run the named handler, then the fallback, until one accepts.
    ///
    /// Returns whether the directive was handled.
    pub(crate) fn dispatch(
        &mut self,
        directive: &Directive,
        output: &mut Output,
    ) -> Result<bool, HandlerError> {
        if let Some(handler) = self.named.get_mut(&directive.name) {
            if handler.handle(directive, output)?.is_handled() {
                return Ok(true);
            }
            tracing::debug!(name = %directive.name, "Handler declined directive");
        }
        if let Some(fallback) = self.fallback.as_mut() {
            return Ok(fallback.handle(directive, output)?.is_handled());
        }
        Ok(false)
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Handlers")
            .field("named", &names)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
