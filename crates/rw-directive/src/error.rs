//! Compile errors.

/// Error type handlers may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Error produced by a compile pass.
///
/// Every variant except [`CompileError::Handler`] means the event stream
/// was not produced by a conforming tokenizer.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A directive part arrived with no open directive.
    #[error("directive event without an open directive")]
    EmptyStack,

    /// A directive closed without a name.
    #[error("{kind:?} directive closed without a name")]
    MissingName { kind: crate::DirectiveKind },

    /// The event stream ended with directives still open.
    #[error("{open} directive(s) left open at end of input")]
    Unclosed { open: usize },

    /// An attribute token arrived outside an attribute list.
    #[error("attribute token outside an attribute list")]
    MissingAttributes,

    /// More buffers were resumed than started.
    #[error("output buffer stack underflow")]
    BufferUnderflow,

    /// A handler failed.
    #[error("handler for directive `{name}` failed")]
    Handler {
        name: String,
        #[source]
        source: HandlerError,
    },
}
