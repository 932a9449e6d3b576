//! Token stream shared by the recognizers and the compiler.
//!
//! Recognizers write a flat sequence of [`Event`]s: every token appears
//! once as [`EventKind::Enter`] and once as [`EventKind::Exit`], properly
//! nested. The compiler reads the same sequence front to back.

/// The three directive forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Fenced block form: `:::name` ... `:::`.
    Container,
    /// Single-line block form: `::name`.
    Leaf,
    /// Inline span form: `:name`.
    Text,
}

/// Kind of token carried by an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    /// Plain text run.
    Data,
    /// `\n`, `\r` or `\r\n`.
    LineEnding,
    /// Indentation at the start of a line.
    LinePrefix,
    /// Spaces or tabs inside a construct.
    Whitespace,
    /// Backslash followed by ASCII punctuation.
    CharacterEscape,
    /// Paragraph wrapping text chunks.
    Paragraph,
    /// One line of inline content, tokenized later.
    ChunkText,
    /// One line of block content, tokenized later.
    ///
    /// `lazy` records whether the registry marked the line as a lazy
    /// continuation before the container claimed it.
    ChunkDocument { lazy: bool },

    /// Whole directive.
    Directive(DirectiveKind),
    /// Opening or closing fence line of a container.
    ContainerFence,
    /// Run of markers inside a container fence.
    ContainerSequence,
    /// Body of a container.
    ContainerContent,
    /// The `::` of a leaf directive.
    LeafSequence,
    /// The `:` of a text directive.
    TextMarker,
    /// Directive name.
    Name(DirectiveKind),

    /// `[...]` including brackets.
    Label(DirectiveKind),
    /// `[` or `]`.
    LabelMarker,
    /// Content between the label brackets.
    LabelString,

    /// `{...}` including braces.
    Attributes(DirectiveKind),
    /// `{` or `}`.
    AttributesMarker,
    /// One attribute or shorthand.
    Attribute,
    /// `#value`.
    AttributeId,
    /// `.value`.
    AttributeClass,
    /// The `#` or `.` of a shorthand.
    AttributeShorthandMarker,
    /// Value of an id shorthand.
    AttributeIdValue,
    /// Value of a class shorthand.
    AttributeClassValue,
    /// Plain attribute name.
    AttributeName,
    /// `=` between name and value.
    AttributeInitializerMarker,
    /// Quoted value including quotes.
    AttributeValueLiteral,
    /// `"` or `'`.
    AttributeValueMarker,
    /// Attribute value without quotes.
    AttributeValue,
    /// Data inside an attribute value.
    AttributeValueData,
}

impl TokenType {
    /// Whether two token types describe the same token, ignoring payloads
    /// that do not affect nesting.
    pub(crate) fn same_token(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Whether this token holds content that is tokenized in a second pass.
    pub(crate) fn is_chunk(self) -> bool {
        matches!(self, Self::ChunkText | Self::ChunkDocument { .. })
    }
}

/// Whether an event opens or closes a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Enter,
    Exit,
}

/// Identifier of a source buffer owned by a [`Parsed`](crate::Parsed) document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub(crate) usize);

/// One enter or exit of a token.
///
/// Both halves of a token carry the full byte span, so a consumer can
/// slice the token's text from either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub token_type: TokenType,
    /// Buffer the span points into.
    pub source: SourceId,
    /// Byte offset of the token start.
    pub start: usize,
    /// Byte offset of the token end.
    pub end: usize,
    /// Line in the original document where the token starts (1-indexed).
    pub line: usize,
}

impl Event {
    /// Whether this is the enter half of a token.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.kind == EventKind::Enter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_token_ignores_lazy_flag() {
        let a = TokenType::ChunkDocument { lazy: true };
        let b = TokenType::ChunkDocument { lazy: false };
        assert!(a.same_token(b));
        assert!(!a.same_token(TokenType::ChunkText));
    }

    #[test]
    fn test_same_token_ignores_kind() {
        let a = TokenType::Name(DirectiveKind::Leaf);
        assert!(a.same_token(TokenType::Name(DirectiveKind::Text)));
    }

    #[test]
    fn test_is_chunk() {
        assert!(TokenType::ChunkText.is_chunk());
        assert!(TokenType::ChunkDocument { lazy: false }.is_chunk());
        assert!(!TokenType::Data.is_chunk());
    }
}
