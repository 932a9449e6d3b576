//! Character classes used by the recognizers.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Directive marker.
pub(crate) const MARKER: char = ':';

/// Minimum fence length, shared with fenced code.
pub(crate) const FENCE_SEQUENCE_SIZE_MIN: usize = 3;

/// Width of one tab stop.
pub(crate) const TAB_SIZE: usize = 4;

pub(crate) fn is_line_ending(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub(crate) fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

pub(crate) fn is_line_ending_or_space(c: char) -> bool {
    is_line_ending(c) || is_space_or_tab(c)
}

/// Column after `c` when it starts at `column`. Tabs advance to the next
/// tab stop.
pub(crate) fn advance_column(column: usize, c: char) -> usize {
    if c == '\t' {
        column + TAB_SIZE - column % TAB_SIZE
    } else {
        column + 1
    }
}

pub(crate) fn is_unicode_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Punctuation (`P*`) or symbol (`S*`) general category.
///
/// Marks, format characters and letters of any script are not
/// punctuation, so `e\u{301}` or a Devanagari vowel sign stay in a name.
pub(crate) fn is_unicode_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}
