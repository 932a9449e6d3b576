//! Runs of spaces and tabs.

use crate::character::{advance_column, is_line_ending, is_space_or_tab};
use crate::event::TokenType;
use crate::tokenizer::Tokenizer;

/// Consume spaces and tabs into one `token_type` token.
///
/// Size is measured in columns, a tab reaching to the next tab stop. With
/// `max`, at most `max - 1` columns are consumed and a tab that would
/// cross that limit is left in place. No token is emitted when nothing
/// matches. Returns the number of columns consumed.
pub(crate) fn space(t: &mut Tokenizer<'_>, token_type: TokenType, max: Option<usize>) -> usize {
    let limit = max.map_or(usize::MAX, |max| max.saturating_sub(1));
    let start = t.column();
    let mut column = start;

    while let Some(c) = t.current().filter(|&c| is_space_or_tab(c)) {
        let next = advance_column(column, c);
        if next - start > limit {
            break;
        }
        if column == start {
            t.enter(token_type);
        }
        t.consume();
        column = next;
    }

    if column > start {
        t.exit(token_type);
    }
    column - start
}

/// Consume any mix of spaces, tabs and line endings.
pub(crate) fn whitespace(t: &mut Tokenizer<'_>) {
    loop {
        match t.current() {
            Some(c) if is_line_ending(c) => {
                t.enter(TokenType::LineEnding);
                t.consume();
                t.exit(TokenType::LineEnding);
            }
            Some(c) if is_space_or_tab(c) => {
                space(t, TokenType::Whitespace, None);
            }
            _ => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tests::{entered, index, with_tokenizer};

    #[test]
    fn test_space_unbounded() {
        with_tokenizer("  \t x", |t| {
            assert_eq!(space(t, TokenType::Whitespace, None), 5);
            assert_eq!(t.current(), Some('x'));
            assert_eq!(entered(t), vec![TokenType::Whitespace]);
        });
    }

    #[test]
    fn test_space_respects_max() {
        with_tokenizer("      x", |t| {
            assert_eq!(space(t, TokenType::LinePrefix, Some(4)), 3);
            assert_eq!(index(t), 3);
        });
    }

    #[test]
    fn test_tab_counts_to_tab_stop() {
        with_tokenizer("\tx", |t| {
            assert_eq!(space(t, TokenType::LinePrefix, Some(4)), 0);
            assert_eq!(t.current(), Some('\t'));
            assert!(entered(t).is_empty());
        });
        with_tokenizer("  \tx", |t| {
            assert_eq!(space(t, TokenType::LinePrefix, Some(5)), 4);
            assert_eq!(t.current(), Some('x'));
        });
        with_tokenizer(" \tx", |t| {
            assert_eq!(space(t, TokenType::LinePrefix, Some(4)), 1);
            assert_eq!(index(t), 1);
        });
    }

    #[test]
    fn test_space_nothing_emits_no_token() {
        with_tokenizer("x", |t| {
            assert_eq!(space(t, TokenType::Whitespace, None), 0);
            assert!(entered(t).is_empty());
        });
    }

    #[test]
    fn test_whitespace_crosses_lines() {
        with_tokenizer(" \n  x", |t| {
            whitespace(t);
            assert_eq!(t.current(), Some('x'));
            assert_eq!(
                entered(t),
                vec![
                    TokenType::Whitespace,
                    TokenType::LineEnding,
                    TokenType::Whitespace
                ]
            );
        });
    }
}
