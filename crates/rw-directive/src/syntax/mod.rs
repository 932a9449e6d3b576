//! Recognizers for the three directive forms and their parts.
//!
//! Each recognizer is an explicit state machine driven by
//! [`run`](crate::tokenizer::run). A recognizer returns `false` when the
//! input does not match; callers wrap it in
//! [`Tokenizer::attempt`](crate::tokenizer::Tokenizer::attempt) so a
//! mismatch leaves no trace.

pub(crate) mod attributes;
pub(crate) mod container;
pub(crate) mod label;
pub(crate) mod leaf;
pub(crate) mod name;
pub(crate) mod space;
pub(crate) mod text;
