//! Ready-made HTML handlers.

use std::fmt::Write;

use crate::compile::{Directive, Outcome, Output};
use crate::error::HandlerError;
use crate::event::DirectiveKind;

/// Handler that renders a directive as an HTML element named `tag`.
///
/// Attributes are escaped. Container content, or the label for leaf and
/// text directives, becomes the element's children as already rendered,
/// with document text escaped by the compiler.
///
/// # Example
///
/// ```
/// use rw_directive::{DirectiveCompiler, html};
///
/// let mut compiler = DirectiveCompiler::new().with("note", html::element("aside"));
/// let out = compiler.compile(":::note{.tip}\nHello\n:::").unwrap();
/// assert_eq!(out, "<aside class=\"tip\">\nHello\n</aside>");
/// ```
pub fn element(
    tag: impl Into<String>,
) -> impl FnMut(&Directive, &mut Output) -> Result<Outcome, HandlerError> + 'static {
    let tag = tag.into();
    move |directive, output| {
        output.push(&start_tag(&tag, directive)?);
        match directive.kind {
            DirectiveKind::Container => {
                if let Some(content) = directive.content.as_deref() {
                    let line_ending = output.line_ending().to_owned();
                    output.push(&line_ending);
                    output.push(content);
                }
            }
            DirectiveKind::Leaf | DirectiveKind::Text => {
                output.push(directive.label.as_deref().unwrap_or_default());
            }
        }
        output.push(&format!("</{tag}>"));
        Ok(Outcome::Handled)
    }
}

/// `<tag key="value" ...>` with escaped attribute values.
pub fn start_tag(tag: &str, directive: &Directive) -> Result<String, std::fmt::Error> {
    let mut out = format!("<{tag}");
    for (key, value) in directive.attributes.iter().flatten() {
        if value.is_empty() {
            write!(out, " {key}")?;
        } else {
            write!(
                out,
                r#" {key}="{}""#,
                html_escape::encode_double_quoted_attribute(value)
            )?;
        }
    }
    out.push('>');
    Ok(out)
}
