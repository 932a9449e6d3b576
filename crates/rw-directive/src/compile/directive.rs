//! Directive records handed to handlers.

use indexmap::IndexMap;

use crate::event::DirectiveKind;

/// Attributes in first-seen key order.
pub type Attributes = IndexMap<String, String>;

/// A fully parsed directive.
///
/// `label` and `attributes` are `None` when the source has no `[...]` or
/// `{...}`, and `content` is only set for container directives with a
/// body.
///
/// # Example
///
/// ```
/// use rw_directive::{Directive, DirectiveKind};
///
/// let directive = Directive::new(DirectiveKind::Leaf, "youtube")
///     .with_attribute("id", "abc")
///     .with_attribute("class", "wide");
/// assert_eq!(directive.attribute("id"), Some("abc"));
/// assert_eq!(directive.classes().collect::<Vec<_>>(), vec!["wide"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: String,
    /// Rendered label text.
    pub label: Option<String>,
    pub attributes: Option<Attributes>,
    /// Rendered body of a container.
    pub content: Option<String>,
}

impl Directive {
    /// Create a directive with no label, attributes or content.
    #[must_use]
    pub fn new(kind: DirectiveKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            label: None,
            attributes: None,
            content: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an attribute, creating the attribute list if needed.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(key).map(String::as_str)
    }

    /// Individual class names.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }
}

/// Merge attribute entries in emission order.
///
/// Repeated `class` values are joined with a space. Any other repeated key
/// keeps its first position and its last value.
pub(crate) fn merge(entries: Vec<(String, String)>) -> Attributes {
    let mut attributes = Attributes::with_capacity(entries.len());
    for (key, value) in entries {
        if key == "class" {
            if let Some(existing) = attributes.get_mut(&key) {
                existing.push(' ');
                existing.push_str(&value);
                continue;
            }
        }
        attributes.insert(key, value);
    }
    attributes
}
