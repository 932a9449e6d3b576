//! Parse configuration.
//!
//! Options can be built in code or read from TOML:
//!
//! ```toml
//! code_indented = false
//!
//! [constructs]
//! text = false
//! ```

use std::path::Path;

use serde::Deserialize;

/// Error loading [`ParseOptions`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML or has unexpected fields.
    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
}

/// Options for [`Parser`](crate::Parser).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Whether indented code is part of the active grammar.
    ///
    /// While enabled, a closing container fence may be indented by at most
    /// three spaces. When disabled, any indentation is accepted.
    pub code_indented: bool,
    /// Which directive forms are recognized.
    pub constructs: Constructs,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            code_indented: true,
            constructs: Constructs::default(),
        }
    }
}

/// The active construct set.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Constructs {
    /// `:::name` fenced blocks.
    pub container: bool,
    /// `::name` single-line blocks.
    pub leaf: bool,
    /// `:name` inline spans.
    pub text: bool,
}

impl Default for Constructs {
    fn default() -> Self {
        Self {
            container: true,
            leaf: true,
            text: true,
        }
    }
}

impl ParseOptions {
    /// Create options with every construct enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Enable or disable indented code.
    #[must_use]
    pub fn with_code_indented(mut self, enabled: bool) -> Self {
        self.code_indented = enabled;
        self
    }

    /// Replace the active construct set.
    #[must_use]
    pub fn with_constructs(mut self, constructs: Constructs) -> Self {
        self.constructs = constructs;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(options.code_indented);
        assert!(options.constructs.container);
        assert!(options.constructs.leaf);
        assert!(options.constructs.text);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let options = ParseOptions::from_toml_str("").unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_partial_toml() {
        let options = ParseOptions::from_toml_str(
            r"
code_indented = false

[constructs]
text = false
",
        )
        .unwrap();

        assert!(!options.code_indented);
        assert!(options.constructs.container);
        assert!(options.constructs.leaf);
        assert!(!options.constructs.text);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ParseOptions::from_toml_str("unknown = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[constructs]\nleaf = false").unwrap();

        let options = ParseOptions::load(file.path()).unwrap();
        assert!(!options.constructs.leaf);
        assert!(options.constructs.text);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ParseOptions::load(Path::new("/nonexistent/directive.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .with_code_indented(false)
            .with_constructs(Constructs {
                container: false,
                ..Constructs::default()
            });
        assert!(!options.code_indented);
        assert!(!options.constructs.container);
        assert!(options.constructs.text);
    }
}
