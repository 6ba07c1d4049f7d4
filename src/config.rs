//! Directive configuration
//!
//! Replaces process-wide prefix state: build one `DirectiveConfig` and pass
//! it to every compile that should use it.

use crate::error::{Error, Result};

/// Default nesting limit for `#if` blocks and parentheses.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tree depth limit for a single guard expression. Long flat `and`/`or`
/// chains count here, not against `DEFAULT_MAX_DEPTH`.
pub const MAX_EXPR_DEPTH: usize = 4096;

pub const DEFAULT_PREFIX: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    If,
    Elif,
    Else,
    EndIf,
}

impl Directive {
    /// Keyword without prefix.
    pub fn name(self) -> &'static str {
        match self {
            Directive::If => "if",
            Directive::Elif => "elif",
            Directive::Else => "else",
            Directive::EndIf => "endif",
        }
    }

    /// Case-insensitive lookup of a keyword without prefix.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "if" => Some(Directive::If),
            "elif" => Some(Directive::Elif),
            "else" => Some(Directive::Else),
            "endif" => Some(Directive::EndIf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveConfig {
    prefix: String,
    max_depth: usize,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DirectiveConfig {
    /// Config with a custom directive prefix, e.g. `"//#"` or `"@"`.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        Self::default().with_prefix(prefix)
    }

    /// The prefix must be non-empty ASCII letters, digits or punctuation.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig("directive prefix is empty".to_string()));
        }
        if let Some(c) = prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || c.is_ascii_punctuation()))
        {
            return Err(Error::InvalidConfig(format!(
                "directive prefix {:?} contains disallowed character {:?}",
                prefix, c
            )));
        }
        self.prefix = prefix;
        Ok(self)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Result<Self> {
        if max_depth == 0 {
            return Err(Error::InvalidConfig("max depth must be at least 1".to_string()));
        }
        self.max_depth = max_depth;
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Full directive keyword, e.g. `#elif`.
    pub fn keyword(&self, directive: Directive) -> String {
        format!("{}{}", self.prefix, directive.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefix_is_hash() {
        let config = DirectiveConfig::default();
        assert_eq!(config.prefix(), "#");
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(config.keyword(Directive::If), "#if");
        assert_eq!(config.keyword(Directive::EndIf), "#endif");
    }

    #[test]
    fn custom_prefix_redefines_keywords() {
        let config = DirectiveConfig::new("//@").unwrap();
        assert_eq!(config.keyword(Directive::Elif), "//@elif");
        assert_eq!(config.keyword(Directive::Else), "//@else");

        let config = DirectiveConfig::new("PP").unwrap();
        assert_eq!(config.keyword(Directive::If), "PPif");
    }

    #[test]
    fn rejects_bad_prefixes() {
        for prefix in ["", " ", "# ", "\t#", "é", "#\n"] {
            assert!(
                matches!(DirectiveConfig::new(prefix), Err(Error::InvalidConfig(_))),
                "accepted {:?}",
                prefix
            );
        }
    }

    #[test]
    fn rejects_zero_depth() {
        assert!(DirectiveConfig::default().with_max_depth(0).is_err());
        assert_eq!(
            DirectiveConfig::default().with_max_depth(8).unwrap().max_depth(),
            8
        );
    }

    #[test]
    fn directive_names_are_case_insensitive() {
        assert_eq!(Directive::from_name("ENDIF"), Some(Directive::EndIf));
        assert_eq!(Directive::from_name("Elif"), Some(Directive::Elif));
        assert_eq!(Directive::from_name("ifdef"), None);
    }
}
