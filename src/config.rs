//! Rendition-set configuration.
//!
//! A [`RenditionConfig`] holds the named rendition sets an application makes
//! available to its blocks. It is an explicit value handed to block
//! constructors rather than process-global state, so tests and embedding
//! applications can carry several configurations side by side.
//!
//! Sets are ordered *lists* of [`RenditionDef`] entries, each carrying its
//! own `short_name`: author-declared choice order is meaningful and must
//! survive deserialization, which mapping types do not guarantee.
//!
//! # YAML
//!
//! ```rust
//! use guise::RenditionConfig;
//!
//! let config = RenditionConfig::from_yaml(r#"
//! standard:
//!   - short_name: card
//!     verbose_name: Card
//!     description: A compact card.
//!     template_string: "<div>{{ self.title }}</div>"
//!   - short_name: hero
//!     verbose_name: Hero
//!     description: Full-width banner.
//!     path_to_template: blocks/hero.html
//!     image_rendition: width-1600
//! "#).unwrap();
//!
//! assert_eq!(config.set("standard").unwrap().len(), 2);
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
#[error("invalid rendition configuration: {0}")]
pub struct ConfigError(#[from] serde_yaml::Error);

/// Constructor arguments for one rendition.
///
/// Exactly one of `path_to_template` / `template_string` must be set; that
/// invariant is checked when the definition is turned into a
/// [`Rendition`](crate::Rendition), not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenditionDef {
    pub short_name: String,
    pub verbose_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path_to_template: Option<String>,
    #[serde(default)]
    pub template_string: Option<String>,
    #[serde(default)]
    pub image_rendition: Option<String>,
}

impl RenditionDef {
    /// Creates a definition with identifying names and no template source.
    pub fn new(
        short_name: impl Into<String>,
        verbose_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            verbose_name: verbose_name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the template lookup path.
    pub fn with_template_path(mut self, path: impl Into<String>) -> Self {
        self.path_to_template = Some(path.into());
        self
    }

    /// Sets the inline template source.
    pub fn with_template_string(mut self, source: impl Into<String>) -> Self {
        self.template_string = Some(source.into());
        self
    }

    /// Sets the image-rendition hint.
    pub fn with_image_rendition(mut self, hint: impl Into<String>) -> Self {
        self.image_rendition = Some(hint.into());
        self
    }
}

/// Named rendition sets: the application-wide rendition configuration.
#[derive(Debug, Clone, Default)]
pub struct RenditionConfig {
    sets: HashMap<String, Vec<RenditionDef>>,
}

impl RenditionConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from YAML: a mapping of set name to an ordered
    /// list of rendition definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document does not deserialize.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let sets: HashMap<String, Vec<RenditionDef>> = serde_yaml::from_str(source)?;
        Ok(Self { sets })
    }

    /// Adds (or replaces) a named set.
    pub fn with_set(mut self, name: impl Into<String>, defs: Vec<RenditionDef>) -> Self {
        self.sets.insert(name.into(), defs);
        self
    }

    /// The definitions of a named set, in declaration order.
    pub fn set(&self, name: &str) -> Option<&[RenditionDef]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    /// Names of all configured sets.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_preserves_declaration_order() {
        let config = RenditionConfig::from_yaml(
            r#"
standard:
  - short_name: zebra
    verbose_name: Zebra
    template_string: "z"
  - short_name: apple
    verbose_name: Apple
    template_string: "a"
"#,
        )
        .unwrap();

        let names: Vec<&str> = config
            .set("standard")
            .unwrap()
            .iter()
            .map(|d| d.short_name.as_str())
            .collect();
        assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_from_yaml_rejects_malformed() {
        let result = RenditionConfig::from_yaml("standard: 12");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_set_is_none() {
        let config = RenditionConfig::new();
        assert!(config.set("missing").is_none());
    }

    #[test]
    fn test_with_set_replaces() {
        let config = RenditionConfig::new()
            .with_set("s", vec![RenditionDef::new("a", "A", "")])
            .with_set("s", vec![RenditionDef::new("b", "B", "")]);

        let defs = config.set("s").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].short_name, "b");
    }

    #[test]
    fn test_def_builders() {
        let def = RenditionDef::new("card", "Card", "A card.")
            .with_template_path("blocks/card.html")
            .with_image_rendition("width-400");

        assert_eq!(def.path_to_template.as_deref(), Some("blocks/card.html"));
        assert_eq!(def.image_rendition.as_deref(), Some("width-400"));
        assert!(def.template_string.is_none());
    }
}
