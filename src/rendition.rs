//! Renditions and rendition sets.
//!
//! A [`Rendition`] binds a short identifier to display metadata and exactly
//! one renderable template, resolved either by path through a
//! [`TemplateStore`] or from inline source. A [`RenditionSet`] is the ordered
//! collection of renditions an author may choose among for one block.
//!
//! Renditions are constructed once, at application start-up, and never
//! mutated; sets may be shared between blocks by cloning since every entry
//! is immutable.

use log::debug;
use thiserror::Error;

use crate::config::{RenditionConfig, RenditionDef};
use crate::template::{ExecutableTemplate, TemplateError, TemplateStore};

/// The image-rendition hint meaning "use the original image".
pub const DEFAULT_IMAGE_RENDITION: &str = "original";

/// Error type for rendition construction and set resolution.
#[derive(Debug, Error)]
pub enum RenditionError {
    /// A rendition was defined with neither a template path nor inline source.
    #[error("rendition \"{short_name}\" provides neither path_to_template nor template_string")]
    NoTemplateProvided { short_name: String },

    /// A configuration entry cannot form a rendition (blank identifying names).
    #[error("invalid rendition entry \"{short_name}\": short_name and verbose_name must be non-empty")]
    InvalidRendition { short_name: String },

    /// The referenced configuration set name does not exist.
    #[error("no rendition set named \"{name}\"")]
    UnavailableSet { name: String },

    /// Template resolution failed. Not-found errors from the store pass
    /// through here unchanged.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// One way a content block can be rendered: a template plus display metadata.
///
/// # Example
///
/// ```rust
/// use guise::{Rendition, TemplateStore};
///
/// let store = TemplateStore::new();
/// let card = Rendition::from_source(
///     "card",
///     "Card View",
///     "A compact card.",
///     "<div>{{ self.title }}</div>",
///     &store,
/// ).unwrap();
///
/// assert_eq!(card.short_name(), "card");
/// assert_eq!(card.to_string(), "Card View");
/// ```
#[derive(Debug, Clone)]
pub struct Rendition {
    short_name: String,
    verbose_name: String,
    description: String,
    image_rendition: String,
    template: ExecutableTemplate,
}

impl Rendition {
    /// Builds a rendition from constructor arguments.
    ///
    /// The template source is resolved here, fail-fast: a `path_to_template`
    /// is looked up through the store (a missing template propagates
    /// unchanged); otherwise `template_string` is compiled inline. When both
    /// are given the path wins.
    ///
    /// # Errors
    ///
    /// [`RenditionError::InvalidRendition`] for blank identifying names,
    /// [`RenditionError::NoTemplateProvided`] when neither source is given,
    /// and any [`TemplateError`] from resolution.
    pub fn from_def(def: &RenditionDef, store: &TemplateStore) -> Result<Self, RenditionError> {
        if def.short_name.trim().is_empty() || def.verbose_name.trim().is_empty() {
            return Err(RenditionError::InvalidRendition {
                short_name: def.short_name.clone(),
            });
        }

        let template = if let Some(path) = &def.path_to_template {
            store.lookup(path)?
        } else if let Some(source) = &def.template_string {
            store.compile(source)?
        } else {
            return Err(RenditionError::NoTemplateProvided {
                short_name: def.short_name.clone(),
            });
        };

        Ok(Self {
            short_name: def.short_name.clone(),
            verbose_name: def.verbose_name.clone(),
            description: def.description.clone(),
            image_rendition: def.image_rendition.clone().unwrap_or_default(),
            template,
        })
    }

    /// Builds a rendition whose template is resolved by path.
    pub fn from_path(
        short_name: impl Into<String>,
        verbose_name: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<String>,
        store: &TemplateStore,
    ) -> Result<Self, RenditionError> {
        Self::from_def(
            &RenditionDef::new(short_name, verbose_name, description).with_template_path(path),
            store,
        )
    }

    /// Builds a rendition from inline template source.
    pub fn from_source(
        short_name: impl Into<String>,
        verbose_name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
        store: &TemplateStore,
    ) -> Result<Self, RenditionError> {
        Self::from_def(
            &RenditionDef::new(short_name, verbose_name, description).with_template_string(source),
            store,
        )
    }

    /// Sets the image-rendition hint. Consumes the rendition; once shared,
    /// a rendition is immutable.
    pub fn with_image_rendition(mut self, hint: impl Into<String>) -> Self {
        self.image_rendition = hint.into();
        self
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn verbose_name(&self) -> &str {
        &self.verbose_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The raw hint; empty means "original".
    pub fn image_rendition(&self) -> &str {
        &self.image_rendition
    }

    /// The hint with the empty default resolved to
    /// [`DEFAULT_IMAGE_RENDITION`].
    pub fn image_rendition_or_default(&self) -> &str {
        if self.image_rendition.is_empty() {
            DEFAULT_IMAGE_RENDITION
        } else {
            &self.image_rendition
        }
    }

    /// The resolved template.
    pub fn template(&self) -> &ExecutableTemplate {
        &self.template
    }
}

impl std::fmt::Display for Rendition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.verbose_name)
    }
}

/// An ordered `short_name → Rendition` collection.
///
/// Insertion order is the order choices are presented to authors. Inserting
/// a rendition whose short name is already present replaces the existing
/// entry *in place*, keeping its position — this is how core renditions are
/// extended or overridden by configuration.
#[derive(Debug, Clone, Default)]
pub struct RenditionSet {
    renditions: Vec<Rendition>,
}

impl RenditionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from an explicit list of renditions.
    ///
    /// Duplicate short names follow insert semantics: the later entry wins,
    /// in place.
    pub fn from_renditions(renditions: Vec<Rendition>) -> Self {
        let mut set = Self::new();
        for rendition in renditions {
            set.insert(rendition);
        }
        set
    }

    /// Builds a set from the named configuration entry.
    ///
    /// # Errors
    ///
    /// [`RenditionError::UnavailableSet`] if `name` is not configured; any
    /// error from constructing the individual renditions.
    pub fn from_config(
        name: &str,
        config: &RenditionConfig,
        store: &TemplateStore,
    ) -> Result<Self, RenditionError> {
        let defs = config
            .set(name)
            .ok_or_else(|| RenditionError::UnavailableSet {
                name: name.to_string(),
            })?;

        let mut set = Self::new();
        for def in defs {
            set.insert(Rendition::from_def(def, store)?);
        }
        debug!("built rendition set \"{}\" ({} renditions)", name, set.len());
        Ok(set)
    }

    /// Builds a set from hard-coded core renditions, optionally extended by
    /// a configuration-sourced set.
    ///
    /// Extension entries sharing a short name with a core rendition override
    /// it in place.
    ///
    /// # Errors
    ///
    /// [`RenditionError::UnavailableSet`] if `extension` names a set absent
    /// from the configuration.
    pub fn extended(
        core: Vec<Rendition>,
        extension: Option<&str>,
        config: &RenditionConfig,
        store: &TemplateStore,
    ) -> Result<Self, RenditionError> {
        let mut set = Self::from_renditions(core);
        if let Some(name) = extension {
            let defs = config
                .set(name)
                .ok_or_else(|| RenditionError::UnavailableSet {
                    name: name.to_string(),
                })?;
            for def in defs {
                set.insert(Rendition::from_def(def, store)?);
            }
        }
        Ok(set)
    }

    /// Inserts a rendition, replacing any existing entry with the same short
    /// name in place.
    pub fn insert(&mut self, rendition: Rendition) {
        match self
            .renditions
            .iter_mut()
            .find(|r| r.short_name == rendition.short_name)
        {
            Some(slot) => *slot = rendition,
            None => self.renditions.push(rendition),
        }
    }

    /// Looks up a rendition by short name.
    pub fn get(&self, short_name: &str) -> Option<&Rendition> {
        self.renditions.iter().find(|r| r.short_name == short_name)
    }

    pub fn contains(&self, short_name: &str) -> bool {
        self.get(short_name).is_some()
    }

    /// Renditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rendition> {
        self.renditions.iter()
    }

    /// Short names in insertion order.
    pub fn short_names(&self) -> impl Iterator<Item = &str> {
        self.renditions.iter().map(|r| r.short_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(short: &str, source: &str) -> RenditionDef {
        RenditionDef::new(short, short.to_uppercase(), "").with_template_string(source)
    }

    // =========================================================================
    // Rendition construction
    // =========================================================================

    #[test]
    fn test_no_template_provided() {
        let store = TemplateStore::new();
        let result = Rendition::from_def(&RenditionDef::new("card", "Card", ""), &store);
        assert!(matches!(
            result,
            Err(RenditionError::NoTemplateProvided { .. })
        ));
    }

    #[test]
    fn test_path_wins_over_inline() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("card.html"), "from path").unwrap();

        let mut store = TemplateStore::new();
        store.add_template_dir(temp.path()).unwrap();

        let rendition = Rendition::from_def(
            &RenditionDef::new("card", "Card", "")
                .with_template_path("card")
                .with_template_string("from inline"),
            &store,
        )
        .unwrap();

        let output = rendition.template().render(&serde_json::json!({})).unwrap();
        assert_eq!(output, "from path");
    }

    #[test]
    fn test_missing_template_path_propagates() {
        let store = TemplateStore::new();
        let result = Rendition::from_def(
            &RenditionDef::new("card", "Card", "").with_template_path("nope.html"),
            &store,
        );
        assert!(matches!(
            result,
            Err(RenditionError::Template(TemplateError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_blank_names_rejected() {
        let store = TemplateStore::new();
        let result = Rendition::from_def(&def("", "x"), &store);
        assert!(matches!(
            result,
            Err(RenditionError::InvalidRendition { .. })
        ));
    }

    #[test]
    fn test_display_is_verbose_name() {
        let store = TemplateStore::new();
        let rendition = Rendition::from_source("card", "Card View", "", "x", &store).unwrap();
        assert_eq!(rendition.to_string(), "Card View");
    }

    #[test]
    fn test_image_rendition_default() {
        let store = TemplateStore::new();
        let plain = Rendition::from_source("a", "A", "", "x", &store).unwrap();
        assert_eq!(plain.image_rendition(), "");
        assert_eq!(plain.image_rendition_or_default(), "original");

        let hinted = Rendition::from_source("b", "B", "", "x", &store)
            .unwrap()
            .with_image_rendition("width-400");
        assert_eq!(hinted.image_rendition_or_default(), "width-400");
    }

    // =========================================================================
    // RenditionSet
    // =========================================================================

    #[test]
    fn test_set_preserves_insertion_order() {
        let store = TemplateStore::new();
        let set = RenditionSet::from_renditions(vec![
            Rendition::from_def(&def("zebra", "z"), &store).unwrap(),
            Rendition::from_def(&def("apple", "a"), &store).unwrap(),
        ]);

        let names: Vec<&str> = set.short_names().collect();
        assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_set_insert_overwrites_in_place() {
        let store = TemplateStore::new();
        let mut set = RenditionSet::from_renditions(vec![
            Rendition::from_def(&def("a", "one"), &store).unwrap(),
            Rendition::from_def(&def("b", "two"), &store).unwrap(),
        ]);

        set.insert(
            Rendition::from_source("a", "Replaced", "", "three", &store).unwrap(),
        );

        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.short_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().verbose_name(), "Replaced");
    }

    #[test]
    fn test_set_from_unknown_config_name() {
        let store = TemplateStore::new();
        let config = RenditionConfig::new();
        let result = RenditionSet::from_config("missing", &config, &store);
        assert!(matches!(
            result,
            Err(RenditionError::UnavailableSet { .. })
        ));
    }

    #[test]
    fn test_set_from_config() {
        let store = TemplateStore::new();
        let config = RenditionConfig::new().with_set("standard", vec![def("card", "c")]);

        let set = RenditionSet::from_config("standard", &config, &store).unwrap();
        assert!(set.contains("card"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_extended_overrides_core() {
        let store = TemplateStore::new();
        let core = vec![
            Rendition::from_source("card", "Core Card", "", "core", &store).unwrap(),
            Rendition::from_source("hero", "Hero", "", "hero", &store).unwrap(),
        ];
        let config = RenditionConfig::new().with_set(
            "extras",
            vec![def("card", "override"), def("strip", "new")],
        );

        let set = RenditionSet::extended(core, Some("extras"), &config, &store).unwrap();

        let names: Vec<&str> = set.short_names().collect();
        assert_eq!(names, vec!["card", "hero", "strip"]);
        assert_eq!(set.get("card").unwrap().verbose_name(), "CARD");
    }

    #[test]
    fn test_extended_unknown_extension_set() {
        let store = TemplateStore::new();
        let result =
            RenditionSet::extended(Vec::new(), Some("missing"), &RenditionConfig::new(), &store);
        assert!(matches!(
            result,
            Err(RenditionError::UnavailableSet { .. })
        ));
    }

    #[test]
    fn test_extended_without_extension() {
        let store = TemplateStore::new();
        let core = vec![Rendition::from_def(&def("card", "c"), &store).unwrap()];
        let set = RenditionSet::extended(core, None, &RenditionConfig::new(), &store).unwrap();
        assert_eq!(set.len(), 1);
    }
}
