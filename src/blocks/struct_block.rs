//! The rendition-aware struct block.
//!
//! A [`StructBlock`] is a composite of named child blocks bound to a
//! [`RenditionSet`]. Construction appends two synthetic fields after the
//! declared children:
//!
//! - `addl_classes` — optional free text appended to the module's containing
//!   element
//! - `render_as` — the author's rendition choice, validated against the
//!   bound set
//!
//! Conversion resolves the chosen [`Rendition`] and threads it to every
//! present child through the [`RenditionContext`], so nested children learn
//! which rendition applies without re-deriving it. Rendering executes the
//! chosen rendition's template with the whole converted value as `self`.

use std::rc::Rc;

use log::trace;
use serde::Serialize;

use super::{Block, BlockError, BlockValue, ChoiceBlock, StructValue, TextBlock};
use crate::config::RenditionConfig;
use crate::context::RenditionContext;
use crate::rendition::{Rendition, RenditionSet};
use crate::template::TemplateStore;

/// Field names the struct reserves for its synthetic fields.
pub const RESERVED_FIELDS: &[&str] = &["addl_classes", "render_as"];

/// The template context a rendition's template executes against.
#[derive(Serialize)]
struct RenderScope<'a> {
    #[serde(rename = "self")]
    value: &'a StructValue,
    image_rendition: &'a str,
    addl_classes: &'a str,
}

/// A composite block whose rendering is selected per-value from a bound
/// rendition set.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use guise::{Block, Rendition, RenditionContext, RenditionSet, StructBlock, TemplateStore, TextBlock};
/// use serde_json::json;
///
/// let store = TemplateStore::new();
/// let set = RenditionSet::from_renditions(vec![
///     Rendition::from_source("plain", "Plain", "", "{{ self.title }}", &store).unwrap(),
/// ]);
/// let block = StructBlock::new(
///     vec![("title".to_string(), Rc::new(TextBlock::new()) as Rc<dyn Block>)],
///     set,
/// ).unwrap();
///
/// let value = block
///     .convert(&json!({"title": "Hi", "render_as": "plain"}), &RenditionContext::none())
///     .unwrap();
/// assert_eq!(block.render(&value, &RenditionContext::none()).unwrap(), "Hi");
/// ```
pub struct StructBlock {
    children: Vec<(String, Rc<dyn Block>)>,
    renditions: RenditionSet,
}

impl StructBlock {
    /// Creates a struct block from declared children and a bound rendition
    /// set, appending the synthetic `addl_classes` and `render_as` fields.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ReservedField`] if a declared child uses a
    /// synthetic field name.
    pub fn new(
        local_blocks: Vec<(String, Rc<dyn Block>)>,
        renditions: RenditionSet,
    ) -> Result<Self, BlockError> {
        let mut children = local_blocks;
        if let Some((name, _)) = children
            .iter()
            .find(|(name, _)| RESERVED_FIELDS.contains(&name.as_str()))
        {
            return Err(BlockError::ReservedField { name: name.clone() });
        }

        children.push((
            "addl_classes".to_string(),
            Rc::new(
                TextBlock::new()
                    .optional()
                    .with_label("Additional Classes")
                    .with_help_text(
                        "Any additional classes to add to this module's containing element.",
                    ),
            ) as Rc<dyn Block>,
        ));
        children.push((
            "render_as".to_string(),
            Rc::new(
                ChoiceBlock::from_rendition_set(&renditions)
                    .with_label("Render As")
                    .with_help_text("How this module should be rendered."),
            ) as Rc<dyn Block>,
        ));

        Ok(Self {
            children,
            renditions,
        })
    }

    /// Creates a struct block bound to the named configuration set.
    ///
    /// # Errors
    ///
    /// [`RenditionError::UnavailableSet`](crate::RenditionError::UnavailableSet)
    /// if the name is not configured.
    pub fn from_config(
        local_blocks: Vec<(String, Rc<dyn Block>)>,
        set_name: &str,
        config: &RenditionConfig,
        store: &TemplateStore,
    ) -> Result<Self, BlockError> {
        let renditions = RenditionSet::from_config(set_name, config, store)?;
        Self::new(local_blocks, renditions)
    }

    /// Creates a struct block from hard-coded core renditions plus an
    /// optional configuration-sourced extension set.
    pub fn from_core(
        local_blocks: Vec<(String, Rc<dyn Block>)>,
        core: Vec<Rendition>,
        extension: Option<&str>,
        config: &RenditionConfig,
        store: &TemplateStore,
    ) -> Result<Self, BlockError> {
        let renditions = RenditionSet::extended(core, extension, config, store)?;
        Self::new(local_blocks, renditions)
    }

    /// The bound rendition set.
    pub fn renditions(&self) -> &RenditionSet {
        &self.renditions
    }

    /// All child fields in declaration order, synthetic fields last.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Rc<dyn Block>)> {
        self.children
            .iter()
            .map(|(name, block)| (name.as_str(), block))
    }

    pub fn child(&self, name: &str) -> Option<&Rc<dyn Block>> {
        self.children
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, block)| block)
    }

    fn resolve(&self, short_name: &str) -> Result<&Rendition, BlockError> {
        self.renditions
            .get(short_name)
            .ok_or_else(|| BlockError::UnknownRendition {
                short_name: short_name.to_string(),
            })
    }
}

impl Block for StructBlock {
    /// Converts a raw field mapping.
    ///
    /// The submitted `render_as` choice is validated against the bound set
    /// before any rendition is resolved; children are then converted in
    /// declaration order under the resolved rendition's context, absent
    /// fields taking the child's default.
    fn convert(
        &self,
        raw: &serde_json::Value,
        _ctx: &RenditionContext,
    ) -> Result<BlockValue, BlockError> {
        let raw = raw.as_object().ok_or(BlockError::ExpectedMapping)?;

        let chosen = match raw.get("render_as") {
            Some(serde_json::Value::String(chosen)) => chosen,
            Some(serde_json::Value::Null) | None => {
                return Err(BlockError::Required {
                    field: "render_as".to_string(),
                })
            }
            Some(_) => {
                return Err(BlockError::WrongType {
                    field: "render_as".to_string(),
                    expected: "string",
                })
            }
        };
        // Choice validation: an unknown key fails here, as a choice
        // constraint, never as a failed rendition lookup.
        let rendition = self
            .renditions
            .get(chosen)
            .ok_or_else(|| BlockError::InvalidChoice {
                field: "render_as".to_string(),
                value: chosen.clone(),
            })?;
        let child_ctx = RenditionContext::with(rendition);

        let mut fields = Vec::with_capacity(self.children.len());
        for (name, child) in &self.children {
            let converted = match raw.get(name) {
                Some(sub) => {
                    trace!("converting \"{}\" under rendition \"{}\"", name, chosen);
                    child.convert(sub, &child_ctx)?
                }
                None => child.default_value(),
            };
            fields.push((name.clone(), converted));
        }
        Ok(BlockValue::Struct(StructValue::new(fields)))
    }

    fn default_value(&self) -> BlockValue {
        BlockValue::Struct(StructValue::new(
            self.children
                .iter()
                .map(|(name, child)| (name.clone(), child.default_value()))
                .collect(),
        ))
    }

    /// Renders a converted value through the rendition stored in its
    /// `render_as` field.
    ///
    /// The template executes with `self` bound to the whole value,
    /// `image_rendition` to the rendition's hint (or `"original"`), and
    /// `addl_classes` to the author's extra classes (or empty).
    fn render(&self, value: &BlockValue, _ctx: &RenditionContext) -> Result<String, BlockError> {
        let value = value.as_struct().ok_or(BlockError::ExpectedMapping)?;
        let chosen = value.text("render_as").ok_or_else(|| BlockError::Required {
            field: "render_as".to_string(),
        })?;
        let rendition = self.resolve(chosen)?;

        let scope = RenderScope {
            value,
            image_rendition: rendition.image_rendition_or_default(),
            addl_classes: value.text("addl_classes").unwrap_or_default(),
        };
        Ok(rendition.template().render(&scope)?)
    }
}

impl std::fmt::Debug for StructBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructBlock")
            .field(
                "children",
                &self.children.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field(
                "renditions",
                &self.renditions.short_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}
