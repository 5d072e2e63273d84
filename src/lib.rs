//! # Guise - Rendition Selection for Composite Content Blocks
//!
//! `guise` lets content authors pick, per block, which of several
//! pre-registered "renditions" (a template plus presentation metadata)
//! should render that block's data, and propagates the choice down to
//! nested child blocks so they render consistently.
//!
//! ## Core Concepts
//!
//! - [`Rendition`]: one way a block can render — a template resolved by
//!   path or compiled from inline source, plus display metadata and an
//!   image-rendition hint
//! - [`RenditionSet`]: the ordered collection of renditions an author may
//!   choose among, built from explicit core renditions, configuration, or
//!   both
//! - [`RenditionConfig`]: named sets, loadable from YAML
//! - [`StructBlock`]: a composite block that appends the synthetic
//!   `render_as` / `addl_classes` fields, validates the author's choice and
//!   threads the resolved rendition to its children
//! - [`NestedStructBlock`]: a composite that inherits its rendition from an
//!   ancestor instead of carrying its own choice
//! - [`BlockRegistry`]: the process-wide `attribute name → block` registry,
//!   populated by installing [`BlockPlugin`] units transactionally
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use guise::{
//!     Block, Rendition, RenditionContext, RenditionSet, StructBlock, TemplateStore, TextBlock,
//! };
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TemplateStore::new();
//! let card = Rendition::from_source(
//!     "card",
//!     "Card View",
//!     "A compact, self-contained card.",
//!     "<div class='{{ addl_classes }}'>{{ self.title }}</div>",
//!     &store,
//! )?;
//!
//! let block = StructBlock::new(
//!     vec![("title".to_string(), Rc::new(TextBlock::new()) as Rc<dyn Block>)],
//!     RenditionSet::from_renditions(vec![card]),
//! )?;
//!
//! let value = block.convert(
//!     &json!({"title": "Hi", "render_as": "card", "addl_classes": "featured"}),
//!     &RenditionContext::none(),
//! )?;
//! let html = block.render(&value, &RenditionContext::none())?;
//! assert_eq!(html, "<div class='featured'>Hi</div>");
//! # Ok(())
//! # }
//! ```
//!
//! ## Propagation
//!
//! When a [`StructBlock`] converts a submitted value it resolves the chosen
//! [`Rendition`] once and hands it to every child through a borrowed
//! [`RenditionContext`]. Children that render under the ancestor's rendition
//! ([`NestedStructBlock`]) read the inherited image-rendition hint from that
//! context; everything else ignores it. The context is an explicit call
//! parameter, never shared mutable state, so block instances can be reused
//! across requests safely.
//!
//! ## Failure Policy
//!
//! Configuration and construction fail fast: a rendition without a template
//! source, an unknown set name, or a colliding registry name surface as
//! errors immediately rather than degrading into a fallback rendering. The
//! one recovery behavior is [`BlockRegistry::install`]'s per-plugin
//! rollback, which keeps the registry consistent for a retry while the
//! failure still propagates.

pub mod blocks;
pub mod config;
pub mod context;
pub mod registry;
pub mod rendition;
pub mod template;

pub use blocks::{
    Block, BlockError, BlockValue, Choice, ChoiceBlock, NestedStructBlock, StructBlock,
    StructValue, TextBlock,
};
pub use config::{ConfigError, RenditionConfig, RenditionDef};
pub use context::RenditionContext;
pub use registry::{BlockPlugin, BlockRegistry, PluginError, RegistryError};
pub use rendition::{Rendition, RenditionError, RenditionSet, DEFAULT_IMAGE_RENDITION};
pub use template::{ExecutableTemplate, TemplateError, TemplateStore, TEMPLATE_EXTENSIONS};
