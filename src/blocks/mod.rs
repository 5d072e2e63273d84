//! Block capability and the block family.
//!
//! A block is anything that can take part in composite content editing: it
//! converts a raw submitted value into a typed [`BlockValue`], supplies a
//! default when the submission omits it, and renders a converted value to
//! its display representation. The [`Block`] trait is the explicit
//! capability interface — child participation is a trait bound, not a
//! runtime attribute probe.
//!
//! The family:
//!
//! - [`TextBlock`], [`ChoiceBlock`] — leaf field blocks
//! - [`StructBlock`] — rendition-aware composite: the author picks a
//!   rendition, children inherit it
//! - [`NestedStructBlock`] — composite that inherits its rendition from an
//!   ancestor instead of carrying its own choice

mod field;
mod nested;
mod struct_block;
mod value;

pub use field::{Choice, ChoiceBlock, TextBlock};
pub use nested::NestedStructBlock;
pub use struct_block::StructBlock;
pub use value::{BlockValue, StructValue};

use thiserror::Error;

use crate::context::RenditionContext;
use crate::rendition::RenditionError;
use crate::template::TemplateError;

/// Error type for block construction, conversion and rendering.
#[derive(Debug, Error)]
pub enum BlockError {
    /// A required field was omitted from the submission.
    #[error("field \"{field}\" is required")]
    Required { field: String },

    /// A submitted value is not among the field's choices.
    #[error("\"{value}\" is not one of the available choices for \"{field}\"")]
    InvalidChoice { field: String, value: String },

    /// A submitted value has the wrong JSON shape for the field.
    #[error("field \"{field}\" expects a {expected} value")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// A struct operation was given something other than a field mapping.
    #[error("struct blocks expect a mapping of field values")]
    ExpectedMapping,

    /// A declared child field uses a name the struct reserves for itself.
    #[error("\"{name}\" is a reserved field name")]
    ReservedField { name: String },

    /// A nested struct was rendered without declaring a template.
    #[error("no template declared for this block")]
    TemplateRequired,

    /// A converted value references a rendition absent from the bound set.
    #[error("converted value references unknown rendition \"{short_name}\"")]
    UnknownRendition { short_name: String },

    #[error(transparent)]
    Rendition(#[from] RenditionError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// The generic block capability.
///
/// Conversion and rendering both receive a [`RenditionContext`]: the
/// rendition resolved by the nearest rendition-aware ancestor, or the empty
/// placeholder at the top of the call chain. Blocks that don't care simply
/// ignore it.
pub trait Block {
    /// Converts a raw submitted value into a typed value.
    ///
    /// # Errors
    ///
    /// Validation failures surface immediately; nothing falls back to a
    /// default rendering.
    fn convert(
        &self,
        raw: &serde_json::Value,
        ctx: &RenditionContext,
    ) -> Result<BlockValue, BlockError>;

    /// The value used when the submission omits this block's field.
    fn default_value(&self) -> BlockValue;

    /// Renders a converted value to its display representation.
    fn render(&self, value: &BlockValue, ctx: &RenditionContext) -> Result<String, BlockError>;
}
