//! Nested structs that inherit their rendition.
//!
//! A [`NestedStructBlock`] is embedded inside a rendition-aware
//! [`StructBlock`](super::StructBlock) and carries no `render_as` choice of
//! its own: the ancestor's resolved rendition arrives through the
//! [`RenditionContext`]. Each concrete use must declare its own template;
//! that requirement is checked at render time, not construction time, so a
//! template-less instance can still serve as a base to build from.

use std::rc::Rc;

use serde::Serialize;

use super::{Block, BlockError, BlockValue, StructValue};
use crate::context::RenditionContext;
use crate::template::ExecutableTemplate;

#[derive(Serialize)]
struct NestedScope<'a> {
    #[serde(rename = "self")]
    value: &'a StructValue,
    image_rendition: &'a str,
}

/// A composite block rendered under an ancestor's rendition.
pub struct NestedStructBlock {
    children: Vec<(String, Rc<dyn Block>)>,
    template: Option<ExecutableTemplate>,
}

impl NestedStructBlock {
    /// Creates a nested struct with no template declared. Rendering fails
    /// with [`BlockError::TemplateRequired`] until one is supplied.
    pub fn new(local_blocks: Vec<(String, Rc<dyn Block>)>) -> Self {
        Self {
            children: local_blocks,
            template: None,
        }
    }

    /// Declares the template this block renders with.
    pub fn with_template(mut self, template: ExecutableTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Rc<dyn Block>)> {
        self.children
            .iter()
            .map(|(name, block)| (name.as_str(), block))
    }
}

impl Block for NestedStructBlock {
    /// Converts a raw field mapping, forwarding the inherited rendition
    /// context to every present child.
    fn convert(
        &self,
        raw: &serde_json::Value,
        ctx: &RenditionContext,
    ) -> Result<BlockValue, BlockError> {
        let raw = raw.as_object().ok_or(BlockError::ExpectedMapping)?;

        let mut fields = Vec::with_capacity(self.children.len());
        for (name, child) in &self.children {
            let converted = match raw.get(name) {
                Some(sub) => child.convert(sub, ctx)?,
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

    /// Renders through the declared template with `self` bound to the value
    /// and `image_rendition` taken from the inherited rendition.
    ///
    /// # Errors
    ///
    /// [`BlockError::TemplateRequired`] when no template was declared.
    fn render(&self, value: &BlockValue, ctx: &RenditionContext) -> Result<String, BlockError> {
        let template = self.template.as_ref().ok_or(BlockError::TemplateRequired)?;
        let value = value.as_struct().ok_or(BlockError::ExpectedMapping)?;

        let scope = NestedScope {
            value,
            image_rendition: ctx.image_rendition(),
        };
        Ok(template.render(&scope)?)
    }
}

impl std::fmt::Debug for NestedStructBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedStructBlock")
            .field(
                "children",
                &self.children.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("template", &self.template.as_ref().map(|t| t.name()))
            .finish()
    }
}
