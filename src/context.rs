//! Rendition propagation context.
//!
//! When a rendition-aware struct converts a submitted value, the rendition
//! the author chose must reach every child block so nested content renders
//! consistently. That used to be modelled as a mutable slot on shared block
//! instances; here it is an explicit, borrowed [`RenditionContext`] threaded
//! through every [`convert`](crate::Block::convert) and
//! [`render`](crate::Block::render) call, so concurrent reuse of block
//! instances cannot observe another request's rendition.

use crate::rendition::{Rendition, DEFAULT_IMAGE_RENDITION};

/// The rendition (if any) inherited from an ancestor block.
///
/// [`RenditionContext::none`] is the empty placeholder used at the top of a
/// conversion or render call chain; a rendition-aware struct replaces it
/// with [`RenditionContext::with`] before delegating to its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenditionContext<'a> {
    rendition: Option<&'a Rendition>,
}

impl<'a> RenditionContext<'a> {
    /// The absence-of-rendition placeholder.
    pub fn none() -> Self {
        Self::default()
    }

    /// A context carrying a resolved rendition.
    pub fn with(rendition: &'a Rendition) -> Self {
        Self {
            rendition: Some(rendition),
        }
    }

    /// The inherited rendition, if one has been resolved upstream.
    pub fn rendition(&self) -> Option<&'a Rendition> {
        self.rendition
    }

    /// The inherited image-rendition hint, defaulting to
    /// [`DEFAULT_IMAGE_RENDITION`] when no rendition is inherited or the
    /// rendition carries no hint.
    pub fn image_rendition(&self) -> &'a str {
        match self.rendition {
            Some(rendition) => rendition.image_rendition_or_default(),
            None => DEFAULT_IMAGE_RENDITION,
        }
    }
}
