//! Leaf field blocks.

use super::{Block, BlockError, BlockValue};
use crate::context::RenditionContext;
use crate::rendition::RenditionSet;

/// A free-text field.
///
/// Required by default; use [`optional`](Self::optional) for fields that may
/// be left empty.
#[derive(Debug, Clone)]
pub struct TextBlock {
    required: bool,
    label: String,
    help_text: String,
}

impl Default for TextBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBlock {
    pub fn new() -> Self {
        Self {
            required: true,
            label: "text".to_string(),
            help_text: String::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl Block for TextBlock {
    fn convert(
        &self,
        raw: &serde_json::Value,
        _ctx: &RenditionContext,
    ) -> Result<BlockValue, BlockError> {
        match raw {
            serde_json::Value::Null => {
                if self.required {
                    Err(BlockError::Required {
                        field: self.label.clone(),
                    })
                } else {
                    Ok(self.default_value())
                }
            }
            serde_json::Value::String(_) => Ok(BlockValue::Scalar(raw.clone())),
            _ => Err(BlockError::WrongType {
                field: self.label.clone(),
                expected: "string",
            }),
        }
    }

    fn default_value(&self) -> BlockValue {
        BlockValue::Scalar(serde_json::Value::String(String::new()))
    }

    fn render(&self, value: &BlockValue, _ctx: &RenditionContext) -> Result<String, BlockError> {
        Ok(value.text().unwrap_or_default().to_string())
    }
}

/// One selectable option of a [`ChoiceBlock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub description: String,
}

impl Choice {
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// A single-choice field over a fixed option list.
///
/// Values outside the option list are rejected at conversion time.
#[derive(Debug, Clone)]
pub struct ChoiceBlock {
    choices: Vec<Choice>,
    required: bool,
    label: String,
    help_text: String,
}

impl ChoiceBlock {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self {
            choices,
            required: true,
            label: "choice".to_string(),
            help_text: String::new(),
        }
    }

    /// Builds the choice field for a rendition set: one option per
    /// rendition, in set order, displayed with the rendition's verbose name
    /// and description.
    pub fn from_rendition_set(set: &RenditionSet) -> Self {
        Self::new(
            set.iter()
                .map(|r| Choice::new(r.short_name(), r.verbose_name(), r.description()))
                .collect(),
        )
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn accepts(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }
}

impl Block for ChoiceBlock {
    fn convert(
        &self,
        raw: &serde_json::Value,
        _ctx: &RenditionContext,
    ) -> Result<BlockValue, BlockError> {
        match raw {
            serde_json::Value::Null => {
                if self.required {
                    Err(BlockError::Required {
                        field: self.label.clone(),
                    })
                } else {
                    Ok(BlockValue::Null)
                }
            }
            serde_json::Value::String(value) => {
                if self.accepts(value) {
                    Ok(BlockValue::Scalar(raw.clone()))
                } else {
                    Err(BlockError::InvalidChoice {
                        field: self.label.clone(),
                        value: value.clone(),
                    })
                }
            }
            _ => Err(BlockError::WrongType {
                field: self.label.clone(),
                expected: "string",
            }),
        }
    }

    fn default_value(&self) -> BlockValue {
        BlockValue::Null
    }

    fn render(&self, value: &BlockValue, _ctx: &RenditionContext) -> Result<String, BlockError> {
        Ok(value.text().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateStore;
    use crate::Rendition;
    use serde_json::json;

    #[test]
    fn test_text_converts_string() {
        let block = TextBlock::new();
        let value = block.convert(&json!("hello"), &RenditionContext::none()).unwrap();
        assert_eq!(value.text(), Some("hello"));
    }

    #[test]
    fn test_text_required_rejects_null() {
        let block = TextBlock::new();
        let result = block.convert(&json!(null), &RenditionContext::none());
        assert!(matches!(result, Err(BlockError::Required { .. })));
    }

    #[test]
    fn test_text_optional_defaults_on_null() {
        let block = TextBlock::new().optional();
        let value = block.convert(&json!(null), &RenditionContext::none()).unwrap();
        assert_eq!(value.text(), Some(""));
    }

    #[test]
    fn test_text_rejects_non_string() {
        let block = TextBlock::new();
        let result = block.convert(&json!(42), &RenditionContext::none());
        assert!(matches!(result, Err(BlockError::WrongType { .. })));
    }

    #[test]
    fn test_choice_accepts_listed_value() {
        let block = ChoiceBlock::new(vec![
            Choice::new("a", "A", ""),
            Choice::new("b", "B", ""),
        ]);
        let value = block.convert(&json!("b"), &RenditionContext::none()).unwrap();
        assert_eq!(value.text(), Some("b"));
    }

    #[test]
    fn test_choice_rejects_unlisted_value() {
        let block = ChoiceBlock::new(vec![Choice::new("a", "A", "")]);
        let result = block.convert(&json!("z"), &RenditionContext::none());
        assert!(matches!(result, Err(BlockError::InvalidChoice { .. })));
    }

    #[test]
    fn test_choice_optional_null() {
        let block = ChoiceBlock::new(vec![Choice::new("a", "A", "")]).optional();
        let value = block.convert(&json!(null), &RenditionContext::none()).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_choice_from_rendition_set() {
        let store = TemplateStore::new();
        let set = crate::RenditionSet::from_renditions(vec![
            Rendition::from_source("card", "Card View", "A card.", "x", &store).unwrap(),
            Rendition::from_source("hero", "Hero", "Wide.", "y", &store).unwrap(),
        ]);

        let block = ChoiceBlock::from_rendition_set(&set);
        let values: Vec<&str> = block.choices().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["card", "hero"]);
        assert_eq!(block.choices()[0].label, "Card View");
        assert_eq!(block.choices()[0].description, "A card.");
    }
}
