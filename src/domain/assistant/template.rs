//! Fixed prompt templates with declared output shapes.

use super::CompletionError;

/// A prompt template paired with the parser for its declared output.
///
/// Implementors never talk to a provider; they only render the prompt and
/// validate whatever text comes back.
pub trait CompletionTemplate {
    /// Validated user input the template is rendered from.
    type Request: Send + Sync;

    /// Typed result decoded from a reply.
    type Output: Send;

    /// Short name used in logs and metrics.
    const NAME: &'static str;

    /// Renders the full prompt for one request.
    fn render(request: &Self::Request) -> String;

    /// Decodes a raw reply, failing on any schema violation.
    fn parse(reply: &str) -> Result<Self::Output, CompletionError>;
}

/// Result of a list-producing tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome<T> {
    /// At least one entry was returned.
    Found(Vec<T>),
    /// The service answered correctly but had nothing to suggest.
    Empty,
}

impl<T> ToolOutcome<T> {
    pub fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            ToolOutcome::Empty
        } else {
            ToolOutcome::Found(items)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ToolOutcome::Empty)
    }

    /// Entries found, empty for [`ToolOutcome::Empty`].
    pub fn into_items(self) -> Vec<T> {
        match self {
            ToolOutcome::Found(items) => items,
            ToolOutcome::Empty => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_maps_to_empty_outcome() {
        let outcome: ToolOutcome<u8> = ToolOutcome::from_list(vec![]);
        assert!(outcome.is_empty());
        assert!(outcome.into_items().is_empty());
    }

    #[test]
    fn non_empty_list_is_found() {
        assert_eq!(ToolOutcome::from_list(vec![1, 2]), ToolOutcome::Found(vec![1, 2]));
    }
}
