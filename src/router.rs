//! Topic → collection routing.

/// Placeholder substituted with the record's topic name.
pub const TOPIC_PLACEHOLDER: &str = "${topic}";

/// Resolves a record's destination collection from its topic through a
/// configured mapping template.
///
/// Every occurrence of the placeholder is substituted verbatim; a template
/// without the placeholder names the same collection for every topic.
#[derive(Debug, Clone)]
pub struct CollectionRouter {
    mapping: String,
}

impl CollectionRouter {
    pub fn new(mapping: impl Into<String>) -> Self {
        Self {
            mapping: mapping.into(),
        }
    }

    /// Resolve the collection name for a topic.
    pub fn resolve(&self, topic: &str) -> String {
        self.mapping.replace(TOPIC_PLACEHOLDER, topic)
    }
}
