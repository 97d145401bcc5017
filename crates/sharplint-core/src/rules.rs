//! Rule metadata shared by analyzers, fixes and configuration

use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;

/// Metadata associated with a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Unique identifier, `<category>/<rule-name>`
    pub id: String,
    /// Human-readable name for the rule
    pub name: String,
    /// Detailed description of what the rule checks
    pub description: String,
    /// Message template; `{0}`, `{1}`... are filled from the format args
    pub message: String,
    /// Default severity level
    pub severity: Severity,
    /// Category this rule belongs to
    pub category: RuleCategory,
    /// Enabled when the configuration asks for the recommended set
    pub recommended: bool,
    /// Tags for organizing and filtering rules
    pub tags: Vec<String>,
}

impl RuleMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            message: name.clone(),
            name,
            description: String::new(),
            severity,
            category,
            recommended: true,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Exclude the rule from the recommended set
    pub fn not_recommended(mut self) -> Self {
        self.recommended = false;
        self
    }

    /// Id of the companion fade-out diagnostic
    pub fn fade_out_id(&self) -> String {
        fade_out_id(&self.id)
    }

    /// Substitute positional arguments into the message template
    pub fn format_message(&self, args: &[String]) -> String {
        args.iter()
            .enumerate()
            .fold(self.message.clone(), |message, (idx, arg)| {
                message.replace(&format!("{{{idx}}}"), arg)
            })
    }
}

/// Id of the fade-out companion for a rule id
pub fn fade_out_id(rule_id: &str) -> String {
    format!("{rule_id}-fade-out")
}

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Correctness issues such as semantic violations
    Correctness,
    /// Suspicious patterns that often indicate bugs
    Suspicious,
    /// Excessive complexity that reduces readability or maintainability
    Complexity,
    /// Style and formatting preferences
    Style,
    /// User-invoked refactorings with no diagnostic
    Refactoring,
    /// Custom category using a bespoke slug
    Custom(String),
}

impl RuleCategory {
    /// Return the kebab-case slug used for IDs and filtering
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Suspicious => "suspicious",
            RuleCategory::Complexity => "complexity",
            RuleCategory::Style => "style",
            RuleCategory::Refactoring => "refactoring",
            RuleCategory::Custom(name) => name.as_str(),
        }
    }

    /// Create a category from its slug, mapping unknown slugs to custom categories
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "correctness" => RuleCategory::Correctness,
            "suspicious" => RuleCategory::Suspicious,
            "complexity" | "simplification" | "redundancy" => RuleCategory::Complexity,
            "style" | "formatting" | "ordering" => RuleCategory::Style,
            "refactoring" => RuleCategory::Refactoring,
            other => RuleCategory::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for RuleCategory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        Ok(RuleCategory::from_slug(&slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_template() {
        let meta = RuleMetadata::new(
            "complexity/simplify-linq-method-chain",
            "Simplify LINQ method chain",
            Severity::Info,
            RuleCategory::Complexity,
        )
        .with_message("Combine 'Where' and '{0}'");
        assert_eq!(meta.format_message(&["Any".to_string()]), "Combine 'Where' and 'Any'");
        assert_eq!(
            meta.fade_out_id(),
            "complexity/simplify-linq-method-chain-fade-out"
        );
    }

    #[test]
    fn category_slugs_round_trip() {
        for category in [
            RuleCategory::Suspicious,
            RuleCategory::Complexity,
            RuleCategory::Style,
            RuleCategory::Refactoring,
        ] {
            assert_eq!(RuleCategory::from_slug(category.slug()), category);
        }
        let json = serde_json::to_string(&RuleCategory::Style).unwrap();
        assert_eq!(json, "\"style\"");
    }
}
