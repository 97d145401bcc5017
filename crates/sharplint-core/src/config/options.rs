//! Configuration types for sharplint

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::diagnostics::Severity;
use crate::rules::RuleMetadata;

/// Modifier order used when the configuration does not name one
pub const DEFAULT_MODIFIER_ORDER: &[&str] = &[
    "public", "private", "protected", "internal", "static", "extern", "new", "virtual",
    "abstract", "sealed", "override", "readonly", "unsafe", "volatile", "async", "const",
    "partial",
];

/// Options threaded through every analyzer and fix
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerOptions {
    /// Rule selection and severities
    #[schemars(description = "Rule severity configuration")]
    pub rules: RulesConfiguration,

    /// Canonical modifier order; modifiers not listed sort last
    #[schemars(description = "Canonical order of declaration modifiers")]
    pub modifier_order: Vec<String>,

    /// Upper bound on re-analysis rounds during fix-all
    #[schemars(description = "Maximum fix-all iterations per document")]
    pub max_fix_iterations: usize,

    /// Emit fade-out companion diagnostics for removable text
    #[schemars(description = "Report fade-out diagnostics for text a fix would remove")]
    pub fade_out: bool,
}

/// Rules configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfiguration {
    /// Enable all recommended rules
    #[schemars(description = "Enable all recommended rules")]
    pub recommended: Option<bool>,

    /// Enable all available rules
    #[schemars(description = "Enable all rules")]
    pub all: Option<bool>,

    /// Per-rule severity overrides keyed by rule id
    #[schemars(description = "Severity overrides keyed by rule id")]
    pub severities: HashMap<String, RuleSeverity>,

    /// Rule ids to switch off regardless of other settings
    #[schemars(description = "Rule ids to disable")]
    pub disabled: Vec<String>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Hint (shown in editors, not in reports)
    Hint,
    /// Warning (doesn't fail build)
    Warn,
    /// Error (fails build)
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, or `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Hint => Some(Severity::Hint),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            rules: RulesConfiguration::default(),
            modifier_order: DEFAULT_MODIFIER_ORDER.iter().map(|m| m.to_string()).collect(),
            max_fix_iterations: 16,
            fade_out: true,
        }
    }
}

impl Default for RulesConfiguration {
    fn default() -> Self {
        Self {
            recommended: Some(true),
            all: None,
            severities: HashMap::new(),
            disabled: Vec::new(),
        }
    }
}

impl AnalyzerOptions {
    /// Effective severity for a rule, `None` when it should not run
    pub fn severity_for(&self, rule: &RuleMetadata) -> Option<Severity> {
        self.rules.severity_for(rule)
    }

    pub fn is_enabled(&self, rule: &RuleMetadata) -> bool {
        self.severity_for(rule).is_some()
    }

    /// Position of a modifier in the configured order
    pub fn modifier_rank(&self, modifier: &str) -> usize {
        self.modifier_order
            .iter()
            .position(|m| m == modifier)
            .unwrap_or(self.modifier_order.len())
    }
}

impl RulesConfiguration {
    pub fn severity_for(&self, rule: &RuleMetadata) -> Option<Severity> {
        if self.disabled.iter().any(|id| id == &rule.id) {
            return None;
        }
        if let Some(severity) = self.severities.get(&rule.id) {
            return severity.to_severity();
        }
        let selected = self.all == Some(true)
            || (rule.recommended && self.recommended.unwrap_or(true));
        selected.then_some(rule.severity)
    }
}
