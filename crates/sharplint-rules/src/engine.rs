//! Rule registry and the analysis/fix drivers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use sharplint_core::{
    AnalyzerOptions, CancellationToken, Diagnostic, DiagnosticCollector, Document, Result,
    ResultExt, RuleMetadata, SemanticOracle, Severity, SharplintError,
};
use similar::{ChangeTag, TextDiff};
use tracing::{debug, trace, warn};

use crate::analyzers::{AnalysisContext, Analyzer, builtin_analyzers};
use crate::fixes::{CodeFix, CodeFixProvider, FixContext, FixOutcome, builtin_fix_providers};

/// A rule: its analyzer and, when it has one, its fix
#[derive(Clone)]
pub struct RegisteredRule {
    pub analyzer: Arc<dyn Analyzer>,
    pub fix: Option<Arc<dyn CodeFixProvider>>,
}

/// Rules keyed by ID, in registration order
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, RegisteredRule>,
}

/// One row of the rule catalog
#[derive(Debug, Clone, Serialize)]
pub struct RuleCatalogEntry {
    #[serde(flatten)]
    pub metadata: RuleMetadata,
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_title: Option<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in analyzer paired with its fix
    pub fn builtin() -> Result<Self> {
        let providers = builtin_fix_providers();
        let mut registry = Self::new();
        for analyzer in builtin_analyzers() {
            let id = analyzer.metadata().id.clone();
            let fix = providers
                .iter()
                .find(|provider| provider.fixable_rule_ids().contains(&id.as_str()))
                .cloned();
            registry.register(analyzer, fix)?;
        }
        debug!(rules = registry.len(), "registered built-in rules");
        Ok(registry)
    }

    /// Register a rule; IDs must be unique and the fix must declare the ID
    pub fn register(
        &mut self,
        analyzer: Arc<dyn Analyzer>,
        fix: Option<Arc<dyn CodeFixProvider>>,
    ) -> Result<()> {
        let id = analyzer.metadata().id.clone();
        if self.rules.contains_key(&id) {
            return Err(SharplintError::rule_error(
                &id,
                "a rule with this ID is already registered",
            ));
        }
        if let Some(provider) = &fix
            && !provider.fixable_rule_ids().contains(&id.as_str())
        {
            return Err(SharplintError::contract_violation(format!(
                "fix '{}' does not declare rule '{id}'",
                provider.title()
            )));
        }
        self.rules.insert(id, RegisteredRule { analyzer, fix });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, rule_id: &str) -> Option<&RegisteredRule> {
        self.rules.get(rule_id)
    }

    pub fn analyzers(&self) -> impl Iterator<Item = &Arc<dyn Analyzer>> {
        self.rules.values().map(|rule| &rule.analyzer)
    }

    pub fn analyzer(&self, rule_id: &str) -> Option<&Arc<dyn Analyzer>> {
        self.rule(rule_id).map(|rule| &rule.analyzer)
    }

    pub fn fix_provider(&self, rule_id: &str) -> Option<&Arc<dyn CodeFixProvider>> {
        self.rule(rule_id).and_then(|rule| rule.fix.as_ref())
    }

    /// IDs of the rules that come with a fix
    pub fn fixable_rule_ids(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.fix.is_some())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Key under which fix-all groups the fix for `diagnostic`
    pub fn equivalence_key(&self, diagnostic: &Diagnostic) -> Option<String> {
        self.fix_provider(&diagnostic.rule_id)
            .map(|provider| provider.equivalence_key(diagnostic))
    }

    pub fn catalog(&self) -> Vec<RuleCatalogEntry> {
        self.rules
            .values()
            .map(|rule| RuleCatalogEntry {
                metadata: rule.analyzer.metadata().clone(),
                fixable: rule.fix.is_some(),
                fix_title: rule.fix.as_ref().map(|fix| fix.title().to_string()),
            })
            .collect()
    }

    pub fn catalog_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.catalog()).map_err(|e| {
            SharplintError::internal_error(format!("failed to serialize rule catalog: {e}"))
        })
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Runs analyzers over a document
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    registry: Arc<RuleRegistry>,
}

impl AnalysisEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every enabled rule in parallel
    ///
    /// Output is sorted, so it does not depend on scheduling. A cancelled
    /// run returns `Err(Cancelled)` and nothing else.
    pub fn analyze(
        &self,
        document: &Document,
        oracle: &dyn SemanticOracle,
        options: &AnalyzerOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let enabled: Vec<(Arc<dyn Analyzer>, Severity)> = self
            .registry
            .analyzers()
            .filter_map(|analyzer| {
                options
                    .severity_for(analyzer.metadata())
                    .map(|severity| (Arc::clone(analyzer), severity))
            })
            .collect();
        debug!(
            file = %document.path().display(),
            rules = enabled.len(),
            "analyzing document"
        );

        let sink = DiagnosticCollector::new();
        enabled.par_iter().try_for_each(|(analyzer, severity)| {
            run_analyzer(analyzer.as_ref(), *severity, document, oracle, options, &sink, cancel)
        })?;
        cancel.check()?;
        Ok(sink.into_sorted())
    }

    /// Run a single rule, whether or not the options enable it
    pub fn analyze_rule(
        &self,
        document: &Document,
        rule_id: &str,
        oracle: &dyn SemanticOracle,
        options: &AnalyzerOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let Some(analyzer) = self.registry.analyzer(rule_id) else {
            warn!(rule = rule_id, "unknown rule");
            return Err(SharplintError::rule_error(rule_id, "unknown rule"));
        };
        let metadata = analyzer.metadata();
        let severity = options.severity_for(metadata).unwrap_or(metadata.severity);
        let sink = DiagnosticCollector::new();
        run_analyzer(analyzer.as_ref(), severity, document, oracle, options, &sink, cancel)?;
        Ok(sink.into_sorted())
    }
}

/// One analyzer over one document; builds its own red tree
fn run_analyzer(
    analyzer: &dyn Analyzer,
    severity: Severity,
    document: &Document,
    oracle: &dyn SemanticOracle,
    options: &AnalyzerOptions,
    sink: &DiagnosticCollector,
    cancel: &CancellationToken,
) -> Result<()> {
    let metadata = analyzer.metadata();
    debug!(rule = %metadata.id, "running analyzer");
    let root = document.syntax();
    let source_map = document.source_map();
    let ctx = AnalysisContext::new(
        &root,
        oracle,
        options,
        sink,
        cancel,
        &source_map,
        metadata,
        severity,
    );
    let kinds = analyzer.node_kinds();
    for node in root.descendants() {
        cancel.check()?;
        if kinds.contains(&node.kind()) {
            trace!(rule = %metadata.id, kind = ?node.kind(), range = ?node.text_range(), "visit");
            analyzer.analyze(&node, &ctx);
        }
    }
    Ok(())
}

/// Outcome of [`FixEngine::fix_all`]
#[derive(Debug, Clone)]
pub struct FixAllResult {
    pub document: Document,
    /// Number of fixes applied
    pub applied: usize,
    /// Analyze-and-fix rounds run
    pub iterations: usize,
    /// True when the rule had nothing left to fix at the end
    pub converged: bool,
}

/// Applies fixes, one snapshot at a time
#[derive(Debug, Clone)]
pub struct FixEngine {
    analysis: AnalysisEngine,
}

impl FixEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            analysis: AnalysisEngine::new(registry),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.analysis.registry()
    }

    /// Build the fix for one diagnostic
    pub fn fix(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        oracle: &dyn SemanticOracle,
        options: &AnalyzerOptions,
    ) -> Result<FixOutcome> {
        if diagnostic.fade_out {
            return Ok(FixOutcome::not_applicable("fade-out diagnostics carry no fix"));
        }
        let provider = self.registry().fix_provider(&diagnostic.rule_id).ok_or_else(|| {
            SharplintError::rule_error(&diagnostic.rule_id, "no fix registered for this rule")
        })?;
        let ctx = FixContext::new(document, diagnostic, oracle, options);
        provider.provide_fix(&ctx)
    }

    /// Like [`FixEngine::fix`], treating a stale diagnostic as an error
    pub fn fix_required(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        oracle: &dyn SemanticOracle,
        options: &AnalyzerOptions,
    ) -> Result<CodeFix> {
        match self.fix(document, diagnostic, oracle, options)? {
            FixOutcome::Applied(fix) => Ok(fix),
            FixOutcome::NotApplicable { reason } => {
                Err(SharplintError::fix_not_applicable(&diagnostic.rule_id, reason))
            }
        }
    }

    /// Fix every diagnostic of one rule
    ///
    /// Each round re-analyzes the current snapshot and applies the first fix
    /// that still applies, so fixes compose sequentially and never see a
    /// stale tree. `oracle_for` builds the semantic view of each snapshot.
    /// Stops when nothing is left to fix or after `max_fix_iterations` rounds.
    pub fn fix_all<O, F>(
        &self,
        document: &Document,
        rule_id: &str,
        options: &AnalyzerOptions,
        oracle_for: F,
        cancel: &CancellationToken,
    ) -> Result<FixAllResult>
    where
        O: SemanticOracle,
        F: Fn(&Document) -> O,
    {
        if self.registry().fix_provider(rule_id).is_none() {
            return Err(SharplintError::rule_error(rule_id, "no fix registered for this rule"));
        }

        let mut current = document.clone();
        let mut applied = 0;
        let mut iterations = 0;
        let mut converged = false;
        while iterations < options.max_fix_iterations {
            cancel.check()?;
            iterations += 1;
            let oracle = oracle_for(&current);
            let diagnostics = self
                .analysis
                .analyze_rule(&current, rule_id, &oracle, options, cancel)?;

            let mut next = None;
            for diagnostic in diagnostics.iter().filter(|d| !d.fade_out) {
                // A rule or stale-fix error skips this diagnostic; contract
                // violations and cancellation end the run
                match self.fix(&current, diagnostic, &oracle, options).recoverable()? {
                    Some(FixOutcome::Applied(fix)) => {
                        next = Some(fix.document);
                        break;
                    }
                    Some(FixOutcome::NotApplicable { reason }) => {
                        debug!(
                            rule = rule_id,
                            offset = diagnostic.location.offset,
                            %reason,
                            "skipping stale diagnostic"
                        );
                    }
                    None => {}
                }
            }
            match next {
                Some(fixed) => {
                    current = fixed;
                    applied += 1;
                }
                None => {
                    converged = true;
                    break;
                }
            }
        }
        if !converged {
            warn!(rule = rule_id, iterations, "fix-all stopped at the iteration cap");
        }
        Ok(FixAllResult {
            document: current,
            applied,
            iterations,
            converged,
        })
    }
}

/// Before/after view of a fix
#[derive(Debug, Clone, Serialize)]
pub struct FixPreview {
    pub file: PathBuf,
    pub original_content: String,
    pub modified_content: String,
    /// Lines removed plus lines added
    pub changed_lines: usize,
    pub diff: String,
}

impl FixPreview {
    pub fn new(original: &Document, modified: &Document) -> Self {
        let original_content = original.text();
        let modified_content = modified.text();
        let text_diff = TextDiff::from_lines(&original_content, &modified_content);
        let changed_lines = text_diff
            .iter_all_changes()
            .filter(|change| change.tag() != ChangeTag::Equal)
            .count();
        let diff = render_diff(&text_diff, original.path());
        Self {
            file: original.path().to_path_buf(),
            original_content,
            modified_content,
            changed_lines,
            diff,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.changed_lines > 0
    }
}

/// Unified diff of two versions of `file_path`; empty when nothing changed
pub fn unified_diff(original: &str, modified: &str, file_path: &Path) -> String {
    render_diff(&TextDiff::from_lines(original, modified), file_path)
}

fn render_diff<'a>(diff: &'a TextDiff<'a, 'a, 'a, str>, file_path: &Path) -> String {
    let path = file_path.display();
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}
