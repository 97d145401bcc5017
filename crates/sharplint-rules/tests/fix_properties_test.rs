//! Properties every analyzer/fix pair must hold
//!
//! One positive sample per rule, each carrying comments outside the code the
//! fix rewrites. For every sample:
//! - the rule reports at least one diagnostic and the fix applies
//! - the fixed text re-parses without errors
//! - every comment survives verbatim
//! - running the rule again on the fixed text reports nothing

use std::sync::Arc;

use sharplint_core::cst::contains_errors;
use sharplint_core::{AnalyzerOptions, CancellationToken, Document, SemanticModel};
use sharplint_rules::analyzers::*;
use sharplint_rules::{AnalysisEngine, FixEngine, FixOutcome, RuleRegistry, builtin_registry};

const ITEM: &str = "class Item { public bool IsValid { get; set; } public int Rank { get; set; } }\n";

fn samples() -> Vec<(&'static str, String)> {
    vec![
        (
            USE_IS_OPERATOR_INSTEAD_OF_AS,
            "// check\nclass C { bool M(object o) => o as string == null; /* tail */ }".to_string(),
        ),
        (
            REMOVE_REDUNDANT_AS_OPERATOR,
            "class C { string M(string s) => s as string; // keep\n}".to_string(),
        ),
        (
            REMOVE_REDUNDANT_CAST,
            "class C { int M(int n) => (int)n; // keep\n}".to_string(),
        ),
        (
            REMOVE_EMPTY_ELSE_CLAUSE,
            "class C { void M(int n) { // start\n if (n > 0) { Go(); } else { } } }".to_string(),
        ),
        (
            USE_METHOD_GROUP_INSTEAD_OF_LAMBDA,
            "class C { bool Check(int x) => x > 0; /* c */ void M(List<int> items) { var a = items.Where(x => Check(x)); } }"
                .to_string(),
        ),
        (
            SIMPLIFY_LINQ_METHOD_CHAIN,
            format!("{ITEM}class C {{ bool M(List<Item> items) /* q */ => items.Where(x => x.IsValid).Any(); }}"),
        ),
        (
            CALL_THEN_BY_INSTEAD_OF_ORDER_BY,
            format!("{ITEM}// sort\nclass C {{ object M(List<Item> items) => items.OrderBy(x => x.Rank).OrderBy(x => x.IsValid); }}"),
        ),
        (
            SIMPLIFY_CODE_BRANCHING,
            "class C { void M(bool done) { while (true) { // loop\n if (done) break; Step(); } } }".to_string(),
        ),
        (
            ADD_ARGUMENT_LIST_TO_OBJECT_CREATION,
            "class Foo { public int A; } // foo\nclass C { Foo M() => new Foo { A = 1 }; }".to_string(),
        ),
        (
            ADD_EMPTY_LINE_BETWEEN_DECLARATIONS,
            "class C\n{\n    // first\n    void M()\n    {\n    }\n    int f;\n}\n".to_string(),
        ),
        (
            PLACE_BINARY_OPERATOR_AT_LINE_START,
            "class C\n{\n    // op\n    bool M(bool a, bool b) => a &&\n        b;\n}\n".to_string(),
        ),
        (
            DEFAULT_LABEL_SHOULD_BE_LAST,
            "class C { void M(int n) { switch (n) { case 1: default: case 2: Go(); break; // done\n } } }".to_string(),
        ),
        (
            REORDER_MODIFIERS,
            "class C { /* m */ static public int f; }".to_string(),
        ),
        (
            REORDER_TYPE_PARAMETER_CONSTRAINTS,
            "// generic\nclass C<T, U> where U : class where T : struct { }".to_string(),
        ),
    ]
}

fn all_rules() -> AnalyzerOptions {
    let mut options = AnalyzerOptions::default();
    options.rules.all = Some(true);
    options
}

fn registry() -> Arc<RuleRegistry> {
    builtin_registry().unwrap()
}

fn comments(document: &Document) -> Vec<String> {
    let mut comments: Vec<String> = document
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind().is_comment_like())
        .map(|token| token.text().to_string())
        .collect();
    comments.sort();
    comments
}

/// Apply the fix of the first primary diagnostic
fn fix_once(rule_id: &str, document: &Document) -> Option<Document> {
    let oracle = SemanticModel::for_document(document);
    let options = all_rules();
    let diagnostics = AnalysisEngine::new(registry())
        .analyze_rule(document, rule_id, &oracle, &options, &CancellationToken::new())
        .unwrap();
    let diagnostic = diagnostics.iter().find(|d| !d.fade_out)?;
    match FixEngine::new(registry())
        .fix(document, diagnostic, &oracle, &options)
        .unwrap()
    {
        FixOutcome::Applied(fix) => Some(fix.document),
        FixOutcome::NotApplicable { reason } => panic!("{rule_id}: {reason}"),
    }
}

#[test]
fn every_rule_has_a_sample() {
    let samples = samples();
    for analyzer in builtin_analyzers() {
        let id = analyzer.metadata().id.as_str();
        assert!(samples.iter().any(|(rule, _)| *rule == id), "no sample for {id}");
    }
}

#[test]
fn fixes_reparse_cleanly() {
    for (rule_id, source) in samples() {
        let before = Document::parse("Sample.cs", &source);
        assert!(!contains_errors(&before.syntax()), "{rule_id}: sample has errors");
        let after =
            fix_once(rule_id, &before).unwrap_or_else(|| panic!("{rule_id}: no diagnostic"));
        let text = after.text();
        let reparsed = Document::parse("Sample.cs", &text);
        assert!(
            !contains_errors(&reparsed.syntax()),
            "{rule_id}: fixed text has errors:\n{text}"
        );
        assert_eq!(reparsed.text(), text);
    }
}

#[test]
fn fixes_keep_every_comment() {
    for (rule_id, source) in samples() {
        let before = Document::parse("Sample.cs", &source);
        let after =
            fix_once(rule_id, &before).unwrap_or_else(|| panic!("{rule_id}: no diagnostic"));
        assert!(!comments(&before).is_empty(), "{rule_id}: sample without comments");
        assert_eq!(comments(&before), comments(&after), "{rule_id}");
    }
}

#[test]
fn fixed_text_is_clean_for_the_rule() {
    for (rule_id, source) in samples() {
        let before = Document::parse("Sample.cs", &source);
        let after =
            fix_once(rule_id, &before).unwrap_or_else(|| panic!("{rule_id}: no diagnostic"));
        let reparsed = Document::parse("Sample.cs", &after.text());
        assert!(
            fix_once(rule_id, &reparsed).is_none(),
            "{rule_id}: still reported after the fix:\n{}",
            after.text()
        );
    }
}

/// Primary span of the first diagnostic of `rule_id` in its sample
fn sample_span(rule_id: &str) -> (String, Document, std::ops::Range<usize>) {
    let (_, source) = samples().into_iter().find(|(id, _)| *id == rule_id).unwrap();
    let document = Document::parse("Sample.cs", &source);
    let oracle = SemanticModel::for_document(&document);
    let diagnostics = AnalysisEngine::new(registry())
        .analyze_rule(&document, rule_id, &oracle, &all_rules(), &CancellationToken::new())
        .unwrap();
    let location = &diagnostics[0].location;
    let span = location.offset..location.offset + location.length;
    (source, document, span)
}

#[test]
fn removal_spans_are_exactly_what_the_fix_removes() {
    for rule_id in [
        REMOVE_REDUNDANT_AS_OPERATOR,
        REMOVE_REDUNDANT_CAST,
        REMOVE_EMPTY_ELSE_CLAUSE,
    ] {
        let (source, document, span) = sample_span(rule_id);
        assert!(!span.is_empty(), "{rule_id}");
        let mut expected = source.clone();
        expected.replace_range(span, "");

        let fixed = fix_once(rule_id, &document).unwrap();
        assert_eq!(fixed.text(), expected, "{rule_id}");
    }
}

#[test]
fn insertion_points_are_exactly_where_the_fix_inserts() {
    let (source, document, span) = sample_span(ADD_ARGUMENT_LIST_TO_OBJECT_CREATION);
    assert!(span.is_empty());
    let mut expected = source.clone();
    expected.insert_str(span.start, "()");

    let fixed = fix_once(ADD_ARGUMENT_LIST_TO_OBJECT_CREATION, &document).unwrap();
    assert_eq!(fixed.text(), expected);
}

#[test]
fn replacements_stay_inside_the_span() {
    for rule_id in [
        USE_IS_OPERATOR_INSTEAD_OF_AS,
        USE_METHOD_GROUP_INSTEAD_OF_LAMBDA,
        REMOVE_REDUNDANT_AS_OPERATOR,
        REMOVE_REDUNDANT_CAST,
        REMOVE_EMPTY_ELSE_CLAUSE,
        ADD_ARGUMENT_LIST_TO_OBJECT_CREATION,
    ] {
        let (source, document, span) = sample_span(rule_id);
        let fixed = fix_once(rule_id, &document).unwrap().text();
        let (before, after) = (&source[..span.start], &source[span.end..]);
        assert!(fixed.starts_with(before), "{rule_id}: text before the span changed");
        assert!(fixed.ends_with(after), "{rule_id}: text after the span changed");
        assert!(fixed.len() >= before.len() + after.len(), "{rule_id}");
    }
}

#[test]
fn input_snapshot_is_never_touched() {
    for (rule_id, source) in samples() {
        let before = Document::parse("Sample.cs", &source);
        let _ = fix_once(rule_id, &before);
        assert_eq!(before.text(), source, "{rule_id}");
    }
}
