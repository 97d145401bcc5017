//! Parser and document tests through the public API
//!
//! This module tests:
//! - Lossless parsing of valid and malformed sources
//! - Error recovery keeping every byte of the input
//! - Snapshots shared across threads

use std::sync::Arc;
use std::thread;

use sharplint_core::cst::{contains_errors, significant_text};
use sharplint_core::{Document, SyntaxKind, TriviaPolicy, parse_source};

const SAMPLES: &[&str] = &[
    "",
    "   \n\t  \n  ",
    "// only a comment\n",
    "class C { }",
    "namespace App\n{\n    public sealed class C<T> where T : class\n    {\n        private readonly int _x;\n    }\n}\n",
    "class C\r\n{\r\n    void M()\r\n    {\r\n        /* crlf */\r\n    }\r\n}\r\n",
    "class C { bool M(object o) => o is string s && s.Length > 0; }",
    "class C { void M(int n) { switch (n) { case 1: default: break; } } }",
    "class C { object M(List<int> xs) => xs.Where(x => x > 0).OrderBy(x => x).ToList(); }",
    "#if DEBUG\nclass C { }\n#endif\n",
    "class C { void M() { do { n--; } while (n > 0); } }",
    "class C { void M() { var s = @\"verbatim \"\"quoted\"\"\"; var c = '\\n'; } }",
];

const MALFORMED: &[&str] = &[
    "class",
    "class C {",
    "class C { void M( { } }",
    "class C { int x = ; }",
    "}}}",
    "class C { void M() { if (a) } }",
    "/* unterminated",
];

#[test]
fn test_parse_is_lossless() {
    for source in SAMPLES.iter().chain(MALFORMED) {
        let parse = parse_source(source);
        assert_eq!(parse.syntax().to_string(), *source, "round trip of {source:?}");
    }
}

#[test]
fn test_valid_samples_have_no_errors() {
    for source in SAMPLES {
        let parse = parse_source(source);
        assert!(parse.errors().is_empty(), "{source:?}: {:?}", parse.errors());
        assert!(!contains_errors(&parse.syntax()), "{source:?}");
    }
}

#[test]
fn test_malformed_samples_are_recovered() {
    for source in MALFORMED {
        let parse = parse_source(source);
        assert!(!parse.errors().is_empty(), "{source:?} should report an error");
        assert_eq!(parse.syntax().kind(), SyntaxKind::CompilationUnit);
        for error in parse.errors() {
            assert!(usize::from(error.range.end()) <= source.len());
        }
    }
}

#[test]
fn test_significant_text_drops_layout_only() {
    let document = Document::parse("C.cs", "class C\n{\n    // note\n    int  x;\n}\n");
    let text = significant_text(&document.syntax());
    assert!(!text.contains("note"));
    assert!(!text.contains('\n'));
    assert!(text.contains("int"));
}

#[test]
fn test_edits_leave_the_source_snapshot_alone() {
    let source = "class C\n{\n    int a;\n    // keep\n    int b;\n}\n";
    let original = Document::parse("C.cs", source);
    let field = original
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::FieldDecl)
        .unwrap();

    let removed = original.remove_node(&field, TriviaPolicy::KeepNone).unwrap();
    assert_eq!(removed.text(), "class C\n{\n    // keep\n    int b;\n}\n");
    assert_eq!(original.text(), source);

    // A node of the new snapshot cannot edit the old one, and vice versa
    let stale = removed
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::FieldDecl)
        .unwrap();
    assert!(original.remove_node(&stale, TriviaPolicy::KeepExterior).is_err());
    assert!(removed.remove_node(&field, TriviaPolicy::KeepExterior).is_err());
}

#[test]
fn test_snapshot_is_shared_across_threads() {
    let document = Arc::new(Document::parse(
        "C.cs",
        "class C { int a; int b; int c; void M() { } }",
    ));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let document = Arc::clone(&document);
            thread::spawn(move || {
                document
                    .syntax()
                    .descendants()
                    .filter(|node| node.kind() == SyntaxKind::FieldDecl)
                    .count()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}

#[test]
fn test_source_map_positions() {
    let document = Document::parse("C.cs", "class C\n{\n    int x;\n}\n");
    let map = document.source_map();
    let field = document
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::FieldDecl)
        .unwrap();
    let location = map.location(field.text_range());
    assert_eq!((location.line, location.column), (3, 5));
    assert_eq!((location.end_line, location.end_column), (3, 11));
    assert_eq!(location.length, "int x;".len());
}
