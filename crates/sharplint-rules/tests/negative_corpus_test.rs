//! Clean code produces nothing, with every rule enabled

use sharplint_core::{AnalyzerOptions, CancellationToken, Document, SemanticModel};
use sharplint_rules::{AnalysisEngine, builtin_registry};

const CLEAN: &str = r#"class Item
{
    public bool IsValid { get; set; }

    public int Rank { get; set; }
}

class Bag
{
    public bool Where(int x) => x > 0;
}

class C<T, U>
    where T : struct
    where U : class
{
    public static int Count;

    public bool Any(List<Item> items) => items.Any(x => x.IsValid);

    public bool Custom(Bag bag) => bag.Where(1);

    public object Sorted(List<Item> items) => items.OrderBy(x => x.Rank).ThenBy(x => x.IsValid);

    public bool Both(bool a, bool b) => a
        && b;

    public void M(object o, int n)
    {
        if (o is string)
        {
            Count++;
        }
        else
        {
            Count--;
        }

        switch (n)
        {
            case 1:
                break;
            default:
                break;
        }

        while (n > 0)
        {
            n--;
        }

        var item = new Item() { Rank = 1 };
        var text = o as string;
        var wide = (long)n;
    }
}
"#;

#[test]
fn clean_file_has_no_diagnostics() {
    let document = Document::parse("Clean.cs", CLEAN);
    let oracle = SemanticModel::for_document(&document);
    let mut options = AnalyzerOptions::default();
    options.rules.all = Some(true);
    let diagnostics = AnalysisEngine::new(builtin_registry().unwrap())
        .analyze(&document, &oracle, &options, &CancellationToken::new())
        .unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");
}

#[test]
fn empty_document_has_no_diagnostics() {
    let document = Document::parse("Empty.cs", "");
    let mut options = AnalyzerOptions::default();
    options.rules.all = Some(true);
    let diagnostics = AnalysisEngine::new(builtin_registry().unwrap())
        .analyze(
            &document,
            &SemanticModel::for_document(&document),
            &options,
            &CancellationToken::new(),
        )
        .unwrap();
    assert!(diagnostics.is_empty());
}
