//! Configuration discovery and rule selection from files on disk

use std::fs;

use sharplint_core::config::config_schema;
use sharplint_core::{ConfigLoader, RuleCategory, RuleMetadata, Severity};
use tempfile::TempDir;

fn rule(id: &str, recommended: bool) -> RuleMetadata {
    let metadata = RuleMetadata::new(id, "Test rule", Severity::Warning, RuleCategory::Style);
    if recommended { metadata } else { metadata.not_recommended() }
}

#[test]
fn test_load_or_default_without_config() {
    let temp_dir = TempDir::new().unwrap();
    let options = ConfigLoader::load_or_default(temp_dir.path()).unwrap();
    assert_eq!(options.max_fix_iterations, 16);
    assert!(options.fade_out);
    assert!(options.modifier_order.iter().any(|m| m == "public"));
}

#[test]
fn test_nearest_config_wins() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("sharplint.toml"), "maxFixIterations = 2\n").unwrap();
    let project = temp_dir.path().join("project");
    let src = project.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(project.join(".sharplintrc.json"), r#"{ "maxFixIterations": 7 }"#).unwrap();

    assert_eq!(ConfigLoader::load_or_default(&src).unwrap().max_fix_iterations, 7);
    assert_eq!(
        ConfigLoader::load_or_default(temp_dir.path()).unwrap().max_fix_iterations,
        2
    );
}

#[test]
fn test_json_takes_priority_over_toml_in_one_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".sharplintrc.toml"), "fadeOut = true\n").unwrap();
    fs::write(temp_dir.path().join(".sharplintrc.json"), r#"{ "fadeOut": false }"#).unwrap();

    let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
    assert!(found.ends_with(".sharplintrc.json"));
    assert!(!ConfigLoader::load_or_default(temp_dir.path()).unwrap().fade_out);
}

#[test]
fn test_broken_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("sharplint.toml"), "rules = 3\n").unwrap();
    let error = ConfigLoader::load_or_default(temp_dir.path()).unwrap_err();
    assert_eq!(error.kind(), sharplint_core::ErrorKind::Config);
}

#[test]
fn test_rule_selection_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sharplint.json");
    fs::write(
        &path,
        r#"{
            "rules": {
                "recommended": true,
                "severities": { "style/extra": "error", "style/noisy": "off" },
                "disabled": ["style/dropped"]
            }
        }"#,
    )
    .unwrap();
    let options = ConfigLoader::load_from_file(&path).unwrap();

    assert_eq!(options.severity_for(&rule("style/base", true)), Some(Severity::Warning));
    assert_eq!(options.severity_for(&rule("style/extra", false)), Some(Severity::Error));
    assert_eq!(options.severity_for(&rule("style/noisy", true)), None);
    assert_eq!(options.severity_for(&rule("style/dropped", true)), None);
    assert_eq!(options.severity_for(&rule("style/optional", false)), None);
}

#[test]
fn test_schema_is_valid_json() {
    let schema = config_schema().unwrap();
    assert_eq!(schema["title"], "sharplint configuration");
    let text = serde_json::to_string(&schema).unwrap();
    for field in ["rules", "modifierOrder", "maxFixIterations", "fadeOut"] {
        assert!(text.contains(field), "schema lacks {field}");
    }
}
