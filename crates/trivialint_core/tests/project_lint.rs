//! Linting and fixing whole project trees.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trivialint_core::{LintSummary, Linter, LinterConfig, Severity};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Clean.cs", "class Clean { void f () { g(); } }\n");
    write(dir.path(), "src/Spaced.cs", "class Spaced { void f() { g (); } }  \n");
    write(dir.path(), "src/Nested/Cast.cs", "class Cast { int a = (int) b; }");
    write(dir.path(), "obj/Debug/Temp.cs", "class Temp { void f() { } }");
    write(dir.path(), "README.md", "trailing   \n");
    dir
}

fn config_in(dir: &Path, json: &str) -> LinterConfig {
    write(dir, ".trivialint.jsonc", json);
    let path = LinterConfig::discover(dir).unwrap();
    LinterConfig::from_file(path).unwrap()
}

fn relative(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[test]
fn test_lint_project_directory() {
    let dir = project();
    let linter = Linter::new(config_in(dir.path(), "{}")).unwrap();

    let (mut results, failures) = linter
        .lint_patterns(&[dir.path().to_string_lossy().to_string()])
        .unwrap();
    results.sort_by(|a, b| a.path.cmp(&b.path));

    assert!(failures.is_empty());
    let counts: Vec<(String, usize)> = results
        .iter()
        .map(|r| (relative(dir.path(), &r.path), r.violations.len()))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("src/Clean.cs".to_string(), 0),
            ("src/Nested/Cast.cs".to_string(), 2),
            ("src/Spaced.cs".to_string(), 3),
        ]
    );

    let summary = LintSummary::from_results(&results);
    assert_eq!(summary.files_checked, 3);
    assert_eq!(summary.files_with_violations, 2);
    assert_eq!(summary.total_violations, 5);
}

#[test]
fn test_glob_patterns_resolve_against_config_directory() {
    let dir = project();
    let linter = Linter::new(config_in(
        dir.path(),
        r#"{
            // generated code is not ours
            "exclude": ["**/Nested/**"],
            "options": { "no-trailing-whitespace": "warning" }
        }"#,
    ))
    .unwrap();

    let (results, _) = linter.lint_patterns(&["**/*.cs".to_string()]).unwrap();
    let names: Vec<String> = results
        .iter()
        .map(|r| relative(dir.path(), &r.path))
        .collect();
    assert_eq!(names, vec!["src/Clean.cs", "src/Spaced.cs"]);

    let spaced = &results[1];
    let trailing = spaced
        .violations
        .iter()
        .find(|v| v.rule_id == "no-trailing-whitespace")
        .unwrap();
    assert_eq!(trailing.severity, Severity::Warning);
    assert_eq!(spaced.error_count(), 2);
}

#[test]
fn test_fix_project_in_parallel() {
    let dir = project();
    for i in 0..16 {
        write(
            dir.path(),
            &format!("src/Many/File{i}.cs"),
            &format!("class File{i} {{ void f() {{ g ({i}); }} }}"),
        );
    }
    let linter = Linter::new(config_in(dir.path(), "{}")).unwrap();
    let patterns = vec![dir.path().join("src").to_string_lossy().to_string()];

    let (results, failures) = linter.fix_patterns(&patterns, false).unwrap();
    assert!(failures.is_empty());
    assert_eq!(results.len(), 19);
    assert!(results.iter().all(|r| r.violations.is_empty()));

    assert_eq!(
        fs::read_to_string(dir.path().join("src/Many/File7.cs")).unwrap(),
        "class File7 { void f () { g(7); } }\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/Spaced.cs")).unwrap(),
        "class Spaced { void f () { g(); } }\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/Nested/Cast.cs")).unwrap(),
        "class Cast { int a = (int)b; }\n"
    );

    let (after, _) = linter.lint_patterns(&patterns).unwrap();
    assert_eq!(LintSummary::from_results(&after).total_violations, 0);
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let dir = project();
    let linter = Linter::new(config_in(dir.path(), "{}")).unwrap();
    let spaced = dir.path().join("src/Spaced.cs");

    let (results, _) = linter
        .fix_files(std::slice::from_ref(&spaced), true)
        .unwrap();

    assert_eq!(results[0].fixes_applied, 3);
    assert_eq!(
        fs::read_to_string(&spaced).unwrap(),
        "class Spaced { void f() { g (); } }  \n"
    );
}
