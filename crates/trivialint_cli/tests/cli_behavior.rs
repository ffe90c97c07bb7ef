//! Integration tests for CLI behavior
//!
//! These tests run the binary against small C# projects in temporary
//! directories and check its output, exit code and the files it leaves.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const CLEAN: &str = "class C { void f () { g(); } }\n";
const SPACED: &str = "class C { void f () { g (); } }\n";

/// Helper to create a command for the trivialint CLI
fn trivialint_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trivialint"));
    cmd.current_dir(dir.path());
    cmd
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        dir.child(name).write_str(content).unwrap();
    }
    dir
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        let dir = TempDir::new().unwrap();
        trivialint_cmd(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        let dir = TempDir::new().unwrap();
        trivialint_cmd(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_file_exits_zero() {
        let dir = project(&[("Clean.cs", CLEAN)]);

        trivialint_cmd(&dir)
            .args(["lint", "Clean.cs"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Checked 1 files, found 0 issues in 0 files",
            ));
    }

    #[test]
    fn reports_violation_position_and_exits_one() {
        let dir = project(&[("Spaced.cs", SPACED)]);

        trivialint_cmd(&dir)
            .args(["lint", "Spaced.cs"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "Spaced.cs:1:24 no-space-before-argument-list:",
            ))
            .stdout(predicate::str::contains("found 1 issues in 1 files"));
    }

    #[test]
    fn lints_directories_recursively() {
        let dir = project(&[
            ("src/Clean.cs", CLEAN),
            ("src/Deep/Spaced.cs", SPACED),
            ("obj/Generated.cs", SPACED),
        ]);

        trivialint_cmd(&dir)
            .args(["lint", "src"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Checked 2 files"))
            .stdout(predicate::str::contains("Generated.cs").not());
    }

    #[test]
    fn reports_zero_files_for_nonexistent_path() {
        let dir = TempDir::new().unwrap();

        trivialint_cmd(&dir)
            .args(["lint", "Missing.cs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 0 files"));
    }

    #[test]
    fn warnings_do_not_fail_the_run() {
        let dir = project(&[
            ("Spaced.cs", SPACED),
            (
                ".trivialint.jsonc",
                r#"{ "options": { "no-space-before-argument-list": "warning" } }"#,
            ),
        ]);

        trivialint_cmd(&dir)
            .args(["lint", "Spaced.cs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(warning)"));
    }

    #[test]
    fn max_line_length_flag_overrides_config() {
        let dir = project(&[("Clean.cs", CLEAN)]);

        trivialint_cmd(&dir)
            .args(["lint", "--max-line-length", "20", "Clean.cs"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Clean.cs:1:1 max-line-length:"));
    }

    #[test]
    fn json_format_lists_violations() {
        let dir = project(&[("Spaced.cs", SPACED)]);

        let output = trivialint_cmd(&dir)
            .args(["lint", "--format", "json", "Spaced.cs"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let results = parsed.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["path"], "Spaced.cs");
        assert_eq!(
            results[0]["violations"][0]["rule_id"],
            "no-space-before-argument-list"
        );
        assert_eq!(
            results[0]["violations"][0]["span"],
            serde_json::json!({ "start": 23, "end": 24 })
        );
    }

    #[test]
    fn sarif_format_is_valid_json() {
        let dir = project(&[("Spaced.cs", SPACED)]);

        let output = trivialint_cmd(&dir)
            .args(["lint", "-f", "sarif", "Spaced.cs"])
            .output()
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        let region = &parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 1);
        assert_eq!(region["startColumn"], 24);
    }

    #[test]
    fn rejects_unknown_format() {
        let dir = project(&[("Clean.cs", CLEAN)]);

        trivialint_cmd(&dir)
            .args(["lint", "--format", "xml", "Clean.cs"])
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_config_exits_two() {
        let dir = project(&[
            ("Clean.cs", CLEAN),
            (".trivialint.jsonc", r#"{ "max_line_length": "long" }"#),
        ]);

        trivialint_cmd(&dir)
            .args(["lint", "Clean.cs"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Config validation failed"));
    }
}

mod fix_command {
    use super::*;

    #[test]
    fn fixes_files_in_place() {
        let dir = project(&[("Messy.cs", "class C { void f() { g (typeof (int)); } }  ")]);

        trivialint_cmd(&dir)
            .args(["lint", "--fix", "Messy.cs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Fixed 4 issues in 1 files"));

        dir.child("Messy.cs")
            .assert("class C { void f () { g(typeof(int)); } }\n");
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = project(&[("Spaced.cs", SPACED)]);

        trivialint_cmd(&dir)
            .args(["lint", "--fix", "--dry-run", "Spaced.cs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Would fix 1 issues in 1 files"))
            .stdout(predicate::str::contains("Run without --dry-run"));

        dir.child("Spaced.cs").assert(SPACED);
    }

    #[test]
    fn dry_run_requires_fix() {
        let dir = project(&[("Spaced.cs", SPACED)]);

        trivialint_cmd(&dir)
            .args(["lint", "--dry-run", "Spaced.cs"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--fix"));
    }

    #[test]
    fn analysis_only_violations_keep_exit_code() {
        let dir = project(&[("Using.cs", "void M () { using (a) b(); }  \n")]);

        trivialint_cmd(&dir)
            .args(["lint", "--fix", "Using.cs"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Fixed 1 issues in 1 files"))
            .stdout(predicate::str::contains("using-requires-braces"));

        dir.child("Using.cs")
            .assert("void M () { using (a) b(); }\n");
    }
}
