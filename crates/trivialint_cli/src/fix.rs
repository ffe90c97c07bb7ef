//! Fix summary reporting

use std::path::PathBuf;

use trivialint_core::LintResult;

/// Summary of applied fixes.
pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
    pub errors: Vec<(PathBuf, String)>,
}

impl FixSummary {
    /// Collects the fixes reported by a fix run. `failures` are files that
    /// could not be read or fixed.
    pub fn from_results(results: &[LintResult], failures: &[(PathBuf, String)]) -> Self {
        let fixes_by_file: Vec<(PathBuf, usize)> = results
            .iter()
            .filter(|r| r.fixes_applied > 0)
            .map(|r| (r.path.clone(), r.fixes_applied))
            .collect();

        Self {
            total_fixes: fixes_by_file.iter().map(|(_, count)| count).sum(),
            files_fixed: fixes_by_file.len(),
            fixes_by_file,
            errors: failures.to_vec(),
        }
    }
}

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.total_fixes == 0 && summary.errors.is_empty() {
        println!("No fixable issues found.");
        return;
    }

    if summary.total_fixes > 0 {
        let action = if dry_run { "Would fix" } else { "Fixed" };

        println!(
            "\n{} {} issues in {} files:",
            action, summary.total_fixes, summary.files_fixed
        );
        print_fix_list(&summary.fixes_by_file);

        if dry_run {
            println!("\nRun without --dry-run to apply fixes.");
        }
    }

    if !summary.errors.is_empty() {
        eprintln!("\nFailed to fix {} file(s):", summary.errors.len());
        for (path, err) in &summary.errors {
            eprintln!("  {}: {}", path.display(), err);
        }
    }
}

fn print_fix_list(fixes_by_file: &[(PathBuf, usize)]) {
    for (path, count) in fixes_by_file {
        println!("  {}: {} fixes", path.display(), count);
    }
}
