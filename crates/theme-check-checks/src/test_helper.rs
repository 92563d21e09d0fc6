//! Shared fixtures for check tests.

use std::collections::BTreeMap;
use std::fs;

use tempfile::TempDir;
use theme_check_core::{Analyzer, CheckBox, Offense, SourceFile};

fn make_theme(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

/// Runs `checks` over a theme made of `files`.
pub(crate) fn analyze_theme(checks: Vec<CheckBox>, files: &[(&str, &str)]) -> Vec<Offense> {
    let dir = make_theme(files);
    let mut builder = Analyzer::builder().root(dir.path());
    for check in checks {
        builder = builder.check_box(check);
    }
    let mut analyzer = builder.build().unwrap();
    analyzer.analyze_theme().to_vec()
}

/// Runs `checks` with auto-correct and returns every template's new source.
pub(crate) fn fix_theme(checks: Vec<CheckBox>, files: &[(&str, &str)]) -> BTreeMap<String, String> {
    let dir = make_theme(files);
    let mut builder = Analyzer::builder().root(dir.path()).auto_correct(true);
    for check in checks {
        builder = builder.check_box(check);
    }
    let mut analyzer = builder.build().unwrap();
    analyzer.analyze_theme();
    analyzer.correct_offenses().unwrap();

    analyzer
        .theme()
        .templates()
        .iter()
        .map(|t| {
            let on_disk = fs::read_to_string(t.path()).unwrap();
            (t.relative_path().display().to_string(), on_disk)
        })
        .collect()
}

/// Offenses rendered one per line, as the CLI prints them.
pub(crate) fn lines(offenses: &[Offense]) -> Vec<String> {
    offenses.iter().map(ToString::to_string).collect()
}
