//! Integration test: settings discovery → Config → Analyzer → correction,
//! end-to-end on themes written to a temporary directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use theme_check_core::{
    Analyzer, Category, Check, CheckRegistry, Config, Correction, HookContext, Node, Offense,
    ParseError, Severity, SourceFile, Span, Template, SETTINGS_FILE_NAME,
};

/// Reports templates longer than `max_length` lines.
struct LineCount {
    max_length: usize,
}

impl Check for LineCount {
    fn name(&self) -> &str {
        "TemplateLength"
    }
    fn category(&self) -> Category {
        Category::Liquid
    }
    fn after_template(&mut self, template: &Template, cx: &mut HookContext<'_>) {
        let lines = template.source().lines().count();
        if lines > self.max_length {
            cx.add_offense(format!(
                "Template has {lines} lines [max: {}]",
                self.max_length
            ));
        }
    }
}

/// Reports parse failures.
struct Syntax;

impl Check for Syntax {
    fn name(&self) -> &str {
        "SyntaxError"
    }
    fn category(&self) -> Category {
        Category::Liquid
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn can_disable(&self) -> bool {
        false
    }
    fn on_error(&mut self, error: &ParseError, cx: &mut HookContext<'_>) {
        cx.add_offense_at_line(error.to_string(), error.line);
    }
}

/// Flags `{{x}}` without inner padding and corrects it.
struct Padding;

impl Check for Padding {
    fn name(&self) -> &str {
        "SpaceInsideBraces"
    }
    fn category(&self) -> Category {
        Category::Liquid
    }
    fn default_severity(&self) -> Severity {
        Severity::Style
    }
    fn can_correct(&self) -> bool {
        true
    }
    fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if node.type_name() != "variable" {
            return;
        }
        let markup = node.markup_span();
        let inner = cx.source().get(markup.start..markup.end).unwrap_or("");
        if !inner.starts_with(' ') {
            cx.add_offense("Space missing after '{{'");
        }
        if !inner.ends_with(' ') {
            cx.add_offense_at("Space missing before '}}'", Span::new(markup.end, markup.end));
        }
    }
    fn correct(&self, offense: &Offense) -> Option<Correction> {
        let offset = if offense.message.contains("after") {
            offense.location.start + 2
        } else {
            offense.location.start
        };
        Some(Correction::insert(offset, " "))
    }
}

const DEFAULTS: &str = "
SyntaxError:
  enabled: true
  category: liquid
TemplateLength:
  enabled: true
  category: liquid
  max_length: 3
SpaceInsideBraces:
  enabled: true
  category: liquid
";

fn registry() -> CheckRegistry {
    let mut registry = CheckRegistry::with_default_settings(DEFAULTS).unwrap();
    registry
        .register("SyntaxError", Category::Liquid, |_| Box::new(Syntax))
        .unwrap();
    registry
        .register("TemplateLength", Category::Liquid, |settings| {
            let max = settings.get_int("max_length", 200);
            Box::new(LineCount {
                max_length: usize::try_from(max).unwrap_or(usize::MAX),
            })
        })
        .unwrap();
    registry
        .register("SpaceInsideBraces", Category::Liquid, |_| Box::new(Padding))
        .unwrap();
    registry
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn analyze(start: &Path) -> Vec<(String, String)> {
    let config = Config::from_path(start, registry()).unwrap();
    let mut analyzer = Analyzer::builder().config(config).build().unwrap();
    analyzer
        .analyze_theme()
        .iter()
        .map(|o| (o.check.clone(), o.location.path.display().to_string()))
        .collect()
}

#[test]
fn disabled_check_reports_nothing() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/index.liquid", "a\nb\nc\nd\ne\n");
    write(
        tmp.path(),
        SETTINGS_FILE_NAME,
        "TemplateLength:\n  enabled: false\n",
    );

    let offenses = analyze(tmp.path());
    assert!(offenses.iter().all(|(check, _)| check != "TemplateLength"));
}

#[test]
fn long_template_is_reported_with_defaults() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/index.liquid", "a\nb\nc\nd\ne\n");

    let offenses = analyze(tmp.path());
    assert_eq!(
        offenses,
        vec![(
            "TemplateLength".to_string(),
            "templates/index.liquid".to_string()
        )]
    );
}

#[test]
fn nested_settings_file_wins_inside_its_directory() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), SETTINGS_FILE_NAME, "TemplateLength:\n  enabled: false\n");
    write(
        tmp.path(),
        "theme/.theme-check.yml",
        "TemplateLength:\n  enabled: true\n",
    );
    write(tmp.path(), "theme/templates/index.liquid", "1\n2\n3\n4\n");

    let config = Config::from_path(&tmp.path().join("theme/templates"), registry()).unwrap();
    assert_eq!(config.root(), tmp.path().join("theme"));
    assert!(config.is_enabled("TemplateLength"));
    assert_eq!(analyze(&tmp.path().join("theme")).len(), 1);
}

#[test]
fn broken_template_is_reported_alongside_others() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/a.liquid", "{{x}}");
    write(tmp.path(), "templates/b.liquid", "{% if x %}");
    write(tmp.path(), "templates/c.liquid", "1\n2\n3\n4\n");

    let offenses = analyze(tmp.path());
    let checks: Vec<&str> = offenses.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(
        checks,
        vec![
            "SpaceInsideBraces",
            "SpaceInsideBraces",
            "SyntaxError",
            "TemplateLength"
        ]
    );
    assert_eq!(offenses[2].1, "templates/b.liquid");
}

#[test]
fn empty_settings_file_matches_no_settings_file() {
    let bare = TempDir::new().unwrap();
    let with_empty = TempDir::new().unwrap();
    write(with_empty.path(), SETTINGS_FILE_NAME, "");

    let names = |start: &Path| -> Vec<String> {
        Config::from_path(start, registry())
            .unwrap()
            .enabled_checks()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    };
    assert_eq!(names(bare.path()), names(with_empty.path()));
}

#[test]
fn root_key_points_analysis_elsewhere() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), SETTINGS_FILE_NAME, "root: dist\n");
    write(tmp.path(), "dist/templates/index.liquid", "1\n2\n3\n4\n");
    write(tmp.path(), "src/templates/index.liquid", "{% if %}");

    let offenses = analyze(tmp.path());
    assert_eq!(offenses.len(), 1);
    assert_eq!(offenses[0].0, "TemplateLength");
}

#[test]
fn ignored_files_are_not_analyzed() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), SETTINGS_FILE_NAME, "ignore:\n  - snippets/vendor/*\n");
    write(tmp.path(), "snippets/vendor/lib.liquid", "{% if %}");

    assert!(analyze(tmp.path()).is_empty());
}

#[test]
fn disable_comment_silences_checks_after_it() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "templates/index.liquid",
        "{{x}}\n{% comment %}theme-check-disable{% endcomment %}{{y}}\n",
    );

    let config = Config::from_path(tmp.path(), registry()).unwrap();
    let mut analyzer = Analyzer::builder().config(config).build().unwrap();
    let offenses = analyzer.analyze_theme();
    assert_eq!(offenses.len(), 2);
    assert!(offenses.iter().all(|o| o.location.line == 1));
}

#[test]
fn corrections_are_written_and_resolve_offenses() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/index.liquid", "{{x}} and {{y}}\n");
    write(tmp.path(), "snippets/clean.liquid", "{{ z }}\n");

    let config = Config::from_path(tmp.path(), registry()).unwrap();
    let mut analyzer = Analyzer::builder()
        .config(config)
        .auto_correct(true)
        .build()
        .unwrap();
    assert_eq!(analyzer.analyze_theme().len(), 4);

    let summary = analyzer.correct_offenses().unwrap();
    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.applied, 4);
    assert_eq!(summary.skipped, 0);

    let written = fs::read_to_string(tmp.path().join("templates/index.liquid")).unwrap();
    assert_eq!(written, "{{ x }} and {{ y }}\n");
    let untouched = fs::read_to_string(tmp.path().join("snippets/clean.liquid")).unwrap();
    assert_eq!(untouched, "{{ z }}\n");

    assert!(analyzer.analyze_theme().is_empty());
}

#[test]
fn custom_check_from_require_runs_with_overrides() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "checks/no_todo.yml",
        "name: NoTodo\ncategory: liquid\nmessage: Remove TODO notes\npattern: TODO\n",
    );
    write(
        tmp.path(),
        SETTINGS_FILE_NAME,
        "require:\n  - checks/no_todo.yml\nNoTodo:\n  severity: error\n",
    );
    write(tmp.path(), "templates/index.liquid", "TODO fix {{ a }} TODO\n");

    let config = Config::from_path(tmp.path(), registry()).unwrap();
    let mut analyzer = Analyzer::builder().config(config).build().unwrap();
    let offenses = analyzer.analyze_theme();

    assert_eq!(offenses.len(), 2);
    assert!(offenses.iter().all(|o| o.check == "NoTodo"));
    assert!(offenses.iter().all(|o| o.severity == Severity::Error));
    assert_eq!(offenses[1].location.start, 17);
}

#[test]
fn category_filter_applies_to_analysis() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/index.liquid", "1\n2\n3\n4\n{{x}}");

    let mut config = Config::from_path(tmp.path(), registry()).unwrap();
    config.set_exclude_categories(vec![Category::Liquid]);
    let mut analyzer = Analyzer::builder().config(config).build().unwrap();
    assert!(analyzer.analyze_theme().is_empty());
}
