//! Core analyzer for orchestrating check execution and correction.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::check::{Check, CheckBox, Checks};
use crate::config::{Config, ConfigError};
use crate::theme::{SourceFile, Theme, ThemeError};
use crate::types::{Correction, Offense, Report};
use crate::utils::disable::DisabledRanges;
use crate::visitor::Visitor;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Theme files could not be listed, read or written.
    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `correct_offenses` was called on an analyzer built without
    /// auto-correct.
    #[error("Auto-correct is not enabled for this analyzer")]
    AutoCorrectDisabled,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    theme: Option<Theme>,
    root: Option<PathBuf>,
    config: Option<Config>,
    checks: Vec<CheckBox>,
    auto_correct: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes an already loaded theme instead of reading one from disk.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Sets the theme root, overriding the config's root.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration. Unless checks are added explicitly, its
    /// enabled checks are used.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a check, bypassing the config's enabled set.
    #[must_use]
    pub fn check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds a boxed check, bypassing the config's enabled set.
    #[must_use]
    pub fn check_box(mut self, check: CheckBox) -> Self {
        self.checks.push(check);
        self
    }

    /// Allows [`Analyzer::correct_offenses`] (default: false).
    #[must_use]
    pub fn auto_correct(mut self, enabled: bool) -> Self {
        self.auto_correct = enabled;
        self
    }

    /// Builds the analyzer, loading the theme if none was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the theme cannot be loaded.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let theme = match self.theme {
            Some(theme) => theme,
            None => {
                let root = self
                    .root
                    .or_else(|| self.config.as_ref().map(|c| c.root().to_path_buf()))
                    .unwrap_or_else(|| PathBuf::from("."));
                let ignore = self
                    .config
                    .as_ref()
                    .map(Config::ignore_patterns)
                    .unwrap_or_default();
                Theme::load_with_ignore(root, ignore)?
            }
        };

        let explicit = !self.checks.is_empty();
        let boxes = match (&self.config, explicit) {
            (Some(config), false) => config.enabled_checks(),
            _ => self.checks,
        };
        let mut checks = Checks::new(boxes);

        if let Some(config) = &self.config {
            let names: Vec<String> = checks.names().map(String::from).collect();
            for name in names {
                if let Some(severity) = config.severity_override(&name) {
                    checks.set_severity(&name, severity);
                }
            }
        }

        debug!(
            "Analyzer ready: {} checks, {} templates",
            checks.len(),
            theme.templates().len()
        );

        Ok(Analyzer {
            theme,
            checks,
            auto_correct: self.auto_correct,
            offenses: Vec::new(),
        })
    }
}

/// Outcome of a correction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionSummary {
    /// Files rewritten on disk.
    pub files_written: usize,
    /// Edits applied.
    pub applied: usize,
    /// Edits dropped because they overlapped an edit already applied.
    pub skipped: usize,
}

/// Runs a set of checks over a theme.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    theme: Theme,
    checks: Checks,
    auto_correct: bool,
    offenses: Vec<Offense>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The theme being analyzed.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The checks taking part in this run.
    #[must_use]
    pub fn checks(&self) -> &Checks {
        &self.checks
    }

    /// Returns true when built with auto-correct.
    #[must_use]
    pub fn is_auto_correct(&self) -> bool {
        self.auto_correct
    }

    /// Offenses from the last [`Analyzer::analyze_theme`] call.
    #[must_use]
    pub fn offenses(&self) -> &[Offense] {
        &self.offenses
    }

    /// Visits every file of the theme with every check and returns the
    /// offenses, ordered by path then location.
    ///
    /// A template that fails to parse is reported through `on_error` and
    /// does not stop the run. Calling this again starts from scratch.
    pub fn analyze_theme(&mut self) -> &[Offense] {
        info!(
            "Analyzing {} templates with {} checks",
            self.theme.templates().len(),
            self.checks.len()
        );

        self.checks.clear_offenses();
        self.checks.call_theme(&self.theme);

        for template in self.theme.templates() {
            debug!("Visiting {}", template.name());
            Visitor::new(&mut self.checks).visit_template(template);
            self.checks.call_after_template(template);
        }
        for file in self.theme.json_files() {
            debug!("Visiting {}", file.name());
            self.checks.call_json(file);
        }
        self.checks.call_end(&self.theme);

        let mut offenses: Vec<Offense> = {
            let disabled = self.disabled_ranges();
            self.checks
                .offenses()
                .filter(|o| !self.is_disabled(o, &disabled))
                .cloned()
                .collect()
        };
        offenses.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.check.cmp(&b.check))
        });

        info!("Analysis complete: {} offenses", offenses.len());
        self.offenses = offenses;
        &self.offenses
    }

    /// Offenses of the last run as a report.
    #[must_use]
    pub fn report(&self) -> Report {
        Report {
            offenses: self.offenses.clone(),
            templates_checked: self.theme.templates().len(),
        }
    }

    /// Applies the corrections of the last run's offenses and writes the
    /// changed templates back to disk.
    ///
    /// Edits within a template are applied from the highest offset down, so
    /// pending edits keep valid offsets. Corrected offenses are removed from
    /// [`Analyzer::offenses`], so a second call writes nothing. Templates are
    /// not re-checked; call
    /// [`Analyzer::analyze_theme`] again to see what remains.
    ///
    /// # Errors
    ///
    /// Returns an error if the analyzer was not built with auto-correct or a
    /// file cannot be written.
    pub fn correct_offenses(&mut self) -> Result<CorrectionSummary, AnalyzerError> {
        if !self.auto_correct {
            return Err(AnalyzerError::AutoCorrectDisabled);
        }

        let mut edits: BTreeMap<PathBuf, Vec<Correction>> = BTreeMap::new();
        let mut remaining = Vec::new();
        for offense in std::mem::take(&mut self.offenses) {
            let correction = self
                .checks
                .get(&offense.check)
                .filter(|i| i.check().can_correct())
                .and_then(|i| i.check().correct(&offense));
            match correction {
                Some(correction) => edits
                    .entry(offense.location.path.clone())
                    .or_default()
                    .push(correction),
                None => remaining.push(offense),
            }
        }
        // Applied offenses are consumed; only uncorrectable ones stay reported.
        self.offenses = remaining;

        let mut summary = CorrectionSummary::default();
        for (path, corrections) in edits {
            let Some(template) = self.theme.template_by_path_mut(&path) else {
                warn!("Cannot correct {}: not a template", path.display());
                continue;
            };
            let (source, applied, skipped) = apply_corrections(template.source(), corrections);
            summary.applied += applied;
            summary.skipped += skipped;
            if applied == 0 {
                continue;
            }
            template.set_source(source);
            template.write()?;
            summary.files_written += 1;
            info!("Corrected {} ({applied} edits)", path.display());
        }

        Ok(summary)
    }

    fn disabled_ranges(&self) -> HashMap<&Path, DisabledRanges> {
        self.theme
            .templates()
            .iter()
            .filter_map(|t| {
                let root = t.root().ok()?;
                let ranges = DisabledRanges::from_template(root, t.source());
                (!ranges.is_empty()).then(|| (t.relative_path(), ranges))
            })
            .collect()
    }

    fn is_disabled(&self, offense: &Offense, disabled: &HashMap<&Path, DisabledRanges>) -> bool {
        let Some(ranges) = disabled.get(offense.location.path.as_path()) else {
            return false;
        };
        let can_disable = self
            .checks
            .get(&offense.check)
            .map_or(true, |i| i.check().can_disable());
        can_disable && ranges.is_disabled(&offense.check, offense.location.start)
    }
}

/// Applies `corrections` to `source` from the highest offset down.
///
/// Returns the new text with the number of applied and skipped edits.
/// An edit is skipped when it overlaps one already applied, falls outside
/// the source, or splits a character.
#[must_use]
pub fn apply_corrections(source: &str, mut corrections: Vec<Correction>) -> (String, usize, usize) {
    corrections.sort_by(|a, b| {
        let (ra, rb) = (a.range(), b.range());
        rb.start
            .cmp(&ra.start)
            .then(rb.end.cmp(&ra.end))
            .then_with(|| a.text().cmp(b.text()))
    });
    corrections.dedup();

    let mut text = source.to_string();
    let mut limit = source.len();
    let (mut applied, mut skipped) = (0, 0);

    for correction in corrections {
        let range = correction.range();
        let in_bounds = range.start <= range.end
            && source.is_char_boundary(range.start)
            && source.is_char_boundary(range.end);
        if !in_bounds || range.end > limit {
            warn!(
                "Skipping correction at {}..{}: overlaps another edit",
                range.start, range.end
            );
            skipped += 1;
            continue;
        }
        text.replace_range(range.start..range.end, correction.text());
        limit = range.start;
        applied += 1;
    }

    (text, applied, skipped)
}
