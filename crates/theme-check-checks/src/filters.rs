//! Known Liquid filter names, loaded once from `data/filters.yml`.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Filters that work but are missing from the reference data.
pub const UNDOCUMENTED_FILTERS: &[&str] = &[
    "customer_logout_link",
    "customer_register_link",
    "format_code",
    "handle",
    "product_img_url",
    "t",
    "translate",
];

const FILTERS_YAML: &str = include_str!("../data/filters.yml");

#[derive(Debug, Deserialize)]
struct FilterGroup {
    items: Vec<FilterItem>,
}

#[derive(Debug, Deserialize)]
struct FilterItem {
    label: String,
}

static LABELS: Lazy<BTreeSet<String>> = Lazy::new(|| load_labels(FILTERS_YAML));

fn load_labels(yaml: &str) -> BTreeSet<String> {
    let groups: Vec<FilterGroup> = serde_yaml::from_str(yaml).unwrap_or_else(|e| {
        tracing::warn!("Failed to load filter reference data: {e}");
        Vec::new()
    });
    groups
        .into_iter()
        .flat_map(|g| g.items)
        .map(|item| item.label)
        .chain(UNDOCUMENTED_FILTERS.iter().map(ToString::to_string))
        .collect()
}

/// Every known filter label.
#[must_use]
pub fn labels() -> &'static BTreeSet<String> {
    &LABELS
}

/// Returns true for a documented or known-undocumented filter.
#[must_use]
pub fn is_known(name: &str) -> bool {
    LABELS.contains(name)
}
