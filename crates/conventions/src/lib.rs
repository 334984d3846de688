//! Convention mining: naming patterns, file organization and framework
//! idioms, each with integer-percentage confidence scores.

pub mod frameworks;
pub mod naming;
pub mod organization;
pub mod rules;

use chrono::{SecondsFormat, Utc};
use codeintel_snapshot::{ConventionSet, Snapshot};
use std::path::Path;

pub use rules::{generate_rules, Rule, RuleOptions, RuleSet};

#[derive(Debug, Clone, Copy)]
pub struct ConventionOptions {
    /// Sub-results below this confidence are dropped unless `include_all`.
    pub min_confidence: u8,
    pub include_all: bool,
}

impl Default for ConventionOptions {
    fn default() -> Self {
        Self {
            min_confidence: rules::DEFAULT_MIN_CONFIDENCE,
            include_all: false,
        }
    }
}

/// Run all three analyses over the snapshot and filter every sub-result by
/// the confidence threshold.
pub fn extract_conventions(
    root: &Path,
    snapshot: &Snapshot,
    opts: &ConventionOptions,
) -> ConventionSet {
    let mut naming = naming::mine_naming(snapshot);
    let mut file_organization = organization::mine_organization(snapshot);
    let mut frameworks = frameworks::mine_frameworks(snapshot, root);

    if !opts.include_all {
        let min = opts.min_confidence;
        naming.overall.retain(|p| p.confidence >= min);
        naming.by_directory.retain(|d| d.confidence >= min);
        if file_organization
            .grouping
            .as_ref()
            .is_some_and(|g| g.confidence < min)
        {
            file_organization.grouping = None;
        }
        if file_organization
            .test_placement
            .as_ref()
            .is_some_and(|p| p.confidence < min)
        {
            file_organization.test_placement = None;
        }
        if file_organization
            .config_placement
            .as_ref()
            .is_some_and(|p| p.confidence < min)
        {
            file_organization.config_placement = None;
        }
        if file_organization
            .barrels
            .as_ref()
            .is_some_and(|p| p.confidence < min)
        {
            file_organization.barrels = None;
        }
        for framework in &mut frameworks {
            framework.patterns.retain(|p| p.confidence >= min);
        }
        frameworks.retain(|f| !f.patterns.is_empty());
    }

    ConventionSet {
        naming,
        file_organization,
        frameworks,
        extracted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
