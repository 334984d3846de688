//! Flatten mined conventions into a deterministic, capped rule list.

use codeintel_snapshot::ConventionSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CONFIDENCE: u8 = 60;
pub const DEFAULT_MAX_RULES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub text: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub rules_text: String,
    pub rule_count: usize,
    pub total: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleOptions {
    pub min_confidence: u8,
    pub max_rules: usize,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_rules: DEFAULT_MAX_RULES,
        }
    }
}

/// Flatten every mined convention into `{text, confidence}` candidates, drop
/// zero-confidence noise, filter by threshold, sort by confidence descending
/// with an alphabetical tie-break, and cap the list. Two runs on identical
/// input produce byte-identical text.
pub fn generate_rules(conventions: &ConventionSet, opts: &RuleOptions) -> RuleSet {
    let mut candidates: Vec<Rule> = Vec::new();

    for pattern in &conventions.naming.overall {
        if pattern.pattern == "mixed" {
            continue;
        }
        candidates.push(Rule {
            text: format!(
                "Name source files in {} (seen in {} files)",
                pattern.pattern, pattern.file_count
            ),
            confidence: pattern.confidence,
        });
    }
    for dir in &conventions.naming.by_directory {
        if dir.dominant == "mixed" {
            continue;
        }
        candidates.push(Rule {
            text: format!("Files under {}/ use {}", dir.directory, dir.dominant),
            confidence: dir.confidence,
        });
    }

    let structure = &conventions.file_organization.structure;
    candidates.push(Rule {
        text: format!(
            "Keep the {} directory layout (max depth {})",
            structure.structure_type, structure.max_depth
        ),
        confidence: 100,
    });
    if let Some(grouping) = &conventions.file_organization.grouping {
        candidates.push(Rule {
            text: format!("Group directories {}", grouping.style),
            confidence: grouping.confidence,
        });
    }
    if let Some(tests) = &conventions.file_organization.test_placement {
        let text = match tests.style.as_str() {
            "co-located" => "Keep tests co-located with the code they cover".to_string(),
            _ => "Keep tests inside dedicated test directories".to_string(),
        };
        candidates.push(Rule {
            text,
            confidence: tests.confidence,
        });
    }
    if let Some(config) = &conventions.file_organization.config_placement {
        let text = match config.style.as_str() {
            "root" => "Keep configuration files at the repository root".to_string(),
            _ => "Keep configuration files in a config directory".to_string(),
        };
        candidates.push(Rule {
            text,
            confidence: config.confidence,
        });
    }
    if let Some(barrels) = &conventions.file_organization.barrels {
        candidates.push(Rule {
            text: "Expose directories through index files".to_string(),
            confidence: barrels.confidence,
        });
    }

    for framework in &conventions.frameworks {
        for pattern in &framework.patterns {
            candidates.push(Rule {
                text: format!("[{}] {}", framework.framework, pattern.pattern),
                confidence: pattern.confidence,
            });
        }
    }

    let total = candidates.len();
    let mut rules: Vec<Rule> = candidates
        .into_iter()
        .filter(|rule| rule.confidence > 0 && rule.confidence >= opts.min_confidence)
        .collect();
    rules.sort_by(|a, b| b.confidence.cmp(&a.confidence).then(a.text.cmp(&b.text)));
    rules.truncate(opts.max_rules);

    let rules_text = rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| format!("{}. {} ({}%)", idx + 1, rule.text, rule.confidence))
        .collect::<Vec<_>>()
        .join("\n");

    let rule_count = rules.len();
    RuleSet {
        rules,
        rules_text,
        rule_count,
        total,
        filtered: total - rule_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::{
        FileOrganization, FrameworkConvention, FrameworkPattern, NamingConventions, NamingPattern,
        StructureInfo,
    };
    use pretty_assertions::assert_eq;

    fn conventions() -> ConventionSet {
        ConventionSet {
            naming: NamingConventions {
                overall: vec![
                    NamingPattern {
                        pattern: "camelCase".to_string(),
                        confidence: 80,
                        file_count: 8,
                        examples: vec![],
                    },
                    NamingPattern {
                        pattern: "kebab-case".to_string(),
                        confidence: 20,
                        file_count: 2,
                        examples: vec![],
                    },
                ],
                by_directory: vec![],
            },
            file_organization: FileOrganization {
                structure: StructureInfo {
                    structure_type: "nested".to_string(),
                    max_depth: 4,
                    avg_depth: 2.5,
                },
                grouping: None,
                test_placement: None,
                config_placement: None,
                barrels: None,
            },
            frameworks: vec![FrameworkConvention {
                framework: "phoenix-ecto".to_string(),
                patterns: vec![FrameworkPattern {
                    pattern: "Routes declared with Phoenix router macros".to_string(),
                    confidence: 80,
                    evidence: vec!["lib/router.ex".to_string()],
                }],
            }],
            extracted_at: String::new(),
        }
    }

    #[test]
    fn filters_sorts_and_numbers_deterministically() {
        let set = generate_rules(&conventions(), &RuleOptions::default());
        assert_eq!(set.total, 4);
        assert_eq!(set.rule_count, 3);
        assert_eq!(set.filtered, 1);
        assert_eq!(set.rules[0].confidence, 100);
        // 80% entries tie-break alphabetically
        assert_eq!(
            set.rules[1].text,
            "Name source files in camelCase (seen in 8 files)"
        );
        assert_eq!(
            set.rules[2].text,
            "[phoenix-ecto] Routes declared with Phoenix router macros"
        );

        let again = generate_rules(&conventions(), &RuleOptions::default());
        assert_eq!(again.rules_text, set.rules_text);
        assert!(set.rules_text.starts_with("1. "));
    }

    #[test]
    fn cap_limits_rule_count() {
        let set = generate_rules(
            &conventions(),
            &RuleOptions {
                min_confidence: 0,
                max_rules: 2,
            },
        );
        assert_eq!(set.rule_count, 2);
        assert_eq!(set.total, 4);
        assert_eq!(set.filtered, 2);
    }
}
