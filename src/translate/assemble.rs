use crate::diagnostics::{Diagnostic, Reason};
use crate::source::{SourceCondition, SourceRuleset};
use crate::target::{RuleSet, TranslatedRule, When};
use crate::translate::translate_with_issues;
use std::collections::BTreeMap;

/// Upstream location windup rulesets are identified by.
pub const DEFAULT_SOURCE_PREFIX: &str = "http://github.com/windup/windup-rulesets/tree/master/";

/// Root the analyzer rulesets are written under.
pub const DEFAULT_TARGET_ROOT: &str = "analyzer-lsp-rules/";

/// Maps a source file identifier to the path of its output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub source_prefix: String,
    pub target_root: String,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            target_root: DEFAULT_TARGET_ROOT.to_string(),
        }
    }
}

impl Destination {
    /// Output path for a source identifier. The source prefix only matches
    /// whole path segments.
    pub fn path_for(&self, source_file: &str) -> String {
        let target_root = if self.target_root.is_empty() || self.target_root.ends_with('/') {
            self.target_root.clone()
        } else {
            format!("{}/", self.target_root)
        };
        let prefix = self.source_prefix.trim_end_matches('/');
        let path = match source_file.strip_prefix(prefix) {
            Some(rest) if !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                format!("{}{}", target_root, rest.trim_start_matches('/'))
            }
            _ => source_file.to_string(),
        };
        match path.strip_suffix(".xml") {
            Some(stem) => format!("{}.yaml", stem),
            None => path,
        }
    }
}

pub fn rule_id(source_file: &str, rule_index: usize) -> String {
    format!("{}-{}", source_file, rule_index)
}

/// Outcome of assembling one rule.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub rule: Option<TranslatedRule>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Translate one rule's condition and wrap it as an analyzer rule.
///
/// `rule_index` is the rule's position in its source file, whether or not
/// earlier rules survived, so ids stay traceable to the source.
pub fn assemble(rule_index: usize, source_file: &str, when: Option<&SourceCondition>) -> Assembly {
    let Some(when) = when else {
        return Assembly {
            rule: None,
            diagnostics: vec![Diagnostic::for_rule(
                source_file,
                rule_index,
                Reason::NoCondition,
            )],
        };
    };

    let translation = translate_with_issues(when);
    let mut diagnostics: Vec<Diagnostic> = translation
        .issues
        .into_iter()
        .map(|reason| Diagnostic::for_rule(source_file, rule_index, reason))
        .collect();

    let mut conditions = translation.conditions;
    let when = match conditions.len() {
        0 => {
            diagnostics.push(Diagnostic::for_rule(
                source_file,
                rule_index,
                Reason::EmptyTranslation,
            ));
            return Assembly {
                rule: None,
                diagnostics,
            };
        }
        1 => When::Condition(conditions.remove(0)),
        _ => When::Or { or: conditions },
    };

    Assembly {
        rule: Some(TranslatedRule {
            id: rule_id(source_file, rule_index),
            when,
        }),
        diagnostics,
    }
}

/// Group rulesets by output path. Rulesets without rules are left out, and
/// rulesets sharing a path are kept as separate documents in input order.
pub fn group_by_destination<I>(
    rulesets: I,
    destination: &Destination,
) -> BTreeMap<String, Vec<RuleSet>>
where
    I: IntoIterator<Item = (String, RuleSet)>,
{
    rulesets
        .into_iter()
        .filter(|(_, ruleset)| !ruleset.rules.is_empty())
        .fold(BTreeMap::new(), |mut outputs, (source_file, ruleset)| {
            outputs
                .entry(destination.path_for(&source_file))
                .or_default()
                .push(ruleset);
            outputs
        })
}

/// Result of converting a batch of source rulesets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub outputs: BTreeMap<String, Vec<RuleSet>>,
    pub diagnostics: Vec<Diagnostic>,
    pub converted: usize,
    pub skipped: usize,
}

/// Translate every rule of every ruleset and group the results by output path.
pub fn convert(rulesets: &[SourceRuleset], destination: &Destination) -> Conversion {
    let mut diagnostics = Vec::new();
    let mut converted = 0;
    let mut skipped = 0;

    let assembled: Vec<(String, RuleSet)> = rulesets
        .iter()
        .map(|source| {
            let mut ruleset = RuleSet::default();
            for (index, rule) in source.rules.iter().enumerate() {
                let assembly = assemble(index, &source.source_file, rule.when.as_ref());
                diagnostics.extend(assembly.diagnostics);
                match assembly.rule {
                    Some(rule) => {
                        if tracing::enabled!(tracing::Level::DEBUG) {
                            if let Ok(rendered) = serde_yaml::to_string(&rule) {
                                tracing::debug!("Converted rule:\n{}", rendered);
                            }
                        }
                        converted += 1;
                        ruleset.rules.push(rule);
                    }
                    None => skipped += 1,
                }
            }
            (source.source_file.clone(), ruleset)
        })
        .collect();

    Conversion {
        outputs: group_by_destination(assembled, destination),
        diagnostics,
        converted,
        skipped,
    }
}
