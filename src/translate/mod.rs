//! Rewrites windup condition trees into analyzer conditions.
//!
//! Translation never fails. Leaves without an analyzer equivalent become
//! placeholder conditions, elements the loader could not map are dropped, and
//! every such degrade is recorded as a [`Reason`] so the rule can be reviewed
//! by hand.

pub mod assemble;

use crate::diagnostics::Reason;
use crate::source::{self, Dependency, JavaClass, SourceCondition};
use crate::target::{FileContent, JavaDependency, JavaReferenced, TargetCondition, TargetPredicate};

/// Conditions produced for one source node, with the issues met on the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Translation {
    pub conditions: Vec<TargetCondition>,
    pub issues: Vec<Reason>,
}

/// Translate a condition tree, discarding issues.
pub fn translate(source: &SourceCondition) -> Vec<TargetCondition> {
    translate_with_issues(source).conditions
}

pub fn translate_with_issues(source: &SourceCondition) -> Translation {
    let mut issues = Vec::new();
    let conditions = translate_node(source, &mut issues);
    Translation { conditions, issues }
}

fn translate_node(source: &SourceCondition, issues: &mut Vec<Reason>) -> Vec<TargetCondition> {
    match source {
        SourceCondition::And(children) => combine(children, "and", TargetPredicate::And, issues),
        SourceCondition::Or(children) => combine(children, "or", TargetPredicate::Or, issues),
        SourceCondition::Not(children) => negate(children, issues),
        SourceCondition::Dependency(dependency) => vec![java_dependency(dependency)],
        SourceCondition::FileContent(file_content) => vec![filecontent(file_content)],
        SourceCondition::JavaClass(java_class) => java_referenced(java_class),
        SourceCondition::Marker(marker) => {
            let predicate = marker.predicate();
            issues.push(Reason::Placeholder { predicate });
            let condition = TargetCondition::new(TargetPredicate::Placeholder(predicate));
            vec![condition]
        }
        SourceCondition::Unsupported(name) => {
            issues.push(Reason::UnsupportedElement { name: name.clone() });
            Vec::new()
        }
    }
}

fn flatten(children: &[SourceCondition], issues: &mut Vec<Reason>) -> Vec<TargetCondition> {
    children
        .iter()
        .flat_map(|child| translate_node(child, issues))
        .collect()
}

fn combine(
    children: &[SourceCondition],
    combinator: &'static str,
    wrap: fn(Vec<TargetCondition>) -> TargetPredicate,
    issues: &mut Vec<Reason>,
) -> Vec<TargetCondition> {
    let conditions = flatten(children, issues);
    if conditions.is_empty() {
        issues.push(Reason::EmptyCombinator { combinator });
        return Vec::new();
    }
    vec![TargetCondition::new(wrap(conditions))]
}

// Negation is pushed onto each produced condition. That matches the source
// semantics for a single leaf only; combinators and already negated
// conditions are flagged.
fn negate(children: &[SourceCondition], issues: &mut Vec<Reason>) -> Vec<TargetCondition> {
    let mut conditions = flatten(children, issues);
    if conditions.is_empty() {
        issues.push(Reason::EmptyCombinator { combinator: "not" });
        return conditions;
    }
    for condition in &mut conditions {
        if condition.predicate.is_combinator() {
            issues.push(Reason::NegatedCombinator {
                combinator: condition.predicate.name(),
            });
        }
        if condition.not {
            issues.push(Reason::NestedNegation);
        }
        condition.not = true;
    }
    conditions
}

fn java_dependency(dependency: &Dependency) -> TargetCondition {
    TargetCondition::new(TargetPredicate::JavaDependency(JavaDependency {
        group_id: dependency.group_id.clone(),
        artifact_id: dependency.artifact_id.clone(),
        lower_bound: dependency.from_version.clone().filter(|v| !v.is_empty()),
        upper_bound: dependency.to_version.clone().filter(|v| !v.is_empty()),
    }))
}

fn filecontent(file_content: &source::FileContent) -> TargetCondition {
    TargetCondition::new(TargetPredicate::FileContent(FileContent {
        pattern: file_content.pattern.clone(),
        filename: file_content.filename.clone().filter(|f| !f.is_empty()),
    }))
    .with_binding(file_content.bind_as.clone(), file_content.from.clone())
}

/// One condition per location; a class without locations matches anywhere.
fn java_referenced(java_class: &JavaClass) -> Vec<TargetCondition> {
    let referenced = |location: Option<&String>| {
        TargetCondition::new(TargetPredicate::JavaReferenced(JavaReferenced {
            pattern: java_class.references.clone(),
            location: location.cloned(),
        }))
        .with_binding(java_class.bind_as.clone(), java_class.from.clone())
    };

    if java_class.locations.is_empty() {
        vec![referenced(None)]
    } else {
        java_class
            .locations
            .iter()
            .map(Some)
            .map(referenced)
            .collect()
    }
}
