//! Analyzer rule model and its YAML shape.

pub mod writer;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// `java.dependency` parameters. Absent bounds leave the range open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaDependency {
    #[serde(rename = "groupID")]
    pub group_id: String,
    #[serde(rename = "artifactID")]
    pub artifact_id: String,
    #[serde(rename = "lowerBound", skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    #[serde(rename = "upperBound", skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
}

/// `filecontent` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// `java.referenced` parameters; no location matches any location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaReferenced {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPredicate {
    JavaDependency(JavaDependency),
    FileContent(FileContent),
    JavaReferenced(JavaReferenced),
    And(Vec<TargetCondition>),
    Or(Vec<TargetCondition>),
    /// Name-only stand-in for a condition the analyzer has no equivalent for
    Placeholder(&'static str),
}

impl TargetPredicate {
    /// Key the predicate is written under.
    pub fn name(&self) -> &'static str {
        match self {
            TargetPredicate::JavaDependency(_) => "java.dependency",
            TargetPredicate::FileContent(_) => "filecontent",
            TargetPredicate::JavaReferenced(_) => "java.referenced",
            TargetPredicate::And(_) => "and",
            TargetPredicate::Or(_) => "or",
            TargetPredicate::Placeholder(name) => *name,
        }
    }

    pub fn is_combinator(&self) -> bool {
        matches!(self, TargetPredicate::And(_) | TargetPredicate::Or(_))
    }
}

/// One analyzer condition. Negation is a flag on the condition itself; the
/// analyzer schema has no `not` combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCondition {
    pub predicate: TargetPredicate,
    pub bind_as: Option<String>,
    pub from: Option<String>,
    pub not: bool,
}

impl TargetCondition {
    pub fn new(predicate: TargetPredicate) -> Self {
        Self {
            predicate,
            bind_as: None,
            from: None,
            not: false,
        }
    }

    pub fn with_binding(mut self, bind_as: Option<String>, from: Option<String>) -> Self {
        self.bind_as = bind_as;
        self.from = from;
        self
    }
}

impl Serialize for TargetCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.predicate {
            TargetPredicate::JavaDependency(params) => {
                map.serialize_entry("java.dependency", params)?
            }
            TargetPredicate::FileContent(params) => map.serialize_entry("filecontent", params)?,
            TargetPredicate::JavaReferenced(params) => {
                map.serialize_entry("java.referenced", params)?
            }
            TargetPredicate::And(children) => map.serialize_entry("and", children)?,
            TargetPredicate::Or(children) => map.serialize_entry("or", children)?,
            TargetPredicate::Placeholder(name) => map.serialize_entry(name, &())?,
        }
        if let Some(bind_as) = &self.bind_as {
            map.serialize_entry("as", bind_as)?;
        }
        if let Some(from) = &self.from {
            map.serialize_entry("from", from)?;
        }
        if self.not {
            map.serialize_entry("not", &true)?;
        }
        map.end()
    }
}

/// The `when` clause of an analyzer rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum When {
    Condition(TargetCondition),
    Or { or: Vec<TargetCondition> },
}

/// One analyzer rule, identified by its source file and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedRule {
    #[serde(rename = "ruleID")]
    pub id: String,
    pub when: When,
}

/// One output document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RuleSet {
    pub rules: Vec<TranslatedRule>,
}
