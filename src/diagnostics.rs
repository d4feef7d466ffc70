use serde::Serialize;
use std::fmt;

/// Why a rule, leaf or file was degraded or dropped during a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reason {
    /// Leaf kind with no analyzer equivalent, emitted as a name-only condition
    Placeholder { predicate: &'static str },
    /// Element the loader does not recognize, dropped from the condition tree
    UnsupportedElement { name: String },
    /// `not` applied to an `and`/`or` condition as a whole unit
    NegatedCombinator { combinator: &'static str },
    /// `not` applied to a condition that was already negated
    NestedNegation,
    /// Combinator whose children all translated to nothing
    EmptyCombinator { combinator: &'static str },
    /// Rule without a `when` clause
    NoCondition,
    /// Rule whose condition translated to nothing
    EmptyTranslation,
    /// Source file that could not be loaded as a ruleset
    SourceSkipped { message: String },
    /// Output document that could not be written
    WriteFailed { path: String, message: String },
}

impl Reason {
    /// True when the reason means the whole rule was left out of the output.
    pub fn drops_rule(&self) -> bool {
        matches!(self, Reason::NoCondition | Reason::EmptyTranslation)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Placeholder { predicate } => write!(
                f,
                "unsupported predicate '{}' emitted as placeholder, needs manual completion",
                predicate
            ),
            Reason::UnsupportedElement { name } => write!(
                f,
                "unsupported element <{}> dropped, the rule may match more than intended",
                name
            ),
            Reason::NegatedCombinator { combinator } => write!(
                f,
                "negated '{}' condition cannot be pushed onto its leaves, review negation manually",
                combinator
            ),
            Reason::NestedNegation => write!(
                f,
                "double negation collapsed into a single 'not', review manually"
            ),
            Reason::EmptyCombinator { combinator } => write!(
                f,
                "'{}' with no translatable children was dropped",
                combinator
            ),
            Reason::NoCondition => write!(f, "rule skipped because it has no 'when' condition"),
            Reason::EmptyTranslation => write!(
                f,
                "rule skipped because its condition translated to nothing"
            ),
            Reason::SourceSkipped { message } => write!(f, "file skipped: {}", message),
            Reason::WriteFailed { path, message } => {
                write!(f, "skipping {} because of an error: {}", path, message)
            }
        }
    }
}

/// One human-readable, machine-inspectable record of a degrade path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    pub reason: Reason,
}

impl Diagnostic {
    pub fn for_file(source_file: impl Into<String>, reason: Reason) -> Self {
        Self {
            source_file: source_file.into(),
            rule_index: None,
            reason,
        }
    }

    pub fn for_rule(source_file: impl Into<String>, rule_index: usize, reason: Reason) -> Self {
        Self {
            source_file: source_file.into(),
            rule_index: Some(rule_index),
            reason,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule_index {
            Some(index) => write!(f, "{} rule #{}: {}", self.source_file, index, self.reason),
            None => write!(f, "{}: {}", self.source_file, self.reason),
        }
    }
}
