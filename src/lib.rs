pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod source;
pub mod target;
pub mod translate;

// Public API
pub use config::ConverterConfig;
pub use diagnostics::{Diagnostic, Reason};
pub use source::loader::{load_rulesets, parse_ruleset, LoadError};
pub use source::{SourceCondition, SourceRule, SourceRuleset};
pub use target::{RuleSet, TargetCondition, TargetPredicate, TranslatedRule, When};
pub use translate::assemble::{
    assemble, convert, group_by_destination, Conversion, Destination,
};
pub use translate::{translate, translate_with_issues, Translation};
