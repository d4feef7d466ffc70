//! Typed model of windup XML rulesets, as produced by the loader.

pub mod loader;
pub mod xml;

use serde::Serialize;

/// One node of a windup `when` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCondition {
    And(Vec<SourceCondition>),
    Or(Vec<SourceCondition>),
    Not(Vec<SourceCondition>),
    /// `<dependency>` or `<project><artifact/></project>`
    Dependency(Dependency),
    FileContent(FileContent),
    JavaClass(JavaClass),
    Marker(Marker),
    /// Element the loader could not map, kept by name so the drop is reported
    Unsupported(String),
}

/// Maven coordinates with an optional version range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_version: Option<String>,
}

/// `<filecontent>`: a pattern searched in files, optionally narrowed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FileContent {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub bind_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// `<javaclass>`: a type reference pattern and the locations it may appear in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct JavaClass {
    pub references: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub bind_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Windup conditions that are recognized but carry nothing the analyzer can use yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    XmlFile,
    File,
    FileExists,
    True,
    False,
    ClassificationExists,
    HintExists,
    LineItemExists,
    TechnologyStatisticsExists,
    TechnologyTagExists,
    IterableFilter,
    ToFileModel,
}

impl Marker {
    pub const ALL: [Marker; 12] = [
        Marker::XmlFile,
        Marker::File,
        Marker::FileExists,
        Marker::True,
        Marker::False,
        Marker::ClassificationExists,
        Marker::HintExists,
        Marker::LineItemExists,
        Marker::TechnologyStatisticsExists,
        Marker::TechnologyTagExists,
        Marker::IterableFilter,
        Marker::ToFileModel,
    ];

    /// Predicate name used for the placeholder condition in analyzer output.
    pub fn predicate(self) -> &'static str {
        match self {
            Marker::XmlFile => "xmlfile",
            Marker::File => "file",
            Marker::FileExists => "file-exists",
            Marker::True => "true",
            Marker::False => "false",
            Marker::ClassificationExists => "classification-exists",
            Marker::HintExists => "hint-exists",
            Marker::LineItemExists => "lineitem-exists",
            Marker::TechnologyStatisticsExists => "technology-statistics-exists",
            Marker::TechnologyTagExists => "technology-tag-exists",
            Marker::IterableFilter => "iterable-filter",
            Marker::ToFileModel => "tofilemodel",
        }
    }

    /// Look up a marker by its windup element name.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "fileexists" => Some(Marker::FileExists),
            _ => Marker::ALL.into_iter().find(|m| m.predicate() == name),
        }
    }
}

impl SourceCondition {
    pub fn dependency(group_id: &str, artifact_id: &str) -> Self {
        SourceCondition::Dependency(Dependency {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            ..Default::default()
        })
    }

    pub fn java_class(references: &str, locations: &[&str]) -> Self {
        SourceCondition::JavaClass(JavaClass {
            references: references.to_string(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        })
    }

    pub fn file_content(pattern: &str) -> Self {
        SourceCondition::FileContent(FileContent {
            pattern: pattern.to_string(),
            ..Default::default()
        })
    }
}

/// One `<rule>` of a ruleset. Only the condition side is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<SourceCondition>,
}

/// One parsed ruleset file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceRuleset {
    /// Stable logical identifier, e.g. the upstream URL of the file
    pub source_file: String,
    pub rules: Vec<SourceRule>,
}
