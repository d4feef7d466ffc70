use crate::diagnostics::{Diagnostic, Reason};
use crate::source::xml::{parse_document, Element};
use crate::source::{
    Dependency, FileContent, JavaClass, Marker, SourceCondition, SourceRule, SourceRuleset,
};
use std::fs::DirEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the windup checkout that holds the rulesets.
pub const RULES_DIR: &str = "rules";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document ended inside <{0}>")]
    Unclosed(String),

    #[error("document is empty")]
    Empty,

    #[error("not a ruleset (root element is <{0}>)")]
    NotARuleset(String),
}

/// Everything the loader found, plus the files it had to skip.
#[derive(Debug, Default)]
pub struct Loaded {
    pub rulesets: Vec<SourceRuleset>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse one ruleset document.
pub fn parse_ruleset(xml: &str, source_file: &str) -> Result<SourceRuleset, LoadError> {
    let root = parse_document(xml)?;
    if root.name != "ruleset" && root.name != "rule-set" {
        return Err(LoadError::NotARuleset(root.name));
    }

    let rules = root
        .child("rules")
        .map(|rules| {
            rules
                .children_named("rule")
                .map(parse_rule)
                .collect()
        })
        .unwrap_or_default();

    Ok(SourceRuleset {
        source_file: source_file.to_string(),
        rules,
    })
}

fn parse_rule(rule: &Element) -> SourceRule {
    let when = rule.child("when").and_then(|when| {
        let mut conditions = parse_children(when);
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            // sibling clauses under <when> are alternatives
            _ => Some(SourceCondition::Or(conditions)),
        }
    });

    SourceRule {
        id: rule.non_empty_attr("id"),
        when,
    }
}

fn parse_children(element: &Element) -> Vec<SourceCondition> {
    element.children.iter().map(parse_condition).collect()
}

/// Map one element to a condition. Anything without a mapping, including a
/// `<project>` with no `<artifact>`, is kept as [`SourceCondition::Unsupported`].
fn parse_condition(element: &Element) -> SourceCondition {
    match element.name.as_str() {
        "and" => SourceCondition::And(parse_children(element)),
        "or" => SourceCondition::Or(parse_children(element)),
        "not" => SourceCondition::Not(parse_children(element)),
        "project" => match element.child("artifact") {
            Some(artifact) => SourceCondition::Dependency(parse_dependency(artifact)),
            None => SourceCondition::Unsupported("project".to_string()),
        },
        "dependency" => SourceCondition::Dependency(parse_dependency(element)),
        "filecontent" => SourceCondition::FileContent(FileContent {
            pattern: element.attr("pattern").unwrap_or_default().to_string(),
            filename: element.non_empty_attr("filename"),
            bind_as: element.non_empty_attr("as"),
            from: element.non_empty_attr("from"),
        }),
        "javaclass" => SourceCondition::JavaClass(JavaClass {
            references: element.attr("references").unwrap_or_default().to_string(),
            locations: element
                .children_named("location")
                .map(|l| l.text.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            bind_as: element.non_empty_attr("as"),
            from: element.non_empty_attr("from"),
        }),
        name => match Marker::from_element(name) {
            Some(marker) => SourceCondition::Marker(marker),
            None => SourceCondition::Unsupported(name.to_string()),
        },
    }
}

fn parse_dependency(element: &Element) -> Dependency {
    Dependency {
        group_id: element.attr("groupId").unwrap_or_default().to_string(),
        artifact_id: element.attr("artifactId").unwrap_or_default().to_string(),
        from_version: element.non_empty_attr("fromVersion"),
        to_version: element.non_empty_attr("toVersion"),
    }
}

/// Logical identifier of a file: its path relative to `root`, behind `source_prefix`.
pub fn source_identifier(root: &Path, path: &Path, source_prefix: &str) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if source_prefix.is_empty() || source_prefix.ends_with('/') {
        format!("{}{}", source_prefix, relative)
    } else {
        format!("{}/{}", source_prefix, relative)
    }
}

fn read_entries(dir: &Path) -> Result<Vec<DirEntry>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::read_dir(dir)
        .map_err(io_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)
}

/// Directories that could not be read, with the error that stopped each.
type Unreadable = Vec<(PathBuf, LoadError)>;

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>, unreadable: &mut Unreadable) {
    match read_entries(dir) {
        Ok(entries) => collect_entries(entries, files, unreadable),
        Err(e) => unreadable.push((dir.to_path_buf(), e)),
    }
}

// Symlinked directories are not followed, so a link cycle cannot recurse.
fn collect_entries(entries: Vec<DirEntry>, files: &mut Vec<PathBuf>, unreadable: &mut Unreadable) {
    for entry in entries {
        let path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => collect_dir(&path, files, unreadable),
            Ok(file_type) if file_type.is_symlink() && path.is_dir() => {
                tracing::debug!("Not following directory link {}", path.display());
            }
            Ok(_) => files.push(path),
            Err(source) => unreadable.push((path.clone(), LoadError::Io { path, source })),
        }
    }
}

/// Walk `<root>/rules/` and parse every XML ruleset found, in path order.
///
/// Only a missing or unreadable rules directory is an error; nested
/// directories and files that cannot be loaded are reported as diagnostics
/// and skipped.
pub fn load_rulesets(root: &Path, source_prefix: &str) -> Result<Loaded, LoadError> {
    let entries = read_entries(&root.join(RULES_DIR))?;
    let mut files = Vec::new();
    let mut unreadable = Vec::new();
    collect_entries(entries, &mut files, &mut unreadable);
    files.sort();

    let mut loaded = Loaded::default();
    for (dir, e) in unreadable {
        loaded.diagnostics.push(Diagnostic::for_file(
            source_identifier(root, &dir, source_prefix),
            Reason::SourceSkipped {
                message: e.to_string(),
            },
        ));
    }
    for path in files {
        if path.extension().and_then(|e| e.to_str()) != Some("xml") {
            tracing::debug!("Skipping {} because it is not a ruleset", path.display());
            continue;
        }
        let source_file = source_identifier(root, &path, source_prefix);

        let result = std::fs::read_to_string(&path)
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })
            .and_then(|xml| parse_ruleset(&xml, &source_file));

        match result {
            Ok(ruleset) => {
                tracing::debug!(
                    "Loaded {} rules from {}",
                    ruleset.rules.len(),
                    path.display()
                );
                loaded.rulesets.push(ruleset);
            }
            Err(e) => loaded.diagnostics.push(Diagnostic::for_file(
                source_file,
                Reason::SourceSkipped {
                    message: e.to_string(),
                },
            )),
        }
    }

    Ok(loaded)
}
