use crate::diagnostics::{Diagnostic, Reason};
use crate::source::SourceRuleset;
use crate::target::RuleSet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize YAML: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render documents as one YAML stream, `---` between documents.
pub fn render_documents<T: Serialize>(documents: &[T]) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&serde_yaml::to_string(document)?);
    }
    Ok(out)
}

/// Write a YAML stream to `path`, creating parent directories and truncating
/// any previous content. Nothing is written when serialization fails.
pub fn write_yaml_file<T: Serialize>(path: &Path, documents: &[T]) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = render_documents(documents)?;
    std::fs::write(path, content).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every destination document. A failing destination is reported and
/// skipped; the rest are still written.
pub fn write_outputs(outputs: &BTreeMap<String, Vec<RuleSet>>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (path, rulesets) in outputs {
        match write_yaml_file(Path::new(path), rulesets) {
            Ok(()) => tracing::info!("Wrote {} ruleset(s) to {}", rulesets.len(), path),
            Err(e) => diagnostics.push(Diagnostic::for_file(
                path.clone(),
                Reason::WriteFailed {
                    path: path.clone(),
                    message: e.to_string(),
                },
            )),
        }
    }
    diagnostics
}

/// Mirror the parsed source rulesets as YAML under `dir`, one file per
/// source file, for inspecting what the loader understood.
pub fn write_source_dump(
    rulesets: &[SourceRuleset],
    source_prefix: &str,
    dir: &Path,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for ruleset in rulesets {
        let relative = ruleset
            .source_file
            .strip_prefix(source_prefix)
            .unwrap_or(&ruleset.source_file)
            .trim_start_matches('/');
        let relative = relative.strip_suffix(".xml").unwrap_or(relative);
        let path = dir.join(format!("{}.yaml", relative));

        if let Err(e) = write_yaml_file(&path, std::slice::from_ref(ruleset)) {
            diagnostics.push(Diagnostic::for_file(
                ruleset.source_file.clone(),
                Reason::WriteFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                },
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRule;
    use tempfile::TempDir;

    #[test]
    fn test_render_multiple_documents() {
        let rendered = render_documents(&[RuleSet::default(), RuleSet::default()]).unwrap();
        assert_eq!(rendered, "rules: []\n---\nrules: []\n");
    }

    #[test]
    fn test_write_outputs_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c.yaml").display().to_string();
        let mut outputs = BTreeMap::new();
        outputs.insert(path.clone(), vec![RuleSet::default()]);

        let diagnostics = write_outputs(&outputs);
        assert!(diagnostics.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "rules: []\n");
    }

    #[test]
    fn test_write_failure_does_not_stop_other_outputs() {
        let temp = TempDir::new().unwrap();
        // a regular file where a directory is needed
        let blocker = temp.path().join("blocked");
        std::fs::write(&blocker, "x").unwrap();

        let bad = blocker.join("out.yaml").display().to_string();
        let good = temp.path().join("ok/out.yaml").display().to_string();
        let mut outputs = BTreeMap::new();
        outputs.insert(bad.clone(), vec![RuleSet::default()]);
        outputs.insert(good.clone(), vec![RuleSet::default()]);

        let diagnostics = write_outputs(&outputs);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].source_file, bad);
        assert!(matches!(diagnostics[0].reason, Reason::WriteFailed { .. }));
        assert!(Path::new(&good).exists());
    }

    #[test]
    fn test_source_dump_paths() {
        let temp = TempDir::new().unwrap();
        let rulesets = vec![SourceRuleset {
            source_file: "http://x/tree/master/rules/a/b.windup.xml".to_string(),
            rules: vec![SourceRule::default()],
        }];

        let diagnostics = write_source_dump(&rulesets, "http://x/tree/master/", temp.path());
        assert!(diagnostics.is_empty());
        let dumped = temp.path().join("rules/a/b.windup.yaml");
        let content = std::fs::read_to_string(dumped).unwrap();
        assert!(content.contains("source_file: http://x/tree/master/rules/a/b.windup.xml"));
    }
}
