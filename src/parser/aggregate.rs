//! Multi-file aggregation: one Module per input file, keyed by name.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ScanError;
use crate::model::Module;
use crate::parser::builder::{scan_file, ScanOptions};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A diagnostic together with the file it came from.
#[derive(Debug)]
pub struct FileDiagnostic {
    pub path: PathBuf,
    pub diagnostic: Diagnostic,
}

/// Result of scanning a batch of files.
#[derive(Debug, Default)]
pub struct Batch {
    /// In input order. A later module with the same name replaces the
    /// earlier one in place.
    pub modules: IndexMap<String, Module>,
    pub diagnostics: Vec<FileDiagnostic>,
    /// Files whose scan aborted
    pub failures: Vec<(PathBuf, ScanError)>,
}

/// Scan every path. A fatal error aborts only that file.
pub fn scan_files(paths: &[PathBuf], options: &ScanOptions) -> Batch {
    let mut batch = Batch::default();

    for path in paths {
        debug!("scanning {}", path.display());
        let mut diags = Diagnostics::default();
        let result = scan_file(path, options, &mut diags);

        collect(&mut batch, path, diags);
        match result {
            Ok(module) => {
                let name = module.name.clone();
                if batch.modules.insert(name.clone(), module).is_some() {
                    batch.diagnostics.push(FileDiagnostic {
                        path: path.clone(),
                        diagnostic: Diagnostic::ModuleCollision { module: name },
                    });
                }
            }
            Err(e) => batch.failures.push((path.clone(), e)),
        }
    }

    batch
}

fn collect(batch: &mut Batch, path: &Path, diags: Diagnostics) {
    batch
        .diagnostics
        .extend(diags.into_vec().into_iter().map(|diagnostic| FileDiagnostic {
            path: path.to_path_buf(),
            diagnostic,
        }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn modules_keyed_by_file_stem() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "iri.h", "/** @name: ta_iri_free */\nvoid ta_iri_free (void *p);");
        let b = write(&dir, "log.h", "typedef struct _ta_log ta_log_t;");

        let batch = scan_files(&[a, b], &ScanOptions::default());
        let names: Vec<_> = batch.modules.keys().cloned().collect();
        assert_eq!(names, vec!["iri", "log"]);
        assert!(batch.failures.is_empty());
        assert!(batch.diagnostics.is_empty());
    }

    #[test]
    fn collision_warns_and_last_wins() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a/log.h", "typedef struct _first first_t;");
        let b = write(&dir, "b/log.h", "typedef struct _second second_t;");

        let batch = scan_files(&[a, b.clone()], &ScanOptions::default());
        assert_eq!(batch.modules.len(), 1);
        assert!(batch.modules["log"].types.contains_key("second"));
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(batch.diagnostics[0].path, b);
        assert_eq!(
            batch.diagnostics[0].diagnostic,
            Diagnostic::ModuleCollision {
                module: "log".to_string()
            }
        );
    }

    #[test]
    fn fatal_error_skips_only_that_file() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.h", "/** @name: ta_nope::run */\nvoid ta_nope_run (void);");
        let good = write(&dir, "good.h", "typedef struct _ta_ok ta_ok_t;");

        let batch = scan_files(&[bad.clone(), good], &ScanOptions::default());
        assert_eq!(batch.modules.keys().collect::<Vec<_>>(), vec!["good"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, bad);
    }

    #[test]
    fn missing_file_is_a_failure() {
        let batch = scan_files(&[PathBuf::from("/nonexistent/x.h")], &ScanOptions::default());
        assert!(matches!(batch.failures[0].1, ScanError::Io(..)));
    }
}
