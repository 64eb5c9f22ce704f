//! Directory-backed document source

use super::{DocumentSource, SourceDocument};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Reads every `*.json` file directly inside a directory.
///
/// Files are returned sorted by name so runs are reproducible. The match id
/// is the file stem (`1234567.json` -> `1234567`).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source for the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory being read
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl DocumentSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn documents(&self) -> Result<Vec<SourceDocument>> {
        if !self.root.is_dir() {
            return Err(Error::FileNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && is_json(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let id = path.file_stem()?.to_string_lossy().to_string();
                Some(SourceDocument::from_file(id, path))
            })
            .collect())
    }
}
