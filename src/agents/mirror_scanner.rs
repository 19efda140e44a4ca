use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::update_runner::has_bare_suffix;

/// MirrorScannerAgent discovers repositories on disk.
pub struct MirrorScannerAgent {
    root: PathBuf,
    skip: HashSet<String>,
}

impl MirrorScannerAgent {
    pub fn new<P: AsRef<Path>>(root: P, skip: impl IntoIterator<Item = String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            skip: skip.into_iter().collect(),
        }
    }

    /// Immediate subdirectories of the root whose names carry the bare
    /// suffix, in sorted name order.
    pub fn scan_mirrors(&self) -> Result<Vec<PathBuf>> {
        let mut mirrors = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || self.is_skipped(&path) {
                continue;
            }
            if has_bare_suffix(&path) {
                mirrors.push(path);
            }
        }

        mirrors.sort();
        Ok(mirrors)
    }

    /// Resolve the sync target list: explicit arguments verbatim (in the
    /// given order, minus skipped names), otherwise the mirror scan. The two
    /// sources are never merged.
    pub fn resolve_sync_targets(&self, explicit: &[String]) -> Result<Vec<PathBuf>> {
        if explicit.is_empty() {
            return self.scan_mirrors();
        }

        Ok(explicit
            .iter()
            .map(PathBuf::from)
            .filter(|path| !self.is_skipped(path))
            .collect())
    }

    /// Recursively collect directories containing a `.git` subdirectory.
    /// Recursion stops at each repository found.
    pub fn find_source_repos(&self) -> Result<Vec<PathBuf>> {
        let mut repos = Vec::new();
        self.walk(&self.root, &mut repos)?;
        Ok(repos)
    }

    pub fn is_skipped(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.skip.contains(name))
    }

    fn walk(&self, dir: &Path, repos: &mut Vec<PathBuf>) -> Result<()> {
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            }
        }
        subdirs.sort();

        for path in subdirs {
            if self.is_skipped(&path) {
                continue;
            }
            if path.join(".git").is_dir() {
                repos.push(path);
                continue;
            }
            self.walk(&path, repos)?;
        }

        Ok(())
    }
}
