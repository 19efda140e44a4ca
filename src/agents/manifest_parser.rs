use crate::error::{MirmanError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// ManifestParser reads a west-style YAML manifest and extracts the declared
/// projects (mirror name plus local checkout path).
pub struct ManifestParser {
    manifest_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    manifest: Manifest,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    projects: Vec<ManifestProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestProject {
    pub name: String,
    #[serde(default)]
    path: Option<String>,
}

impl ManifestProject {
    /// Local checkout path; projects without an explicit path live under
    /// their own name.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.path.as_deref().unwrap_or(&self.name))
    }
}

impl ManifestParser {
    pub fn new<P: AsRef<Path>>(manifest_path: P) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(&self) -> Result<Vec<ManifestProject>> {
        let content = fs::read_to_string(&self.manifest_path).map_err(|e| {
            MirmanError::ManifestParsing(format!(
                "Failed to read '{}': {e}",
                self.manifest_path.display()
            ))
        })?;

        let file: ManifestFile = serde_yaml::from_str(&content).map_err(|e| {
            MirmanError::ManifestParsing(format!(
                "Failed to parse '{}': {e}",
                self.manifest_path.display()
            ))
        })?;

        Ok(file.manifest.projects)
    }
}
