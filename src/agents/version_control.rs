use super::update_runner::RemoteRefresher;
use crate::error::{MirmanError, Result};
use std::path::Path;
use std::process::{Command, Output};

/// GitClient wraps the git executable for mirror maintenance operations.
pub struct GitClient;

impl GitClient {
    /// Verify the git executable is reachable on PATH.
    pub fn check_available() -> Result<()> {
        let output = Self::run_git(&["--version"], None)?;
        Self::ensure_success(&output, "git --version")
    }

    /// True when `path` holds a bare repository.
    pub fn is_bare_repository(path: &Path) -> Result<bool> {
        let output = Self::run_git(&["rev-parse", "--is-bare-repository"], Some(path))?;
        Self::ensure_success(&output, "git rev-parse")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    /// Best-effort origin URL of the repository at `path`, for progress
    /// lines only.
    pub fn remote_url(path: &Path) -> Option<String> {
        let output = Self::run_git(&["remote", "get-url", "origin"], Some(path)).ok()?;
        if !output.status.success() {
            return None;
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if url.is_empty() { None } else { Some(url) }
    }

    /// Mirror-clone `source` into `dest`.
    pub fn clone_mirror(source: &Path, dest: &Path) -> Result<()> {
        let source = source.to_string_lossy();
        let dest = dest.to_string_lossy();
        let output = Self::run_git(&["clone", "--mirror", &source, &dest], None)?;
        Self::ensure_success(&output, "git clone --mirror")
    }

    fn run_git(args: &[&str], cwd: Option<&Path>) -> Result<Output> {
        if std::env::var_os("MIRMAN_VERBOSE").is_some() {
            eprintln!("Executing: git {}", args.join(" "));
        }

        let mut command = Command::new("git");
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        command.args(args).output().map_err(|e| {
            MirmanError::GitOperation(format!(
                "Failed to execute git command '{}': {e}. Install Git and ensure it is on PATH",
                args.join(" ")
            ))
        })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(MirmanError::GitOperation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr)
        )))
    }
}

/// Production refresher: runs `git remote update` in the current working
/// directory, after confirming it is a bare repository.
pub struct GitRefresher;

impl RemoteRefresher for GitRefresher {
    fn refresh_remotes(&self) -> Result<()> {
        if !GitClient::is_bare_repository(Path::new("."))? {
            return Err(MirmanError::GitOperation(
                "not a bare repository".to_string(),
            ));
        }

        let output = GitClient::run_git(&["remote", "update"], None)?;
        GitClient::ensure_success(&output, "git remote update")
    }

    fn remote_source(&self) -> Option<String> {
        GitClient::remote_url(Path::new("."))
    }
}
