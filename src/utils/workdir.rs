use crate::error::{MirmanError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Scoped change of the process working directory. The previous directory is
/// restored when the guard drops, including on early returns and panics.
pub struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    /// Enter `target`. On error the working directory is left untouched.
    pub fn enter(target: &Path) -> Result<Self> {
        let previous = env::current_dir().map_err(|e| {
            MirmanError::WorkingDir(format!("Cannot determine current directory: {e}"))
        })?;

        env::set_current_dir(target).map_err(|e| {
            MirmanError::WorkingDir(format!("Cannot enter '{}': {e}", target.display()))
        })?;

        Ok(Self { previous })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        // Nothing useful can be done if restoration itself fails.
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn cwd_lock() -> &'static std::sync::Mutex<()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}
