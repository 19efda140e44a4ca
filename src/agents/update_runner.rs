use crate::error::Result;
use crate::utils::workdir::WorkdirGuard;
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Directory suffix marking a bare mirror repository.
pub const BARE_SUFFIX: &str = ".git";

/// Refreshes all remote-tracking refs for the repository in the current
/// working directory.
pub trait RemoteRefresher {
    fn refresh_remotes(&self) -> Result<()>;

    /// Human-readable origin of the repository in the current working
    /// directory, for progress lines. Best-effort.
    fn remote_source(&self) -> Option<String> {
        None
    }
}

impl<R: RemoteRefresher> RemoteRefresher for &R {
    fn refresh_remotes(&self) -> Result<()> {
        (**self).refresh_remotes()
    }

    fn remote_source(&self) -> Option<String> {
        (**self).remote_source()
    }
}

/// Per-target classification after validation and the update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Synced,
    WrongSuffix,
    Missing,
    NotADirectory,
    EnterFailed,
    UpdateFailed,
}

impl TargetOutcome {
    fn label(self) -> ColoredString {
        match self {
            Self::Synced => "synced".green(),
            Self::WrongSuffix => {
                format!("skipped (name does not end with '{BARE_SUFFIX}')").yellow()
            }
            Self::Missing => "failed (path does not exist)".red(),
            Self::NotADirectory => "failed (not a directory)".red(),
            Self::EnterFailed => "failed (cannot enter directory)".red(),
            Self::UpdateFailed => "failed (remote update returned non-zero)".red(),
        }
    }
}

/// Aggregate counters for one run. Invariant: total = success + failure + skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: TargetOutcome) {
        match outcome {
            TargetOutcome::Synced => self.record_success(),
            TargetOutcome::WrongSuffix => self.record_skip(),
            TargetOutcome::Missing
            | TargetOutcome::NotADirectory
            | TargetOutcome::EnterFailed
            | TargetOutcome::UpdateFailed => self.record_failure(),
        }
    }

    pub fn record_success(&mut self) {
        self.total += 1;
        self.success += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failure += 1;
    }

    pub fn record_skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }
}

/// UpdateRunner processes a batch of mirror targets: validates each one,
/// invokes the refresher against it, and accumulates outcome counts.
pub struct UpdateRunner<R: RemoteRefresher> {
    refresher: R,
}

impl<R: RemoteRefresher> UpdateRunner<R> {
    pub fn new(refresher: R) -> Self {
        Self { refresher }
    }

    /// Process every target, one at a time, in the given order. Per-target
    /// errors are classified and counted, never propagated.
    pub fn run(&self, targets: &[impl AsRef<Path>]) -> RunSummary {
        let mut summary = RunSummary::default();

        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        for (index, target) in targets.iter().enumerate() {
            let target = target.as_ref();
            pb.set_message(format!("Syncing {}", target.display()));

            let (outcome, origin) = self.process_target(target);
            let origin = origin
                .map(|url| format!(" (from {url})"))
                .unwrap_or_default();
            pb.println(format!(
                "  [{}/{}] {}{} ... {}",
                index + 1,
                targets.len(),
                target.display(),
                origin.dimmed(),
                outcome.label()
            ));

            summary.record(outcome);
            pb.inc(1);
        }

        pb.finish_and_clear();
        summary
    }

    fn process_target(&self, target: &Path) -> (TargetOutcome, Option<String>) {
        if !has_bare_suffix(target) {
            return (TargetOutcome::WrongSuffix, None);
        }
        if !target.exists() {
            return (TargetOutcome::Missing, None);
        }
        if !target.is_dir() {
            return (TargetOutcome::NotADirectory, None);
        }

        // The guard restores the previous working directory when it drops,
        // even if the refresh errors. If entering fails there is nothing to
        // restore and the refresher is never invoked.
        let guard = match WorkdirGuard::enter(target) {
            Ok(guard) => guard,
            Err(_) => return (TargetOutcome::EnterFailed, None),
        };

        let origin = self.refresher.remote_source();
        let outcome = match self.refresher.refresh_remotes() {
            Ok(()) => TargetOutcome::Synced,
            Err(_) => TargetOutcome::UpdateFailed,
        };
        drop(guard);
        (outcome, origin)
    }
}

pub fn has_bare_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(BARE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::mirror_scanner::MirrorScannerAgent;
    use crate::error::MirmanError;
    use crate::utils::workdir::cwd_lock;
    use std::cell::RefCell;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Scripted refresher; results are consumed FIFO, then Ok.
    struct ScriptedRefresher {
        results: RefCell<Vec<Result<()>>>,
        calls: RefCell<usize>,
        source_calls: RefCell<usize>,
    }

    impl ScriptedRefresher {
        fn new(results: Vec<Result<()>>) -> Self {
            Self {
                results: RefCell::new(results),
                calls: RefCell::new(0),
                source_calls: RefCell::new(0),
            }
        }

        fn always_ok() -> Self {
            Self::new(Vec::new())
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }

        fn source_calls(&self) -> usize {
            *self.source_calls.borrow()
        }
    }

    impl RemoteRefresher for ScriptedRefresher {
        fn refresh_remotes(&self) -> Result<()> {
            *self.calls.borrow_mut() += 1;
            let mut results = self.results.borrow_mut();
            if results.is_empty() {
                Ok(())
            } else {
                results.remove(0)
            }
        }

        fn remote_source(&self) -> Option<String> {
            *self.source_calls.borrow_mut() += 1;
            Some("https://example.invalid/mirror.git".to_string())
        }
    }

    fn update_failure() -> Result<()> {
        Err(MirmanError::GitOperation(
            "git remote update failed: exit status 1".to_string(),
        ))
    }

    #[test]
    fn valid_mirror_counts_success() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo1.git");
        fs::create_dir(&repo).unwrap();

        let refresher = ScriptedRefresher::always_ok();
        let summary = UpdateRunner::new(&refresher).run(&[repo]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.failure, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(refresher.calls(), 1);
    }

    #[test]
    fn missing_target_counts_failure_without_update_attempt() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.git");

        let refresher = ScriptedRefresher::always_ok();
        let summary = UpdateRunner::new(&refresher).run(&[missing]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 0);
        assert_eq!(summary.failure, 1);
        assert_eq!(refresher.calls(), 0);
    }

    #[test]
    fn wrong_suffix_is_skipped_and_leaves_counters_untouched() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let plain = dir.path().join("notsuffix");
        fs::create_dir(&plain).unwrap();

        let refresher = ScriptedRefresher::always_ok();
        let summary = UpdateRunner::new(&refresher).run(&[plain]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 0);
        assert_eq!(summary.failure, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(refresher.calls(), 0);
    }

    #[test]
    fn file_with_bare_suffix_counts_failure() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.git");
        fs::write(&file, "not a directory").unwrap();

        let refresher = ScriptedRefresher::always_ok();
        let summary = UpdateRunner::new(&refresher).run(&[file]);

        assert_eq!(summary.failure, 1);
        assert_eq!(refresher.calls(), 0);
    }

    #[test]
    fn failing_update_counts_failure() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo2.git");
        fs::create_dir(&repo).unwrap();

        let refresher = ScriptedRefresher::new(vec![update_failure()]);
        let summary = UpdateRunner::new(&refresher).run(&[repo]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 0);
        assert_eq!(summary.failure, 1);
        assert_eq!(refresher.calls(), 1);
    }

    #[test]
    fn mixed_batch_preserves_counter_invariant_and_order() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let good = dir.path().join("a.git");
        let bad = dir.path().join("b.git");
        fs::create_dir(&good).unwrap();
        fs::create_dir(&bad).unwrap();

        let targets: Vec<PathBuf> = vec![
            good,
            dir.path().join("missing.git"),
            dir.path().join("plain"),
            bad,
        ];

        let refresher = ScriptedRefresher::new(vec![Ok(()), update_failure()]);
        let summary = UpdateRunner::new(&refresher).run(&targets);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.failure, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total, summary.success + summary.failure + summary.skipped);
        // Only the two validated targets reached the refresher.
        assert_eq!(refresher.calls(), 2);
    }

    #[test]
    fn remote_source_is_queried_only_for_validated_targets() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo.git");
        fs::create_dir(&repo).unwrap();

        let refresher = ScriptedRefresher::always_ok();
        UpdateRunner::new(&refresher).run(&[repo, dir.path().join("missing.git")]);

        assert_eq!(refresher.source_calls(), 1);
    }

    #[test]
    fn explicitly_supplied_target_in_skip_set_never_reaches_the_runner() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a.git")).unwrap();
        fs::create_dir(dir.path().join("b.git")).unwrap();

        let scanner = MirrorScannerAgent::new(dir.path(), vec!["b.git".to_string()]);
        let explicit = vec![
            dir.path().join("a.git").display().to_string(),
            dir.path().join("b.git").display().to_string(),
        ];
        let targets = scanner.resolve_sync_targets(&explicit).unwrap();
        assert_eq!(targets, vec![dir.path().join("a.git")]);

        let refresher = ScriptedRefresher::always_ok();
        let summary = UpdateRunner::new(&refresher).run(&targets);

        // The skipped name touches no counter at all.
        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.failure, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(refresher.calls(), 1);
    }

    #[test]
    fn record_helpers_keep_the_counter_invariant() {
        let mut summary = RunSummary::default();
        summary.record_success();
        summary.record_failure();
        summary.record_skip();

        assert_eq!(summary.total, 3);
        assert_eq!(
            (summary.success, summary.failure, summary.skipped),
            (1, 1, 1)
        );
        assert_eq!(
            summary.total,
            summary.success + summary.failure + summary.skipped
        );
    }

    #[test]
    fn working_directory_is_restored_after_the_run() {
        let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo.git");
        fs::create_dir(&repo).unwrap();

        let refresher = ScriptedRefresher::new(vec![update_failure()]);
        UpdateRunner::new(&refresher).run(&[repo]);

        assert_eq!(env::current_dir().unwrap(), before);
    }
}
