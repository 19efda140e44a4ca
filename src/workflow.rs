use crate::agents::{
    BARE_SUFFIX, GitClient, GitRefresher, ManifestParser, MirrorScannerAgent, RunSummary,
    UpdateRunner,
};
use crate::error::{MirmanError, Result};
use colored::Colorize;
use jiff::Zoned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Execute the sync workflow: refresh remote-tracking refs for every target
/// bare mirror and report aggregate counts.
pub fn execute_sync(targets: &[String], skip_repos: &[String]) -> Result<RunSummary> {
    println!("{}", "Syncing bare mirror repositories...".cyan().bold());

    println!("\n{}", "1. Checking Git environment...".yellow());
    GitClient::check_available()?;
    println!("{}", "✓ Git is available".green());

    println!("\n{}", "2. Resolving targets...".yellow());
    let scanner = MirrorScannerAgent::new(env::current_dir()?, skip_repos.iter().cloned());
    let resolved = scanner.resolve_sync_targets(targets)?;

    if resolved.is_empty() {
        println!(
            "{}",
            format!(
                "⚠ No mirror repositories found; mirror directory names must end with '{BARE_SUFFIX}'"
            )
            .yellow()
        );
        return Ok(RunSummary::default());
    }
    println!("{}", format!("✓ {} target(s) to sync", resolved.len()).green());

    println!("\n{}", "3. Refreshing remote-tracking refs...".yellow());
    let runner = UpdateRunner::new(GitRefresher);
    let summary = runner.run(&resolved);

    print_summary(&summary);
    Ok(summary)
}

/// Execute the init workflow: discover Git repositories under the current
/// directory (or take them from a manifest file) and create bare mirrors of
/// them under the mirror root.
pub fn execute_init(
    mirror_root: &str,
    manifest: Option<&str>,
    clean_old: bool,
    skip_dirs: &[String],
) -> Result<RunSummary> {
    println!("{}", "Creating bare mirror repositories...".cyan().bold());

    println!("\n{}", "1. Checking Git environment...".yellow());
    GitClient::check_available()?;
    println!("{}", "✓ Git is available".green());

    println!("\n{}", "2. Preparing mirror directory...".yellow());
    let repos_dir = Path::new(mirror_root).join("repos");
    if clean_old && repos_dir.exists() {
        println!(
            "{}",
            format!("⚠ Removing old mirrors under {}", repos_dir.display()).yellow()
        );
        fs::remove_dir_all(&repos_dir)?;
    }
    fs::create_dir_all(&repos_dir)?;
    println!(
        "{}",
        format!("✓ Mirror directory ready: {}", repos_dir.display()).green()
    );

    let sources: Vec<(String, PathBuf)> = if let Some(manifest_path) = manifest {
        println!("\n{}", "3. Parsing manifest projects...".yellow());
        let projects = ManifestParser::new(manifest_path).parse()?;
        if projects.is_empty() {
            return Err(MirmanError::MirrorValidation(format!(
                "No projects declared in '{manifest_path}'"
            )));
        }
        println!(
            "{}",
            format!("✓ {} projects declared", projects.len()).green()
        );
        projects
            .into_iter()
            .map(|project| {
                let path = project.local_path();
                (project.name, path)
            })
            .collect()
    } else {
        println!("\n{}", "3. Searching for source repositories...".yellow());
        let scanner = MirrorScannerAgent::new(env::current_dir()?, skip_dirs.iter().cloned());
        let repos = scanner.find_source_repos()?;
        if repos.is_empty() {
            return Err(MirmanError::MirrorValidation(
                "No Git repositories found under the current directory".to_string(),
            ));
        }
        println!(
            "{}",
            format!("✓ Found {} source repositories", repos.len()).green()
        );
        repos
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("repo")
                    .to_string();
                (name, path)
            })
            .collect()
    };

    println!("\n{}", "4. Creating mirrors...".yellow());
    let mut summary = RunSummary::default();
    for (index, (name, source)) in sources.iter().enumerate() {
        let dest = repos_dir.join(format!("{name}{BARE_SUFFIX}"));
        println!(
            "  [{}/{}] {} -> {}",
            index + 1,
            sources.len(),
            source.display(),
            dest.display()
        );

        if !source.join(".git").is_dir() {
            summary.record_failure();
            println!(
                "  {}",
                format!("✗ not a Git repository: {}", source.display()).red()
            );
            continue;
        }

        if dest.exists() {
            // Recreate from scratch; a stale partial mirror is worthless.
            if let Err(e) = fs::remove_dir_all(&dest) {
                println!(
                    "  {}",
                    format!("⚠ Cannot remove old mirror {}: {e}", dest.display()).yellow()
                );
            }
        }
        match GitClient::clone_mirror(source, &dest) {
            Ok(()) => {
                summary.record_success();
                println!("  {}", "✓ mirrored".green());
            }
            Err(e) => {
                summary.record_failure();
                println!("  {}", format!("✗ {e}").red());
            }
        }
    }

    print_summary(&summary);
    println!(
        "{}",
        format!("Mirrors stored under {}", repos_dir.display()).dimmed()
    );
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Run Summary:".cyan().bold());
    println!("  {} total", summary.total.to_string().yellow());
    println!("  {} succeeded", summary.success.to_string().green());
    println!("  {} failed", summary.failure.to_string().red());
    if summary.skipped > 0 {
        println!("  {} skipped", summary.skipped.to_string().yellow());
    }
    println!(
        "{}",
        format!(
            "Completed at {}",
            Zoned::now().strftime("%Y-%m-%d %H:%M:%S")
        )
        .dimmed()
    );
}
