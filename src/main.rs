mod agents;
mod cli;
mod error;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("MIRMAN_VERBOSE", "1");
        }
    }

    let result = match cli.command {
        Commands::Sync {
            targets,
            skip_repos,
        } => workflow::execute_sync(&targets, &skip_repos),
        Commands::Init {
            mirror_root,
            manifest,
            clean_old,
            skip_dirs,
        } => workflow::execute_init(&mirror_root, manifest.as_deref(), clean_old, &skip_dirs),
    };

    match result {
        Ok(summary) if summary.failure > 0 => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(2);
        }
    }
}
