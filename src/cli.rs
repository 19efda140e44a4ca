use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "mirman",
    about = "Mirror Manager - A tool to maintain local bare Git mirror repositories",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh remote-tracking refs for bare mirror repositories
    Sync {
        /// Mirror directories to sync (default: scan the current directory for *.git)
        #[arg(value_name = "TARGET")]
        targets: Vec<String>,

        /// Mirror names to exclude from the run
        #[arg(long = "skip-repo", value_name = "NAME")]
        skip_repos: Vec<String>,
    },

    /// Create bare mirrors of Git repositories found under the current directory
    Init {
        /// Directory the mirrors are created under
        #[arg(long, default_value = "mirrors", value_name = "DIR")]
        mirror_root: String,

        /// Manifest file declaring the projects to mirror (instead of scanning)
        #[arg(long, value_name = "FILE")]
        manifest: Option<String>,

        /// Delete the existing repos directory before mirroring
        #[arg(long)]
        clean_old: bool,

        /// Directory names to prune while searching for source repositories
        #[arg(
            long = "skip-dir",
            value_name = "NAME",
            default_values_t = [
                ".git".to_string(),
                ".west".to_string(),
                "build".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ]
        )]
        skip_dirs: Vec<String>,
    },
}
