//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::DEFAULT_RENDER_DEPTH;

/// Course catalog planner: load a course list, print it in order, search it
#[derive(Parser, Debug)]
#[command(name = "coursecat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .coursecat.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print all courses in course-number order
    List {
        /// Catalog CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Look up one course (exit code 1 if not found)
    Search {
        /// Catalog CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Course number, case-sensitive
        number: String,
    },

    /// Show the search tree shape
    Tree {
        /// Catalog CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Levels to draw before collapsing a subtree
        #[arg(long, default_value_t = DEFAULT_RENDER_DEPTH)]
        depth: usize,
    },

    /// Interactive menu (default when no command is given)
    Menu {
        /// Catalog to load before the first prompt
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
