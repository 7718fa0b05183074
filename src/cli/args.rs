//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::TieBreak;

/// Extract neighbor names from a phylogenetic tree around the MRCA of target leaves
#[derive(Parser, Debug)]
#[command(name = "exnn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .exnn.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the MRCA of all targets and the MRCA of the majority of targets
    Pivots {
        /// Tree in Newick format
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
        /// Newline-separated target names
        #[arg(value_hint = ValueHint::FilePath)]
        targets: PathBuf,
        /// Child to follow on equal votes (overrides config)
        #[arg(long, value_name = "first|second")]
        tie_break: Option<TieBreak>,
    },

    /// Cut clades and write the remaining leaf names
    Extract {
        /// Tree in Newick format
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
        /// Newline-separated target names
        #[arg(value_hint = ValueHint::FilePath)]
        targets: PathBuf,
        /// Output file for newline-separated neighbor names
        #[arg(value_hint = ValueHint::FilePath)]
        neighbors: PathBuf,
        /// Cut the clade at the MRCA of these comma-separated leaves (repeatable)
        #[arg(long = "cut", value_name = "NAMES")]
        cuts: Vec<String>,
        /// Also write the pruned tree in Newick format
        #[arg(long, value_hint = ValueHint::FilePath)]
        tree_out: Option<PathBuf>,
        /// Child to follow on equal votes (overrides config)
        #[arg(long, value_name = "first|second")]
        tie_break: Option<TieBreak>,
    },

    /// List the leaf names of a tree
    Leaves {
        /// Tree in Newick format
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
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
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
