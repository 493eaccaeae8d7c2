//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::services::ConflictPolicy;

/// Turn declarative directory descriptions into trees, READMEs and documents
#[derive(Parser, Debug)]
#[command(name = "dirtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (TOML), layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where a tree comes from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory to scan, or JSON/YAML document
    #[arg(value_hint = ValueHint::AnyPath)]
    pub source: PathBuf,

    /// Top-level key to read (required for documents)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Only use the sub-tree at this slash-separated path below the root
    #[arg(short, long, value_name = "PATH")]
    pub node: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Number of levels to print, the root counts as one
        #[arg(short = 'L', long)]
        max_depth: Option<usize>,
    },

    /// Create directories with a README each
    Build {
        #[command(flatten)]
        source: SourceArgs,
        /// Directory to create the tree in (created if missing)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: PathBuf,
        /// README template (default: configured or built-in)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        template: Option<PathBuf>,
        /// Extra placeholder, e.g. --set AUTHOR=me fills [AUTHOR]
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },

    /// Write the tree to a JSON/YAML document
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// Target document (.json, .yaml, .yml)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Top-level key to write (default: name of the tree's root)
        #[arg(long = "as", value_name = "NAME")]
        root_key: Option<String>,
        /// What to do if the document exists (default: configured, else error)
        #[arg(long)]
        on_conflict: Option<ConflictPolicy>,
    },

    /// List the top-level keys of a document
    Roots {
        /// JSON/YAML document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
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
    /// Show global config file location
    Path,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}
