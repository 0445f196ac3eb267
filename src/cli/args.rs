//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Rebuild Australian Curriculum RDF/XML exports as a typed tree and render them to markdown
#[derive(Parser, Debug)]
#[command(name = "curriculum-tree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file (default: ./.curriculum-tree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// RDF/XML inputs shared by the loading commands.
#[derive(Args, Debug, Clone)]
pub struct Inputs {
    /// RDF/XML files or directories containing them
    #[arg(required = true, value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Continue with the next file after a file fails to load
    #[arg(short, long)]
    pub keep_going: bool,

    /// Accept files without a root node
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load files and print a summary per learning area
    Load {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Print the curriculum tree
    Tree {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Follow hasLevel/hasChild links from each file's root and print what is reached
    Walk {
        /// RDF/XML files or directories containing them
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },

    /// Show where a content description sits in the hierarchy
    Place {
        /// Content description code, e.g. AC9M7N01
        code: String,

        #[command(flatten)]
        inputs: Inputs,
    },

    /// Render the curriculum as linked markdown files
    Render {
        #[command(flatten)]
        inputs: Inputs,

        /// Output directory (default: render.output_dir from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
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

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
