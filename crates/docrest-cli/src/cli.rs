use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docrest",
    about = "REST-style access to a hierarchical document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = "docrest.toml")]
    pub config: PathBuf,

    /// Snapshot file, overriding `store_path` from the configuration
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every document in a collection
    List(PathArgs),
    /// Show one document
    Get(PathArgs),
    /// Create a document unless one with the same key exists
    Post(WriteArgs),
    /// Create or update a document by key
    Put(WriteArgs),
    /// Replace the document with the same key
    Patch(PatchArgs),
    /// Delete a document and its child collections
    Delete(CascadeArgs),
    /// Delete every document in a collection
    Clear(CascadeArgs),
}

/// Paths are `/`-separated, or a JSON array of segments when a segment
/// itself contains `/` (e.g. `'["files","a/b"]'`).
#[derive(Args)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Target collection
    pub path: String,
    /// Document contents as a JSON object
    pub json: String,
    /// Field identifying an existing document in the collection
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Collection searched for the key
    pub path: String,
    pub json: String,
    #[arg(long)]
    pub key: String,
}

#[derive(Args)]
pub struct CascadeArgs {
    pub path: String,
    /// Child collection to cascade into (repeatable, in order)
    #[arg(long = "child")]
    pub children: Vec<String>,
}
