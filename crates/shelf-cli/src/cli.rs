use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "promptshelf: a versioned prompt library with line and character diffs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    /// Diff markup; only `diff` supports it.
    Html,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Line diff of two files
    Diff(DiffArgs),
    /// Line similarity of two files as a percentage
    Similarity(SimilarityArgs),
    /// Character diff of two lines
    Inline(InlineArgs),
    /// List stored prompts
    List(ListArgs),
    /// Show the version history of a prompt
    Log(LogArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on [default: 127.0.0.1:3000]
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory holding prompts/ and recycle_bin/
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Front-end directory to serve outside /api
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
    /// TOML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct SimilarityArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct InlineArgs {
    pub old_line: String,
    pub new_line: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct LogArgs {
    pub id: String,
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}
