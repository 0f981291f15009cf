use crate::sort::SortMode;
use clap::Parser;
use std::path::PathBuf;

/// dsweep: find what is eating your disk and clean it up
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan (default: current)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Initial sort key for every listing
    #[arg(short, long, value_enum, default_value_t = SortMode::Size)]
    pub sort: SortMode,

    /// Sort ascending instead of the key's default direction
    #[arg(short, long)]
    pub ascending: bool,

    /// Write logs to this file (nothing is logged without it)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
