use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub(crate) struct PutArgs {
    /// Local file or directory
    pub(crate) local: PathBuf,
    /// Destination path inside the subtree
    pub(crate) remote: String,
    /// Skip local paths matching this glob (repeatable, directory uploads only)
    #[arg(long, value_name = "GLOB")]
    pub(crate) exclude: Vec<String>,
}

#[derive(Args)]
pub(crate) struct MkdirArgs {
    pub(crate) path: String,
}

#[derive(Args)]
pub(crate) struct MvArgs {
    pub(crate) from: String,
    pub(crate) to: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct RmArgs {
    pub(crate) path: String,
    /// Delete a directory and everything under it
    #[arg(short = 'r', long)]
    pub(crate) recursive: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct RmManyArgs {
    #[arg(required = true)]
    pub(crate) paths: Vec<String>,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub(crate) yes: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
