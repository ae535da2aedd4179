use anyhow::Result;
use clap::{Args, Parser};

use treeward::model::ConfigOverrides;

use crate::Commands;

#[derive(Parser)]
#[command(name = "treeward")]
#[command(about = "Browse and edit one subtree of a GitHub repository", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Overrides for `config.json`, applied to this invocation only.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct TargetArgs {
    /// API base URL (defaults to https://api.github.com)
    #[arg(long = "api-url", global = true)]
    pub(crate) api_url: Option<String>,
    /// Repository owner
    #[arg(long, global = true)]
    pub(crate) owner: Option<String>,
    /// Repository name
    #[arg(long, global = true)]
    pub(crate) repo: Option<String>,
    /// Branch (defaults to the repository default branch)
    #[arg(long, global = true)]
    pub(crate) branch: Option<String>,
    /// Managed subtree root
    #[arg(long, global = true)]
    pub(crate) subtree: Option<String>,
}

impl TargetArgs {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base: self.api_url.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            subtree: self.subtree.clone(),
        }
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => crate::cli_exec::run_tui(&cli.target)?,
        Some(command) => {
            treeward::logging::init_stderr();
            crate::cli_exec::handle_command(&cli.target, command)?
        }
    }

    Ok(())
}
