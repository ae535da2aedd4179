use clap::{Args, Subcommand};

#[derive(Args)]
pub(crate) struct LoginArgs {
    /// Personal access token with contents read/write on the repository
    #[arg(long)]
    pub(crate) token: String,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the persisted configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Persist the global target flags given with it (`--api-url`, `--owner`, `--repo`,
    /// `--branch`, `--subtree`); omitted flags keep their current value
    Set {
        /// Capacity budget in bytes
        #[arg(long)]
        budget: Option<u64>,
    },
}
