use clap::Subcommand;

pub(crate) mod browse;
pub(crate) mod edit;
pub(crate) mod session;

pub(crate) use session::ConfigCommands;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Store a GitHub token for later commands
    Login(session::LoginArgs),

    /// Forget the stored token
    Logout,

    /// Show target, sign-in state and capacity
    Status(browse::StatusArgs),

    /// Show or change the persisted target
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List the subtree as an indented tree
    #[command(name = "ls")]
    Ls(browse::LsArgs),

    /// Approximate subtree size against the budget
    Size(browse::SizeArgs),

    /// Print a file
    Cat(browse::CatArgs),

    /// Upload a local file, or a directory recursively
    Put(edit::PutArgs),

    /// Create a directory (placeholder marker)
    Mkdir(edit::MkdirArgs),

    /// Move or rename a file or directory (copy then delete)
    #[command(name = "mv")]
    Mv(edit::MvArgs),

    /// Delete a file, or a directory with -r
    #[command(name = "rm")]
    Rm(edit::RmArgs),

    /// Delete several files and directories after confirmation
    #[command(name = "rm-many")]
    RmMany(edit::RmManyArgs),

    /// Print a bookmarkable address for the current target and filters
    Address(browse::AddressArgs),

    /// Apply an address: persist its target and print the filtered listing
    Open(browse::OpenArgs),

    /// Full-screen explorer (default when no command is given)
    Tui,
}
