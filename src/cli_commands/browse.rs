use clap::Args;

#[derive(Args)]
pub(crate) struct StatusArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct LsArgs {
    /// Keep entries whose name starts with this (case-insensitive)
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Only files with this extension, e.g. `bsp` or `.bsp`
    #[arg(long)]
    pub(crate) ext: Option<String>,
    /// Expand this directory (repeatable)
    #[arg(long, value_name = "PATH")]
    pub(crate) expand: Vec<String>,
    /// Expand every directory
    #[arg(long)]
    pub(crate) all: bool,
    /// List entries without hierarchy
    #[arg(long)]
    pub(crate) flat: bool,
    /// Hide directories in the flat listing
    #[arg(long)]
    pub(crate) no_folders: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct SizeArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct CatArgs {
    pub(crate) path: String,
}

#[derive(Args)]
pub(crate) struct AddressArgs {
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) ext: Option<String>,
}

#[derive(Args)]
pub(crate) struct OpenArgs {
    /// Fragment such as `#owner=o&repo=r&q=de_`
    pub(crate) fragment: String,
    /// Only print the listing; do not persist the target
    #[arg(long)]
    pub(crate) no_save: bool,
}
