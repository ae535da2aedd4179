mod config;
mod entry;
mod snapshot;

pub use self::config::{
    ConfigOverrides, ConsoleConfig, ConsoleState, DEFAULT_API_BASE, DEFAULT_SUBTREE, ONE_GIB,
};
pub use self::entry::{ContentRef, Entry, EntryKind};
pub use self::snapshot::{RepoMeta, Snapshot};
