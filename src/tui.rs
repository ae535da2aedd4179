//! Full-screen explorer over one console.

use anyhow::Result;

use crate::model::ConsoleConfig;
use crate::store::ConsoleStore;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    pub store: ConsoleStore,
    pub config: ConsoleConfig,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
