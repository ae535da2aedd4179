use anyhow::{Context, Result};

use treeward::console::{self, Command, Console, Mutation, Outcome};
use treeward::model::ConsoleConfig;
use treeward::mutate::BatchReport;
use treeward::remote::GitHubClient;
use treeward::store::ConsoleStore;

use crate::cli_runtime::TargetArgs;
use crate::{Commands, ConfigCommands};

mod browse;
mod dispatch;
mod edit;
mod session;
mod upload;

pub(super) fn handle_command(target: &TargetArgs, command: Commands) -> Result<()> {
    dispatch::handle_command(target, command)
}

pub(super) fn run_tui(target: &TargetArgs) -> Result<()> {
    treeward::logging::init_for_tui()?;
    let ctx = CliContext::load(target)?;
    treeward::tui::run_with_options(treeward::tui::TuiRunOptions {
        store: ctx.store,
        config: ctx.cfg,
    })
}

/// Store plus the effective configuration (persisted values with flag overrides applied).
pub(super) struct CliContext {
    pub(super) store: ConsoleStore,
    pub(super) cfg: ConsoleConfig,
}

impl CliContext {
    pub(super) fn load(target: &TargetArgs) -> Result<Self> {
        let store = ConsoleStore::open_default()?;
        let mut cfg = store.read_config()?;
        cfg.apply(&target.overrides());
        Ok(Self { store, cfg })
    }

    pub(super) fn console(&self) -> Result<Console<GitHubClient>> {
        let session = self.store.session().context("load session")?;
        console::connect(&self.cfg, session)
    }

    /// Console with a snapshot already loaded.
    pub(super) fn loaded_console(&self) -> Result<Console<GitHubClient>> {
        let mut console = self.console()?;
        console.refresh().context("list subtree")?;
        Ok(console)
    }
}

/// The change went through either way; only the follow-up listing failed.
pub(super) fn warn_stale_listing(console: &mut Console<GitHubClient>) {
    if let Some(err) = console.take_refresh_error() {
        eprintln!("warning: listing refresh failed after the change: {}", err);
    }
}

pub(super) fn print_json<T: serde::Serialize>(value: &T, label: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {}", label))?
    );
    Ok(())
}

pub(super) fn print_report(verb: &str, report: &BatchReport, json: bool) -> Result<()> {
    if json {
        return print_json(report, "report");
    }
    for path in &report.completed {
        println!("{} {}", verb, path);
    }
    for path in &report.skipped {
        println!("skipped {}", path);
    }
    Ok(())
}
