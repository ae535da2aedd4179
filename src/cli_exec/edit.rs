use std::io::{BufRead, Write};

use super::*;

fn expect_batch(outcome: Outcome) -> Result<BatchReport> {
    match outcome {
        Outcome::Batch(report) => Ok(report),
        other => anyhow::bail!("unexpected outcome {:?}", other),
    }
}

pub(super) fn handle_mkdir_command(ctx: &CliContext, path: &str) -> Result<()> {
    let mut console = ctx.console()?;
    console
        .dispatch(Command::Mutate(Mutation::CreateDirectory {
            path: path.to_string(),
        }))
        .with_context(|| format!("create directory {}", path))?;
    warn_stale_listing(&mut console);
    println!("Created {}", path.trim_end_matches('/'));
    Ok(())
}

pub(super) fn handle_mv_command(ctx: &CliContext, from: &str, to: &str, json: bool) -> Result<()> {
    let mut console = ctx.loaded_console()?;
    let outcome = console
        .dispatch(Command::Mutate(Mutation::Rename {
            from: from.to_string(),
            to: to.to_string(),
        }))
        .with_context(|| format!("move {} -> {}", from, to))?;
    warn_stale_listing(&mut console);
    print_report("moved", &expect_batch(outcome)?, json)
}

pub(super) fn handle_rm_command(
    ctx: &CliContext,
    path: &str,
    recursive: bool,
    json: bool,
) -> Result<()> {
    let mut console = ctx.loaded_console()?;
    let is_dir = path.ends_with('/')
        || console
            .snapshot()
            .is_some_and(|s| s.is_directory(path.trim_end_matches('/')));
    if is_dir && !recursive {
        anyhow::bail!("{} is a directory (use -r to delete it and everything under it)", path);
    }
    let outcome = console
        .dispatch(Command::Mutate(Mutation::Delete {
            path: path.to_string(),
        }))
        .with_context(|| format!("delete {}", path))?;
    warn_stale_listing(&mut console);
    print_report("deleted", &expect_batch(outcome)?, json)
}

pub(super) fn handle_rm_many_command(
    ctx: &CliContext,
    paths: Vec<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let mut console = ctx.loaded_console()?;
    for path in paths {
        let path = path.trim_end_matches('/').to_string();
        if !console.view().selected.contains(&path) {
            console.dispatch(Command::ToggleSelected(path))?;
        }
    }

    let outcome = console.dispatch(Command::Mutate(Mutation::DeleteSelected { confirmed: yes }))?;
    let outcome = match outcome {
        Outcome::NeedsConfirmation { items } => {
            if !confirm(items)? {
                println!("Cancelled");
                return Ok(());
            }
            console
                .dispatch(Command::Mutate(Mutation::DeleteSelected { confirmed: true }))
                .context("delete selection")?
        }
        other => other,
    };
    warn_stale_listing(&mut console);
    print_report("deleted", &expect_batch(outcome)?, json)
}

fn confirm(items: usize) -> Result<bool> {
    let mut err = std::io::stderr().lock();
    write!(err, "Delete {} item(s)? [y/N] ", items).context("write prompt")?;
    err.flush().context("flush prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
