use std::io::Write;

use treeward::address::SessionAddress;
use treeward::capacity::format_bytes;
use treeward::model::EntryKind;
use treeward::view::VisibleEntry;

use crate::cli_commands::browse::LsArgs;

use super::*;

#[derive(serde::Serialize)]
struct StatusJson<'a> {
    owner: Option<&'a str>,
    repo: Option<&'a str>,
    branch: Option<&'a str>,
    subtree: &'a str,
    signed_in: bool,
    signed_in_at: Option<String>,
}

pub(super) fn handle_status_command(ctx: &CliContext, json: bool) -> Result<()> {
    let state = ctx.store.read_state()?;
    let signed_in = ctx.store.session()?.is_authenticated();
    let status = StatusJson {
        owner: ctx.cfg.owner.as_deref(),
        repo: ctx.cfg.repo.as_deref(),
        branch: ctx.cfg.branch.as_deref(),
        subtree: &ctx.cfg.subtree,
        signed_in,
        signed_in_at: state.signed_in_at,
    };
    if json {
        return print_json(&status, "status");
    }

    match ctx.cfg.target() {
        Some((owner, repo)) => println!("repo: {}/{}", owner, repo),
        None => println!("repo: (not configured)"),
    }
    println!(
        "branch: {}",
        status.branch.unwrap_or("(default branch)")
    );
    println!("subtree: {}", status.subtree);
    match (&status.signed_in_at, signed_in) {
        (_, false) => println!("session: signed out"),
        (Some(at), true) => println!("session: signed in since {}", at),
        (None, true) => println!("session: signed in"),
    }
    Ok(())
}

pub(super) fn handle_ls_command(ctx: &CliContext, args: LsArgs) -> Result<()> {
    let mut console = ctx.loaded_console()?;
    if let Some(q) = args.search {
        console.dispatch(Command::Search(q))?;
    }
    if let Some(ext) = args.ext {
        console.dispatch(Command::Extension(ext))?;
    }
    if args.all {
        console.dispatch(Command::ExpandAll)?;
    }
    for path in args.expand {
        let path = path.trim_end_matches('/').to_string();
        if !console.view().expanded.contains(&path) {
            console.dispatch(Command::ToggleExpanded(path))?;
        }
    }
    console.dispatch(Command::SetFlat(args.flat))?;
    console.dispatch(Command::ShowFolders(!args.no_folders))?;

    let rows = console.visible();
    if args.json {
        return print_json(&rows, "listing");
    }

    let mut out = std::io::stdout().lock();
    for row in &rows {
        writeln!(out, "{}", format_row(row, args.flat)).context("write listing")?;
    }
    if console.snapshot().is_some_and(|s| s.truncated) {
        eprintln!("warning: the remote truncated this listing; some entries are missing");
    }
    Ok(())
}

fn format_row(row: &VisibleEntry, flat: bool) -> String {
    let indent = if flat { 0 } else { row.depth };
    let name = if row.depth == 0 && !flat {
        row.path.as_str()
    } else if flat {
        row.display_name.as_str()
    } else {
        row.display_name.rsplit('/').next().unwrap_or(&row.display_name)
    };
    match row.kind {
        EntryKind::Directory => format!("{}{}/", "  ".repeat(indent), name),
        EntryKind::File => format!(
            "{}{}  {}",
            "  ".repeat(indent),
            name,
            format_bytes(row.size)
        ),
    }
}

#[derive(serde::Serialize)]
struct SizeJson {
    used_bytes: u64,
    budget_bytes: u64,
    remaining_bytes: u64,
    percent: f64,
    files: usize,
    directories: usize,
}

pub(super) fn handle_size_command(ctx: &CliContext, json: bool) -> Result<()> {
    let console = ctx.loaded_console()?;
    let (Some(snapshot), Some(meter)) = (console.snapshot(), console.meter()) else {
        anyhow::bail!("no listing loaded");
    };
    if json {
        return print_json(
            &SizeJson {
                used_bytes: meter.used_bytes,
                budget_bytes: meter.budget_bytes,
                remaining_bytes: meter.remaining_bytes(),
                percent: meter.percent(),
                files: snapshot.files.len(),
                directories: snapshot.directories.len(),
            },
            "size",
        );
    }
    println!("{} ({:.1}%)", meter.label(), meter.percent());
    println!("remaining: {}", format_bytes(meter.remaining_bytes()));
    println!(
        "files: {}  directories: {}",
        snapshot.files.len(),
        snapshot.directories.len()
    );
    Ok(())
}

pub(super) fn handle_cat_command(ctx: &CliContext, path: &str) -> Result<()> {
    let mut console = ctx.console()?;
    let bytes = console
        .read_file(path)
        .with_context(|| format!("read {}", path))?;
    let mut out = std::io::stdout().lock();
    out.write_all(&bytes).context("write stdout")?;
    out.flush().context("flush stdout")?;
    Ok(())
}

pub(super) fn handle_address_command(
    ctx: &CliContext,
    search: Option<String>,
    ext: Option<String>,
) -> Result<()> {
    let (owner, repo) = ctx
        .cfg
        .target()
        .context("no repository configured (run `treeward config set --owner ... --repo ...`)")?;
    let mut address = SessionAddress::new(owner, repo, ctx.cfg.branch.as_deref());
    address.search = search.filter(|s| !s.trim().is_empty());
    address.extension = ext.filter(|s| !s.trim().is_empty());
    println!("{}", address.to_fragment());
    Ok(())
}

pub(super) fn handle_open_command(ctx: &CliContext, fragment: &str, no_save: bool) -> Result<()> {
    let address = SessionAddress::parse(fragment)
        .with_context(|| format!("address {:?} needs owner and repo", fragment))?;

    let mut cfg = ctx.cfg.clone();
    cfg.owner = Some(address.owner.clone());
    cfg.repo = Some(address.repo.clone());
    cfg.branch = address.branch.clone();

    if !no_save {
        let mut persisted = ctx.store.read_config()?;
        persisted.owner = cfg.owner.clone();
        persisted.repo = cfg.repo.clone();
        persisted.branch = cfg.branch.clone();
        ctx.store.write_config(&persisted)?;
    }

    let mut view = treeward::view::ViewState::default();
    address.apply_to(&mut view);
    let session = ctx.store.session().context("load session")?;
    let mut console = console::connect(&cfg, session)?.with_view(view);
    console.refresh().context("list subtree")?;
    if !address.search.as_deref().unwrap_or("").is_empty() {
        console.dispatch(Command::ExpandAll)?;
    }

    let mut out = std::io::stdout().lock();
    for row in console.visible() {
        writeln!(out, "{}", format_row(&row, false)).context("write listing")?;
    }
    Ok(())
}
