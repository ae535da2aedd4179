use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

mod common;

fn run_treeward(home: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_treeward"))
        .env("TREEWARD_HOME", home)
        .env_remove("GITHUB_TOKEN")
        .env_remove("TREEWARD_LOG")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("run treeward {:?}", args))
}

fn ensure_ok(label: &str, out: &Output) -> Result<String> {
    if out.status.success() {
        return Ok(String::from_utf8_lossy(&out.stdout).to_string());
    }
    anyhow::bail!(
        "{} failed\nstdout:\n{}\nstderr:\n{}",
        label,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

fn configure(home: &Path, server: &common::ServerGuard) -> Result<()> {
    let out = run_treeward(
        home,
        &[
            "config",
            "set",
            "--api-url",
            &server.base_url,
            "--owner",
            common::OWNER,
            "--repo",
            common::REPO,
        ],
    )?;
    ensure_ok("config set", &out)?;
    Ok(())
}

#[test]
fn login_status_and_listing() -> Result<()> {
    let server = common::spawn_server_with(&[
        ("cstrike/maps/de_dust2.bsp", b"bsp"),
        ("cstrike/server.cfg", b"hostname x"),
    ])?;
    let home = tempfile::tempdir().context("create home")?;
    configure(home.path(), &server)?;

    let status = ensure_ok("status", &run_treeward(home.path(), &["status"])?)?;
    assert!(status.contains("repo: mock/server"), "{}", status);
    assert!(status.contains("session: signed out"), "{}", status);

    ensure_ok(
        "login",
        &run_treeward(home.path(), &["login", "--token", &server.token])?,
    )?;
    let status: serde_json::Value = serde_json::from_str(&ensure_ok(
        "status --json",
        &run_treeward(home.path(), &["status", "--json"])?,
    )?)
    .context("parse status")?;
    assert_eq!(status["signed_in"], true);
    assert!(status["signed_in_at"].is_string());

    let ls = ensure_ok("ls", &run_treeward(home.path(), &["ls", "--all"])?)?;
    let lines: Vec<&str> = ls.lines().collect();
    assert_eq!(
        lines,
        vec!["cstrike/", "  maps/", "    de_dust2.bsp  3 B", "  server.cfg  10 B"]
    );

    let flat = ensure_ok(
        "ls --flat --ext",
        &run_treeward(home.path(), &["ls", "--flat", "--ext", "bsp", "--no-folders"])?,
    )?;
    assert_eq!(flat.trim(), "maps/de_dust2.bsp  3 B");

    Ok(())
}

#[test]
fn edits_from_the_command_line() -> Result<()> {
    let server = common::spawn_server_with(&[
        ("cstrike/maps/de_dust2.bsp", b"bsp"),
        ("cstrike/server.cfg", b"hostname x"),
    ])?;
    let home = tempfile::tempdir().context("create home")?;
    configure(home.path(), &server)?;

    // Writes need a session.
    let denied = run_treeward(home.path(), &["mkdir", "cstrike/sound"])?;
    assert!(!denied.status.success());
    assert!(String::from_utf8_lossy(&denied.stderr).contains("unauthenticated"));

    ensure_ok(
        "login",
        &run_treeward(home.path(), &["login", "--token", &server.token])?,
    )?;

    let local = home.path().join("motd.txt");
    std::fs::write(&local, b"welcome").context("write local file")?;
    ensure_ok(
        "put",
        &run_treeward(
            home.path(),
            &["put", local.to_str().unwrap(), "cstrike/motd.txt"],
        )?,
    )?;
    let cat = run_treeward(home.path(), &["cat", "cstrike/motd.txt"])?;
    ensure_ok("cat", &cat)?;
    assert_eq!(cat.stdout, b"welcome");

    let mv = ensure_ok(
        "mv",
        &run_treeward(home.path(), &["mv", "cstrike/maps", "cstrike/levels"])?,
    )?;
    assert!(mv.contains("moved cstrike/maps/de_dust2.bsp"), "{}", mv);

    // A directory needs -r.
    let refused = run_treeward(home.path(), &["rm", "cstrike/levels"])?;
    assert!(!refused.status.success());

    let report: serde_json::Value = serde_json::from_str(&ensure_ok(
        "rm-many",
        &run_treeward(
            home.path(),
            &["rm-many", "cstrike/levels", "cstrike/motd.txt", "--yes", "--json"],
        )?,
    )?)
    .context("parse rm-many report")?;
    assert_eq!(
        report["completed"],
        serde_json::json!(["cstrike/levels/de_dust2.bsp", "cstrike/motd.txt"])
    );

    let ls = ensure_ok("ls", &run_treeward(home.path(), &["ls"])?)?;
    assert_eq!(ls.lines().collect::<Vec<_>>(), vec!["cstrike/", "  server.cfg  10 B"]);
    Ok(())
}
