mod common;

use anyhow::Result;
use treeward::console::{Command, Console, Mutation, Outcome};
use treeward::error::TreeError;
use treeward::model::ConsoleConfig;
use treeward::remote::{ContentApi, GitHubClient};
use treeward::session::Session;

fn config(server: &common::ServerGuard) -> ConsoleConfig {
    ConsoleConfig {
        api_base: server.base_url.clone(),
        owner: Some(common::OWNER.to_string()),
        repo: Some(common::REPO.to_string()),
        ..ConsoleConfig::default()
    }
}

fn connect(server: &common::ServerGuard, token: Option<&str>) -> Result<Console<GitHubClient>> {
    let session = Session::new(token.map(str::to_string));
    let mut console = treeward::console::connect(&config(server), session)?;
    console.refresh()?;
    Ok(console)
}

fn file_paths(console: &Console<GitHubClient>) -> Vec<String> {
    let mut paths: Vec<String> = console
        .snapshot()
        .map(|s| s.files.iter().map(|e| e.path.clone()).collect())
        .unwrap_or_default();
    paths.sort();
    paths
}

#[test]
fn console_mutations_round_trip_through_the_remote() -> Result<()> {
    let server = common::spawn_server_with(&[
        ("cstrike/maps/de_dust2.bsp", b"dust2"),
        ("cstrike/maps/.gitkeep", b""),
        ("cstrike/server.cfg", b"hostname x"),
    ])?;
    let mut console = connect(&server, Some(&server.token))?;

    // Create then update the same path.
    let created = console.dispatch(Command::Mutate(Mutation::WriteFile {
        path: "cstrike/motd.txt".into(),
        bytes: b"hello".to_vec(),
    }))?;
    assert!(matches!(created, Outcome::Wrote(_)));
    console.dispatch(Command::Mutate(Mutation::WriteFile {
        path: "cstrike/motd.txt".into(),
        bytes: b"hello again".to_vec(),
    }))?;
    assert_eq!(console.read_file("cstrike/motd.txt")?, b"hello again");

    console.dispatch(Command::Mutate(Mutation::CreateDirectory {
        path: "cstrike/sound".into(),
    }))?;
    assert!(console.snapshot().is_some_and(|s| s.is_directory("cstrike/sound")));

    // Directory move: the marker stays behind and is not relocated.
    let moved = console.dispatch(Command::Mutate(Mutation::Rename {
        from: "cstrike/maps".into(),
        to: "cstrike/levels".into(),
    }))?;
    let Outcome::Batch(report) = moved else {
        panic!("unexpected outcome {:?}", moved);
    };
    assert_eq!(report.completed, vec!["cstrike/maps/de_dust2.bsp"]);
    assert_eq!(console.read_file("cstrike/levels/de_dust2.bsp")?, b"dust2");

    console.dispatch(Command::Mutate(Mutation::Delete {
        path: "cstrike/maps/".into(),
    }))?;
    assert_eq!(
        file_paths(&console),
        vec![
            "cstrike/levels/de_dust2.bsp",
            "cstrike/motd.txt",
            "cstrike/server.cfg",
            "cstrike/sound/.gitkeep",
        ]
    );

    // Bulk delete asks first, then removes everything selected.
    console.dispatch(Command::ToggleSelected("cstrike/levels".into()))?;
    console.dispatch(Command::ToggleSelected("cstrike/motd.txt".into()))?;
    assert_eq!(
        console.dispatch(Command::Mutate(Mutation::DeleteSelected { confirmed: false }))?,
        Outcome::NeedsConfirmation { items: 2 }
    );
    console.dispatch(Command::Mutate(Mutation::DeleteSelected { confirmed: true }))?;
    assert_eq!(
        file_paths(&console),
        vec!["cstrike/server.cfg", "cstrike/sound/.gitkeep"]
    );
    assert!(console.view().selected.is_empty());
    Ok(())
}

#[test]
fn signed_out_console_sends_no_writes() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/server.cfg", b"x")])?;
    let mut console = connect(&server, None)?;

    let err = console
        .dispatch(Command::Mutate(Mutation::Delete {
            path: "cstrike/server.cfg".into(),
        }))
        .unwrap_err();
    assert!(matches!(err, TreeError::Unauthenticated), "{:?}", err);
    assert_eq!(file_paths(&console), vec!["cstrike/server.cfg"]);
    Ok(())
}

#[test]
fn rejected_token_keeps_previous_snapshot() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/server.cfg", b"x")])?;
    let mut console = connect(&server, Some("revoked"))?;

    let err = console
        .dispatch(Command::Mutate(Mutation::WriteFile {
            path: "cstrike/new.cfg".into(),
            bytes: b"y".to_vec(),
        }))
        .unwrap_err();
    assert!(
        matches!(err, TreeError::RemoteError { status: 401, .. }),
        "{:?}",
        err
    );
    assert_eq!(file_paths(&console), vec!["cstrike/server.cfg"]);
    Ok(())
}

#[test]
fn stale_content_ref_is_a_conflict() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/server.cfg", b"v1")])?;
    let session = Session::new(Some(server.token.clone()));
    let client = GitHubClient::new(&server.base_url, common::OWNER, common::REPO, session)?;

    let Some(v1) = client.get_metadata("cstrike/server.cfg", "main")? else {
        panic!("server.cfg missing");
    };
    client.put_content("cstrike/server.cfg", b"v2", Some(&v1), "Update", "main")?;

    let err = client
        .put_content("cstrike/server.cfg", b"v3", Some(&v1), "Update", "main")
        .unwrap_err();
    assert!(
        matches!(err, TreeError::RemoteError { status: 409, .. }),
        "{:?}",
        err
    );
    assert_eq!(client.get_blob(&v1)?, b"v1");
    Ok(())
}
