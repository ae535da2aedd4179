mod common;

use anyhow::Result;
use treeward::error::TreeError;
use treeward::model::ContentRef;
use treeward::remote::{ContentApi, GitHubClient, fetch_snapshot};
use treeward::session::Session;
use treeward::subtree::Subtree;

fn client(server: &common::ServerGuard, token: Option<&str>) -> Result<GitHubClient> {
    GitHubClient::new(
        &server.base_url,
        common::OWNER,
        common::REPO,
        Session::new(token.map(str::to_string)),
    )
}

#[test]
fn snapshot_is_scoped_to_the_subtree() -> Result<()> {
    let server = common::spawn_server_with(&[
        ("cstrike/maps/de_dust2.bsp", b"bsp"),
        ("cstrike/server.cfg", b"hostname x"),
        ("cstrike-old/readme.txt", b"sibling"),
        ("valve/liblist.gam", b"outside"),
    ])?;
    let client = client(&server, None)?;
    let subtree = Subtree::new("cstrike")?;

    let snapshot = fetch_snapshot(&client, &subtree, None)?;
    assert_eq!(snapshot.branch, "main");
    assert_eq!(snapshot.repo.full_name, "mock/server");
    assert!(!snapshot.truncated);

    let mut files: Vec<&str> = snapshot.files.iter().map(|e| e.path.as_str()).collect();
    files.sort();
    assert_eq!(files, vec!["cstrike/maps/de_dust2.bsp", "cstrike/server.cfg"]);
    let dirs: Vec<&str> = snapshot.directories.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(dirs, vec!["cstrike/maps"]);
    assert_eq!(snapshot.entry("cstrike/server.cfg").map(|e| e.size), Some(10));
    Ok(())
}

#[test]
fn unknown_branch_is_not_found() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/a.txt", b"a")])?;
    let client = client(&server, None)?;
    let err = fetch_snapshot(&client, &Subtree::new("cstrike")?, Some("release")).unwrap_err();
    assert!(matches!(err, TreeError::NotFound(_)), "{:?}", err);
    Ok(())
}

#[test]
fn metadata_distinguishes_files_directories_and_absence() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/maps/de_dust2.bsp", b"bsp")])?;
    let client = client(&server, Some(&server.token))?;

    let file = client.get_metadata("cstrike/maps/de_dust2.bsp", "main")?;
    assert_eq!(
        file.map(|r| r.as_str().to_string()),
        Some(blake3::hash(b"bsp").to_hex().to_string())
    );
    assert_eq!(client.get_metadata("cstrike/maps", "main")?, None);
    assert_eq!(client.get_metadata("cstrike/missing.cfg", "main")?, None);
    Ok(())
}

#[test]
fn bad_token_surfaces_remote_status() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/a.txt", b"a")])?;
    let client = client(&server, Some("wrong"))?;
    let err = client.get_metadata("cstrike/a.txt", "main").unwrap_err();
    match err {
        TreeError::RemoteError { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Bad credentials"), "{}", body);
        }
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}

#[test]
fn deleting_a_vanished_file_keeps_the_404_status() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/a.txt", b"a")])?;
    let client = client(&server, Some(&server.token))?;
    let err = client
        .delete_content("cstrike/gone.cfg", &ContentRef("x".into()), "Delete gone.cfg", "main")
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, TreeError::RemoteError { status: 404, .. }), "{:?}", err);
    Ok(())
}
