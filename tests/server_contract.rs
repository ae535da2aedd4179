mod common;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;

#[test]
fn mock_serves_listing_and_enforces_content_concurrency() -> Result<()> {
    let server = common::spawn_server_with(&[("cstrike/maps/de_dust2.bsp", b"bsp")])?;
    let client = reqwest::blocking::Client::new();
    let auth = common::auth_header(&server.token);

    // Listing is readable anonymously.
    let repo: serde_json::Value = client
        .get(common::repo_url(&server, ""))
        .send()
        .context("get repo")?
        .error_for_status()
        .context("get repo status")?
        .json()
        .context("parse repo")?;
    assert_eq!(repo["full_name"], "mock/server");
    assert_eq!(repo["default_branch"], "main");

    let branch: serde_json::Value = client
        .get(common::repo_url(&server, "branches/main"))
        .send()
        .context("get branch")?
        .error_for_status()
        .context("get branch status")?
        .json()
        .context("parse branch")?;
    let tree_sha = branch["commit"]["commit"]["tree"]["sha"]
        .as_str()
        .context("tree sha")?
        .to_string();

    let tree: serde_json::Value = client
        .get(common::repo_url(&server, &format!("git/trees/{}?recursive=1", tree_sha)))
        .send()
        .context("get tree")?
        .error_for_status()
        .context("get tree status")?
        .json()
        .context("parse tree")?;
    let listed: Vec<(String, String)> = tree["tree"]
        .as_array()
        .context("tree array")?
        .iter()
        .map(|i| {
            (
                i["path"].as_str().unwrap_or_default().to_string(),
                i["type"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    assert_eq!(
        listed,
        vec![
            ("cstrike".to_string(), "tree".to_string()),
            ("cstrike/maps".to_string(), "tree".to_string()),
            ("cstrike/maps/de_dust2.bsp".to_string(), "blob".to_string()),
        ]
    );

    // Content metadata needs the token.
    let anon = client
        .get(common::repo_url(&server, "contents/cstrike/maps/de_dust2.bsp?ref=main"))
        .send()
        .context("anonymous metadata")?;
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    let meta: serde_json::Value = client
        .get(common::repo_url(&server, "contents/cstrike/maps/de_dust2.bsp?ref=main"))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .send()
        .context("metadata")?
        .error_for_status()
        .context("metadata status")?
        .json()
        .context("parse metadata")?;
    let sha = meta["sha"].as_str().context("sha")?.to_string();
    assert_eq!(sha, blake3::hash(b"bsp").to_hex().to_string());

    // Creating over an existing path without a sha is rejected.
    let put = |sha: Option<&str>, content: &[u8]| {
        let mut body = serde_json::json!({
            "message": "Update cstrike/maps/de_dust2.bsp",
            "content": STANDARD.encode(content),
            "branch": "main",
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::Value::String(sha.to_string());
        }
        client
            .put(common::repo_url(&server, "contents/cstrike/maps/de_dust2.bsp"))
            .header(reqwest::header::AUTHORIZATION, &auth)
            .json(&body)
            .send()
    };
    assert_eq!(
        put(None, b"v2").context("put without sha")?.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        put(Some("stale"), b"v2").context("put stale sha")?.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        put(Some(&sha), b"v2").context("put current sha")?.status(),
        StatusCode::OK
    );

    // Old blobs stay addressable; new ones come back base64 with line breaks.
    let v2 = blake3::hash(b"v2").to_hex().to_string();
    let blob: serde_json::Value = client
        .get(common::repo_url(&server, &format!("git/blobs/{}", v2)))
        .send()
        .context("get blob")?
        .error_for_status()
        .context("get blob status")?
        .json()
        .context("parse blob")?;
    let encoded: String = blob["content"]
        .as_str()
        .context("blob content")?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(STANDARD.decode(encoded)?, b"v2");

    let delete = client
        .delete(common::repo_url(&server, "contents/cstrike/maps/de_dust2.bsp"))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"message": "Delete", "sha": sha, "branch": "main"}))
        .send()
        .context("delete stale")?;
    assert_eq!(delete.status(), StatusCode::CONFLICT);

    let missing = client
        .delete(common::repo_url(&server, "contents/cstrike/nope.txt"))
        .header(reqwest::header::AUTHORIZATION, &auth)
        .json(&serde_json::json!({"message": "Delete", "sha": "x", "branch": "main"}))
        .send()
        .context("delete missing")?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    Ok(())
}
