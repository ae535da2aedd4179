use super::*;

#[test]
fn missing_files_yield_defaults() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let store = ConsoleStore::open(tmp.path());
    let cfg = store.read_config()?;
    assert_eq!(cfg.subtree, "cstrike");
    assert_eq!(cfg.budget_bytes, 1024 * 1024 * 1024);
    assert_eq!(store.token()?, None);
    Ok(())
}

#[test]
fn token_survives_reopen_until_cleared() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    ConsoleStore::open(tmp.path()).set_token("  ghp_abc \n")?;

    let reopened = ConsoleStore::open(tmp.path());
    assert_eq!(reopened.token()?, Some("ghp_abc".to_string()));
    let st = reopened.read_state()?;
    assert!(st.signed_in_at.is_some());

    reopened.clear_token()?;
    assert_eq!(ConsoleStore::open(tmp.path()).token()?, None);
    Ok(())
}

#[test]
fn token_is_not_written_to_config() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let store = ConsoleStore::open(tmp.path());
    let cfg = ConsoleConfig {
        owner: Some("octo".to_string()),
        repo: Some("servers".to_string()),
        ..ConsoleConfig::default()
    };
    store.write_config(&cfg)?;
    store.set_token("secret")?;

    let raw = fs::read_to_string(tmp.path().join("config.json")).context("read config")?;
    assert!(!raw.contains("secret"));
    assert_eq!(store.read_config()?, cfg);
    Ok(())
}

#[test]
fn empty_token_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ConsoleStore::open(tmp.path());
    assert!(store.set_token("   ").is_err());
}
