use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use time::format_description::well_known::Rfc3339;

use crate::model::{ConsoleConfig, ConsoleState};
use crate::session::Session;

const HOME_ENV: &str = "TREEWARD_HOME";
const TOKEN_ENV: &str = "GITHUB_TOKEN";
const APP_DIR: &str = "treeward";

/// Durable local storage for the console: `config.json` for the target and `state.json` for
/// the auth token.
#[derive(Clone, Debug)]
pub struct ConsoleStore {
    root: PathBuf,
}

impl ConsoleStore {
    /// `$TREEWARD_HOME`, else the platform config directory.
    pub fn default_root() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| anyhow!("no config directory available (set {})", HOME_ENV))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::open(&Self::default_root()?))
    }

    pub fn open(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_config(&self) -> Result<ConsoleConfig> {
        let path = self.root.join("config.json");
        if !path.exists() {
            return Ok(ConsoleConfig::default());
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: ConsoleConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ConsoleConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_state(&self) -> Result<ConsoleState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(ConsoleState {
                version: 1,
                ..ConsoleState::default()
            });
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ConsoleState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &ConsoleState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.read_state()?.github_token)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("token must not be empty");
        }
        let mut st = self.read_state()?;
        st.github_token = Some(token.to_string());
        st.signed_in_at = Some(
            time::OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .context("format sign-in time")?,
        );
        self.write_state(&st)
    }

    /// Session seeded from `GITHUB_TOKEN` when set, else from the stored token.
    pub fn session(&self) -> Result<Session> {
        let from_env = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if from_env.is_some() {
            tracing::debug!("using token from {}", TOKEN_ENV);
            return Ok(Session::new(from_env));
        }
        Ok(Session::new(self.token()?))
    }

    pub fn clear_token(&self) -> Result<()> {
        let mut st = self.read_state()?;
        st.github_token = None;
        st.signed_in_at = None;
        self.write_state(&st)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
