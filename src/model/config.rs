use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_SUBTREE: &str = "cstrike";
pub const ONE_GIB: u64 = 1024 * 1024 * 1024;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_subtree() -> String {
    DEFAULT_SUBTREE.to_string()
}

fn default_budget() -> u64 {
    ONE_GIB
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub version: u32,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    /// Branch override; the repository default branch is used when unset.
    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default = "default_subtree")]
    pub subtree: String,

    /// Capacity budget for the size meter, in bytes.
    #[serde(default = "default_budget")]
    pub budget_bytes: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_base: default_api_base(),
            owner: None,
            repo: None,
            branch: None,
            subtree: default_subtree(),
            budget_bytes: default_budget(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleState {
    pub version: u32,

    // Token lives here rather than in config.json so config can be shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_in_at: Option<String>,
}

/// Per-invocation values that win over `config.json` without being persisted.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub subtree: Option<String>,
}

impl ConsoleConfig {
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        fn set(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *slot = Some(v.to_string());
            }
        }
        if let Some(api) = overrides.api_base.as_deref().filter(|v| !v.trim().is_empty()) {
            self.api_base = api.trim().to_string();
        }
        if let Some(sub) = overrides.subtree.as_deref().filter(|v| !v.trim().is_empty()) {
            self.subtree = sub.trim().to_string();
        }
        set(&mut self.owner, &overrides.owner);
        set(&mut self.repo, &overrides.repo);
        set(&mut self.branch, &overrides.branch);
    }

    /// `(owner, repo)` when both are configured.
    pub fn target(&self) -> Option<(&str, &str)> {
        match (self.owner.as_deref(), self.repo.as_deref()) {
            (Some(o), Some(r)) if !o.is_empty() && !r.is_empty() => Some((o, r)),
            _ => None,
        }
    }
}
