//! Bookmarkable projection of the current target and filters, encoded as a
//! `key=value&...` fragment.

use url::form_urlencoded;

use crate::view::ViewState;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionAddress {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
    pub search: Option<String>,
    pub extension: Option<String>,
}

impl SessionAddress {
    pub fn new(owner: &str, repo: &str, branch: Option<&str>) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: non_empty(branch),
            search: None,
            extension: None,
        }
    }

    pub fn with_view(mut self, view: &ViewState) -> Self {
        self.search = non_empty(Some(&view.search));
        self.extension = non_empty(Some(&view.extension));
        self
    }

    /// `#owner=..&repo=..[&branch=..][&q=..][&ext=..]`
    pub fn to_fragment(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        ser.append_pair("owner", &self.owner);
        ser.append_pair("repo", &self.repo);
        if let Some(b) = &self.branch {
            ser.append_pair("branch", b);
        }
        if let Some(q) = &self.search {
            ser.append_pair("q", q);
        }
        if let Some(e) = &self.extension {
            ser.append_pair("ext", e);
        }
        format!("#{}", ser.finish())
    }

    /// Parse a fragment (leading `#` optional). Owner and repo are required.
    pub fn parse(fragment: &str) -> Option<Self> {
        let raw = fragment.trim().trim_start_matches('#');
        let mut out = SessionAddress::default();
        for (k, v) in form_urlencoded::parse(raw.as_bytes()) {
            let v = v.trim().to_string();
            match k.as_ref() {
                "owner" => out.owner = v,
                "repo" => out.repo = v,
                "branch" => out.branch = non_empty(Some(&v)),
                "q" => out.search = non_empty(Some(&v)),
                "ext" => out.extension = non_empty(Some(&v)),
                _ => {}
            }
        }
        if out.owner.is_empty() || out.repo.is_empty() {
            return None;
        }
        Some(out)
    }

    /// Apply the filter part of the address onto a view state.
    pub fn apply_to(&self, view: &mut ViewState) {
        view.set_search(self.search.as_deref().unwrap_or(""));
        view.set_extension(self.extension.as_deref().unwrap_or(""));
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "tests/address_tests.rs"]
mod tests;
