use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use url::Url;

use crate::error::{TreeError, TreeResult};

use super::GitHubClient;

impl GitHubClient {
    /// `{base}/repos/{owner}/{repo}/{segments...}`, each segment percent-encoded.
    pub(super) fn endpoint(&self, segments: &[&str]) -> TreeResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segs = url.path_segments_mut().map_err(|_| {
                TreeError::Transport(format!("api base {} cannot carry a path", self.base_url))
            })?;
            segs.pop_if_empty();
            segs.extend(["repos", self.owner.as_str(), self.repo.as_str()]);
            for s in segments {
                segs.extend(s.split('/').filter(|p| !p.is_empty()));
            }
        }
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(super) fn send(&self, req: RequestBuilder, label: &str) -> TreeResult<Response> {
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| TreeError::Transport(format!("{}: {}", label, e)))?;
        tracing::debug!(
            label,
            status = resp.status().as_u16(),
            url = %resp.url(),
            "remote call"
        );
        Ok(resp)
    }

    pub(super) fn ensure_ok(&self, resp: Response, label: &str) -> TreeResult<Response> {
        check(resp, label, Access::Read)
    }

    /// Like [`ensure_ok`](Self::ensure_ok) for PUT and DELETE, where a 404 keeps its status.
    pub(super) fn ensure_written(&self, resp: Response, label: &str) -> TreeResult<Response> {
        check(resp, label, Access::Write)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Access {
    Read,
    Write,
}

fn check(resp: Response, label: &str, access: Access) -> TreeResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let rate_exhausted = resp
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    let body = resp.text().unwrap_or_default();
    Err(classify(status, rate_exhausted, body, label, access))
}

/// Map a non-success status into the error taxonomy, keeping the body verbatim.
pub(super) fn classify(
    status: StatusCode,
    rate_exhausted: bool,
    body: String,
    label: &str,
    access: Access,
) -> TreeError {
    match status {
        StatusCode::NOT_FOUND if access == Access::Read => {
            TreeError::NotFound(format!("{}: {}", label, body.trim()))
        }
        StatusCode::TOO_MANY_REQUESTS => TreeError::RateLimited {
            status: status.as_u16(),
            body,
        },
        StatusCode::FORBIDDEN if rate_exhausted => TreeError::RateLimited {
            status: status.as_u16(),
            body,
        },
        _ => TreeError::RemoteError {
            status: status.as_u16(),
            body,
        },
    }
}

pub(super) fn decode_err(label: &'static str) -> impl FnOnce(reqwest::Error) -> TreeError {
    move |e| TreeError::Decode(format!("{}: {}", label, e))
}
