use super::*;

type Shared = State<Arc<AppState>>;

#[derive(Debug, serde::Deserialize)]
pub(super) struct RefQuery {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct TreeQuery {
    #[serde(default)]
    recursive: Option<String>,
}

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Rejects requests without the configured bearer token.
pub(super) async fn require_bearer(
    State(state): Shared,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };
    let Ok(value) = value.to_str() else {
        return bad_credentials();
    };
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("token "));
    if token != Some(state.token.as_str()) {
        return bad_credentials();
    }
    next.run(req).await
}

fn known_branch(state: &AppState, branch: Option<&str>) -> bool {
    branch.is_none_or(|b| b == state.default_branch)
}

pub(super) async fn get_repo(
    State(state): Shared,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    if !state.is_repo(&owner, &repo) {
        return not_found();
    }
    let store = state.store.read().await;
    Json(RepoResponse {
        full_name: state.full_name(),
        description: Some("treeward mock repository".to_string()),
        default_branch: Some(state.default_branch.clone()),
        size: Some(store.total_bytes().div_ceil(1024)),
    })
    .into_response()
}

pub(super) async fn get_branch(
    State(state): Shared,
    Path((owner, repo, branch)): Path<(String, String, String)>,
) -> Response {
    if !state.is_repo(&owner, &repo) || branch != state.default_branch {
        return not_found();
    }
    let store = state.store.read().await;
    Json(BranchResponse {
        name: branch,
        commit: BranchCommit {
            sha: store.commit_sha(),
            commit: Some(CommitDetail {
                tree: Some(ObjectRef {
                    sha: store.tree_sha(),
                }),
            }),
        },
    })
    .into_response()
}

pub(super) async fn get_tree(
    State(state): Shared,
    Path((owner, repo, tree)): Path<(String, String, String)>,
    Query(q): Query<TreeQuery>,
) -> Response {
    if !state.is_repo(&owner, &repo) {
        return not_found();
    }
    let store = state.store.read().await;
    if tree != store.tree_sha() {
        return not_found();
    }
    let recursive = q.recursive.as_deref().is_some_and(|r| !r.is_empty() && r != "0");
    let items = store
        .tree_items()
        .into_iter()
        .filter(|item| recursive || !item.path.contains('/'))
        .collect();
    Json(TreeResponse {
        sha: tree,
        tree: items,
        truncated: false,
    })
    .into_response()
}

pub(super) async fn get_blob(
    State(state): Shared,
    Path((owner, repo, sha)): Path<(String, String, String)>,
) -> Response {
    if !state.is_repo(&owner, &repo) {
        return not_found();
    }
    let store = state.store.read().await;
    let Some(bytes) = store.blob(&sha) else {
        return not_found();
    };
    Json(BlobResponse {
        sha,
        size: bytes.len() as u64,
        content: wrapped_base64(bytes),
        encoding: "base64".to_string(),
    })
    .into_response()
}

pub(super) async fn get_contents(
    State(state): Shared,
    Path((owner, repo, path)): Path<(String, String, String)>,
    Query(q): Query<RefQuery>,
) -> Response {
    if !state.is_repo(&owner, &repo) || !known_branch(&state, q.git_ref.as_deref()) {
        return not_found();
    }
    let path = path.trim_matches('/');
    let store = state.store.read().await;
    if let Some(meta) = store.metadata(path) {
        return Json(meta).into_response();
    }
    let listing = store.dir_listing(path);
    if listing.is_empty() {
        return not_found();
    }
    Json(listing).into_response()
}

pub(super) async fn put_contents(
    State(state): Shared,
    Path((owner, repo, path)): Path<(String, String, String)>,
    Json(body): Json<PutContentRequest>,
) -> Response {
    if !state.is_repo(&owner, &repo) || !known_branch(&state, Some(body.branch.as_str())) {
        return not_found();
    }
    let path = path.trim_matches('/');
    if path.is_empty() {
        return unprocessable("path is required");
    }
    let cleaned: String = body.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = match STANDARD.decode(cleaned.as_bytes()) {
        Ok(b) => b,
        Err(err) => return bad_request(&format!("content is not valid base64: {}", err)),
    };

    let mut store = state.store.write().await;
    let existing = store.file_sha(path).map(str::to_string);
    let status = match (existing.as_deref(), body.sha.as_deref()) {
        (Some(_), None) => {
            return unprocessable("Invalid request.\n\n\"sha\" wasn't supplied.");
        }
        (Some(current), Some(given)) if current != given => {
            return conflict(&format!("{} does not match {}", path, given));
        }
        (None, Some(_)) => return conflict(&format!("{} does not exist", path)),
        (Some(_), Some(_)) => StatusCode::OK,
        (None, None) => StatusCode::CREATED,
    };

    store.put(path, bytes);
    tracing::info!(path, message = %body.message, "put contents");
    let meta = store.metadata(path);
    let commit = store.commit_sha();
    (
        status,
        Json(serde_json::json!({
            "content": meta,
            "commit": {"sha": commit, "message": body.message},
        })),
    )
        .into_response()
}

pub(super) async fn delete_contents(
    State(state): Shared,
    Path((owner, repo, path)): Path<(String, String, String)>,
    Json(body): Json<DeleteContentRequest>,
) -> Response {
    if !state.is_repo(&owner, &repo) || !known_branch(&state, Some(body.branch.as_str())) {
        return not_found();
    }
    let path = path.trim_matches('/');
    let mut store = state.store.write().await;
    match store.file_sha(path) {
        None => return not_found(),
        Some(current) if current != body.sha => {
            return conflict(&format!("{} does not match {}", path, body.sha));
        }
        Some(_) => {}
    }
    store.remove(path);
    tracing::info!(path, message = %body.message, "delete contents");
    let commit = store.commit_sha();
    Json(serde_json::json!({
        "content": null,
        "commit": {"sha": commit, "message": body.message},
    }))
    .into_response()
}
