use super::*;

/// Listing and blob routes, readable anonymously like a public repository.
fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/repos/:owner/:repo", get(get_repo))
        .route("/repos/:owner/:repo/branches/:branch", get(get_branch))
        .route("/repos/:owner/:repo/git/trees/:tree", get(get_tree))
        .route("/repos/:owner/:repo/git/blobs/:sha", get(get_blob))
}

/// Contents routes; every method requires the bearer token.
fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/repos/:owner/:repo/contents/*path",
            get(get_contents).put(put_contents).delete(delete_contents),
        )
        .layer(middleware::from_fn_with_state(state, require_bearer))
}

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(public_router())
        .merge(authed_router(state.clone()))
        .with_state(state)
}
