//! In-memory GitHub-shaped server for one repository, used by the integration tests and for
//! trying the CLI without network access.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use tokio::sync::RwLock;

use treeward::remote::{
    BlobResponse, BranchCommit, BranchResponse, CommitDetail, ContentMetadata,
    DeleteContentRequest, ObjectRef, PutContentRequest, RepoResponse, TreeItem, TreeItemKind,
    TreeResponse,
};

#[path = "treeward_mock/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "treeward_mock/state.rs"]
mod state;
use self::state::*;
#[path = "treeward_mock/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "treeward_mock/routes.rs"]
mod routes;
use self::routes::*;
#[path = "treeward_mock/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
