use super::*;

#[derive(Parser)]
#[command(name = "treeward-mock")]
#[command(about = "In-memory GitHub-shaped server for one repository", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8787")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    #[arg(long, default_value = "mock")]
    owner: String,

    #[arg(long, default_value = "server")]
    repo: String,

    #[arg(long, default_value = "main")]
    default_branch: String,

    /// Bearer token required by the contents routes
    #[arg(long, default_value = "dev")]
    token: String,

    /// Local directory whose files become the initial repository content
    #[arg(long)]
    seed_dir: Option<PathBuf>,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    treeward::logging::init_stderr();

    let mut store = RepoStore::default();
    if let Some(dir) = &args.seed_dir {
        let n = seed_from_dir(&mut store, dir)
            .with_context(|| format!("seed from {}", dir.display()))?;
        tracing::info!(files = n, dir = %dir.display(), "seeded repository");
    }

    let state = Arc::new(AppState {
        owner: args.owner.clone(),
        repo: args.repo.clone(),
        default_branch: args.default_branch.clone(),
        token: args.token.clone(),
        store: RwLock::new(store),
    });
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("treeward-mock listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
