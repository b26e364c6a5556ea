use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use shard_pager::api::handlers::{self, AppContext};
use shard_pager::api::protocol::{
    ENDPOINT_INGEST, ENDPOINT_PAGE, ENDPOINT_PAGE_NEXT, ENDPOINT_PAGE_PREV, ENDPOINT_PAGE_ROWS,
    ENDPOINT_SHARD,
};
use shard_pager::store::gateway::ShardStore;
use shard_pager::worker::executor::ShardWorker;
use std::net::SocketAddr;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;
    let mut data_dir: PathBuf = std::env::var("DATA_DIR")
        .unwrap_or_else(|_| "shard-data".to_string())
        .into();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--data-dir" => {
                data_dir = args[i + 1].clone().into();
                i += 2;
            }
            "--help" => {
                eprintln!("Usage: {} [--bind <addr:port>] [--data-dir <path>]", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Opening shard store at {}", data_dir.display());
    let store = ShardStore::shared(&data_dir).await?;

    let worker = ShardWorker::spawn();
    let ctx = AppContext::new(worker, store);

    let app = Router::new()
        .route(ENDPOINT_INGEST, post(handlers::handle_ingest))
        .route(ENDPOINT_PAGE, get(handlers::handle_page))
        .route(ENDPOINT_PAGE_NEXT, post(handlers::handle_next_page))
        .route(ENDPOINT_PAGE_PREV, post(handlers::handle_prev_page))
        .route(ENDPOINT_PAGE_ROWS, post(handlers::handle_set_rows_per_page))
        .route(ENDPOINT_SHARD, get(handlers::handle_get_shard))
        .layer(Extension(ctx));

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
