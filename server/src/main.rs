use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_server::{Collection, Item};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "todo-server")]
#[command(about = "In-memory todo collection served over HTTP")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// JSON file holding an array of todos to start with
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_server=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let collection = match &args.seed {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            let items: Vec<Item> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing seed file {}", path.display()))?;
            tracing::info!(count = items.len(), "seeded collection");
            Collection::from_items(items)?
        }
        None => Collection::new(),
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    todo_server::run_until(listener, collection, todo_server::shutdown_signal()).await?;
    Ok(())
}
