//! CLI entry point for the CampusNet API server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use campusnet_api::config::AppConfig;
use campusnet_api::run_server;
use campusnet_api::state::AppState;
use campusnet_graph::{CampusGraph, GraphClient, MemoryGraph, QueryExecutor};

#[derive(Parser)]
#[command(name = "campusnet-api")]
#[command(about = "REST API for the campus social graph")]
struct Cli {
    /// Neo4j bolt URI.
    #[arg(long, env = "NEO4J_URI")]
    neo4j_uri: Option<String>,

    /// Neo4j user.
    #[arg(long, env = "NEO4J_USER")]
    neo4j_user: Option<String>,

    /// Neo4j password.
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    neo4j_password: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file prefix (default: campusnet).
    #[arg(short, long, default_value = "campusnet")]
    config: String,

    /// Serve from a process-local in-memory graph instead of Neo4j.
    #[arg(long)]
    memory: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(uri) = &self.neo4j_uri {
            config.neo4j.uri = uri.clone();
        }
        if let Some(user) = &self.neo4j_user {
            config.neo4j.user = user.clone();
        }
        if let Some(password) = &self.neo4j_password {
            config.neo4j.password = password.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    cli.apply(&mut config);

    let executor: Arc<dyn QueryExecutor> = if cli.memory {
        tracing::warn!("Serving from the in-memory graph; data is lost on exit");
        Arc::new(MemoryGraph::new())
    } else {
        Arc::new(GraphClient::connect(&config.neo4j).await?)
    };

    tracing::info!(
        endpoints = ?config.relations.endpoints,
        duplicates = ?config.relations.duplicates,
        "Relationship policy"
    );
    let graph = CampusGraph::new(executor).with_policy(config.relations);

    run_server(AppState::new(graph), &config.server).await?;
    Ok(())
}
