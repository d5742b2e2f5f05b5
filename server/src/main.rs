use anyhow::Result;
use axum::Router;
use clap::Parser;
use course_core::RankingConfig;
use server::{build_app, Settings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Unified course table (.csv, .jsonl or .json)
    #[arg(long, default_value = "data/processed/unified_courses.csv")]
    corpus: PathBuf,
    /// Append-only feedback file
    #[arg(long, default_value = "course_feedback.csv")]
    feedback: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Score multiplier for exact phrase matches
    #[arg(long, default_value_t = 1.3)]
    boost_factor: f32,
    /// Records ranked per query
    #[arg(long, default_value_t = 30)]
    top_n: usize,
    /// Cards returned after level filtering
    #[arg(long, default_value_t = server::DEFAULT_DISPLAY_LIMIT)]
    display_limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let settings = Settings {
        corpus: args.corpus,
        feedback: args.feedback,
        ranking: RankingConfig { boost_factor: args.boost_factor, top_n: args.top_n },
        display_limit: args.display_limit,
    };
    let app: Router = build_app(settings)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
