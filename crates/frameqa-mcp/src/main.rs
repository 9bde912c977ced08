use anyhow::Context;
use clap::Parser;
use frameqa_mcp::{
    config::{Cli, Command},
    http, stdio, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries the stdio transport, so logs always go to stderr.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frameqa_mcp=info,frameqa_figma=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = AppState::from_config(&cli).context("invalid Figma API configuration")?;

    match cli.command() {
        Command::Serve => http::serve(state, cli.addr()).await,
        Command::Stdio => stdio::serve(state).await,
    }
}
