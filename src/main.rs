use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use mediasort::config::MediaDirs;
use mediasort::date::EmbeddedReader;
use mediasort::server::{build_router, AppState};
use mediasort::walk::organize;

#[derive(Parser)]
#[command(name = "mediasort", version, about = "Organize photo and video files into a date-partitioned archive")]
struct Cli {
    /// Install root holding the input/ and output/ directories
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Port for the trigger endpoint
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Run a single organization pass and exit instead of serving
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let dirs = MediaDirs::resolve(&cli.root)?;
    info!(input = %dirs.input.display(), output = %dirs.output.display(), "media directories ready");

    if cli.once {
        let summary = organize(&dirs.input, &dirs.output, &EmbeddedReader)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let app = build_router(AppState { dirs });
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("mediasort listening on http://127.0.0.1:{}", cli.port);
    axum::serve(listener, app).await?;

    Ok(())
}
