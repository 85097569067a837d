use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use trivia_api_lib::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env_and_file()?;
    tracing::info!(
        "[Trivia] Starting with database {} on {}",
        config.database_path.display(),
        config.bind_addr
    );
    trivia_api_lib::run(config).await
}
