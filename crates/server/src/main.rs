//! schemarag server binary.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::load()?;
    server::init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    server::start_server(config).await?;

    Ok(())
}
