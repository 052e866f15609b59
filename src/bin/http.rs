use mlpt::{AppConfig, SqliteStore, http_api, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init_tracing(&config.log_filter);
    let store = SqliteStore::open(&config.database)?;

    println!("mlpt HTTP API listening on http://{}", config.http_addr);
    http_api::serve(config.http_addr, store).await?;
    Ok(())
}
