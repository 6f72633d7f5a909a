//! Terminal entry point.

use anyhow::Context;

use stocktake_app::{load_configured, shell, AppConfig, Session};
use stocktake_core::default_locations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stocktake_observability::init();

    let config = AppConfig::from_env();
    tracing::info!(catalog = %config.catalog, export_dir = %config.export_dir.display(), "starting");

    let catalog = load_configured(&config.catalog).await;
    let mut session = Session::new(default_locations(), catalog);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    shell::run(&mut session, stdin.lock(), &mut stdout, &config.export_dir)
        .context("terminal session failed")?;

    tracing::info!(counts = session.counts().len(), "session closed; counts discarded");
    Ok(())
}
