use anyhow::Context;
use penseek::core::logging::init_logging;
use penseek::{Config, CveStore, ImportLedger, Session, TerminalConsole};

fn main() -> anyhow::Result<()> {
    let config = Config::new(None)?;
    config
        .init()
        .with_context(|| format!("Failed to prepare data directory {:?}", config.base_dir))?;

    init_logging(&config)?;
    tracing::info!(data_dir = %config.base_dir.display(), "starting penseek");

    // No degraded mode: without the store there is nothing to do.
    let store = CveStore::open(&config).context("Failed to open CVE database")?;
    let ledger = ImportLedger::open(&config).context("Failed to open import ledger")?;

    let console = TerminalConsole::new().context("Failed to set up terminal")?;
    let mut session = Session::new(console, store, ledger, config);
    let result = session.run();

    // Restore the terminal before anything is printed.
    drop(session);
    if let Err(e) = &result {
        tracing::error!(error = %e, "session ended with an error");
    }
    result?;

    tracing::info!("exiting");
    Ok(())
}
