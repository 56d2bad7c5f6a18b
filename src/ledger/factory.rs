use crate::config::{LedgerBackend, LedgerConfig};
use crate::error::{AppError, Result};
use crate::ledger::{InMemoryLedger, OrderLedger, SledLedger};
use std::sync::Arc;

/// Create an order ledger based on configuration
pub async fn create_ledger(config: &LedgerConfig) -> Result<Arc<dyn OrderLedger>> {
    match config.backend {
        LedgerBackend::Memory => {
            tracing::info!("Initializing in-memory order ledger");
            let ledger = InMemoryLedger::new();
            if let Some(ref seed) = config.seed_file {
                ledger.load_json_file(seed).await?;
            }
            Ok(Arc::new(ledger))
        }

        LedgerBackend::Sled => {
            let path = config.path.as_ref().ok_or_else(|| {
                AppError::Configuration("Sled backend requires 'path' configuration".to_string())
            })?;

            tracing::info!(path = ?path, "Initializing Sled order ledger");

            let ledger = SledLedger::new(path)?;
            if let Some(ref seed) = config.seed_file {
                ledger.load_json_file(seed).await?;
            }
            Ok(Arc::new(ledger))
        }
    }
}

/// Create an empty in-memory ledger (for testing and development)
pub fn create_in_memory_ledger() -> Arc<dyn OrderLedger> {
    Arc::new(InMemoryLedger::new())
}
