use std::sync::Arc;

use omc_application::prelude::{reconcile_requests, sweep_sessions};
use omc_core::sessions::SessionStore;
use omc_db_sqlite::Connections;
use omc_gateways::chat::ChatClient;

use crate::config;

/// Evicts idle edit sessions.
pub async fn sweep_idle_sessions(sessions: Arc<dyn SessionStore>, cfg: config::Sessions) {
    let mut interval = tokio::time::interval(cfg.sweep_interval);
    loop {
        interval.tick().await;
        sweep_sessions(sessions.as_ref());
    }
}

/// Periodically purges open requests whose moderation message was deleted.
pub async fn reconcile_orphaned_requests(
    connections: Connections,
    channel: ChatClient,
    cfg: config::Reconciliation,
) {
    let config::Reconciliation {
        initial_delay,
        interval,
        batch_size,
        batch_delay,
    } = cfg;
    tokio::time::sleep(initial_delay).await;
    let mut interval = tokio::time::interval(interval);
    loop {
        interval.tick().await;
        let connections = connections.clone();
        let channel = channel.clone();
        let task = tokio::task::spawn_blocking(move || {
            reconcile_requests(&connections, &channel, batch_size, batch_delay)
        });
        match task.await {
            // The summary has already been logged
            Ok(Ok(_)) => {}
            Ok(Err(err)) => log::warn!("Reconciliation failed: {err}"),
            Err(err) => log::error!("Reconciliation task aborted: {err}"),
        }
    }
}
