use std::{thread, time::Duration};

use super::*;
use error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub checked: usize,
    pub purged: usize,
    pub failed: usize,
}

/// Purges open requests whose moderation message is gone.
///
/// Requests are only purged if the channel definitely reports
/// the message as missing. Pauses after every `batch_size` checks.
pub fn reconcile_requests(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    batch_size: usize,
    batch_delay: Duration,
) -> Result<Reconciliation> {
    let requests = usecases::open_change_requests(&connections.shared()?)?;
    info!(
        "Checking {} open request(s) for orphaned messages",
        requests.len()
    );
    let mut summary = Reconciliation::default();
    for (i, request) in requests.iter().enumerate() {
        if i > 0 && batch_size > 0 && i % batch_size == 0 {
            thread::sleep(batch_delay);
        }
        summary.checked += 1;
        let message_id = &request.message_id;
        match channel.message_exists(message_id) {
            Ok(true) => {
                debug!("Message {message_id} of request {} still exists", request.id);
            }
            Ok(false) => match purge(connections, message_id) {
                Ok(()) => {
                    debug!("Purged request {} of deleted message {message_id}", request.id);
                    summary.purged += 1;
                }
                Err(err) => {
                    warn!("Failed to purge request {}: {err}", request.id);
                    summary.failed += 1;
                }
            },
            Err(err) => {
                warn!(
                    "Failed to check message {message_id} of request {}: {err}",
                    request.id
                );
                summary.failed += 1;
            }
        }
    }
    let Reconciliation {
        checked,
        purged,
        failed,
    } = summary;
    info!("Reconciled {checked} open request(s): {purged} purged, {failed} failed");
    Ok(summary)
}

fn purge(connections: &sqlite::Connections, message_id: &MessageId) -> Result<()> {
    connections
        .exclusive()?
        .transaction(|conn| usecases::purge_orphaned_request(conn, message_id))
        .map_err(AppError::from)
}
