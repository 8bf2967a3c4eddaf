use super::*;

/// Evicts idle edit sessions.
pub fn sweep_sessions(sessions: &dyn SessionStore) -> usize {
    let evicted = sessions.sweep(Timestamp::now());
    if evicted > 0 {
        info!("Evicted {evicted} idle edit session(s)");
    } else {
        debug!("No idle edit sessions");
    }
    evicted
}

pub fn pending_request_count(connections: &sqlite::Connections) -> Result<usize> {
    Ok(usecases::count_pending_requests(&connections.shared()?)?)
}
