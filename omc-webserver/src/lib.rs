#[macro_use]
extern crate log;

use std::sync::Arc;

use omc_core::sessions::SessionStore;
use omc_db_sqlite::Connections;

mod web;

pub use web::{Cfg, Gateways};

pub async fn run(
    connections: Connections,
    sessions: Arc<dyn SessionStore>,
    cfg: Cfg,
    gateways: Gateways,
) {
    web::run(connections, sessions, cfg, gateways).await;
}
