use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use omc_core::sessions::{InMemorySessionStore, SessionStore};
use omc_db_sqlite::Connections;

mod config;
mod gateways;
mod tasks;

#[derive(Parser)]
#[command(version, about = "Request & approval workflow for map location changes")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database URL, overrides the configuration
    #[arg(long, value_name = "URL")]
    db_url: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let mut cfg = config::Config::try_load_from_file_or_default(args.config.as_ref())?;
    if let Some(db_url) = args.db_url {
        cfg.db.conn_sqlite = db_url;
    }
    let config::Config {
        db,
        webserver,
        workflow,
        sessions,
        reconciliation,
        gateways: gateway_cfg,
    } = cfg;

    log::info!("Connecting to SQLite database {}", db.conn_sqlite);
    let connections = Connections::init(&db.conn_sqlite, db.conn_pool_size)?;
    omc_db_sqlite::run_embedded_database_migrations(connections.exclusive()?)?;

    let ttl = time::Duration::try_from(sessions.ttl)
        .map_err(|_| anyhow!("Invalid session TTL: {:?}", sessions.ttl))?;
    let session_store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(ttl));

    let chat = gateways::chat_client(&gateway_cfg.chat)?;
    let web_gateways = omc_webserver::Gateways {
        channel: Box::new(chat.clone()),
        follow_up: Box::new(chat.clone()),
        classifier: gateways::classifier_gateway(gateway_cfg.classifier.as_ref())?,
        name_matcher: gateways::name_match_gateway(gateway_cfg.name_matcher.as_ref())?,
        notify: gateways::notification_gateway(&gateway_cfg.notify)?,
    };

    let web_cfg = omc_webserver::Cfg {
        ack_deadline: webserver.ack_deadline,
        moderator_roles: workflow.moderator_roles,
        admin_roles: workflow.admin_roles,
        category_settings: workflow.category_settings,
    };

    // The blocking HTTP clients must be created outside of the runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        tokio::spawn(tasks::sweep_idle_sessions(
            Arc::clone(&session_store),
            sessions,
        ));
        tokio::spawn(tasks::reconcile_orphaned_requests(
            connections.clone(),
            chat,
            reconciliation,
        ));
        omc_webserver::run(connections, session_store, web_cfg, web_gateways).await;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    // Panicking handlers must unwind into the `JoinError` of their task
    #[test]
    fn no_build_profile_aborts_on_panic() {
        let manifest: toml::Table = toml::from_str(include_str!("../Cargo.toml")).unwrap();
        let profiles = manifest["profile"].as_table().unwrap();
        assert!(profiles.contains_key("production"));
        for (name, profile) in profiles {
            assert_ne!(
                profile.get("panic").and_then(toml::Value::as_str),
                Some("abort"),
                "profile {name}"
            );
        }
    }
}
