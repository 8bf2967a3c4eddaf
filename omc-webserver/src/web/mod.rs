use std::{collections::HashSet, sync::Arc, time::Duration};

use omc_core::{
    entities::*,
    gateways::{
        chat::{FollowUpGateway, ModerationChannel},
        classify::ClassifierGateway,
        name_match::NameMatchGateway,
        notify::NotificationGateway,
    },
    sessions::SessionStore,
    usecases::CategorySettings,
};
use omc_db_sqlite::Connections;
use rocket::{config::Config as RocketCfg, Rocket, Route};

mod action;
mod dispatch;
mod error;
mod guards;
mod interactions;
mod views;


#[derive(Debug, Clone)]
pub struct Cfg {
    /// The surface expects an answer within this time,
    /// slower handlers are answered with a deferral.
    pub ack_deadline: Duration,
    pub moderator_roles: HashSet<String>,
    pub admin_roles: HashSet<String>,
    pub category_settings: CategorySettings,
}

impl Cfg {
    /// Maps the roles of the chat platform onto a workflow role.
    pub fn role_of(&self, roles: &[String]) -> Role {
        if roles.iter().any(|r| self.admin_roles.contains(r)) {
            return Role::Admin;
        }
        if roles.iter().any(|r| self.moderator_roles.contains(r)) {
            return Role::Moderator;
        }
        Role::Member
    }
}

pub struct Gateways {
    pub channel: Box<dyn ModerationChannel + Send + Sync>,
    pub follow_up: Box<dyn FollowUpGateway + Send + Sync>,
    pub classifier: Option<Box<dyn ClassifierGateway + Send + Sync>>,
    pub name_matcher: Option<Box<dyn NameMatchGateway + Send + Sync>>,
    pub notify: Box<dyn NotificationGateway + Send + Sync>,
}

/// Everything a handler needs, shared between the
/// request handlers and their blocking worker tasks.
pub(crate) struct Backend {
    pub db: Connections,
    pub sessions: Arc<dyn SessionStore>,
    pub gateways: Gateways,
    pub cfg: Cfg,
}

impl Backend {
    pub fn classifier(&self) -> Option<&dyn ClassifierGateway> {
        self.gateways
            .classifier
            .as_deref()
            .map(|c| c as &dyn ClassifierGateway)
    }

    pub fn name_matcher(&self) -> Option<&dyn NameMatchGateway> {
        self.gateways
            .name_matcher
            .as_deref()
            .map(|m| m as &dyn NameMatchGateway)
    }
}

pub(crate) struct InstanceOptions {
    mounts: Vec<(&'static str, Vec<Route>)>,
    rocket_cfg: Option<RocketCfg>,
}

pub(crate) fn rocket_instance(options: InstanceOptions, backend: Backend) -> Rocket<rocket::Build> {
    let InstanceOptions { mounts, rocket_cfg } = options;

    match omc_application::prelude::pending_request_count(&backend.db) {
        Ok(count) => info!("{count} change request(s) are waiting for review"),
        Err(err) => warn!("Unable to count pending change requests: {err}"),
    }

    let r = match rocket_cfg {
        Some(cfg) => rocket::custom(cfg),
        None => rocket::build(),
    };

    let mut instance = r.manage(Arc::new(backend));

    for (m, r) in mounts {
        instance = instance.mount(m, r);
    }
    instance
}

fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![("/", interactions::routes())]
}

pub async fn run(
    db: Connections,
    sessions: Arc<dyn SessionStore>,
    cfg: Cfg,
    gateways: Gateways,
) {
    let options = InstanceOptions {
        mounts: mounts(),
        rocket_cfg: None,
    };
    let backend = Backend {
        db,
        sessions,
        gateways,
        cfg,
    };
    let instance = rocket_instance(options, backend);
    if let Err(err) = instance.launch().await {
        log::error!("Unable to run web server: {err}");
    }
}
