use duration_str::{deserialize_duration, deserialize_option_duration};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("openmapcurator.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub webserver: Option<WebServer>,
    pub workflow: Option<Workflow>,
    pub sessions: Option<Sessions>,
    pub reconciliation: Option<Reconciliation>,
    pub gateway: Option<Gateway>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub connection_sqlite: String,
    pub connection_pool_size: u32,
}

impl Default for Db {
    fn default() -> Self {
        Config::default().db.expect("DB configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WebServer {
    #[serde(deserialize_with = "deserialize_duration")]
    pub ack_deadline: Duration,
}

impl Default for WebServer {
    fn default() -> Self {
        Config::default()
            .webserver
            .expect("Webserver configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Workflow {
    pub fallback_category: String,
    pub categories: Vec<String>,
    pub moderator_roles: Vec<String>,
    #[serde(default)]
    pub admin_roles: Vec<String>,
}

impl Default for Workflow {
    fn default() -> Self {
        Config::default().workflow.expect("Workflow configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sessions {
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub sweep_interval: Duration,
}

impl Default for Sessions {
    fn default() -> Self {
        Config::default().sessions.expect("Sessions configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Reconciliation {
    #[serde(deserialize_with = "deserialize_duration")]
    pub initial_delay: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
    pub batch_size: usize,
    #[serde(deserialize_with = "deserialize_duration")]
    pub batch_delay: Duration,
}

impl Default for Reconciliation {
    fn default() -> Self {
        Config::default()
            .reconciliation
            .expect("Reconciliation configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub chat: Option<Chat>,
    pub classifier: Option<HttpService>,
    pub name_matcher: Option<HttpService>,
    pub notify: Option<Notify>,
}

impl Default for Gateway {
    fn default() -> Self {
        Config::default().gateway.expect("Gateway configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Chat {
    pub api_base_url: String,
    pub application_id: String,
    pub moderation_channel_id: String,
    pub bot_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpService {
    pub url: String,
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Notify {
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub notify_on: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for Notify {
    fn default() -> Self {
        Gateway::default()
            .notify
            .expect("Notify gateway configuration")
    }
}
