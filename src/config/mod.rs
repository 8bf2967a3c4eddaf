use anyhow::Result;
use omc_core::{gateways::notify::NotificationType, usecases::CategorySettings};
use std::{
    collections::HashSet,
    env, fs,
    io::ErrorKind,
    path::Path,
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "openmapcurator.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";
const ENV_NAME_CHAT_BOT_TOKEN: &str = "CHAT_BOT_TOKEN";

const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No categories defined")]
    NoCategories,
    #[error("The fallback category '{0}' is not one of the categories")]
    UnknownFallbackCategory(String),
    #[error("No moderator roles defined")]
    NoModeratorRoles,
    #[error("Unknown notification event '{0}'")]
    UnknownNotificationEvent(String),
    #[error("Missing '{0}' gateway configuration")]
    MissingGateway(&'static str),
    #[error("The {0} must not be zero")]
    Zero(&'static str),
}

pub struct Config {
    pub db: Db,
    pub webserver: WebServer,
    pub workflow: Workflow,
    pub sessions: Sessions,
    pub reconciliation: Reconciliation,
    pub gateways: Gateways,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        if let Ok(token) = env::var(ENV_NAME_CHAT_BOT_TOKEN) {
            cfg.gateways.chat.bot_token = Some(token);
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u32,
}

pub struct WebServer {
    pub ack_deadline: Duration,
}

pub struct Workflow {
    pub category_settings: CategorySettings,
    pub moderator_roles: HashSet<String>,
    pub admin_roles: HashSet<String>,
}

pub struct Sessions {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

pub struct Reconciliation {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

pub struct Gateways {
    pub chat: ChatGateway,
    pub classifier: Option<HttpService>,
    pub name_matcher: Option<HttpService>,
    pub notify: NotifyGateway,
}

pub struct ChatGateway {
    pub api_base_url: String,
    pub application_id: String,
    pub moderation_channel_id: String,
    pub bot_token: Option<String>,
    pub timeout: Duration,
}

pub struct HttpService {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub struct NotifyGateway {
    pub webhook_url: Option<String>,
    pub notify_on: HashSet<NotificationType>,
    pub timeout: Duration,
}

impl From<raw::HttpService> for HttpService {
    fn from(from: raw::HttpService) -> Self {
        let raw::HttpService {
            url,
            api_key,
            timeout,
        } = from;
        Self {
            url,
            api_key: api_key.filter(|key| !key.is_empty()),
            timeout: timeout.unwrap_or(DEFAULT_GATEWAY_TIMEOUT),
        }
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            webserver,
            workflow,
            sessions,
            reconciliation,
            gateway,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db.unwrap_or_default();
        if connection_pool_size == 0 {
            return Err(Error::Zero("connection pool size").into());
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::WebServer { ack_deadline } = webserver.unwrap_or_default();
        let webserver = WebServer { ack_deadline };

        let raw::Workflow {
            fallback_category,
            categories,
            moderator_roles,
            admin_roles,
        } = workflow.unwrap_or_default();
        if categories.is_empty() {
            return Err(Error::NoCategories.into());
        }
        if !categories.contains(&fallback_category) {
            return Err(Error::UnknownFallbackCategory(fallback_category).into());
        }
        if moderator_roles.is_empty() {
            return Err(Error::NoModeratorRoles.into());
        }
        let workflow = Workflow {
            category_settings: CategorySettings {
                fallback: fallback_category,
                categories,
            },
            moderator_roles: moderator_roles.into_iter().collect(),
            admin_roles: admin_roles.into_iter().collect(),
        };

        let raw::Sessions {
            ttl,
            sweep_interval,
        } = sessions.unwrap_or_default();
        if sweep_interval.is_zero() {
            return Err(Error::Zero("session sweep interval").into());
        }
        let sessions = Sessions {
            ttl,
            sweep_interval,
        };

        let raw::Reconciliation {
            initial_delay,
            interval,
            batch_size,
            batch_delay,
        } = reconciliation.unwrap_or_default();
        if interval.is_zero() {
            return Err(Error::Zero("reconciliation interval").into());
        }
        let reconciliation = Reconciliation {
            initial_delay,
            interval,
            batch_size,
            batch_delay,
        };

        let raw::Gateway {
            chat,
            classifier,
            name_matcher,
            notify,
        } = gateway.unwrap_or_default();

        let raw::Chat {
            api_base_url,
            application_id,
            moderation_channel_id,
            bot_token,
            timeout,
        } = chat.ok_or(Error::MissingGateway("chat"))?;
        let chat = ChatGateway {
            api_base_url,
            application_id,
            moderation_channel_id,
            bot_token: bot_token.filter(|token| !token.is_empty()),
            timeout: timeout.unwrap_or(DEFAULT_GATEWAY_TIMEOUT),
        };

        let raw::Notify {
            webhook_url,
            notify_on,
            timeout,
        } = notify.unwrap_or_default();
        let notify_on = notify_on
            .into_iter()
            .map(|name| {
                omc_gateways::notify::notification_type_from_name(&name)
                    .ok_or(Error::UnknownNotificationEvent(name))
            })
            .collect::<std::result::Result<_, _>>()?;
        let notify = NotifyGateway {
            webhook_url: webhook_url.filter(|url| !url.is_empty()),
            notify_on,
            timeout: timeout.unwrap_or(DEFAULT_GATEWAY_TIMEOUT),
        };

        let gateways = Gateways {
            chat,
            classifier: classifier.map(Into::into),
            name_matcher: name_matcher.map(Into::into),
            notify,
        };

        Ok(Self {
            db,
            webserver,
            workflow,
            sessions,
            reconciliation,
            gateways,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config> {
        let raw: raw::Config = toml::from_str(toml)?;
        Config::try_from(raw)
    }

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg: Config = Config::try_load_from_file_or_default(file).unwrap();
        assert!(cfg.workflow.moderator_roles.contains("moderator"));
        assert_eq!(cfg.workflow.category_settings.fallback, "Other");
        assert_eq!(cfg.gateways.notify.notify_on.len(), 3);
        assert!(cfg.gateways.classifier.is_none());
    }

    #[test]
    fn reject_unknown_fallback_category() {
        let err = parse(
            r#"
            [workflow]
            fallback-category = "Misc"
            categories = ["Park"]
            moderator-roles = ["mods"]
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownFallbackCategory(c)) if c == "Misc"
        ));
    }

    #[test]
    fn reject_missing_moderator_roles() {
        let err = parse(
            r#"
            [workflow]
            fallback-category = "Park"
            categories = ["Park"]
            moderator-roles = []
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoModeratorRoles)
        ));
    }

    #[test]
    fn reject_unknown_notification_event() {
        let err = parse(
            r#"
            [gateway.chat]
            api-base-url = "http://localhost"
            application-id = "app"
            moderation-channel-id = "channel"

            [gateway.notify]
            notify-on = ["location-created", "location-moved"]
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownNotificationEvent(e)) if e == "location-moved"
        ));
    }

    #[test]
    fn optional_gateways() {
        let cfg = parse(
            r#"
            [gateway.chat]
            api-base-url = "http://localhost"
            application-id = "app"
            moderation-channel-id = "channel"
            bot-token = ""

            [gateway.classifier]
            url = "http://localhost/classify"
            api-key = "secret"
            timeout = "3s"

            [gateway.notify]
            webhook-url = "http://localhost/hook"
            notify-on = ["location-removed"]
            "#,
        )
        .unwrap();
        assert!(cfg.gateways.chat.bot_token.is_none());
        assert_eq!(cfg.gateways.chat.timeout, DEFAULT_GATEWAY_TIMEOUT);
        let classifier = cfg.gateways.classifier.unwrap();
        assert_eq!(classifier.api_key.as_deref(), Some("secret"));
        assert_eq!(classifier.timeout, Duration::from_secs(3));
        assert!(cfg.gateways.name_matcher.is_none());
        assert_eq!(
            cfg.gateways.notify.notify_on,
            HashSet::from([NotificationType::LocationRemoved])
        );
    }
}
