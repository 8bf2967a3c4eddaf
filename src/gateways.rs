use anyhow::{anyhow, Result};
use omc_core::gateways::{
    classify::ClassifierGateway,
    name_match::NameMatchGateway,
    notify::{NotificationEvent, NotificationGateway},
};
use omc_gateways::{
    chat::ChatClient, classifier::HttpClassifier, name_matcher::HttpNameMatcher, notify::Notify,
};

use crate::config;

pub fn chat_client(cfg: &config::ChatGateway) -> Result<ChatClient> {
    let config::ChatGateway {
        api_base_url,
        application_id,
        moderation_channel_id,
        bot_token,
        timeout,
    } = cfg;
    let bot_token = bot_token
        .as_deref()
        .ok_or_else(|| anyhow!("No bot token for the chat platform configured"))?;
    if moderation_channel_id.is_empty() {
        return Err(anyhow!("No moderation channel configured"));
    }
    log::info!("Post change requests to channel {moderation_channel_id} via {api_base_url}");
    ChatClient::new(
        api_base_url.as_str(),
        bot_token,
        application_id.as_str(),
        moderation_channel_id.as_str(),
        *timeout,
    )
}

pub fn classifier_gateway(
    cfg: Option<&config::HttpService>,
) -> Result<Option<Box<dyn ClassifierGateway + Send + Sync>>> {
    let Some(cfg) = cfg else {
        log::warn!("No classifier configured: new locations get the fallback category");
        return Ok(None);
    };
    log::info!("Use HTTP classifier ({})", cfg.url);
    let gw = HttpClassifier::new(cfg.url.as_str(), cfg.api_key.clone(), cfg.timeout)?;
    Ok(Some(Box::new(gw)))
}

pub fn name_match_gateway(
    cfg: Option<&config::HttpService>,
) -> Result<Option<Box<dyn NameMatchGateway + Send + Sync>>> {
    let Some(cfg) = cfg else {
        log::info!("No semantic name matcher configured: resolve names by text only");
        return Ok(None);
    };
    log::info!("Use HTTP name matcher ({})", cfg.url);
    let gw = HttpNameMatcher::new(cfg.url.as_str(), cfg.api_key.clone(), cfg.timeout)?;
    Ok(Some(Box::new(gw)))
}

pub fn notification_gateway(
    cfg: &config::NotifyGateway,
) -> Result<Box<dyn NotificationGateway + Send + Sync>> {
    let Some(webhook_url) = &cfg.webhook_url else {
        log::warn!("No change notification webhook configured");
        return Ok(Box::new(DummyNotifyGw));
    };
    log::info!("Send change notifications to {webhook_url}");
    let gw = Notify::new(webhook_url.as_str(), cfg.notify_on.clone(), cfg.timeout)?;
    Ok(Box::new(gw))
}

struct DummyNotifyGw;

impl NotificationGateway for DummyNotifyGw {
    fn notify(&self, event: NotificationEvent) {
        log::debug!(
            "Cannot notify about location {} because no webhook was configured",
            event.location_id()
        );
    }
}
