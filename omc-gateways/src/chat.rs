use std::time::Duration;

use anyhow::Result;
use reqwest::{blocking::Client, StatusCode};

use omc_boundary::{ButtonStyle, ChannelMessage, Component, CustomId, FollowUp, PostedMessage};
use omc_core::gateways::chat::{
    FollowUpGateway, ModerationChannel, RequestMessage, AMEND_ACTION, APPROVE_ACTION, DENY_ACTION,
};
use omc_entities::id::MessageId;

use crate::{check_status, http_client};

/// REST client of the chat platform.
#[derive(Debug, Clone)]
pub struct ChatClient {
    api_base_url: String,
    bot_token: String,
    application_id: String,
    moderation_channel_id: String,
    client: Client,
}

impl ChatClient {
    pub fn new(
        api_base_url: impl Into<String>,
        bot_token: impl Into<String>,
        application_id: impl Into<String>,
        moderation_channel_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            api_base_url,
            bot_token: bot_token.into(),
            application_id: application_id.into(),
            moderation_channel_id: moderation_channel_id.into(),
            client: http_client(timeout)?,
        })
    }

    fn channel_messages_url(&self) -> String {
        let Self {
            api_base_url,
            moderation_channel_id,
            ..
        } = self;
        format!("{api_base_url}/channels/{moderation_channel_id}/messages")
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.bot_token)
    }
}

pub fn moderation_message(message: &RequestMessage) -> ChannelMessage {
    let RequestMessage { title, body } = message;
    ChannelMessage {
        content: format!("**{title}**\n{body}"),
        components: vec![
            Component::button(CustomId::new(APPROVE_ACTION), "Approve", ButtonStyle::Success),
            Component::button(CustomId::new(DENY_ACTION), "Dismiss", ButtonStyle::Danger),
            Component::button(CustomId::new(AMEND_ACTION), "Modify", ButtonStyle::Secondary),
        ],
    }
}

impl ModerationChannel for ChatClient {
    fn post_request(&self, message: &RequestMessage) -> Result<MessageId> {
        let response = self
            .client
            .post(self.channel_messages_url())
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&moderation_message(message))
            .send()?;
        let PostedMessage { id } = check_status(response)?.json()?;
        log::debug!("Posted moderation message {id}");
        Ok(id.into())
    }

    fn message_exists(&self, message_id: &MessageId) -> Result<bool> {
        let url = format!("{}/{}", self.channel_messages_url(), message_id);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response)?;
        Ok(true)
    }
}

impl FollowUpGateway for ChatClient {
    fn follow_up(&self, interaction_token: &str, content: &str, ephemeral: bool) -> Result<()> {
        let Self {
            api_base_url,
            application_id,
            ..
        } = self;
        let url = format!("{api_base_url}/webhooks/{application_id}/{interaction_token}");
        let payload = FollowUp {
            content: content.to_owned(),
            ephemeral,
        };
        let response = self.client.post(url).json(&payload).send()?;
        check_status(response)?;
        Ok(())
    }
}
