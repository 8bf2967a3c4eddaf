use omc_entities::id::MessageId;

/// Actions of the controls attached to every moderation message.
pub const APPROVE_ACTION: &str = "approve";
pub const DENY_ACTION: &str = "deny";
pub const AMEND_ACTION: &str = "amend";

/// The content of a moderation message with Approve/Dismiss controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    pub title: String,
    pub body: String,
}

/// The channel in which moderators review requests.
pub trait ModerationChannel {
    /// Posts a message with the moderation controls attached.
    fn post_request(&self, message: &RequestMessage) -> anyhow::Result<MessageId>;

    /// `Ok(false)` means that the message is definitely gone.
    fn message_exists(&self, message_id: &MessageId) -> anyhow::Result<bool>;
}

/// Delivers results of deferred interactions.
pub trait FollowUpGateway {
    fn follow_up(&self, interaction_token: &str, content: &str, ephemeral: bool)
        -> anyhow::Result<()>;
}
