use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

/// Fields shared by all inbound interactions.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct InteractionContext {
    pub id      : String,
    /// Token for follow-up messages of deferred responses.
    pub token   : String,
    pub user_id : String,
    /// Role ids of the user in the chat platform.
    #[serde(default)]
    pub roles   : Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    Command(CommandInteraction),
    Component(ComponentInteraction),
    Modal(ModalInteraction),
    Autocomplete(AutocompleteInteraction),
}

impl Interaction {
    pub fn context(&self) -> &InteractionContext {
        match self {
            Self::Command(x) => &x.context,
            Self::Component(x) => &x.context,
            Self::Modal(x) => &x.context,
            Self::Autocomplete(x) => &x.context,
        }
    }
}

/// A slash command like `request edit` with named string options.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct CommandInteraction {
    #[serde(flatten)]
    pub context: InteractionContext,
    pub name: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// A click on a button or a choice in a select menu.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ComponentInteraction {
    #[serde(flatten)]
    pub context: InteractionContext,
    pub custom_id: String,
    #[serde(default)]
    pub values: Vec<String>,
    /// The message that carries the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// A submitted form.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ModalInteraction {
    #[serde(flatten)]
    pub context: InteractionContext,
    pub custom_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// A request for suggestions while the user is typing an option.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct AutocompleteInteraction {
    #[serde(flatten)]
    pub context: InteractionContext,
    pub command: String,
    pub focused: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionResponse {
    Message(Message),
    Modal(Modal),
    Choices { choices: Vec<Choice> },
    /// The result will be delivered as a follow-up message.
    Deferred,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Message {
    pub content: String,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl Message {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
            components: vec![],
        }
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Button {
        custom_id: String,
        label: String,
        style: ButtonStyle,
    },
    Select {
        custom_id: String,
        placeholder: String,
        options: Vec<Choice>,
    },
}

impl Component {
    pub fn button(custom_id: impl ToString, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self::Button {
            custom_id: custom_id.to_string(),
            label: label.into(),
            style,
        }
    }

    pub fn select(
        custom_id: impl ToString,
        placeholder: impl Into<String>,
        options: Vec<Choice>,
    ) -> Self {
        Self::Select {
            custom_id: custom_id.to_string(),
            placeholder: placeholder.into(),
            options,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Modal {
    pub custom_id: String,
    pub title: String,
    pub fields: Vec<TextField>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct TextField {
    pub name      : String,
    pub label     : String,
    #[serde(default)]
    pub value     : String,
    #[serde(default)]
    pub required  : bool,
    #[serde(default)]
    pub multiline : bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// A message posted into a channel by the bot.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ChannelMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct PostedMessage {
    pub id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct FollowUp {
    pub content: String,
    #[serde(default)]
    pub ephemeral: bool,
}

/// The opaque identifier of a component or form.
///
/// Encoded as `action:target:aux:user` where every segment
/// except the action is optional and empty segments are omitted
/// from the end. Parsing never fails: missing or empty segments
/// become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomId {
    pub action: String,
    pub target: Option<String>,
    pub aux: Option<String>,
    pub user: Option<String>,
}

impl CustomId {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn aux(mut self, aux: impl Into<String>) -> Self {
        self.aux = Some(aux.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn parse(s: &str) -> Self {
        let mut segments = s.splitn(4, ':').map(str::trim);
        let mut next = || {
            segments
                .next()
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
        };
        let action = next().unwrap_or_default();
        let target = next();
        let aux = next();
        let user = next();
        Self {
            action,
            target,
            aux,
            user,
        }
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let segments = [&self.target, &self.aux, &self.user];
        let len = segments
            .iter()
            .rposition(|s| s.is_some())
            .map_or(0, |pos| pos + 1);
        f.write_str(&self.action)?;
        for segment in &segments[..len] {
            write!(f, ":{}", segment.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_component_interaction() {
        let json = r#"{
            "type": "component",
            "id": "1",
            "token": "t",
            "user_id": "u",
            "custom_id": "approve",
            "message_id": "m"
        }"#;
        let Interaction::Component(c) = serde_json::from_str::<Interaction>(json).unwrap() else {
            panic!("not a component interaction");
        };
        assert_eq!(c.context.user_id, "u");
        assert!(c.context.roles.is_empty());
        assert!(c.values.is_empty());
        assert_eq!(c.message_id.as_deref(), Some("m"));
    }

    #[test]
    fn encode_responses() {
        let json = serde_json::to_value(InteractionResponse::Deferred).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "deferred" }));
        let json = serde_json::to_value(InteractionResponse::Message(Message::ephemeral("hi")))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "message", "content": "hi", "ephemeral": true })
        );
    }

    #[test]
    fn custom_id_format() {
        let id = CustomId::new("edit_field").target("abc").user("u1");
        assert_eq!(id.to_string(), "edit_field:abc::u1");
        assert_eq!(CustomId::parse(&id.to_string()), id);
        assert_eq!(CustomId::new("approve").to_string(), "approve");
    }

    #[test]
    fn parse_custom_ids_defensively() {
        assert_eq!(CustomId::parse(""), CustomId::default());
        assert_eq!(CustomId::parse("deny::"), CustomId::new("deny"));
        let id = CustomId::parse("a:b:c:d:e");
        assert_eq!(id.user.as_deref(), Some("d:e"));
    }
}
