use std::{collections::HashSet, thread, time::Duration};

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Serialize;

use omc_core::gateways::notify::{NotificationEvent, NotificationGateway, NotificationType};

use crate::http_client;

/// Posts change notifications to a webhook.
#[derive(Debug, Clone)]
pub struct Notify {
    webhook_url: String,
    client: Client,
    notify_on: HashSet<NotificationType>,
}

#[derive(Debug, Clone, Serialize)]
struct ChangeNotification {
    event: &'static str,
    location_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Notify {
    pub fn new(
        webhook_url: impl Into<String>,
        notify_on: HashSet<NotificationType>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            webhook_url: webhook_url.into(),
            client: http_client(timeout)?,
            notify_on,
        })
    }

    fn skip(&self, ev: &NotificationEvent) -> bool {
        !self.notify_on.contains(&ev.kind())
    }
}

pub const fn event_name(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::LocationCreated => "location-created",
        NotificationType::LocationUpdated => "location-updated",
        NotificationType::LocationRemoved => "location-removed",
    }
}

pub fn notification_type_from_name(name: &str) -> Option<NotificationType> {
    use NotificationType as T;
    [T::LocationCreated, T::LocationUpdated, T::LocationRemoved]
        .into_iter()
        .find(|kind| event_name(*kind) == name)
}

fn change_notification(event: &NotificationEvent) -> ChangeNotification {
    use NotificationEvent as E;
    let name = match event {
        E::LocationCreated { location } | E::LocationUpdated { location } => {
            Some(location.name.clone())
        }
        E::LocationRemoved { .. } => None,
    };
    ChangeNotification {
        event: event_name(event.kind()),
        location_id: event.location_id().to_string(),
        name,
    }
}

impl NotificationGateway for Notify {
    fn notify(&self, event: NotificationEvent) {
        if self.skip(&event) {
            return;
        }
        let notification = change_notification(&event);
        log::info!(
            "Sending {} notification for location {}",
            notification.event,
            notification.location_id
        );
        let client = self.client.clone();
        let url = self.webhook_url.clone();
        thread::spawn(move || {
            if let Err(err) = send_raw(&client, &url, &notification) {
                log::warn!("Could not send change notification: {err}");
            }
        });
    }
}

#[cfg(not(test))]
fn send_raw(client: &Client, url: &str, notification: &ChangeNotification) -> Result<()> {
    let response = client.post(url).json(notification).send()?;
    crate::check_status(response)?;
    Ok(())
}

/// Don't actually send notifications while running the tests.
#[cfg(test)]
fn send_raw(_: &Client, _: &str, notification: &ChangeNotification) -> Result<()> {
    log::debug!("Would send notification: {notification:?}");
    Ok(())
}
