use omc_entities::{id::Id, location::Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    LocationCreated,
    LocationUpdated,
    LocationRemoved,
}

/// A change of the location store that external
/// consumers (e.g. a map viewer) should pick up.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    LocationCreated { location: &'a Location },
    LocationUpdated { location: &'a Location },
    LocationRemoved { id: &'a Id },
}

impl NotificationEvent<'_> {
    pub const fn kind(&self) -> NotificationType {
        match self {
            Self::LocationCreated { .. } => NotificationType::LocationCreated,
            Self::LocationUpdated { .. } => NotificationType::LocationUpdated,
            Self::LocationRemoved { .. } => NotificationType::LocationRemoved,
        }
    }

    pub fn location_id(&self) -> &Id {
        match self {
            Self::LocationCreated { location } | Self::LocationUpdated { location } => {
                &location.id
            }
            Self::LocationRemoved { id } => id,
        }
    }
}

/// Fire and forget: implementations must never fail loudly.
pub trait NotificationGateway {
    fn notify(&self, event: NotificationEvent);
}
