pub mod prelude {
    use std::{
        cell::{Cell, RefCell},
        collections::HashSet,
    };

    pub use omc_core::{
        entities::*,
        gateways::{
            chat::{ModerationChannel, RequestMessage},
            classify::ClassifierGateway,
            notify::{NotificationEvent, NotificationGateway, NotificationType},
        },
        repositories::{Error as RepoError, *},
        sessions::{InMemorySessionStore, SessionStore},
        snapshot::LocationSnapshot,
        usecases,
    };
    pub use omc_entities::builders::Builder;

    pub use crate::{
        error::{AppError, BError},
        prelude::{self as flows, NewLocationDraft},
    };

    pub mod sqlite {
        pub use super::super::super::sqlite::*;
    }

    pub fn moderator() -> Actor {
        Actor::new("mod", Role::Moderator)
    }

    pub fn admin() -> Actor {
        Actor::new("admin", Role::Admin)
    }

    #[derive(Default)]
    pub struct DummyChannel {
        posted: RefCell<Vec<(MessageId, RequestMessage)>>,
        deleted: RefCell<HashSet<MessageId>>,
        failing: Cell<bool>,
    }

    impl DummyChannel {
        pub fn fail_posting(&self) {
            self.failing.set(true);
        }

        pub fn posted_count(&self) -> usize {
            self.posted.borrow().len()
        }

        pub fn last_posted(&self) -> Option<RequestMessage> {
            self.posted.borrow().last().map(|(_, msg)| msg.clone())
        }

        pub fn delete_message(&self, message_id: &MessageId) {
            self.deleted.borrow_mut().insert(message_id.clone());
        }
    }

    impl ModerationChannel for DummyChannel {
        fn post_request(&self, message: &RequestMessage) -> anyhow::Result<MessageId> {
            if self.failing.get() {
                anyhow::bail!("The channel is not available");
            }
            let mut posted = self.posted.borrow_mut();
            let message_id = MessageId::from(format!("msg-{}", posted.len() + 1));
            posted.push((message_id.clone(), message.clone()));
            Ok(message_id)
        }

        fn message_exists(&self, message_id: &MessageId) -> anyhow::Result<bool> {
            if self.failing.get() {
                anyhow::bail!("The channel is not available");
            }
            Ok(!self.deleted.borrow().contains(message_id))
        }
    }

    #[derive(Default)]
    pub struct DummyNotifyGW {
        events: RefCell<Vec<NotificationType>>,
    }

    impl DummyNotifyGW {
        pub fn events(&self) -> Vec<NotificationType> {
            self.events.borrow().clone()
        }
    }

    impl NotificationGateway for DummyNotifyGW {
        fn notify(&self, event: NotificationEvent) {
            self.events.borrow_mut().push(event.kind());
        }
    }

    /// Runs a callback on every notification.
    pub struct NotifyHook<F>(pub F);

    impl<F> NotificationGateway for NotifyHook<F>
    where
        F: Fn(),
    {
        fn notify(&self, _: NotificationEvent) {
            (self.0)();
        }
    }

    pub struct UnreachableClassifier;

    impl ClassifierGateway for UnreachableClassifier {
        fn classify(&self, _: &str, _: &str, _: &[String]) -> anyhow::Result<String> {
            anyhow::bail!("Connection refused")
        }
    }

    pub struct BackendFixture {
        pub db_connections: sqlite::Connections,
        pub sessions: InMemorySessionStore,
        pub channel: DummyChannel,
        pub notify: DummyNotifyGW,
        pub category_settings: usecases::CategorySettings,
    }

    impl BackendFixture {
        pub fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let db_connections = sqlite::Connections::init(":memory:", 1).unwrap();
            omc_db_sqlite::run_embedded_database_migrations(db_connections.exclusive().unwrap())
                .unwrap();
            Self {
                db_connections,
                sessions: InMemorySessionStore::new(time::Duration::minutes(30)),
                channel: DummyChannel::default(),
                notify: DummyNotifyGW::default(),
                category_settings: usecases::CategorySettings {
                    fallback: "Other".into(),
                    categories: vec!["Landmark".into(), "Other".into()],
                },
            }
        }

        pub fn prepare(
            &self,
            requester: &str,
            proposal: usecases::NewLocationProposal,
        ) -> NewLocationDraft {
            flows::prepare_new_location(
                &self.db_connections,
                &self.sessions,
                &requester.into(),
                proposal,
            )
            .unwrap()
        }

        /// Submits a proposal and merges it into a near match.
        pub fn submit_new(
            &self,
            requester: &str,
            proposal: usecases::NewLocationProposal,
            classifier: Option<&dyn ClassifierGateway>,
        ) -> ChangeRequest {
            match self.prepare(requester, proposal) {
                NewLocationDraft::Unique(proposal) => flows::submit_new_location(
                    &self.db_connections,
                    &self.channel,
                    classifier,
                    &self.category_settings,
                    requester.into(),
                    proposal,
                    None,
                ),
                NewLocationDraft::NearMatch { draft, existing } => flows::submit_parked_location(
                    &self.db_connections,
                    &self.channel,
                    classifier,
                    &self.category_settings,
                    &self.sessions,
                    &requester.into(),
                    &draft,
                    Some(&existing.id),
                ),
            }
            .unwrap()
        }

        pub fn create_location(&self, location: Location) -> Location {
            self.db_connections
                .exclusive()
                .unwrap()
                .create_location(&location)
                .unwrap();
            location
        }

        pub fn get_location(&self, id: &Id) -> Location {
            self.db_connections
                .shared()
                .unwrap()
                .get_location(id.as_str())
                .unwrap()
        }

        pub fn all_locations(&self) -> Vec<Location> {
            self.db_connections.shared().unwrap().all_locations().unwrap()
        }

        pub fn store_request(&self, request: &ChangeRequest) {
            self.db_connections
                .exclusive()
                .unwrap()
                .create_change_request(request)
                .unwrap();
        }

        pub fn get_request(&self, message_id: &MessageId) -> ChangeRequest {
            self.db_connections
                .shared()
                .unwrap()
                .get_change_request_by_message_id(message_id)
                .unwrap()
        }

        /// Stores the request under a new id, so that
        /// subsequent updates of the old id fail.
        pub fn reissue_request(&self, message_id: &MessageId) {
            let db = self.db_connections.exclusive().unwrap();
            let mut request = db.get_change_request_by_message_id(message_id).unwrap();
            db.delete_change_request_by_message_id(message_id).unwrap();
            request.id = Id::new();
            db.create_change_request(&request).unwrap();
        }

        pub fn pending_count(&self) -> usize {
            self.db_connections
                .shared()
                .unwrap()
                .count_change_requests_by_status(RequestStatus::Pending)
                .unwrap()
        }
    }
}
