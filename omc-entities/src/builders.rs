pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{location_builder::*, request_builder::*};

pub mod location_builder {

    use super::*;
    use crate::{coordinates::*, id::*, location::*, time::*};

    #[derive(Debug)]
    pub struct LocationBuild {
        location: Location,
    }

    impl LocationBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.location.id = id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.location.name = name.into();
            self
        }
        pub fn point(mut self, x: f64, y: f64) -> Self {
            self.location.coordinates = Coordinates::Single(Point::new(x, y));
            self
        }
        pub fn points(mut self, points: &[(f64, f64)]) -> Self {
            let points: Vec<_> = points.iter().copied().map(Point::from).collect();
            self.location.coordinates = Coordinates::Multi(points.try_into().unwrap());
            self
        }
        pub fn category(mut self, category: &str) -> Self {
            self.location.category = category.into();
            self
        }
        pub fn description(mut self, desc: &str) -> Self {
            self.location.description = desc.into();
            self
        }
        pub fn media_urls(mut self, urls: Vec<impl Into<String>>) -> Self {
            self.location.media_urls = urls.into_iter().map(Into::into).collect();
            self
        }
        pub fn icon(mut self, icon: Option<&str>) -> Self {
            self.location.icon = icon.map(Into::into);
            self
        }
        pub fn finish(self) -> Location {
            self.location
        }
    }

    impl Builder for Location {
        type Build = LocationBuild;
        fn build() -> LocationBuild {
            LocationBuild {
                location: Location {
                    id: Id::new(),
                    name: "".into(),
                    coordinates: Coordinates::Single(Point::default()),
                    category: "".into(),
                    description: "".into(),
                    media_urls: vec![],
                    icon: None,
                    approved_by: None,
                    last_modified: Timestamp::now(),
                },
            }
        }
    }
}

pub mod request_builder {

    use super::*;
    use crate::{id::*, request::*, time::*};

    #[derive(Debug)]
    pub struct ChangeRequestBuild {
        request: ChangeRequest,
    }

    impl ChangeRequestBuild {
        pub fn message_id(mut self, id: &str) -> Self {
            self.request.message_id = id.into();
            self
        }
        pub fn requester(mut self, id: &str) -> Self {
            self.request.requester_id = id.into();
            self
        }
        pub fn kind(mut self, kind: RequestKind) -> Self {
            self.request.kind = kind;
            self
        }
        pub fn status(mut self, status: RequestStatus) -> Self {
            self.request.status = status;
            self
        }
        pub fn reason(mut self, reason: &str) -> Self {
            self.request.reason = Some(reason.into());
            self
        }
        pub fn current_data(mut self, json: Option<&str>) -> Self {
            self.request.current_data = json.map(Into::into);
            self
        }
        pub fn new_data(mut self, json: Option<&str>) -> Self {
            self.request.new_data = json.map(Into::into);
            self
        }
        pub fn finish(self) -> ChangeRequest {
            self.request
        }
    }

    impl Builder for ChangeRequest {
        type Build = ChangeRequestBuild;
        fn build() -> ChangeRequestBuild {
            let now = Timestamp::now();
            ChangeRequestBuild {
                request: ChangeRequest {
                    id: Id::new(),
                    message_id: Id::new().as_str().into(),
                    requester_id: "requester".into(),
                    kind: RequestKind::New,
                    reason: None,
                    current_data: None,
                    new_data: None,
                    status: RequestStatus::Pending,
                    approver_id: None,
                    approved_at: None,
                    review_comment: None,
                    created_at: now,
                    updated_at: now,
                },
            }
        }
    }
}
