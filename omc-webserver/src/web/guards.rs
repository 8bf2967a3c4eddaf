use std::{ops::Deref, sync::Arc};

use rocket::{
    outcome::try_outcome,
    request::{FromRequest, Outcome},
    Request, State,
};

use super::Backend;

// Owned handle to be moved into blocking worker tasks
#[derive(Clone)]
pub(crate) struct Shared(pub Arc<Backend>);

impl Deref for Shared {
    type Target = Backend;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Shared {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let backend = try_outcome!(request.guard::<&State<Arc<Backend>>>().await);
        Outcome::Success(Self(Arc::clone(backend.inner())))
    }
}
