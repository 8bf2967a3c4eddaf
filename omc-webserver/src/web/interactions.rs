use omc_boundary::{Interaction, InteractionResponse, Message};
use rocket::{
    post, routes,
    serde::json::Json,
    tokio::{
        self,
        task::{JoinError, JoinHandle},
    },
    Route,
};

use super::{
    dispatch,
    error::{Error, GENERIC_FAILURE},
    guards::Shared,
};

type Handled = Result<InteractionResponse, Error>;

pub fn routes() -> Vec<Route> {
    routes![post_interaction]
}

fn into_response(joined: Result<Handled, JoinError>) -> InteractionResponse {
    match joined {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => InteractionResponse::Message(err.into()),
        Err(err) => {
            error!("Interaction handler failed: {err}");
            InteractionResponse::Message(Message::ephemeral(GENERIC_FAILURE))
        }
    }
}

/// Receives all interactions of the chat platform.
///
/// Handlers run on a blocking worker. If a handler misses the
/// acknowledgement deadline the interaction is deferred and the
/// result is delivered as follow-up message later on.
#[post("/interactions", format = "json", data = "<interaction>")]
async fn post_interaction(
    backend: Shared,
    interaction: Json<Interaction>,
) -> Json<InteractionResponse> {
    let interaction = interaction.into_inner();
    let token = interaction.context().token.clone();
    let is_autocomplete = matches!(interaction, Interaction::Autocomplete(_));
    let deadline = backend.cfg.ack_deadline;
    let worker = backend.clone();
    let mut task = tokio::task::spawn_blocking(move || dispatch::handle(&worker, interaction));
    match tokio::time::timeout(deadline, &mut task).await {
        Ok(joined) => Json(into_response(joined)),
        Err(_) if is_autocomplete => {
            // Suggestions are useless once the user typed on
            debug!("Suggestions missed the deadline of {deadline:?}");
            Json(InteractionResponse::Choices { choices: vec![] })
        }
        Err(_) => {
            debug!("Deferring interaction after {deadline:?}");
            tokio::spawn(follow_up(backend, token, task));
            Json(InteractionResponse::Deferred)
        }
    }
}

async fn follow_up(backend: Shared, token: String, task: JoinHandle<Handled>) {
    let msg = match into_response(task.await) {
        InteractionResponse::Message(msg) => msg,
        response => {
            warn!("Unable to deliver a deferred {response:?} as follow-up");
            Message::ephemeral(GENERIC_FAILURE)
        }
    };
    let delivered = tokio::task::spawn_blocking(move || {
        backend
            .gateways
            .follow_up
            .follow_up(&token, &msg.content, msg.ephemeral)
    })
    .await;
    match delivered {
        Ok(Ok(())) => debug!("Delivered follow-up message"),
        Ok(Err(err)) => warn!("Failed to deliver follow-up message: {err}"),
        Err(err) => error!("Failed to deliver follow-up message: {err}"),
    }
}
