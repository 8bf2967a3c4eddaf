//! HTTP implementations of the gateways that connect
//! the workflow engine to the outside world.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

pub mod chat;
pub mod classifier;
pub mod name_matcher;
pub mod notify;

fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, thiserror::Error)]
#[error("Unexpected response status {status}: {body}")]
struct UnexpectedResponse {
    status: reqwest::StatusCode,
    body: String,
}

fn check_status(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(UnexpectedResponse { status, body }.into())
}
