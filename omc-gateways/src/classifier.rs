use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use omc_core::gateways::classify::ClassifierGateway;

use crate::{check_status, http_client};

/// Classifies locations by calling a JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    name: &'a str,
    description: &'a str,
    categories: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    category: String,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            api_key,
            client: http_client(timeout)?,
        })
    }
}

impl ClassifierGateway for HttpClassifier {
    fn classify(&self, name: &str, description: &str, categories: &[String]) -> Result<String> {
        let mut request = self.client.post(&self.url).json(&ClassifyRequest {
            name,
            description,
            categories,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let ClassifyResponse { category } = check_status(request.send()?)?.json()?;
        log::debug!("Classified '{name}' as '{category}'");
        Ok(category)
    }
}
