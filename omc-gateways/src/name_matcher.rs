use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use omc_core::gateways::name_match::NameMatchGateway;

use crate::{check_status, http_client};

/// Semantic name matching by calling a JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpNameMatcher {
    url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    query: &'a str,
    candidates: &'a [String],
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    #[serde(default)]
    matches: Vec<String>,
}

impl HttpNameMatcher {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            api_key,
            client: http_client(timeout)?,
        })
    }
}

impl NameMatchGateway for HttpNameMatcher {
    fn closest_names(
        &self,
        query: &str,
        candidates: &[String],
        limit: usize,
    ) -> Result<Vec<String>> {
        if candidates.is_empty() || limit == 0 {
            return Ok(vec![]);
        }
        let mut request = self.client.post(&self.url).json(&MatchRequest {
            query,
            candidates,
            limit,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let MatchResponse { mut matches } = check_status(request.send()?)?.json()?;
        matches.truncate(limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_call_without_candidates() {
        let matcher =
            HttpNameMatcher::new("http://127.0.0.1:9/match", None, Duration::from_secs(1)).unwrap();
        assert!(matcher.closest_names("mill", &[], 5).unwrap().is_empty());
        assert!(matcher
            .closest_names("mill", &["Windmill".into()], 5)
            .is_err());
    }

    #[test]
    fn missing_matches_are_empty() {
        let res: MatchResponse = serde_json::from_str("{}").unwrap();
        assert!(res.matches.is_empty());
    }
}
