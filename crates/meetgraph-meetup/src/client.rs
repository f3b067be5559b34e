//! HTTP client for the Meetup v2 REST API.

use std::time::Duration;

use async_trait::async_trait;
use meetgraph_core::records::{RawEvent, RawGroup, RawMember, RawRsvp};
use meetgraph_core::MeetupConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api::{GroupQuery, MeetupApi};
use crate::error::{MeetupError, Result};

/// Envelope of every collection endpoint.
#[derive(Debug, Deserialize)]
struct ResultSet<T> {
    results: Vec<T>,
}

/// Meetup API client authenticated with an API key.
#[derive(Clone)]
pub struct MeetupClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl MeetupClient {
    pub fn new(config: &MeetupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MeetupError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Meetup request");

        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("sign", "true")])
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MeetupError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MeetupError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_results<T: DeserializeOwned>(&self, path: &str, mut query: Vec<(&str, String)>) -> Result<Vec<T>> {
        query.push(("page", self.page_size.to_string()));
        let set: ResultSet<T> = self.get_json(path, &query).await?;
        Ok(set.results)
    }
}

#[async_trait]
impl MeetupApi for MeetupClient {
    async fn get_event(&self, event_id: i64) -> Result<RawEvent> {
        self.get_json(&format!("/2/event/{}", event_id), &[]).await
    }

    async fn get_groups(&self, query: &GroupQuery) -> Result<Vec<RawGroup>> {
        let params = match query {
            GroupQuery::Urlname(urlname) => vec![("group_urlname", urlname.clone())],
            GroupQuery::Member(member_id) => vec![("member_id", member_id.to_string())],
        };
        self.get_results("/2/groups", params).await
    }

    async fn get_members(&self, group_id: i64) -> Result<Vec<RawMember>> {
        self.get_results("/2/members", vec![("group_id", group_id.to_string())])
            .await
    }

    async fn get_rsvps(&self, event_id: i64) -> Result<Vec<RawRsvp>> {
        self.get_results("/2/rsvps", vec![("event_id", event_id.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_set_envelope() {
        let json = r#"{
            "results": [{"rsvp_id": 1, "response": "yes", "member": {"member_id": 10, "name": "Ada"}}],
            "meta": {"count": 1, "next": ""}
        }"#;
        let set: ResultSet<RawRsvp> = serde_json::from_str(json).unwrap();
        assert_eq!(set.results.len(), 1);
        assert_eq!(set.results[0].response, "yes");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = MeetupConfig {
            base_url: "https://api.meetup.com/".to_string(),
            ..MeetupConfig::default()
        };
        let client = MeetupClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.meetup.com");
    }

    #[test]
    fn test_new_keeps_settings() {
        let config = MeetupConfig {
            api_key: "secret".to_string(),
            page_size: 50,
            timeout_secs: 5,
            ..MeetupConfig::default()
        };
        let client = MeetupClient::new(&config).unwrap();
        assert_eq!(client.api_key, "secret");
        assert_eq!(client.page_size, 50);
    }
}
