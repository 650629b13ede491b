// file: src/index/solr.rs
// description: Solr-compatible HTTP JSON update client
// reference: https://solr.apache.org/guide/solr/latest/indexing-guide/indexing-with-update-handlers.html

use crate::config::IndexConfig;
use crate::error::{IngestError, Result};
use crate::index::provider::{SearchIndex, UpdateResponse};
use crate::models::Document;
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SolrResponse {
    #[serde(rename = "responseHeader")]
    header: ResponseHeader,
    #[serde(default)]
    error: Option<SolrErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeader {
    status: i32,
    #[serde(rename = "QTime", default)]
    qtime: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SolrErrorBody {
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Clone)]
pub struct SolrClient {
    client: Client,
    collection_url: String,
}

impl SolrClient {
    pub fn new(config: &IndexConfig) -> Result<Self> {
        Validator::validate_url(&config.endpoint)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| IngestError::Index(format!("Failed to build HTTP client: {}", e)))?;

        let collection_url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.collection.trim_matches('/')
        );

        info!("Search index client targeting {}", collection_url);

        Ok(Self {
            client,
            collection_url,
        })
    }

    pub fn update_url(&self) -> String {
        format!("{}/update", self.collection_url)
    }

    pub fn ping_url(&self) -> String {
        format!("{}/admin/ping", self.collection_url)
    }

    pub async fn ping(&self) -> Result<UpdateResponse> {
        debug!("Pinging search index at {}", self.ping_url());
        let request = self.client.get(self.ping_url()).query(&[("wt", "json")]);
        self.send(request, "ping").await
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<UpdateResponse> {
        let response = request.send().await.map_err(|e| {
            IngestError::Index(format!("Failed to send {} request: {}", operation, e))
        })?;

        let http_status = response.status();
        let body = response.text().await.map_err(|e| {
            IngestError::Index(format!("Failed to read {} response: {}", operation, e))
        })?;

        let parsed = parse_response(http_status.as_u16(), &body);
        debug!(
            "Search index {} answered HTTP {} with status {}",
            operation, http_status, parsed.status
        );
        Ok(parsed)
    }
}

/// The JSON header is authoritative; without one the HTTP status decides.
fn parse_response(http_status: u16, body: &str) -> UpdateResponse {
    match serde_json::from_str::<SolrResponse>(body) {
        Ok(parsed) => UpdateResponse {
            status: parsed.header.status,
            qtime_ms: parsed.header.qtime,
            message: parsed.error.and_then(|e| e.msg),
        },
        Err(_) if (200..300).contains(&http_status) => UpdateResponse::ok(),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            UpdateResponse {
                status: i32::from(http_status),
                qtime_ms: None,
                message: (!snippet.is_empty()).then_some(snippet),
            }
        }
    }
}

#[async_trait]
impl SearchIndex for SolrClient {
    async fn add(
        &self,
        documents: &[Document],
        commit_within: Duration,
    ) -> Result<UpdateResponse> {
        let request = self
            .client
            .post(self.update_url())
            .query(&[
                ("commitWithin", commit_within.as_millis().to_string()),
                ("wt", "json".to_string()),
            ])
            .json(documents);
        self.send(request, "update").await
    }

    async fn commit(&self) -> Result<UpdateResponse> {
        let request = self
            .client
            .get(self.update_url())
            .query(&[("commit", "true"), ("wt", "json")]);
        self.send(request, "commit").await
    }
}
