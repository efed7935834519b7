use anyhow::Context;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{info, warn};

use super::proxy::{base_url, join};
use super::{get_json, AnalyticsApi, ChartPayload, TableRow};
use crate::config::{Config, Credentials, UpstreamConfig};
use crate::error::{Result, TrackRecordError};
use crate::range::RangeQuery;

/// Direct client for the upstream analytics service.
///
/// Requests use positional segments
/// (`analytics/<endpoint>/<metric>/<instrument>/<range>/<start>/<end>`),
/// HTTP basic auth when credentials are configured, and the default
/// certificate validation of the HTTP client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base: Url,
    settings: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(client, &config.upstream)
    }

    pub fn with_client(client: Client, upstream: &UpstreamConfig) -> Result<Self> {
        let raw = upstream.base_url.as_deref().ok_or_else(|| {
            TrackRecordError::Config(
                "upstream.base_url is not set (config file or TRACKRECORD_UPSTREAM_URL)".into(),
            )
        })?;
        if upstream.credentials.is_none() {
            warn!("No upstream credentials configured, sending unauthenticated requests");
        }
        Ok(Self {
            client,
            base: base_url(raw)?,
            settings: upstream.clone(),
        })
    }

    pub fn chart_url(&self, query: &RangeQuery) -> Result<Url> {
        self.endpoint_url(&self.settings.chart_endpoint, query)
    }

    pub fn table_url(&self, query: &RangeQuery) -> Result<Url> {
        self.endpoint_url(&self.settings.table_endpoint, query)
    }

    fn endpoint_url(&self, endpoint: &str, query: &RangeQuery) -> Result<Url> {
        let path = query.upstream_path(endpoint, &self.settings.metric, &self.settings.instrument);
        join(&self.base, &path)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.settings.credentials {
            Some(Credentials { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            None => request,
        }
    }
}

impl AnalyticsApi for UpstreamClient {
    async fn fetch_chart(&self, query: &RangeQuery) -> Result<ChartPayload> {
        let url = self.chart_url(query)?;
        info!("Fetching chart data from upstream {}", url);
        get_json(self.get(url), "upstream chart").await
    }

    async fn fetch_table(&self, query: &RangeQuery) -> Result<Vec<TableRow>> {
        let url = self.table_url(query)?;
        info!("Fetching table data from upstream {}", url);
        get_json(self.get(url), "upstream table").await
    }
}
