use anyhow::{anyhow, Context};
use reqwest::{Client, Url};
use tracing::info;

use super::{get_json, AnalyticsApi, ChartPayload, TableRow};
use crate::config::{Config, ProxyConfig};
use crate::error::Result;
use crate::range::RangeQuery;

const USER_AGENT: &str = concat!("trackrecord/", env!("CARGO_PKG_VERSION"));

/// Client for the internal proxy endpoints (`algo-main` / `algo-table`)
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    chart_url: Url,
    table_url: Url,
}

impl ProxyClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(client, &config.proxy)
    }

    pub fn with_client(client: Client, proxy: &ProxyConfig) -> Result<Self> {
        let base = base_url(&proxy.base_url)?;
        Ok(Self {
            client,
            chart_url: join(&base, &proxy.chart_path)?,
            table_url: join(&base, &proxy.table_path)?,
        })
    }

    /// Endpoint URL with the encoded range attached as query parameters
    pub fn request_url(&self, endpoint: &Url, query: &RangeQuery) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(query.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
        url
    }

    pub fn chart_url(&self) -> &Url {
        &self.chart_url
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }
}

impl AnalyticsApi for ProxyClient {
    async fn fetch_chart(&self, query: &RangeQuery) -> Result<ChartPayload> {
        let url = self.request_url(&self.chart_url, query);
        info!("Fetching chart data from {}", url);
        get_json(self.client.get(url), "chart").await
    }

    async fn fetch_table(&self, query: &RangeQuery) -> Result<Vec<TableRow>> {
        let url = self.request_url(&self.table_url, query);
        info!("Fetching table data from {}", url);
        get_json(self.client.get(url), "table").await
    }
}

/// Parse a base URL so that relative paths join beneath it
pub(crate) fn base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| anyhow!("Invalid base URL '{}': {}", raw, e))
}

pub(crate) fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| anyhow!("Invalid path '{}': {}", path, e))
}
