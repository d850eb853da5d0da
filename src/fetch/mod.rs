use crate::error::FetchError;
use crate::stats::StatsSnapshot;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::collections::HashMap;
use std::time::Duration;

/// Where the day's raw numbers come from.
#[async_trait]
pub trait StatsSource {
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError>;
}

/// Reads the community plugin stats file, a JSON object keyed by plugin id.
pub struct HttpStatsSource {
    client: HttpClient,
    url: String,
    plugin_id: String,
    timeout: Duration,
}

impl HttpStatsSource {
    pub fn new(url: impl Into<String>, plugin_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: HttpClient::new(),
            url: url.into(),
            plugin_id: plugin_id.into(),
            timeout,
        }
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let mut all_stats: HashMap<String, serde_json::Value> = serde_json::from_str(&body)?;
        let entry = all_stats
            .remove(&self.plugin_id)
            .ok_or_else(|| FetchError::PluginMissing(self.plugin_id.clone()))?;

        Ok(serde_json::from_value(entry)?)
    }
}
