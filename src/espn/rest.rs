use super::types::{Drives, EspnPlay, PlaysPage, Summary};
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// Client for ESPN's undocumented site and core JSON APIs. No auth; the
/// endpoints are public but unversioned, so parse failures are surfaced with
/// the URL for debuggability.
pub struct EspnRest {
    client: Client,
    summary_url: String,
    core_api_url: String,
}

const PLAYS_PAGE_LIMIT: u32 = 300;

impl EspnRest {
    pub fn new(summary_url: &str, core_api_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            summary_url: summary_url.trim_end_matches('/').to_string(),
            core_api_url: core_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Game summary: header, win probability series, completed drives.
    pub async fn get_summary(&self, game_id: u64) -> Result<Summary> {
        let url = format!("{}?event={}", self.summary_url, game_id);
        self.get_json(&url).await
    }

    /// Full play listing from the core API. Paginates automatically.
    pub async fn get_plays(&self, game_id: u64) -> Result<Vec<EspnPlay>> {
        let mut all_plays = Vec::new();
        let mut page_index = 1u32;
        loop {
            let url = format!(
                "{}/events/{}/competitions/{}/plays?limit={}&page={}",
                self.core_api_url, game_id, game_id, PLAYS_PAGE_LIMIT, page_index
            );
            let page: PlaysPage = self.get_json(&url).await?;
            let page_count = page.page_count.max(1);
            all_plays.extend(page.items);
            if page_index >= page_count {
                break;
            }
            page_index += 1;
            // Courtesy pause between pages; ESPN throttles bursty clients
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        tracing::debug!(game_id, count = all_plays.len(), "fetched ESPN plays");
        Ok(all_plays)
    }

    /// Drive listing from the core API.
    pub async fn get_drives(&self, game_id: u64) -> Result<Drives> {
        let url = format!(
            "{}/events/{}/competitions/{}/drives?limit=50",
            self.core_api_url, game_id, game_id
        );
        // The core drives endpoint wraps drives in `items`; reuse the summary
        // shape by lifting them into `previous`.
        let listing: DriveListing = self.get_json(&url).await?;
        Ok(Drives {
            previous: listing.items,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", url, status, body);
        }
        resp.json()
            .await
            .with_context(|| format!("failed to parse response from {}", url))
    }
}

#[derive(Debug, serde::Deserialize)]
struct DriveListing {
    #[serde(default)]
    items: Vec<super::types::Drive>,
}
