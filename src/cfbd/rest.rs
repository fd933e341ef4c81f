use super::types::{CfbdGame, CfbdPlay, CfbdWpEntry};
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// CollegeFootballData.com REST client. All endpoints take a Bearer key.
pub struct CfbdRest {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CfbdRest {
    pub fn new(api_key: String, base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Plays for one game. CFBD scopes `/plays` by year+week, then the
    /// gameId parameter narrows it to the single game.
    pub async fn get_plays(&self, game_id: u64, year: u16, week: u8) -> Result<Vec<CfbdPlay>> {
        let url = format!(
            "{}/plays?gameId={}&year={}&week={}",
            self.base_url, game_id, year, week
        );
        let plays: Vec<CfbdPlay> = self.get_json(&url).await?;
        // Responses occasionally bleed in sibling games from the same week
        let plays: Vec<CfbdPlay> = plays
            .into_iter()
            .filter(|p| p.game_id.is_none() || p.game_id == Some(game_id))
            .collect();
        tracing::debug!(game_id, count = plays.len(), "fetched CFBD plays");
        Ok(plays)
    }

    /// Per-play home win probability for one game.
    pub async fn get_win_probability(&self, game_id: u64) -> Result<Vec<CfbdWpEntry>> {
        let url = format!("{}/winprobability?gameId={}", self.base_url, game_id);
        let entries: Vec<CfbdWpEntry> = self.get_json(&url).await?;
        tracing::debug!(game_id, count = entries.len(), "fetched CFBD win probability");
        Ok(entries)
    }

    /// Game metadata lookup, used to resolve year/week for an ESPN event id.
    pub async fn get_games(&self, year: u16, week: Option<u8>, team: Option<&str>) -> Result<Vec<CfbdGame>> {
        let mut url = format!("{}/games?year={}", self.base_url, year);
        if let Some(week) = week {
            url.push_str(&format!("&week={}", week));
        }
        if let Some(team) = team {
            url.push_str(&format!("&team={}", urlencode(team)));
        }
        self.get_json(&url).await
    }

    /// Pre-flight check: verify the API key works before any real fetch.
    /// Calls `/games` for a fixed season and distinguishes 401 from other failures.
    pub async fn preflight_auth_check(&self) -> Result<()> {
        let url = format!("{}/games?year=2024&week=1", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Auth pre-flight request failed")?;
        let status = resp.status();
        if status.as_u16() == 401 {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "Authentication failed (401 Unauthorized).\n\
                 Possible causes:\n\
                 - CFBD_API_KEY is wrong or has trailing whitespace/BOM characters\n\
                 - The key was revoked on collegefootballdata.com\n\
                 Server response: {}",
                body
            );
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Auth pre-flight failed ({}): {}", status, body);
        }
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
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

/// Minimal percent-encoding for team names in query strings (spaces and '&').
fn urlencode(value: &str) -> String {
    value.replace('%', "%25").replace(' ', "%20").replace('&', "%26")
}
