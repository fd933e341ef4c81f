use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub espn: EspnConfig,
    pub cfbd: CfbdConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnConfig {
    pub summary_url: String,
    pub core_api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CfbdConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Minimum gain (yards) for a play to count as explosive.
    #[serde(default = "default_explosive_yards")]
    pub explosive_yards: i32,
    /// Minimum |home WP change| (percentage points) for an inflection point.
    #[serde(default = "default_inflection_threshold")]
    pub inflection_threshold_pct: f64,
    #[serde(default = "default_red_zone_yards")]
    pub red_zone_yards: u16,
    #[serde(default = "default_green_zone_yards")]
    pub green_zone_yards: u16,
    /// Window on each side of halftime for the "middle eight", in seconds.
    #[serde(default = "default_middle_eight_secs")]
    pub middle_eight_secs: u16,
    /// How many trailing games make up the "recent" window in season splits.
    #[serde(default = "default_recent_games")]
    pub recent_games: usize,
}

fn default_explosive_yards() -> i32 {
    20
}
fn default_inflection_threshold() -> f64 {
    5.0
}
fn default_red_zone_yards() -> u16 {
    20
}
fn default_green_zone_yards() -> u16 {
    30
}
fn default_middle_eight_secs() -> u16 {
    240
}
fn default_recent_games() -> usize {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            explosive_yards: default_explosive_yards(),
            inflection_threshold_pct: default_inflection_threshold(),
            red_zone_yards: default_red_zone_yards(),
            green_zone_yards: default_green_zone_yards(),
            middle_eight_secs: default_middle_eight_secs(),
            recent_games: default_recent_games(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_chart_js_url")]
    pub chart_js_url: String,
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
}

fn default_chart_js_url() -> String {
    "https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js".to_string()
}
fn default_title_prefix() -> String {
    "Game Review".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            chart_js_url: default_chart_js_url(),
            title_prefix: default_title_prefix(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// CFBD API key from the environment, or prompted at startup.
    /// Prompted values are saved to .env for future runs.
    pub fn cfbd_api_key() -> Result<String> {
        match std::env::var("CFBD_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(sanitize_key(&key)),
            _ => {
                let key = prompt("CFBD API Key (collegefootballdata.com)")?;
                save_env_var("CFBD_API_KEY", &key);
                Ok(key)
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = input.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

/// Append a KEY=VALUE line to .env and set it in the current process.
fn save_env_var(key: &str, value: &str) {
    std::env::set_var(key, value);
    let path = Path::new(ENV_FILE);
    let mut contents = std::fs::read_to_string(path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", key, value));
    let _ = std::fs::write(path, contents);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert!(config.cfbd.base_url.contains("collegefootballdata"));
        assert!(config.espn.summary_url.contains("espn.com"));
        assert_eq!(config.analysis.explosive_yards, 20);
        assert_eq!(config.analysis.red_zone_yards, 20);
    }

    #[test]
    fn test_analysis_defaults_when_section_missing() {
        let toml_src = r#"
            [espn]
            summary_url = "https://site.api.espn.com/apis/site/v2/sports/football/college-football/summary"
            core_api_url = "https://sports.core.api.espn.com/v2/sports/football/leagues/college-football"

            [cfbd]
            base_url = "https://api.collegefootballdata.com"
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.analysis.inflection_threshold_pct, 5.0);
        assert_eq!(config.analysis.recent_games, 3);
        assert_eq!(config.espn.request_timeout_ms, 10_000);
        assert!(config.report.chart_js_url.contains("chart.js"));
    }

    #[test]
    fn test_sanitize_key_strips_invisibles() {
        assert_eq!(sanitize_key("\u{feff}abc123\r\n"), "abc123");
        assert_eq!(sanitize_key("  abc\u{200b}123  "), "abc123");
    }
}
