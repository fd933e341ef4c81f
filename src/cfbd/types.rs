use crate::model::{classify, Play};
use serde::{Deserialize, Serialize};

/// CFBD `/plays` response element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfbdPlay {
    pub id: String,
    #[serde(default)]
    pub game_id: Option<u64>,
    #[serde(default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub drive_number: Option<u32>,
    #[serde(default)]
    pub play_number: Option<u32>,
    #[serde(default)]
    pub offense: String,
    #[serde(default)]
    pub defense: String,
    #[serde(default)]
    pub offense_score: Option<u16>,
    #[serde(default)]
    pub defense_score: Option<u16>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
    #[serde(default)]
    pub period: u8,
    #[serde(default)]
    pub clock: Option<CfbdClock>,
    #[serde(default)]
    pub yardline: Option<i32>,
    #[serde(default)]
    pub yards_to_goal: Option<i32>,
    #[serde(default)]
    pub down: Option<i8>,
    #[serde(default)]
    pub distance: Option<i32>,
    #[serde(default)]
    pub yards_gained: Option<i32>,
    #[serde(default)]
    pub scoring: bool,
    #[serde(default)]
    pub play_type: String,
    #[serde(default)]
    pub play_text: Option<String>,
    #[serde(default)]
    pub ppa: Option<PpaValue>,
    #[serde(default)]
    pub wallclock: Option<String>,
}

/// CFBD serves `ppa` as a JSON string in some seasons and a number in others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PpaValue {
    Number(f64),
    Text(String),
}

impl PpaValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PpaValue::Number(n) => Some(*n),
            PpaValue::Text(s) => s.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfbdClock {
    #[serde(default)]
    pub minutes: Option<u16>,
    #[serde(default)]
    pub seconds: Option<u16>,
}

/// CFBD `/winprobability` response element. Probabilities come back as
/// strings in some seasons, same quirk as `ppa`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfbdWpEntry {
    #[serde(default)]
    pub play_id: Option<String>,
    #[serde(default)]
    pub play_number: Option<u32>,
    #[serde(default)]
    pub home_win_probability: Option<PpaValue>,
    #[serde(default)]
    pub play_text: Option<String>,
    #[serde(default)]
    pub home_score: Option<u16>,
    #[serde(default)]
    pub away_score: Option<u16>,
}

impl CfbdWpEntry {
    /// Home win probability as a 0-100 percentage.
    pub fn home_wp_pct(&self) -> Option<f64> {
        self.home_win_probability
            .as_ref()
            .and_then(|v| v.as_f64())
            .map(|v| v * 100.0)
    }
}

/// CFBD `/games` response element (only fields the fetch pipeline needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfbdGame {
    pub id: u64,
    #[serde(default)]
    pub season: Option<u16>,
    #[serde(default)]
    pub week: Option<u8>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub home_points: Option<u16>,
    #[serde(default)]
    pub away_points: Option<u16>,
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Convert a raw CFBD play into the provider-agnostic shape.
pub fn normalize_play(raw: &CfbdPlay, sequence: usize) -> Play {
    let text = raw.play_text.clone().unwrap_or_default();
    let clock_secs = raw
        .clock
        .as_ref()
        .map(|c| c.minutes.unwrap_or(0) * 60 + c.seconds.unwrap_or(0));
    // offense_score/defense_score are relative to possession; map back to
    // home/away when the feed says which side the offense is.
    let (home_score, away_score) = match (&raw.home, &raw.offense) {
        (Some(home), offense) if home == offense => (raw.offense_score, raw.defense_score),
        (Some(_), _) => (raw.defense_score, raw.offense_score),
        (None, _) => (None, None),
    };
    Play {
        id: raw.id.clone(),
        sequence,
        period: raw.period,
        clock_secs,
        offense: raw.offense.clone(),
        defense: raw.defense.clone(),
        down: raw.down.filter(|d| (1..=4).contains(d)).map(|d| d as u8),
        distance: raw.distance.filter(|d| *d >= 0).map(|d| d as u16),
        yards_to_goal: raw.yards_to_goal.filter(|y| *y >= 0).map(|y| y as u16),
        yards_gained: raw.yards_gained.unwrap_or(0),
        class: classify(&raw.play_type, &text),
        play_type: raw.play_type.clone(),
        text,
        scoring: raw.scoring,
        home_score,
        away_score,
        ppa: raw.ppa.as_ref().and_then(|p| p.as_f64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayClass;

    const PLAY_JSON: &str = r#"{
        "id": "401752873101994901",
        "driveId": "4017528731",
        "gameId": 401752873,
        "driveNumber": 1,
        "playNumber": 2,
        "offense": "Washington",
        "offenseConference": "Big Ten",
        "offenseScore": 0,
        "defense": "Michigan",
        "home": "Michigan",
        "away": "Washington",
        "defenseConference": "Big Ten",
        "defenseScore": 0,
        "period": 1,
        "clock": {"minutes": 14, "seconds": 21},
        "offenseTimeouts": 3,
        "defenseTimeouts": 3,
        "yardline": 65,
        "yardsToGoal": 75,
        "down": 1,
        "distance": 10,
        "yardsGained": 23,
        "scoring": false,
        "playType": "Rush",
        "playText": "J. Back run for 23 yds to the MICH 42",
        "ppa": "1.2041",
        "wallclock": "2025-10-18T19:04:00.000Z"
    }"#;

    #[test]
    fn test_cfbd_play_parses_and_normalizes() {
        let raw: CfbdPlay = serde_json::from_str(PLAY_JSON).unwrap();
        let play = normalize_play(&raw, 0);
        assert_eq!(play.offense, "Washington");
        assert_eq!(play.defense, "Michigan");
        assert_eq!(play.clock_secs, Some(861));
        assert_eq!(play.down, Some(1));
        assert_eq!(play.yards_gained, 23);
        assert_eq!(play.class, PlayClass::Offense);
        assert!((play.ppa.unwrap() - 1.2041).abs() < 1e-9);
        // offense is the away side here, so scores swap back to home/away
        assert_eq!(play.home_score, Some(0));
        assert_eq!(play.away_score, Some(0));
    }

    #[test]
    fn test_ppa_numeric_and_missing() {
        let raw: CfbdPlay = serde_json::from_str(
            r#"{"id": "1", "period": 2, "playType": "Pass Reception", "ppa": -0.4}"#,
        )
        .unwrap();
        assert_eq!(raw.ppa.as_ref().and_then(|p| p.as_f64()), Some(-0.4));

        let raw: CfbdPlay =
            serde_json::from_str(r#"{"id": "2", "period": 2, "playType": "Timeout"}"#).unwrap();
        assert!(raw.ppa.is_none());
        let play = normalize_play(&raw, 5);
        assert_eq!(play.class, PlayClass::Timeout);
        assert_eq!(play.sequence, 5);
        assert_eq!(play.clock_secs, None);
    }

    #[test]
    fn test_wp_entry_string_and_number() {
        let entries: Vec<CfbdWpEntry> = serde_json::from_str(
            r#"[
                {"playId": "1", "playNumber": 1, "homeWinProbability": "0.621", "homeScore": 0, "awayScore": 0},
                {"playId": "2", "playNumber": 2, "homeWinProbability": 0.64},
                {"playId": "3", "playNumber": 3}
            ]"#,
        )
        .unwrap();
        assert!((entries[0].home_wp_pct().unwrap() - 62.1).abs() < 1e-9);
        assert!((entries[1].home_wp_pct().unwrap() - 64.0).abs() < 1e-9);
        assert_eq!(entries[2].home_wp_pct(), None);
    }

    #[test]
    fn test_cfbd_game_parses() {
        let json = r#"{
            "id": 401752873,
            "season": 2025,
            "week": 8,
            "seasonType": "regular",
            "startDate": "2025-10-18T19:00:00.000Z",
            "homeTeam": "Michigan",
            "homePoints": 24,
            "awayTeam": "Washington",
            "awayPoints": 13
        }"#;
        let game: CfbdGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, 401752873);
        assert_eq!(game.week, Some(8));
        assert_eq!(game.home_team.as_deref(), Some("Michigan"));
    }
}
