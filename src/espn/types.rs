use crate::model::{classify, parse_clock, GameInfo, Play};
use serde::{Deserialize, Serialize};

/// ESPN site-API summary response (`/summary?event=<id>`). Only the parts the
/// reports consume are modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default)]
    pub winprobability: Vec<WinProbEntry>,
    #[serde(default)]
    pub drives: Option<Drives>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub week: Option<u8>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub year: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(rename = "homeAway", default)]
    pub home_away: String,
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub linescores: Vec<LineScore>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineScore {
    #[serde(rename = "displayValue", default)]
    pub display_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinProbEntry {
    #[serde(rename = "playId")]
    pub play_id: String,
    #[serde(rename = "homeWinPercentage")]
    pub home_win_percentage: f64,
    #[serde(rename = "secondsLeft", default)]
    pub seconds_left: Option<u32>,
}

/// `drives` in the summary: completed drives under `previous`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drives {
    #[serde(default)]
    pub previous: Vec<Drive>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drive {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub plays: Vec<EspnPlay>,
}

/// One play as it appears both inside summary drives and in the paginated
/// core-API plays listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspnPlay {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "sequenceNumber", default)]
    pub sequence_number: Option<String>,
    #[serde(rename = "type", default)]
    pub play_type: Option<PlayType>,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "shortText", default)]
    pub short_text: String,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub clock: Option<Clock>,
    #[serde(rename = "scoringPlay", default)]
    pub scoring_play: bool,
    #[serde(rename = "scoreValue", default)]
    pub score_value: u8,
    #[serde(rename = "statYardage", default)]
    pub stat_yardage: i32,
    #[serde(default)]
    pub start: Option<Situation>,
    #[serde(default)]
    pub end: Option<Situation>,
    #[serde(rename = "homeScore", default)]
    pub home_score: Option<u16>,
    #[serde(rename = "awayScore", default)]
    pub away_score: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayType {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub number: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    #[serde(rename = "displayValue", default)]
    pub display_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Situation {
    #[serde(default)]
    pub down: Option<i8>,
    #[serde(default)]
    pub distance: Option<i32>,
    #[serde(rename = "yardsToEndzone", default)]
    pub yards_to_endzone: Option<i32>,
    #[serde(rename = "yardLine", default)]
    pub yard_line: Option<i32>,
}

/// Paginated core-API plays listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaysPage {
    #[serde(default)]
    pub count: u32,
    #[serde(rename = "pageIndex", default)]
    pub page_index: u32,
    #[serde(rename = "pageCount", default)]
    pub page_count: u32,
    #[serde(default)]
    pub items: Vec<EspnPlay>,
}

impl Summary {
    /// Flatten the header into normalized game metadata.
    pub fn game_info(&self, game_id: u64) -> GameInfo {
        let mut info = GameInfo {
            game_id,
            ..GameInfo::default()
        };
        let Some(header) = &self.header else {
            return info;
        };
        info.year = header.season.as_ref().map(|s| s.year);
        info.week = header.week;
        let Some(comp) = header.competitions.first() else {
            return info;
        };
        info.date = comp.date.clone();
        for competitor in &comp.competitors {
            let score: u16 = competitor.score.parse().unwrap_or(0);
            let line: Vec<u16> = competitor
                .linescores
                .iter()
                .map(|ls| ls.display_value.parse().unwrap_or(0))
                .collect();
            if competitor.home_away == "home" {
                info.home_team = competitor.team.display_name.clone();
                info.home_score = score;
                info.home_line_scores = line;
            } else if competitor.home_away == "away" {
                info.away_team = competitor.team.display_name.clone();
                info.away_score = score;
                info.away_line_scores = line;
            }
        }
        info
    }

    /// Normalized plays in game order, from the drives embedded in the
    /// summary when ESPN includes them.
    pub fn plays_from_drives(&self, info: &GameInfo) -> Vec<Play> {
        match &self.drives {
            Some(drives) => drives.normalized_plays(info),
            None => Vec::new(),
        }
    }
}

impl Drives {
    /// Normalized plays with offense/defense attributed from the owning
    /// drive. Drives are the only ESPN feed that ties plays to a
    /// possession team.
    pub fn normalized_plays(&self, info: &GameInfo) -> Vec<Play> {
        let mut out = Vec::new();
        for drive in &self.previous {
            let offense = drive
                .team
                .as_ref()
                .map(|t| t.display_name.clone())
                .unwrap_or_default();
            let defense = if offense == info.home_team {
                info.away_team.clone()
            } else {
                info.home_team.clone()
            };
            for raw in &drive.plays {
                out.push(normalize_play(raw, out.len(), offense.clone(), defense.clone()));
            }
        }
        out
    }
}

/// Convert a raw ESPN play into the provider-agnostic shape.
pub fn normalize_play(raw: &EspnPlay, sequence: usize, offense: String, defense: String) -> Play {
    let play_type = raw
        .play_type
        .as_ref()
        .map(|t| t.text.clone())
        .unwrap_or_default();
    let clock_secs = raw
        .clock
        .as_ref()
        .and_then(|c| parse_clock(&c.display_value));
    let start = raw.start.as_ref();
    Play {
        id: raw.id.clone().unwrap_or_default(),
        sequence,
        period: raw.period.as_ref().map(|p| p.number).unwrap_or(0),
        clock_secs,
        offense,
        defense,
        down: start.and_then(|s| s.down).filter(|d| (1..=4).contains(d)).map(|d| d as u8),
        distance: start.and_then(|s| s.distance).filter(|d| *d >= 0).map(|d| d as u16),
        yards_to_goal: start
            .and_then(|s| s.yards_to_endzone)
            .filter(|y| *y >= 0)
            .map(|y| y as u16),
        yards_gained: raw.stat_yardage,
        class: classify(&play_type, &raw.text),
        play_type,
        text: raw.text.clone(),
        scoring: raw.scoring_play,
        home_score: raw.home_score,
        away_score: raw.away_score,
        ppa: None,
    }
}
