pub mod explosive;
pub mod middle_eight;
pub mod penalties;
pub mod ppa;
pub mod red_zone;
pub mod situational;
pub mod win_prob;

use crate::model::{GameInfo, Play};

/// One game's worth of normalized plays plus its metadata. Season-level
/// analyses take slices of these, ordered by week.
#[derive(Debug, Clone)]
pub struct GamePlays {
    pub info: GameInfo,
    pub plays: Vec<Play>,
}

impl GamePlays {
    pub fn opponent_of(&self, team: &str) -> String {
        if team_matches(&self.info.home_team, team) {
            self.info.away_team.clone()
        } else {
            self.info.home_team.clone()
        }
    }
}

/// Conversion attempts vs successes; rate guards the empty denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversionSplit {
    pub attempts: usize,
    pub conversions: usize,
}

impl ConversionSplit {
    pub fn record(&mut self, converted: bool) {
        self.attempts += 1;
        if converted {
            self.conversions += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        pct(self.conversions, self.attempts)
    }
}

/// Percentage with a zero-denominator guard.
pub fn pct(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Mean with a zero-denominator guard.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Final words that belong to the school name, not a mascot ("Michigan
/// State", "Georgia Tech"). The mascot strip must leave these alone.
const SCHOOL_SUFFIXES: &[&str] = &["state", "tech", "a&m"];

/// ESPN display names carry the mascot ("Ohio State Buckeyes"); CFBD keys
/// games by the school alone. Dropping the trailing mascot word recovers it.
pub fn school_name(display_name: &str) -> String {
    let words: Vec<&str> = display_name.split_whitespace().collect();
    match words.len() {
        0 => String::new(),
        1 => words[0].to_string(),
        n if SCHOOL_SUFFIXES.contains(&words[n - 1].to_lowercase().as_str()) => words.join(" "),
        n => words[..n - 1].join(" "),
    }
}

/// Team-name comparison across feeds: ESPN uses "Washington Huskies",
/// CFBD uses "Washington". Exact match first, then either side with its
/// mascot stripped. Substring matching is deliberately avoided so
/// "Michigan" never claims Michigan State's snaps.
pub fn team_matches(feed_name: &str, filter: &str) -> bool {
    if feed_name.is_empty() || filter.is_empty() {
        return false;
    }
    let feed = feed_name.to_lowercase();
    let filter = filter.to_lowercase();
    feed == filter || school_name(&feed) == filter || feed == school_name(&filter)
}

/// Sort games by week (unknown weeks last) and return the trailing window.
pub fn recent_games(games: &[GamePlays], n: usize) -> Vec<&GamePlays> {
    let mut sorted: Vec<&GamePlays> = games.iter().collect();
    sorted.sort_by_key(|g| g.info.week.map(|w| w as u16).unwrap_or(u16::MAX));
    let start = sorted.len().saturating_sub(n);
    sorted.split_off(start)
}
