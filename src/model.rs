use serde::{Deserialize, Serialize};

/// Normalized internal types used by the analysis layer (provider-agnostic).
/// Both the ESPN and CFBD feeds are flattened into these before any stats run.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Play {
    pub id: String,
    /// Position within the game, 0-based, in feed order.
    pub sequence: usize,
    pub period: u8,
    /// Seconds remaining in the period, when the feed supplied a clock.
    pub clock_secs: Option<u16>,
    pub offense: String,
    pub defense: String,
    pub down: Option<u8>,
    pub distance: Option<u16>,
    pub yards_to_goal: Option<u16>,
    pub yards_gained: i32,
    pub play_type: String,
    pub text: String,
    pub scoring: bool,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    /// Predicted Points Added (CFBD only).
    pub ppa: Option<f64>,
    pub class: PlayClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayClass {
    Offense,
    SpecialTeams,
    Penalty,
    Timeout,
    EndPeriod,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: u64,
    pub year: Option<u16>,
    pub week: Option<u8>,
    pub date: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    /// Per-quarter scores as displayed, home then away.
    pub home_line_scores: Vec<u16>,
    pub away_line_scores: Vec<u16>,
}

impl GameInfo {
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

/// Parse a display clock like "12:34" or "0:05.3" into seconds remaining.
pub fn parse_clock(clock: &str) -> Option<u16> {
    let clock = clock.trim();
    if clock.is_empty() {
        return None;
    }
    let clock = clock.split('.').next()?;
    let (min_str, sec_str) = clock.split_once(':')?;
    let minutes: u16 = min_str.trim().parse().ok()?;
    let seconds: u16 = sec_str.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Seconds of regulation per quarter.
pub const QUARTER_SECS: u16 = 900;

/// Quarter label for tables: "Q1".."Q4", then "OT", "2OT", ...
pub fn period_label(period: u8) -> String {
    match period {
        1..=4 => format!("Q{}", period),
        5 => "OT".to_string(),
        p if p > 5 => format!("{}OT", p - 4),
        _ => "-".to_string(),
    }
}

/// Text keywords that mark a gain as a return or takeaway rather than an
/// offensive snap. Kept identical across providers so explosive-play counts
/// agree between feeds.
const NON_OFFENSE_KEYWORDS: &[&str] = &[
    "intercepted",
    "interception",
    "fumble recovery",
    "recovered by",
    "punt return",
    "kickoff return",
    "blocked",
];

const SPECIAL_TEAMS_KEYWORDS: &[&str] = &["kickoff", "punt", "field goal", "extra point"];

/// Classify a play from its type label and description text.
pub fn classify(play_type: &str, text: &str) -> PlayClass {
    let ty = play_type.to_lowercase();
    let txt = text.to_lowercase();
    if ty.contains("timeout") {
        return PlayClass::Timeout;
    }
    if ty.contains("end period") || ty.contains("end of half") || ty.contains("end of game") {
        return PlayClass::EndPeriod;
    }
    if ty.contains("penalty") {
        return PlayClass::Penalty;
    }
    if SPECIAL_TEAMS_KEYWORDS.iter().any(|k| ty.contains(k) || txt.contains(k)) {
        return PlayClass::SpecialTeams;
    }
    PlayClass::Offense
}

impl Play {
    /// Explosive play: an offensive snap gaining at least `threshold` yards.
    /// Returns and takeaways are excluded even when the yardage is large.
    pub fn is_explosive(&self, threshold: i32) -> bool {
        if self.class != PlayClass::Offense {
            return false;
        }
        if self.yards_gained < threshold {
            return false;
        }
        let txt = self.text.to_lowercase();
        !NON_OFFENSE_KEYWORDS.iter().any(|k| txt.contains(k))
    }

    /// Middle eight: last 4 minutes of Q2 plus first 4 minutes of Q3.
    pub fn in_middle_eight(&self, window_secs: u16) -> bool {
        match (self.period, self.clock_secs) {
            (2, Some(clock)) => clock <= window_secs,
            (3, Some(clock)) => clock >= QUARTER_SECS.saturating_sub(window_secs),
            _ => false,
        }
    }

    /// Did this snap move the chains (or score)?
    pub fn converted(&self) -> bool {
        let txt = self.text.to_lowercase();
        if txt.contains("1st down") || txt.contains("first down") {
            return true;
        }
        if self.play_type.to_lowercase().contains("touchdown") || txt.contains("touchdown") {
            return true;
        }
        match self.distance {
            Some(dist) => self.yards_gained >= dist as i32,
            None => false,
        }
    }

    pub fn is_touchdown(&self) -> bool {
        self.play_type.to_lowercase().contains("touchdown")
            || self.text.to_lowercase().contains("touchdown")
    }

    pub fn is_field_goal(&self) -> bool {
        self.play_type.to_lowercase().contains("field goal")
    }

    /// Turnover by the offense: interception or lost fumble.
    pub fn is_turnover(&self) -> bool {
        let ty = self.play_type.to_lowercase();
        let txt = self.text.to_lowercase();
        ty.contains("interception")
            || ty.contains("fumble lost")
            || txt.contains("intercepted")
            || (txt.contains("fumble") && txt.contains("recovered by") && !ty.contains("punt"))
    }

    pub fn display_clock(&self) -> String {
        match self.clock_secs {
            Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
            None => "-".to_string(),
        }
    }

    pub fn down_distance(&self) -> String {
        match (self.down, self.distance) {
            (Some(d), Some(dist)) => format!("{} & {}", ordinal(d), dist),
            _ => String::new(),
        }
    }
}

fn ordinal(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        4 => "4th",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(period: u8, clock: Option<u16>, yards: i32, play_type: &str, text: &str) -> Play {
        Play {
            id: "1".to_string(),
            sequence: 0,
            period,
            clock_secs: clock,
            offense: "Washington".to_string(),
            defense: "Michigan".to_string(),
            down: Some(1),
            distance: Some(10),
            yards_to_goal: Some(75),
            yards_gained: yards,
            play_type: play_type.to_string(),
            text: text.to_string(),
            scoring: false,
            home_score: None,
            away_score: None,
            ppa: None,
            class: classify(play_type, text),
        }
    }

    #[test]
    fn test_parse_clock_formats() {
        assert_eq!(parse_clock("12:34"), Some(754));
        assert_eq!(parse_clock("0:05.3"), Some(5));
        assert_eq!(parse_clock("15:00"), Some(900));
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("garbage"), None);
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(1), "Q1");
        assert_eq!(period_label(4), "Q4");
        assert_eq!(period_label(5), "OT");
        assert_eq!(period_label(7), "3OT");
    }

    #[test]
    fn test_classify_special_teams() {
        assert_eq!(classify("Punt", "x punts 45 yards"), PlayClass::SpecialTeams);
        assert_eq!(classify("Kickoff", ""), PlayClass::SpecialTeams);
        assert_eq!(classify("Field Goal Good", ""), PlayClass::SpecialTeams);
        assert_eq!(classify("Rush", "run for 5 yards"), PlayClass::Offense);
        assert_eq!(classify("Penalty", "false start"), PlayClass::Penalty);
        assert_eq!(classify("Timeout", ""), PlayClass::Timeout);
        assert_eq!(classify("End Period", ""), PlayClass::EndPeriod);
    }

    #[test]
    fn test_explosive_requires_offense_snap() {
        let p = play(1, Some(600), 35, "Pass Reception", "pass complete for 35 yards");
        assert!(p.is_explosive(20));

        let returned = play(1, Some(600), 40, "Pass", "pass intercepted, returned 40 yards");
        assert!(!returned.is_explosive(20));

        let punt = play(1, Some(600), 55, "Punt", "punt for 55 yards");
        assert!(!punt.is_explosive(20));

        let short = play(1, Some(600), 12, "Rush", "rush for 12 yards");
        assert!(!short.is_explosive(20));
    }

    #[test]
    fn test_middle_eight_window() {
        assert!(play(2, Some(120), 0, "Rush", "").in_middle_eight(240));
        assert!(play(3, Some(780), 0, "Rush", "").in_middle_eight(240));
        assert!(!play(2, Some(500), 0, "Rush", "").in_middle_eight(240));
        assert!(!play(1, Some(100), 0, "Rush", "").in_middle_eight(240));
        assert!(!play(3, Some(100), 0, "Rush", "").in_middle_eight(240));
    }

    #[test]
    fn test_converted_by_distance_or_text() {
        let mut p = play(3, Some(300), 12, "Pass Reception", "pass complete for 12 yards");
        assert!(p.converted());
        p.yards_gained = 4;
        assert!(!p.converted());
        p.text = "pass complete for 4 yards for a 1st down".to_string();
        assert!(p.converted());
    }

    #[test]
    fn test_turnover_detection() {
        let p = play(1, Some(60), 0, "Pass Interception Return", "pass intercepted by X");
        assert!(p.is_turnover());
        let p = play(1, Some(60), 3, "Rush", "rush, fumble, recovered by DEF TeamX");
        assert!(p.is_turnover());
        let p = play(1, Some(60), 3, "Rush", "rush for 3 yards");
        assert!(!p.is_turnover());
    }
}
