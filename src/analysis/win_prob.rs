use crate::espn::types::WinProbEntry;
use crate::model::Play;

/// Win-probability series, per-play deltas, and the swings big enough to
/// call a game's inflection points.

#[derive(Debug, Clone, Default)]
pub struct WinProbReport {
    pub points: Vec<WpPoint>,
    pub inflections: Vec<Inflection>,
    pub max_home_wp: f64,
    pub min_home_wp: f64,
}

/// One entry of the series, joined to its play when one matches.
#[derive(Debug, Clone)]
pub struct WpPoint {
    pub index: usize,
    pub play_id: String,
    /// Id of the play this point joined to in the normalized feed. CFBD and
    /// ESPN never share an id space, so consumers key on this, not `play_id`.
    pub matched_play_id: Option<String>,
    /// Home win probability, 0-100.
    pub home_wp: f64,
    /// Change from the previous point, percentage points.
    pub delta: f64,
    pub seconds_left: Option<u32>,
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub offense: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Inflection {
    pub index: usize,
    pub home_wp: f64,
    pub delta: f64,
    pub category: InflectionCategory,
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub offense: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflectionCategory {
    Turnover,
    Score,
    Explosive,
    FirstDown,
    FourthDown,
    Penalty,
    BigPlay,
}

impl InflectionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            InflectionCategory::Turnover => "Turnover",
            InflectionCategory::Score => "Score",
            InflectionCategory::Explosive => "Explosive",
            InflectionCategory::FirstDown => "First Down",
            InflectionCategory::FourthDown => "Fourth Down",
            InflectionCategory::Penalty => "Penalty",
            InflectionCategory::BigPlay => "Big Play",
        }
    }
}

/// Category checks run in priority order: a pick-six reads as a turnover,
/// not a score.
fn categorize(play: Option<&Play>, explosive_yards: i32) -> InflectionCategory {
    let Some(play) = play else {
        return InflectionCategory::BigPlay;
    };
    if play.is_turnover() {
        return InflectionCategory::Turnover;
    }
    if play.scoring || play.is_touchdown() || (play.is_field_goal() && play.scoring) {
        return InflectionCategory::Score;
    }
    if play.is_explosive(explosive_yards) {
        return InflectionCategory::Explosive;
    }
    if play.down == Some(4) {
        return InflectionCategory::FourthDown;
    }
    if play.text.to_lowercase().contains("penalty") {
        return InflectionCategory::Penalty;
    }
    if play.converted() {
        return InflectionCategory::FirstDown;
    }
    InflectionCategory::BigPlay
}

/// Join a WP entry to its play: by id where the feed carries one, falling
/// back to position when ids do not line up (ESPN's pregame entry has no
/// matching play).
fn join_play<'a>(entry: &WinProbEntry, index: usize, plays: &'a [Play]) -> Option<&'a Play> {
    if !entry.play_id.is_empty() {
        if let Some(play) = plays.iter().find(|p| p.id == entry.play_id) {
            return Some(play);
        }
    }
    plays.get(index)
}

pub fn analyze(
    entries: &[WinProbEntry],
    plays: &[Play],
    threshold_pct: f64,
    explosive_yards: i32,
) -> WinProbReport {
    let mut report = WinProbReport {
        max_home_wp: f64::MIN,
        min_home_wp: f64::MAX,
        ..WinProbReport::default()
    };
    if entries.is_empty() {
        report.max_home_wp = 0.0;
        report.min_home_wp = 0.0;
        return report;
    }

    let mut prev_wp: Option<f64> = None;
    for (index, entry) in entries.iter().enumerate() {
        let home_wp = entry.home_win_percentage * 100.0;
        let delta = prev_wp.map(|p| home_wp - p).unwrap_or(0.0);
        prev_wp = Some(home_wp);
        report.max_home_wp = report.max_home_wp.max(home_wp);
        report.min_home_wp = report.min_home_wp.min(home_wp);

        let play = join_play(entry, index, plays);
        report.points.push(WpPoint {
            index,
            play_id: entry.play_id.clone(),
            matched_play_id: play.map(|p| p.id.clone()),
            home_wp,
            delta,
            seconds_left: entry.seconds_left,
            period: play.map(|p| p.period),
            clock: play.map(|p| p.display_clock()),
            offense: play.map(|p| p.offense.clone()),
            text: play.map(|p| p.text.chars().take(200).collect()),
        });

        if delta.abs() >= threshold_pct {
            report.inflections.push(Inflection {
                index,
                home_wp,
                delta,
                category: categorize(play, explosive_yards),
                period: play.map(|p| p.period),
                clock: play.map(|p| p.display_clock()),
                offense: play.map(|p| p.offense.clone()),
                text: play
                    .map(|p| p.text.chars().take(200).collect())
                    .unwrap_or_default(),
            });
        }
    }

    report
}

/// Two WPA series paired for side-by-side charting. When the feeds differ in
/// length the longer one loses leading entries; ESPN's extra pregame rows are
/// the usual cause.
#[derive(Debug, Clone, Default)]
pub struct AlignedSeries {
    pub espn: Vec<f64>,
    pub cfbd: Vec<f64>,
    /// Leading entries trimmed, positive = trimmed from ESPN.
    pub offset: i64,
    pub espn_max: f64,
    pub espn_min: f64,
    pub cfbd_max: f64,
    pub cfbd_min: f64,
}

fn deltas(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

fn bounds(series: &[f64]) -> (f64, f64) {
    if series.is_empty() {
        return (0.0, 0.0);
    }
    series.iter().fold((f64::MIN, f64::MAX), |(max, min), v| {
        (max.max(*v), min.min(*v))
    })
}

/// Pair ESPN and CFBD home-WP series positionally after trimming the longer
/// feed's leading entries, then compare per-play deltas.
pub fn align(espn_wp: &[f64], cfbd_wp: &[f64]) -> AlignedSeries {
    let (espn, cfbd, offset) = if espn_wp.len() > cfbd_wp.len() {
        let trim = espn_wp.len() - cfbd_wp.len();
        (&espn_wp[trim..], cfbd_wp, trim as i64)
    } else {
        let trim = cfbd_wp.len() - espn_wp.len();
        (espn_wp, &cfbd_wp[trim..], -(trim as i64))
    };

    let espn_deltas = deltas(espn);
    let cfbd_deltas = deltas(cfbd);
    let (espn_max, espn_min) = bounds(&espn_deltas);
    let (cfbd_max, cfbd_min) = bounds(&cfbd_deltas);

    AlignedSeries {
        espn: espn_deltas,
        cfbd: cfbd_deltas,
        offset,
        espn_max,
        espn_min,
        cfbd_max,
        cfbd_min,
    }
}
