use super::{team_matches, ConversionSplit};
use crate::model::Play;

/// Third/fourth-down conversion splits for one team's offense, plus the
/// go-for-it subset of fourth downs.
#[derive(Debug, Clone, Default)]
pub struct SituationalReport {
    pub third_down: ConversionSplit,
    pub fourth_down: ConversionSplit,
    /// Third downs bucketed by distance: to-go <= 3, 4-7, 8+.
    pub third_short: ConversionSplit,
    pub third_medium: ConversionSplit,
    pub third_long: ConversionSplit,
    pub go_for_it: ConversionSplit,
    pub go_for_it_plays: Vec<FourthDownAttempt>,
}

#[derive(Debug, Clone)]
pub struct FourthDownAttempt {
    pub period: u8,
    pub clock: String,
    pub distance: Option<u16>,
    pub yards_to_goal: Option<u16>,
    pub play_type: String,
    pub yards_gained: i32,
    pub ppa: Option<f64>,
    pub converted: bool,
    pub text: String,
}

/// A 4th-down snap where the offense kept the ball: not a punt, field goal,
/// timeout, or a no-play penalty.
pub fn is_go_for_it(play: &Play) -> bool {
    if play.down != Some(4) {
        return false;
    }
    let ty = play.play_type.to_lowercase();
    if ty.contains("punt") || ty.contains("field goal") || ty.contains("timeout") {
        return false;
    }
    if ty.contains("penalty") && play.text.to_lowercase().contains("no play") {
        return false;
    }
    true
}

pub fn analyze(plays: &[&Play], team: &str) -> SituationalReport {
    let mut report = SituationalReport::default();

    for play in plays {
        if !team_matches(&play.offense, team) {
            continue;
        }
        match play.down {
            Some(3) => {
                let converted = play.converted();
                report.third_down.record(converted);
                match play.distance {
                    Some(d) if d <= 3 => report.third_short.record(converted),
                    Some(d) if d <= 7 => report.third_medium.record(converted),
                    Some(_) => report.third_long.record(converted),
                    None => {}
                }
            }
            Some(4) => {
                let converted = play.converted();
                report.fourth_down.record(converted);
                if is_go_for_it(play) {
                    report.go_for_it.record(converted);
                    report.go_for_it_plays.push(FourthDownAttempt {
                        period: play.period,
                        clock: play.display_clock(),
                        distance: play.distance,
                        yards_to_goal: play.yards_to_goal,
                        play_type: play.play_type.clone(),
                        yards_gained: play.yards_gained,
                        ppa: play.ppa,
                        converted,
                        text: play.text.chars().take(200).collect(),
                    });
                }
            }
            _ => {}
        }
    }

    report
}
