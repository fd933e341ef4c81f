use super::{mean, pct, team_matches, ConversionSplit};
use crate::model::{Play, PlayClass};

/// Splits inside a yards-to-goal boundary (red zone = 20, green zone = 30).
#[derive(Debug, Clone, Default)]
pub struct ZoneReport {
    pub boundary: u16,
    pub plays: usize,
    pub touchdowns: usize,
    pub td_rate: f64,
    pub turnovers: usize,
    pub avg_ppa: f64,
    pub explosive: usize,
    pub explosive_rate: f64,
    pub third_down: ConversionSplit,
    pub fourth_down: ConversionSplit,
}

#[derive(Debug, Clone, Default)]
pub struct RedZoneReport {
    pub red_zone: ZoneReport,
    pub green_zone: ZoneReport,
}

/// Offensive snaps for the team inside the boundary. Field goals stay in
/// even though they classify as special teams; they are part of zone scoring.
fn zone_plays<'a>(plays: &[&'a Play], team: &str, boundary: u16) -> Vec<&'a Play> {
    plays
        .iter()
        .filter(|p| {
            team_matches(&p.offense, team)
                && (p.class != PlayClass::SpecialTeams || p.is_field_goal())
                && p.yards_to_goal.is_some_and(|y| y <= boundary)
        })
        .copied()
        .collect()
}

fn analyze_zone(plays: &[&Play], boundary: u16, explosive_yards: i32) -> ZoneReport {
    let mut report = ZoneReport {
        boundary,
        plays: plays.len(),
        ..ZoneReport::default()
    };

    let ppas: Vec<f64> = plays.iter().filter_map(|p| p.ppa).collect();
    report.avg_ppa = mean(&ppas);

    for play in plays {
        if play.is_touchdown() {
            report.touchdowns += 1;
        }
        if play.is_turnover() {
            report.turnovers += 1;
        }
        if play.is_explosive(explosive_yards) {
            report.explosive += 1;
        }
        match play.down {
            Some(3) => report.third_down.record(play.converted()),
            Some(4) => report.fourth_down.record(play.converted()),
            _ => {}
        }
    }

    report.td_rate = pct(report.touchdowns, report.plays);
    report.explosive_rate = pct(report.explosive, report.plays);
    report
}

pub fn analyze(
    plays: &[&Play],
    team: &str,
    red_boundary: u16,
    green_boundary: u16,
    explosive_yards: i32,
) -> RedZoneReport {
    let red = zone_plays(plays, team, red_boundary);
    let green = zone_plays(plays, team, green_boundary);
    RedZoneReport {
        red_zone: analyze_zone(&red, red_boundary, explosive_yards),
        green_zone: analyze_zone(&green, green_boundary, explosive_yards),
    }
}
