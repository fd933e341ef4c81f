use super::{mean, team_matches};
use crate::model::{Play, PlayClass};

/// Predicted points added summaries. Plays without a PPA value (untimed
/// downs, administrative rows) are skipped rather than counted as zero.

#[derive(Debug, Clone, Default)]
pub struct PpaReport {
    pub plays: usize,
    pub avg: f64,
    pub total: f64,
    pub by_down: Vec<DownPpa>,
    pub rushing: PlaySplit,
    pub passing: PlaySplit,
    /// Share of total positive PPA produced by explosive plays, 0-100.
    pub explosive_share: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DownPpa {
    pub down: u8,
    pub plays: usize,
    pub avg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PlaySplit {
    pub plays: usize,
    pub avg: f64,
    pub total: f64,
}

fn is_rush(play: &Play) -> bool {
    let ty = play.play_type.to_lowercase();
    ty.contains("rush") || ty.contains("run")
}

fn is_pass(play: &Play) -> bool {
    let ty = play.play_type.to_lowercase();
    ty.contains("pass") || ty.contains("sack") || ty.contains("interception")
}

pub fn analyze(plays: &[&Play], team: &str, explosive_yards: i32) -> PpaReport {
    let scored: Vec<(&Play, f64)> = plays
        .iter()
        .filter(|p| team_matches(&p.offense, team) && p.class == PlayClass::Offense)
        .filter_map(|p| p.ppa.map(|v| (*p, v)))
        .collect();

    let mut report = PpaReport {
        plays: scored.len(),
        ..PpaReport::default()
    };
    let values: Vec<f64> = scored.iter().map(|(_, v)| *v).collect();
    report.avg = mean(&values);
    report.total = values.iter().sum();

    for down in 1..=4u8 {
        let vals: Vec<f64> = scored
            .iter()
            .filter(|(p, _)| p.down == Some(down))
            .map(|(_, v)| *v)
            .collect();
        report.by_down.push(DownPpa {
            down,
            plays: vals.len(),
            avg: mean(&vals),
        });
    }

    let rush: Vec<f64> = scored.iter().filter(|(p, _)| is_rush(p)).map(|(_, v)| *v).collect();
    let pass: Vec<f64> = scored.iter().filter(|(p, _)| is_pass(p)).map(|(_, v)| *v).collect();
    report.rushing = PlaySplit { plays: rush.len(), avg: mean(&rush), total: rush.iter().sum() };
    report.passing = PlaySplit { plays: pass.len(), avg: mean(&pass), total: pass.iter().sum() };

    let positive_total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let explosive_total: f64 = scored
        .iter()
        .filter(|(p, v)| p.is_explosive(explosive_yards) && *v > 0.0)
        .map(|(_, v)| *v)
        .sum();
    report.explosive_share = if positive_total > 0.0 {
        explosive_total / positive_total * 100.0
    } else {
        0.0
    };

    report
}
