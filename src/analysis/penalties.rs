use super::{team_matches, GamePlays};
use crate::model::{Play, PlayClass};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PenaltyReport {
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    /// Yardage from accepted penalties only (absolute value).
    pub total_yards: u32,
    pub by_type: Vec<(String, usize)>,
    pub per_game: Vec<GamePenalties>,
    pub items: Vec<PenaltyPlay>,
}

#[derive(Debug, Clone)]
pub struct GamePenalties {
    pub game_id: u64,
    pub week: Option<u8>,
    pub opponent: String,
    pub count: usize,
    pub yards: u32,
}

#[derive(Debug, Clone)]
pub struct PenaltyPlay {
    pub game_id: u64,
    pub week: Option<u8>,
    pub period: u8,
    pub clock: String,
    pub team_committed: String,
    pub penalty_type: String,
    pub accepted: bool,
    pub yards: u32,
    pub down_distance: String,
    pub text: String,
}

fn is_penalty(play: &Play) -> bool {
    play.class == PlayClass::Penalty || play.text.to_lowercase().contains("penalty")
}

/// Which side committed the penalty. ESPN/CFBD descriptions name the flagged
/// team right after the PENALTY token ("PENALTY WASH False Start..."), so
/// look for either team's name or its leading word there, falling back to
/// the offense.
fn team_committed(play: &Play) -> String {
    let lower = play.text.to_lowercase();
    let after = match lower.find("penalty") {
        Some(idx) => &lower[idx..],
        None => lower.as_str(),
    };
    for side in [&play.offense, &play.defense] {
        if side.is_empty() {
            continue;
        }
        let full = side.to_lowercase();
        let first_word = full.split_whitespace().next().unwrap_or(&full).to_string();
        if after.contains(&full) || after.contains(&first_word) {
            return side.clone();
        }
    }
    play.offense.clone()
}

/// Penalty name from the description: the words between the flagged team and
/// the yardage/result clause.
fn penalty_type(play: &Play) -> String {
    let text = &play.text;
    let Some(idx) = text.to_lowercase().find("penalty") else {
        return play.play_type.clone();
    };
    let tail = &text[idx + "penalty".len()..];
    let tail = tail.trim_start_matches([',', ':', ' ']);
    let cut = tail
        .find(|c: char| c == ',' || c == '(')
        .unwrap_or(tail.len());
    let name = tail[..cut].trim();
    if name.is_empty() {
        play.play_type.clone()
    } else {
        name.to_string()
    }
}

/// Penalty splits for one team (committed by either side of its games).
pub fn analyze(games: &[GamePlays], team: &str) -> PenaltyReport {
    let mut report = PenaltyReport::default();
    let mut type_counts: HashMap<String, usize> = HashMap::new();

    for game in games {
        let opponent = game.opponent_of(team);
        let mut game_count = 0usize;
        let mut game_yards = 0u32;

        for play in &game.plays {
            if !is_penalty(play) {
                continue;
            }
            let committed = team_committed(play);
            if !team_matches(&committed, team) {
                continue;
            }
            let declined = play.text.to_lowercase().contains("declined");
            let yards = if declined { 0 } else { play.yards_gained.unsigned_abs() };

            report.total += 1;
            if declined {
                report.declined += 1;
            } else {
                report.accepted += 1;
                report.total_yards += yards;
                game_yards += yards;
            }
            game_count += 1;

            let ptype = penalty_type(play);
            *type_counts.entry(ptype.clone()).or_default() += 1;

            report.items.push(PenaltyPlay {
                game_id: game.info.game_id,
                week: game.info.week,
                period: play.period,
                clock: play.display_clock(),
                team_committed: committed,
                penalty_type: ptype,
                accepted: !declined,
                yards,
                down_distance: play.down_distance(),
                text: play.text.chars().take(200).collect(),
            });
        }

        report.per_game.push(GamePenalties {
            game_id: game.info.game_id,
            week: game.info.week,
            opponent,
            count: game_count,
            yards: game_yards,
        });
    }

    report.by_type = type_counts.into_iter().collect();
    report.by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    report.per_game.sort_by_key(|g| g.week.map(|w| w as u16).unwrap_or(u16::MAX));
    report
}
