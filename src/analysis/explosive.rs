use super::{recent_games, team_matches, GamePlays};
use crate::model::Play;

#[derive(Debug, Clone, Default)]
pub struct ExplosiveReport {
    pub total: usize,
    pub games: usize,
    pub avg_per_game: f64,
    pub recent_total: usize,
    pub recent_avg: f64,
    pub per_game: Vec<GameCount>,
    pub plays: Vec<ExplosivePlay>,
}

#[derive(Debug, Clone)]
pub struct GameCount {
    pub game_id: u64,
    pub week: Option<u8>,
    pub opponent: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ExplosivePlay {
    pub game_id: u64,
    pub week: Option<u8>,
    pub opponent: String,
    pub period: u8,
    pub clock: String,
    pub play_type: String,
    pub yards_gained: i32,
    pub ppa: Option<f64>,
    pub text: String,
}

fn explosive_in_game<'a>(game: &'a GamePlays, team: &str, threshold: i32) -> Vec<&'a Play> {
    game.plays
        .iter()
        .filter(|p| team_matches(&p.offense, team) && p.is_explosive(threshold))
        .collect()
}

/// Explosive plays for one team across a set of games, with a trailing
/// recent-games window.
pub fn analyze(games: &[GamePlays], team: &str, threshold: i32, recent: usize) -> ExplosiveReport {
    let mut report = ExplosiveReport {
        games: games.len(),
        ..ExplosiveReport::default()
    };

    for game in games {
        let opponent = game.opponent_of(team);
        let hits = explosive_in_game(game, team, threshold);
        report.per_game.push(GameCount {
            game_id: game.info.game_id,
            week: game.info.week,
            opponent: opponent.clone(),
            count: hits.len(),
        });
        report.total += hits.len();
        for play in hits {
            report.plays.push(ExplosivePlay {
                game_id: game.info.game_id,
                week: game.info.week,
                opponent: opponent.clone(),
                period: play.period,
                clock: play.display_clock(),
                play_type: play.play_type.clone(),
                yards_gained: play.yards_gained,
                ppa: play.ppa,
                text: play.text.chars().take(150).collect(),
            });
        }
    }

    if report.games > 0 {
        report.avg_per_game = report.total as f64 / report.games as f64;
    }

    let window = recent_games(games, recent);
    report.recent_total = window
        .iter()
        .map(|g| explosive_in_game(g, team, threshold).len())
        .sum();
    if !window.is_empty() {
        report.recent_avg = report.recent_total as f64 / window.len() as f64;
    }

    report.per_game.sort_by_key(|g| g.week.map(|w| w as u16).unwrap_or(u16::MAX));
    report
}
