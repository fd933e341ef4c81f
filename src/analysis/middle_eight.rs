use super::{mean, recent_games, team_matches, GamePlays};
use crate::model::Play;

/// Middle-eight scoring: the window from the last stretch of Q2 through the
/// opening stretch of Q3. Touchdowns count 7, field goals 3.

#[derive(Debug, Clone, Default)]
pub struct MiddleEightReport {
    pub games: usize,
    pub points_for: i32,
    pub points_against: i32,
    pub net: i32,
    pub avg_net: f64,
    pub recent_net: i32,
    pub recent_avg_net: f64,
    pub per_game: Vec<GameNet>,
    pub scoring_plays: Vec<ScoringPlay>,
}

#[derive(Debug, Clone)]
pub struct GameNet {
    pub game_id: u64,
    pub week: Option<u8>,
    pub opponent: String,
    pub points_for: i32,
    pub points_against: i32,
    pub net: i32,
}

#[derive(Debug, Clone)]
pub struct ScoringPlay {
    pub game_id: u64,
    pub week: Option<u8>,
    pub period: u8,
    pub clock: String,
    pub offense: String,
    pub points: i32,
    pub text: String,
}

fn play_points(play: &Play) -> i32 {
    if play.is_touchdown() {
        7
    } else if play.is_field_goal() && play.scoring {
        3
    } else {
        0
    }
}

fn game_net(game: &GamePlays, team: &str, window_secs: u16) -> (GameNet, Vec<ScoringPlay>) {
    let mut net = GameNet {
        game_id: game.info.game_id,
        week: game.info.week,
        opponent: game.opponent_of(team),
        points_for: 0,
        points_against: 0,
        net: 0,
    };
    let mut scoring = Vec::new();

    for play in &game.plays {
        if !play.in_middle_eight(window_secs) {
            continue;
        }
        let points = play_points(play);
        if points == 0 {
            continue;
        }
        if team_matches(&play.offense, team) {
            net.points_for += points;
        } else {
            net.points_against += points;
        }
        scoring.push(ScoringPlay {
            game_id: game.info.game_id,
            week: game.info.week,
            period: play.period,
            clock: play.display_clock(),
            offense: play.offense.clone(),
            points,
            text: play.text.chars().take(200).collect(),
        });
    }

    net.net = net.points_for - net.points_against;
    (net, scoring)
}

pub fn analyze(
    games: &[GamePlays],
    team: &str,
    window_secs: u16,
    recent: usize,
) -> MiddleEightReport {
    let mut report = MiddleEightReport {
        games: games.len(),
        ..MiddleEightReport::default()
    };

    for game in games {
        let (net, mut scoring) = game_net(game, team, window_secs);
        report.points_for += net.points_for;
        report.points_against += net.points_against;
        report.per_game.push(net);
        report.scoring_plays.append(&mut scoring);
    }
    report.per_game.sort_by_key(|g| (g.week.is_none(), g.week));
    report.net = report.points_for - report.points_against;
    report.avg_net = mean(&report.per_game.iter().map(|g| g.net as f64).collect::<Vec<_>>());

    let window = recent_games(games, recent);
    for game in window {
        let (net, _) = game_net(game, team, window_secs);
        report.recent_net += net.net;
    }
    report.recent_avg_net = if recent == 0 {
        0.0
    } else {
        report.recent_net as f64 / recent.min(games.len()).max(1) as f64
    };

    report
}
