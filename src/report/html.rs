use std::collections::HashMap;

use crate::analysis::explosive::ExplosiveReport;
use crate::analysis::middle_eight::MiddleEightReport;
use crate::analysis::penalties::PenaltyReport;
use crate::analysis::ppa::PpaReport;
use crate::analysis::red_zone::RedZoneReport;
use crate::analysis::situational::SituationalReport;
use crate::analysis::win_prob::{AlignedSeries, WinProbReport};
use crate::analysis::{team_matches, ConversionSplit};
use crate::config::ReportConfig;
use crate::model::{period_label, GameInfo, Play, PlayClass};

use super::{chart, delta_cell, escape, header_card, page, section, summary_card, table};

/// Everything the single-game page needs, computed upstream.
pub struct GamePage<'a> {
    pub info: &'a GameInfo,
    pub plays: &'a [Play],
    pub win_prob: &'a WinProbReport,
    pub home_explosive: &'a ExplosiveReport,
    pub away_explosive: &'a ExplosiveReport,
    pub home_penalties: &'a PenaltyReport,
    pub away_penalties: &'a PenaltyReport,
}

fn team_totals(plays: &[Play], team: &str) -> (usize, i32) {
    let snaps: Vec<&Play> = plays
        .iter()
        .filter(|p| team_matches(&p.offense, team) && p.class == PlayClass::Offense)
        .collect();
    let yards = snaps.iter().map(|p| p.yards_gained).sum();
    (snaps.len(), yards)
}

fn line_score_table(info: &GameInfo) -> String {
    let quarters = info.home_line_scores.len().max(info.away_line_scores.len());
    let mut headers: Vec<String> = vec!["Team".to_string()];
    for q in 1..=quarters {
        headers.push(period_label(q as u8));
    }
    headers.push("Final".to_string());
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let row = |team: &str, scores: &[u16], total: u16| {
        let mut cells = vec![escape(team)];
        for q in 0..quarters {
            cells.push(scores.get(q).map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()));
        }
        cells.push(format!("<strong>{total}</strong>"));
        cells
    };

    table(
        &header_refs,
        &[
            row(&info.away_team, &info.away_line_scores, info.away_score),
            row(&info.home_team, &info.home_line_scores, info.home_score),
        ],
    )
}

fn play_rows(plays: &[Play], wpa: &HashMap<&str, f64>) -> Vec<Vec<String>> {
    plays
        .iter()
        .filter(|p| p.class != PlayClass::EndPeriod)
        .map(|p| {
            let delta = wpa.get(p.id.as_str());
            vec![
                period_label(p.period),
                p.display_clock(),
                escape(&p.offense),
                escape(&p.down_distance()),
                escape(&p.text),
                delta.map(|d| delta_cell(*d)).unwrap_or_default(),
            ]
        })
        .collect()
}

pub fn render_game(data: &GamePage, cfg: &ReportConfig) -> String {
    let info = data.info;
    let title = format!("{} — {}", cfg.title_prefix, info.matchup());
    let subtitle = match &info.date {
        Some(date) => format!(
            "Final: {} {} — {} {} · {}",
            info.away_team, info.away_score, info.home_team, info.home_score, date
        ),
        None => format!(
            "Final: {} {} — {} {}",
            info.away_team, info.away_score, info.home_team, info.home_score
        ),
    };
    let mut body = header_card(&title, &subtitle);

    body.push_str(&section("Line score", &line_score_table(info)));

    let (home_snaps, home_yards) = team_totals(data.plays, &info.home_team);
    let (away_snaps, away_yards) = team_totals(data.plays, &info.away_team);
    let cards = [
        summary_card(&format!("{} plays", info.away_team), &away_snaps.to_string()),
        summary_card(&format!("{} yards", info.away_team), &away_yards.to_string()),
        summary_card(
            &format!("{} explosive", info.away_team),
            &data.away_explosive.total.to_string(),
        ),
        summary_card(
            &format!("{} penalties", info.away_team),
            &format!("{} / {} yds", data.away_penalties.total, data.away_penalties.total_yards),
        ),
        summary_card(&format!("{} plays", info.home_team), &home_snaps.to_string()),
        summary_card(&format!("{} yards", info.home_team), &home_yards.to_string()),
        summary_card(
            &format!("{} explosive", info.home_team),
            &data.home_explosive.total.to_string(),
        ),
        summary_card(
            &format!("{} penalties", info.home_team),
            &format!("{} / {} yds", data.home_penalties.total, data.home_penalties.total_yards),
        ),
    ];
    body.push_str(&format!("<div class=\"cards\">{}</div>", cards.join("")));

    let mut scripts = Vec::new();
    if !data.win_prob.points.is_empty() {
        body.push_str(&section(
            "Win probability",
            "<canvas id=\"wp-chart\"></canvas>",
        ));
        let config = chart::win_prob_chart(data.win_prob, &info.home_team);
        scripts.push(chart::mount_script("wp-chart", &config));

        let rows: Vec<Vec<String>> = data
            .win_prob
            .inflections
            .iter()
            .map(|i| {
                vec![
                    i.period.map(period_label).unwrap_or_default(),
                    i.clock.clone().unwrap_or_default(),
                    escape(i.category.label()),
                    delta_cell(i.delta),
                    format!("{:.1}%", i.home_wp),
                    escape(&i.text),
                ]
            })
            .collect();
        body.push_str(&section(
            "Inflection points",
            &table(&["Qtr", "Clock", "Category", "WP swing", "Home WP", "Play"], &rows),
        ));
    }

    let explosive_rows: Vec<Vec<String>> = data
        .away_explosive
        .plays
        .iter()
        .chain(data.home_explosive.plays.iter())
        .map(|p| {
            vec![
                period_label(p.period),
                p.clock.clone(),
                escape(&p.play_type),
                p.yards_gained.to_string(),
                p.ppa.map(|v| format!("{v:+.2}")).unwrap_or_default(),
                escape(&p.text),
            ]
        })
        .collect();
    body.push_str(&section(
        "Explosive plays",
        &table(&["Qtr", "Clock", "Type", "Yards", "PPA", "Play"], &explosive_rows),
    ));

    let penalty_rows: Vec<Vec<String>> = data
        .away_penalties
        .items
        .iter()
        .chain(data.home_penalties.items.iter())
        .map(|p| {
            vec![
                period_label(p.period),
                p.clock.clone(),
                escape(&p.team_committed),
                escape(&p.penalty_type),
                if p.accepted { format!("{} yds", p.yards) } else { "declined".to_string() },
                escape(&p.text),
            ]
        })
        .collect();
    body.push_str(&section(
        "Penalties",
        &table(&["Qtr", "Clock", "Team", "Penalty", "Result", "Play"], &penalty_rows),
    ));

    let wpa: HashMap<&str, f64> = data
        .win_prob
        .points
        .iter()
        .filter_map(|p| p.matched_play_id.as_deref().map(|id| (id, p.delta)))
        .collect();
    body.push_str(&section(
        "Play by play",
        &table(
            &["Qtr", "Clock", "Offense", "Down", "Play", "WPA"],
            &play_rows(data.plays, &wpa),
        ),
    ));

    page(&title, &cfg.chart_js_url, &body, &scripts)
}

pub fn render_compare(
    info: &GameInfo,
    aligned: &AlignedSeries,
    espn_plays: usize,
    cfbd_plays: usize,
    cfg: &ReportConfig,
) -> String {
    let title = format!("{} — {} (feed comparison)", cfg.title_prefix, info.matchup());
    let mut body = header_card(&title, "ESPN vs CollegeFootballData win-probability deltas");

    let cards = [
        summary_card("ESPN plays", &espn_plays.to_string()),
        summary_card("CFBD plays", &cfbd_plays.to_string()),
        summary_card("ESPN max swing", &format!("{:+.1}", aligned.espn_max)),
        summary_card("ESPN min swing", &format!("{:+.1}", aligned.espn_min)),
        summary_card("CFBD max swing", &format!("{:+.1}", aligned.cfbd_max)),
        summary_card("CFBD min swing", &format!("{:+.1}", aligned.cfbd_min)),
    ];
    body.push_str(&format!("<div class=\"cards\">{}</div>", cards.join("")));

    let note = match aligned.offset {
        0 => "Feeds matched in length; paired one to one.".to_string(),
        n if n > 0 => format!("Trimmed the first {n} ESPN entries to align the feeds."),
        n => format!("Trimmed the first {} CFBD entries to align the feeds.", -n),
    };
    body.push_str(&section(
        "Aligned WPA",
        &format!("<p class=\"note\">{}</p><canvas id=\"cmp-chart\"></canvas>", escape(&note)),
    ));

    let config = chart::compare_chart(aligned);
    let scripts = vec![chart::mount_script("cmp-chart", &config)];
    page(&title, &cfg.chart_js_url, &body, &scripts)
}

/// Season rollup inputs, one report per analysis module.
pub struct SeasonPage<'a> {
    pub team: &'a str,
    pub games: usize,
    /// Size of the trailing window behind the "last N" figures.
    pub recent_games: usize,
    pub situational: &'a SituationalReport,
    pub explosive: &'a ExplosiveReport,
    pub penalties: &'a PenaltyReport,
    pub red_zone: &'a RedZoneReport,
    pub middle_eight: &'a MiddleEightReport,
    pub ppa: &'a PpaReport,
}

fn split_row(label: &str, split: &ConversionSplit) -> Vec<String> {
    vec![
        escape(label),
        format!("{} / {}", split.conversions, split.attempts),
        format!("{:.1}%", split.rate()),
    ]
}

pub fn render_season(data: &SeasonPage, cfg: &ReportConfig) -> String {
    let title = format!("{} — {} season review", cfg.title_prefix, data.team);
    let mut body = header_card(&title, &format!("{} games analyzed", data.games));

    let cards = [
        summary_card("3rd down", &format!("{:.1}%", data.situational.third_down.rate())),
        summary_card("4th down", &format!("{:.1}%", data.situational.fourth_down.rate())),
        summary_card("Explosive / game", &format!("{:.1}", data.explosive.avg_per_game)),
        summary_card("Penalty yards", &data.penalties.total_yards.to_string()),
        summary_card("Red-zone TD rate", &format!("{:.1}%", data.red_zone.red_zone.td_rate)),
        summary_card("Middle-8 net", &format!("{:+}", data.middle_eight.net)),
        summary_card("Avg PPA", &format!("{:+.3}", data.ppa.avg)),
    ];
    body.push_str(&format!("<div class=\"cards\">{}</div>", cards.join("")));

    let sit = &data.situational;
    body.push_str(&section(
        "Situational conversions",
        &table(
            &["Situation", "Conversions", "Rate"],
            &[
                split_row("3rd down", &sit.third_down),
                split_row("3rd and short (1-3)", &sit.third_short),
                split_row("3rd and medium (4-7)", &sit.third_medium),
                split_row("3rd and long (8+)", &sit.third_long),
                split_row("4th down", &sit.fourth_down),
                split_row("4th down go-for-it", &sit.go_for_it),
            ],
        ),
    ));

    let go_rows: Vec<Vec<String>> = sit
        .go_for_it_plays
        .iter()
        .map(|a| {
            vec![
                period_label(a.period),
                a.clock.clone(),
                a.distance.map(|d| d.to_string()).unwrap_or_default(),
                a.yards_gained.to_string(),
                if a.converted { "converted".to_string() } else { "stopped".to_string() },
                escape(&a.text),
            ]
        })
        .collect();
    if !go_rows.is_empty() {
        body.push_str(&section(
            "Fourth-down attempts",
            &table(&["Qtr", "Clock", "Distance", "Gained", "Result", "Play"], &go_rows),
        ));
    }

    let exp_rows: Vec<Vec<String>> = data
        .explosive
        .per_game
        .iter()
        .map(|g| {
            vec![
                g.week.map(|w| format!("Wk {w}")).unwrap_or_default(),
                escape(&g.opponent),
                g.count.to_string(),
            ]
        })
        .collect();
    body.push_str(&section(
        "Explosive plays per game",
        &format!(
            "<p class=\"note\">{} total, {:.1} per game (last {}: {:.1})</p>{}",
            data.explosive.total,
            data.explosive.avg_per_game,
            data.explosive.per_game.len().min(data.recent_games),
            data.explosive.recent_avg,
            table(&["Week", "Opponent", "Explosive"], &exp_rows)
        ),
    ));

    let pen_rows: Vec<Vec<String>> = data
        .penalties
        .by_type
        .iter()
        .map(|(name, count)| vec![escape(name), count.to_string()])
        .collect();
    body.push_str(&section(
        "Penalties",
        &format!(
            "<p class=\"note\">{} total ({} accepted, {} declined) for {} yards</p>{}",
            data.penalties.total,
            data.penalties.accepted,
            data.penalties.declined,
            data.penalties.total_yards,
            table(&["Penalty", "Count"], &pen_rows)
        ),
    ));

    let zone_row = |zone: &crate::analysis::red_zone::ZoneReport| {
        vec![
            format!("Inside {}", zone.boundary),
            zone.plays.to_string(),
            format!("{} ({:.1}%)", zone.touchdowns, zone.td_rate),
            zone.turnovers.to_string(),
            format!("{} ({:.1}%)", zone.explosive, zone.explosive_rate),
            format!("{:+.3}", zone.avg_ppa),
        ]
    };
    body.push_str(&section(
        "Scoring zones",
        &table(
            &["Zone", "Plays", "TDs", "Turnovers", "Explosive", "Avg PPA"],
            &[zone_row(&data.red_zone.red_zone), zone_row(&data.red_zone.green_zone)],
        ),
    ));

    let m8_rows: Vec<Vec<String>> = data
        .middle_eight
        .per_game
        .iter()
        .map(|g| {
            vec![
                g.week.map(|w| format!("Wk {w}")).unwrap_or_default(),
                escape(&g.opponent),
                g.points_for.to_string(),
                g.points_against.to_string(),
                delta_cell(g.net as f64),
            ]
        })
        .collect();
    body.push_str(&section(
        "Middle eight",
        &format!(
            "<p class=\"note\">Net {:+} on the season, {:+} over the recent window</p>{}",
            data.middle_eight.net,
            data.middle_eight.recent_net,
            table(&["Week", "Opponent", "For", "Against", "Net"], &m8_rows)
        ),
    ));

    let ppa_rows: Vec<Vec<String>> = data
        .ppa
        .by_down
        .iter()
        .map(|d| {
            vec![
                format!("Down {}", d.down),
                d.plays.to_string(),
                format!("{:+.3}", d.avg),
            ]
        })
        .collect();
    body.push_str(&section(
        "Predicted points added",
        &format!(
            "<p class=\"note\">Rushing {:+.3} over {} plays · Passing {:+.3} over {} plays · \
             explosive plays produced {:.0}% of positive PPA</p>{}",
            data.ppa.rushing.avg,
            data.ppa.rushing.plays,
            data.ppa.passing.avg,
            data.ppa.passing.plays,
            data.ppa.explosive_share,
            table(&["Down", "Plays", "Avg PPA"], &ppa_rows)
        ),
    ));

    page(&title, &cfg.chart_js_url, &body, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classify;

    fn info() -> GameInfo {
        GameInfo {
            game_id: 401520279,
            year: Some(2024),
            week: Some(10),
            date: Some("2024-11-02".to_string()),
            home_team: "Washington Huskies".to_string(),
            away_team: "Oregon Ducks".to_string(),
            home_score: 24,
            away_score: 21,
            home_line_scores: vec![7, 7, 3, 7],
            away_line_scores: vec![0, 14, 0, 7],
        }
    }

    fn play(id: &str, offense: &str, yards: i32, text: &str) -> Play {
        Play {
            id: id.to_string(),
            sequence: 0,
            period: 1,
            clock_secs: Some(500),
            offense: offense.to_string(),
            defense: String::new(),
            down: Some(1),
            distance: Some(10),
            yards_to_goal: Some(60),
            yards_gained: yards,
            play_type: "Rush".to_string(),
            text: text.to_string(),
            scoring: false,
            home_score: None,
            away_score: None,
            ppa: None,
            class: classify("Rush", text),
        }
    }

    #[test]
    fn test_game_page_renders_and_escapes() {
        let info = info();
        let plays = vec![
            play("1", "Washington Huskies", 5, "rush for 5 yds"),
            play("2", "Oregon Ducks", 45, "rush for 45 yds & a score"),
        ];
        let win_prob = WinProbReport::default();
        let empty_exp = ExplosiveReport::default();
        let empty_pen = PenaltyReport::default();
        let html = render_game(
            &GamePage {
                info: &info,
                plays: &plays,
                win_prob: &win_prob,
                home_explosive: &empty_exp,
                away_explosive: &empty_exp,
                home_penalties: &empty_pen,
                away_penalties: &empty_pen,
            },
            &ReportConfig {
                chart_js_url: "https://cdn.example/chart.js".to_string(),
                title_prefix: "CFB Review".to_string(),
            },
        );
        assert!(html.contains("Oregon Ducks @ Washington Huskies"));
        assert!(html.contains("45 yds &amp; a score"));
        assert!(html.contains("Line score"));
        // No WP data, so no chart script should be emitted.
        assert!(!html.contains("wp-chart"));
    }

    #[test]
    fn test_wpa_column_joins_cfbd_plays_to_espn_entries() {
        use crate::analysis::win_prob;
        use crate::espn::types::WinProbEntry;

        let info = info();
        // ESPN WP ids never appear among CFBD play ids; the column relies on
        // the joined play's own id.
        let plays = vec![
            play("101752873101", "Washington Huskies", 4, "rush for 4 yds"),
            play("101752873102", "Washington Huskies", 25, "rush for 25 yds"),
        ];
        let entries = vec![
            WinProbEntry {
                play_id: "4017528731".to_string(),
                home_win_percentage: 0.50,
                seconds_left: Some(3600),
            },
            WinProbEntry {
                play_id: "4017528732".to_string(),
                home_win_percentage: 0.62,
                seconds_left: Some(3560),
            },
        ];
        let win_prob = win_prob::analyze(&entries, &plays, 5.0, 20);
        let empty_exp = ExplosiveReport::default();
        let empty_pen = PenaltyReport::default();
        let html = render_game(
            &GamePage {
                info: &info,
                plays: &plays,
                win_prob: &win_prob,
                home_explosive: &empty_exp,
                away_explosive: &empty_exp,
                home_penalties: &empty_pen,
                away_penalties: &empty_pen,
            },
            &ReportConfig {
                chart_js_url: "https://cdn.example/chart.js".to_string(),
                title_prefix: "CFB Review".to_string(),
            },
        );
        // The 12-point swing lands in the play-by-play WPA column.
        assert!(html.contains("+12.0"));
    }

    #[test]
    fn test_season_recent_label_uses_configured_window() {
        use crate::analysis::explosive::GameCount;

        let per_game: Vec<GameCount> = (1..=6)
            .map(|w| GameCount {
                game_id: w as u64,
                week: Some(w),
                opponent: "Opponent".to_string(),
                count: 2,
            })
            .collect();
        let explosive = ExplosiveReport {
            total: 12,
            games: 6,
            per_game,
            ..ExplosiveReport::default()
        };
        let html = render_season(
            &SeasonPage {
                team: "Washington",
                games: 6,
                recent_games: 5,
                situational: &SituationalReport::default(),
                explosive: &explosive,
                penalties: &PenaltyReport::default(),
                red_zone: &RedZoneReport::default(),
                middle_eight: &MiddleEightReport::default(),
                ppa: &PpaReport::default(),
            },
            &ReportConfig {
                chart_js_url: "https://cdn.example/chart.js".to_string(),
                title_prefix: "CFB Review".to_string(),
            },
        );
        assert!(html.contains("last 5"));
    }

    #[test]
    fn test_compare_page_notes_offset() {
        let aligned = AlignedSeries {
            espn: vec![1.0, 2.0],
            cfbd: vec![1.5, 1.5],
            offset: 2,
            ..AlignedSeries::default()
        };
        let html = render_compare(
            &info(),
            &aligned,
            150,
            148,
            &ReportConfig {
                chart_js_url: "https://cdn.example/chart.js".to_string(),
                title_prefix: "CFB Review".to_string(),
            },
        );
        assert!(html.contains("Trimmed the first 2 ESPN entries"));
        assert!(html.contains("cmp-chart"));
    }
}
