// End-to-end report generation from cached JSON fixtures, no network.

use std::fs;
use std::path::PathBuf;

use cfb_review::config::{AnalysisConfig, CfbdConfig, Config, EspnConfig, ReportConfig};
use cfb_review::pipeline::Pipeline;

const GAME_ID: u64 = 401752873;

const SUMMARY_JSON: &str = r#"{
    "header": {
        "id": "401752873",
        "season": {"year": 2024},
        "week": 10,
        "competitions": [{
            "date": "2024-11-02T19:30Z",
            "competitors": [
                {
                    "homeAway": "home",
                    "team": {"displayName": "Washington Huskies", "abbreviation": "WASH"},
                    "score": "24",
                    "linescores": [
                        {"displayValue": "7"}, {"displayValue": "7"},
                        {"displayValue": "3"}, {"displayValue": "7"}
                    ]
                },
                {
                    "homeAway": "away",
                    "team": {"displayName": "Oregon Ducks", "abbreviation": "ORE"},
                    "score": "21",
                    "linescores": [
                        {"displayValue": "0"}, {"displayValue": "14"},
                        {"displayValue": "0"}, {"displayValue": "7"}
                    ]
                }
            ]
        }]
    },
    "winprobability": [
        {"playId": "40175287311", "homeWinPercentage": 0.52, "secondsLeft": 3590},
        {"playId": "40175287312", "homeWinPercentage": 0.54, "secondsLeft": 3550},
        {"playId": "40175287313", "homeWinPercentage": 0.71, "secondsLeft": 3500},
        {"playId": "40175287314", "homeWinPercentage": 0.69, "secondsLeft": 3460}
    ]
}"#;

const CFBD_PLAYS_JSON: &str = r#"[
    {
        "id": "p1", "gameId": 401752873, "offense": "Washington", "defense": "Oregon",
        "offenseScore": 0, "defenseScore": 0, "home": "Washington", "away": "Oregon",
        "period": 1, "clock": {"minutes": 14, "seconds": 50},
        "yardsToGoal": 75, "down": 1, "distance": 10, "yardsGained": 6,
        "scoring": false, "playType": "Rush",
        "playText": "Demond Williams Jr. rush for 6 yds", "ppa": 0.12
    },
    {
        "id": "p2", "gameId": 401752873, "offense": "Washington", "defense": "Oregon",
        "offenseScore": 0, "defenseScore": 0, "home": "Washington", "away": "Oregon",
        "period": 1, "clock": {"minutes": 14, "seconds": 10},
        "yardsToGoal": 69, "down": 2, "distance": 4, "yardsGained": 5,
        "scoring": false, "playType": "Pass Reception",
        "playText": "pass complete for 5 yds for a 1ST down", "ppa": "0.35"
    },
    {
        "id": "p3", "gameId": 401752873, "offense": "Washington", "defense": "Oregon",
        "offenseScore": 7, "defenseScore": 0, "home": "Washington", "away": "Oregon",
        "period": 1, "clock": {"minutes": 13, "seconds": 20},
        "yardsToGoal": 64, "down": 1, "distance": 10, "yardsGained": 64,
        "scoring": true, "playType": "Passing Touchdown",
        "playText": "pass complete for 64 yds for a TOUCHDOWN", "ppa": 4.1
    },
    {
        "id": "p4", "gameId": 401752873, "offense": "Oregon", "defense": "Washington",
        "offenseScore": 0, "defenseScore": 7, "home": "Washington", "away": "Oregon",
        "period": 1, "clock": {"minutes": 12, "seconds": 40},
        "yardsToGoal": 70, "down": 1, "distance": 10, "yardsGained": -10,
        "scoring": false, "playType": "Penalty",
        "playText": "PENALTY ORE holding, 10 yds to the ORE 20", "ppa": null
    }
]"#;

const CFBD_WP_JSON: &str = r#"[
    {"playId": "p1", "playNumber": 1, "homeWinProbability": 0.53, "homeScore": 0, "awayScore": 0},
    {"playId": "p2", "playNumber": 2, "homeWinProbability": "0.55", "homeScore": 0, "awayScore": 0},
    {"playId": "p3", "playNumber": 3, "homeWinProbability": 0.72, "homeScore": 7, "awayScore": 0}
]"#;

fn test_config() -> Config {
    Config {
        espn: EspnConfig {
            summary_url: "https://site.api.espn.test/summary".to_string(),
            core_api_url: "https://sports.core.api.espn.test".to_string(),
            request_timeout_ms: 1000,
        },
        cfbd: CfbdConfig {
            base_url: "https://api.collegefootballdata.test".to_string(),
            request_timeout_ms: 1000,
        },
        analysis: AnalysisConfig {
            explosive_yards: 20,
            inflection_threshold_pct: 5.0,
            red_zone_yards: 20,
            green_zone_yards: 30,
            middle_eight_secs: 240,
            recent_games: 3,
        },
        report: ReportConfig {
            chart_js_url: "https://cdn.example/chart.js".to_string(),
            title_prefix: "CFB Review".to_string(),
        },
    }
}

fn seed_cache(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cfb_review_flow_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let game_dir = dir.join(format!("game_{GAME_ID}"));
    fs::create_dir_all(&game_dir).unwrap();
    fs::write(game_dir.join("summary.json"), SUMMARY_JSON).unwrap();
    fs::write(game_dir.join("cfbd_plays.json"), CFBD_PLAYS_JSON).unwrap();
    fs::write(game_dir.join("cfbd_wp.json"), CFBD_WP_JSON).unwrap();
    dir
}

#[test]
fn test_game_report_from_cache() {
    let dir = seed_cache("game");
    let pipeline = Pipeline::new(test_config(), &dir);
    let out = dir.join("review.html");

    pipeline.report(GAME_ID, Some(out.clone())).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("Oregon Ducks @ Washington Huskies"));
    assert!(html.contains("wp-chart"), "win probability chart missing");
    // The 17-point swing on p3 crosses the 5pp threshold and is a score.
    assert!(html.contains("Score"));
    assert!(html.contains("pass complete for 64 yds"));
    // The holding call lands in the penalty table with its yardage.
    assert!(html.contains("holding"));
    // ESPN WP ids and CFBD play ids live in different id spaces; the small
    // second-play swing still shows up in the play-by-play WPA column.
    assert!(html.contains("+2.0"), "play-by-play WPA column empty");
    assert!(html.contains("Generated "));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_compare_report_aligns_feeds() {
    let dir = seed_cache("compare");
    let pipeline = Pipeline::new(test_config(), &dir);
    let out = dir.join("compare.html");

    pipeline.compare(GAME_ID, Some(out.clone())).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("cmp-chart"));
    // ESPN has 4 entries, CFBD 3: one leading ESPN entry is trimmed.
    assert!(html.contains("Trimmed the first 1 ESPN entries"));
    assert!(html.contains("ESPN plays"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_season_report_filters_by_team() {
    let dir = seed_cache("season");
    let pipeline = Pipeline::new(test_config(), &dir);
    let out = dir.join("season.html");

    pipeline.season("Washington", Some(out.clone())).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("Washington season review"));
    assert!(html.contains("1 games analyzed"));
    assert!(html.contains("Situational conversions"));
    assert!(html.contains("Middle eight"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_season_errors_for_unknown_team() {
    let dir = seed_cache("unknown");
    let pipeline = Pipeline::new(test_config(), &dir);

    let err = pipeline.season("Slippery Rock", None).unwrap_err();
    assert!(format!("{err:#}").contains("no cached games involve"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_report_requires_cached_summary() {
    let dir = std::env::temp_dir().join(format!("cfb_review_flow_empty_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    let pipeline = Pipeline::new(test_config(), &dir);

    let err = pipeline.report(GAME_ID, None).unwrap_err();
    assert!(format!("{err:#}").contains("run fetch first"));

    let _ = fs::remove_dir_all(&dir);
}
