use serde_json::{json, Value};

use crate::analysis::win_prob::{AlignedSeries, WinProbReport};

/// Win-probability line chart: home WP over the game with inflection points
/// overlaid as a scatter dataset whose tooltips carry the category.
pub fn win_prob_chart(report: &WinProbReport, home_team: &str) -> Value {
    let labels: Vec<String> = report
        .points
        .iter()
        .map(|p| match (p.period, &p.clock) {
            (Some(q), Some(clock)) => format!("Q{q} {clock}"),
            _ => format!("#{}", p.index + 1),
        })
        .collect();
    let series: Vec<f64> = report.points.iter().map(|p| p.home_wp).collect();
    let inflections: Vec<Value> = report
        .inflections
        .iter()
        .map(|i| {
            json!({
                "x": labels.get(i.index).cloned().unwrap_or_default(),
                "y": i.home_wp,
                "category": i.category.label(),
            })
        })
        .collect();

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": format!("{home_team} win %"),
                    "data": series,
                    "borderColor": "#4c6ef5",
                    "backgroundColor": "rgba(76, 110, 245, 0.1)",
                    "fill": true,
                    "pointRadius": 0,
                    "tension": 0.2
                },
                {
                    "label": "Inflection points",
                    "type": "scatter",
                    "data": inflections,
                    "backgroundColor": "#e03131",
                    "pointRadius": 5
                }
            ]
        },
        "options": {
            "scales": { "y": { "min": 0, "max": 100 } },
            "plugins": {
                "tooltip": {
                    "callbacks": {}
                }
            },
            "animation": false
        }
    })
}

/// Side-by-side WPA delta series from the two feeds after alignment.
pub fn compare_chart(aligned: &AlignedSeries) -> Value {
    let len = aligned.espn.len().max(aligned.cfbd.len());
    let labels: Vec<String> = (1..=len).map(|i| format!("#{i}")).collect();

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": "ESPN WPA",
                    "data": aligned.espn,
                    "borderColor": "#4c6ef5",
                    "pointRadius": 0,
                    "tension": 0.1
                },
                {
                    "label": "CFBD WPA",
                    "data": aligned.cfbd,
                    "borderColor": "#f08c00",
                    "pointRadius": 0,
                    "tension": 0.1
                }
            ]
        },
        "options": {
            "scales": { "y": { "title": { "display": true, "text": "Delta (pp)" } } },
            "animation": false
        }
    })
}

/// Render a config into the inline script that mounts it on a canvas.
pub fn mount_script(canvas_id: &str, config: &Value) -> String {
    format!(
        "new Chart(document.getElementById('{canvas_id}'), {});",
        config
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::win_prob::{Inflection, InflectionCategory, WpPoint};

    #[test]
    fn test_win_prob_chart_shape() {
        let report = WinProbReport {
            points: vec![WpPoint {
                index: 0,
                play_id: "1".to_string(),
                matched_play_id: Some("1".to_string()),
                home_wp: 55.0,
                delta: 0.0,
                seconds_left: Some(3600),
                period: Some(1),
                clock: Some("15:00".to_string()),
                offense: None,
                text: None,
            }],
            inflections: vec![Inflection {
                index: 0,
                home_wp: 55.0,
                delta: 6.0,
                category: InflectionCategory::Score,
                period: Some(1),
                clock: Some("15:00".to_string()),
                offense: None,
                text: String::new(),
            }],
            max_home_wp: 55.0,
            min_home_wp: 55.0,
        };
        let config = win_prob_chart(&report, "Washington");
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"][0], "Q1 15:00");
        assert_eq!(config["data"]["datasets"][1]["data"][0]["category"], "Score");
    }

    #[test]
    fn test_mount_script_embeds_canvas_id() {
        let script = mount_script("wp-chart", &serde_json::json!({"type": "line"}));
        assert!(script.contains("getElementById('wp-chart')"));
        assert!(script.contains("\"type\":\"line\""));
    }
}
