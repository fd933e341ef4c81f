pub mod chart;
pub mod html;

use chrono::Local;

/// Escape text destined for an HTML body or attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #f4f5f7; color: #212529; }
.wrap { max-width: 1080px; margin: 0 auto; padding: 24px 16px 48px; }
.header { background: linear-gradient(135deg, #4c2889, #1864ab); color: #fff; border-radius: 12px; padding: 28px 32px; margin-bottom: 24px; }
.header h1 { margin: 0 0 6px; font-size: 1.6rem; }
.header .sub { opacity: 0.85; font-size: 0.95rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin-bottom: 24px; }
.card { background: #fff; border-radius: 10px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.card .value { font-size: 1.5rem; font-weight: 700; }
.card .label { color: #868e96; font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.04em; }
section { background: #fff; border-radius: 10px; padding: 20px 24px; margin-bottom: 24px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
section h2 { margin-top: 0; font-size: 1.15rem; border-bottom: 2px solid #e9ecef; padding-bottom: 8px; }
table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
th { text-align: left; color: #868e96; font-weight: 600; padding: 8px 10px; border-bottom: 2px solid #dee2e6; }
td { padding: 7px 10px; border-bottom: 1px solid #f1f3f5; }
tr:nth-child(even) td { background: #f8f9fa; }
.pos { color: #2b8a3e; font-weight: 600; }
.neg { color: #c92a2a; font-weight: 600; }
.note { color: #868e96; font-size: 0.85rem; }
footer { text-align: center; color: #adb5bd; font-size: 0.8rem; margin-top: 32px; }
canvas { max-height: 360px; }
"#;

/// Shared page skeleton. `body` is already-escaped section markup; `scripts`
/// are inline Chart.js mount statements.
pub fn page(title: &str, chart_js_url: &str, body: &str, scripts: &[String]) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M");
    let script_block = if scripts.is_empty() {
        String::new()
    } else {
        format!(
            "<script src=\"{}\"></script>\n<script>\n{}\n</script>",
            escape(chart_js_url),
            scripts.join("\n")
        )
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"wrap\">\n{body}\n\
         <footer>Generated {generated}</footer>\n</div>\n{script_block}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn header_card(title: &str, subtitle: &str) -> String {
    format!(
        "<div class=\"header\"><h1>{}</h1><div class=\"sub\">{}</div></div>",
        escape(title),
        escape(subtitle)
    )
}

pub fn summary_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
        escape(value),
        escape(label)
    )
}

/// Table from pre-escaped cell strings.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table><thead><tr>");
    for h in headers {
        out.push_str(&format!("<th>{}</th>", escape(h)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub fn section(title: &str, inner: &str) -> String {
    format!("<section><h2>{}</h2>{inner}</section>", escape(title))
}

/// Signed delta cell with the pos/neg color class.
pub fn delta_cell(delta: f64) -> String {
    let class = if delta >= 0.0 { "pos" } else { "neg" };
    format!("<span class=\"{class}\">{delta:+.1}</span>")
}
