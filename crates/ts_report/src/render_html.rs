//! crates/ts_report/src/render_html.rs
//! Self-contained HTML page: no external assets, every model string escaped.

use std::fmt::Write as _;

use crate::{ReportError, ReportModel};

pub fn render_html(model: &ReportModel) -> Result<String, ReportError> {
    write_html(model).map_err(|_| ReportError::Template("html_write"))
}

fn write_html(model: &ReportModel) -> Result<String, std::fmt::Error> {
    let mut html = String::new();
    let cover = &model.cover;
    writeln!(
        html,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        esc(&cover.title)
    )?;
    writeln!(
        html,
        "<h1>{}</h1><p>Generated {} | {} division(s), {} team(s)</p>",
        esc(&cover.title),
        esc(&cover.generated_at),
        cover.division_count,
        cover.team_count
    )?;

    writeln!(html, "<h2>Divisions</h2>")?;
    writeln!(
        html,
        "<table><tr><th>Division</th><th>Sheet</th><th>Teams</th><th>Shape</th><th>Layout</th><th>Values</th><th>Structural ops</th></tr>"
    )?;
    for r in &model.divisions.rows {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            esc(&r.division),
            esc(&r.sheet),
            r.teams,
            esc(&r.shape),
            esc(&r.layout_note),
            r.values,
            r.structural_ops
        )?;
    }
    writeln!(html, "</table>")?;

    if let Some(s) = &model.shootout {
        writeln!(html, "<h2>Shootout</h2><p>Sheet: {}</p>", esc(&s.sheet))?;
    }

    if !model.warnings.items.is_empty() {
        writeln!(html, "<h2>Warnings</h2><ul>")?;
        for w in &model.warnings.items {
            writeln!(html, "<li>{}</li>", esc(w))?;
        }
        writeln!(html, "</ul>")?;
    }

    let i = &model.integrity;
    writeln!(
        html,
        "<h2>Integrity</h2><p>Engine: {}/{} v{} ({})</p>",
        esc(&i.engine_vendor),
        esc(&i.engine_name),
        esc(&i.engine_version),
        esc(&i.engine_build)
    )?;
    writeln!(
        html,
        "<p>Roster {}<br>Config {}<br>Operations {}</p>",
        esc(&i.roster_sha256),
        esc(&i.config_sha256),
        esc(&i.operations_sha256)
    )?;
    writeln!(html, "</body></html>")?;
    Ok(html)
}

fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_model;
    use crate::tests::run_record;

    #[test]
    fn html_lists_divisions_and_warnings() {
        let html = render_html(&build_model(&run_record()).unwrap()).unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<td>U9</td><td>U9</td><td>7</td><td>twelve</td><td>fallback (12-team)</td>"));
        assert!(html.contains("<li>topology.fallback: U9 has 7 teams; using the 12-team layout</li>"));
        assert!(html.contains("<p>Sheet: Shootout</p>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut v = run_record();
        v["tournament"] = serde_json::json!("Cup <A & B>");
        let html = render_html(&build_model(&v).unwrap()).unwrap();
        assert!(html.contains("<h1>Cup &lt;A &amp; B&gt;</h1>"));
        assert!(!html.contains("<A & B>"));
    }
}
