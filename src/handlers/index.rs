//! Dashboard page

use axum::{extract::State, response::Html};
use serde_json::Value;

use crate::{gallery, AppResult, AppState};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Solar Panel Defect Detection</title>
<style>
body { font-family: sans-serif; margin: 2rem; background: #0f172a; color: #e2e8f0; }
table { border-collapse: collapse; margin-bottom: 1.5rem; }
td, th { border: 1px solid #334155; padding: 0.3rem 0.8rem; text-align: left; }
li { margin: 0.2rem 0; }
a { color: #38bdf8; }
</style>
</head>
<body>
<h1>Solar Panel Defect Detection</h1>
<p>Electroluminescence image analysis. Send <code>POST /api/analyze</code> with <code>{"image_name": "..."}</code> to analyze an image.</p>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Main page - available images and summary statistics
pub async fn page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let images = gallery::list_images(
        &state.config.results_images_dir,
        &state.config.result_image_extension,
    )
    .await?;

    Ok(Html(render(&images, &state.dataset.summary)))
}

fn render(images: &[String], summary: &Value) -> String {
    let mut html = String::from(PAGE_HEAD);

    html.push_str("<h2>Summary</h2>\n");
    match summary.as_object() {
        Some(stats) if !stats.is_empty() => {
            html.push_str("<table>\n");
            for (key, value) in stats {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                html.push_str(&format!(
                    "<tr><th>{}</th><td>{}</td></tr>\n",
                    escape(key),
                    escape(&shown)
                ));
            }
            html.push_str("</table>\n");
        }
        _ => html.push_str("<p>No summary statistics loaded.</p>\n"),
    }

    html.push_str(&format!("<h2>Available images ({})</h2>\n", images.len()));
    if images.is_empty() {
        html.push_str("<p>No result images found.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for name in images {
            let name = escape(name);
            html.push_str(&format!(
                "<li>{0} (<a href=\"/original/{0}\">original</a>, <a href=\"/results/{0}\">result</a>)</li>\n",
                name
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str(PAGE_TAIL);
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
