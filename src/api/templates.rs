use crate::render::html_escape;
use crate::session::SearchSession;

use super::models::SearchParams;

/// The whole search screen: form, actor picker, status line and result grid.
pub fn render_search_page(session: &SearchSession, params: &SearchParams) -> String {
    let selected = params.actor_id().trim();
    let mut options = String::new();
    for opt in session.actor_options() {
        let sel = if !opt.value.is_empty() && opt.value == selected {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{value}"{sel}>{label}</option>"#,
            value = html_escape(&opt.value),
            label = html_escape(&opt.label),
        ));
    }

    let status = session.status();
    let status_class = if status.is_error {
        "status status-error"
    } else {
        "status"
    };

    let top_k = params
        .top_k()
        .map(|n| n.to_string())
        .unwrap_or_default();

    let content = format!(
        r#"<form class="search-form" method="get" action="/">
    <input id="searchInput" name="q" type="text" placeholder="Describe a scene..." value="{q}">
    <input id="objectInput" name="object" type="text" placeholder="Object (e.g. car)" value="{object}">
    <select id="actorSelect" name="actor_id">{options}</select>
    <input id="topK" name="top_k" type="number" min="1" placeholder="Top K" value="{top_k}">
    <button id="searchBtn" type="submit">Search</button>
</form>
<div id="status" class="{status_class}">{status_line}</div>
<div id="resultsGrid" class="results-grid">
{grid}</div>"#,
        q = html_escape(params.q()),
        object = html_escape(params.object()),
        status_line = html_escape(&status.line()),
        grid = session.grid().to_html(),
    );

    build_page("Scene Search", &content)
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<div class="header"><h1>{title}</h1></div>
<div class="container">
{content}
</div>
</body>
</html>"#,
        title = html_escape(title),
    )
}
