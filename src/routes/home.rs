use axum::{extract::State, response::Html};

use crate::dashboard::{TimelineListState, NEW_TIMELINE_HREF};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Dashboard listing every timeline", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let result = state.timelines.list_timelines().await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "dashboard query failed");
    }

    Html(render_page(&TimelineListState::from_query(Some(result))))
}

fn render_page(list: &TimelineListState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Case Timelines</title>
    <style>
        body {{
            margin: 0;
            padding: 32px;
            font-family: Arial, sans-serif;
            background-color: #f0f0f0;
        }}
        h1 {{
            color: #333;
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
            background-color: white;
        }}
        th, td {{
            padding: 10px;
            border: 1px solid #ddd;
            text-align: center;
        }}
        td.error {{
            color: #b91c1c;
        }}
        td.empty p {{
            color: #666;
        }}
        a.button {{
            padding: 10px 20px;
            background-color: #007bff;
            color: white;
            text-decoration: none;
            border-radius: 5px;
            font-weight: bold;
        }}
    </style>
</head>
<body>
    <header>
        <h1>Case Timelines</h1>
        <a class="button" href="{NEW_TIMELINE_HREF}">New Timeline</a>
        <a href="/swagger-ui/">API Docs</a>
    </header>
    <main>
        {list}
    </main>
</body>
</html>
"#,
        list = list.render_html()
    )
}
