use axum::response::Html;
use pulldown_cmark::{Event, Options, Parser, html};

use crate::models::{ModelId, Notice, NoticeLevel, RunOutcome};
use crate::workflow::{EXTRACTING_MESSAGE, summarizing_message};

const INDEX_HTML: &str = include_str!("../templates/index.html");

pub const ADMIN_CONTACT_ERROR: &str =
    "アプリをデプロイする管理者に連絡して、Gemini APIキーを設定してもらってください。";
pub const RESULT_HEADING: &str = "要約結果";

/// The page shown when no API key is configured. Nothing on it can start a run.
pub fn render_blocked() -> Html<String> {
    let sidebar = render_notice(&Notice::error(ADMIN_CONTACT_ERROR));
    render_layout(&sidebar, "")
}

/// The interactive page, optionally with the outcome of the last run.
pub fn render_ready(selected: ModelId, outcome: Option<&RunOutcome>) -> Html<String> {
    let mut main = render_form();
    if let Some(outcome) = outcome {
        for notice in &outcome.notices {
            main.push_str(&render_notice(notice));
        }
        if let Some(summary) = &outcome.summary {
            main.push_str(&format!(
                "<h2>{}</h2>\n<div class=\"markdown\" id=\"summary\">{}</div>\n",
                RESULT_HEADING,
                render_markdown(summary)
            ));
        }
    }
    render_layout(&render_model_select(selected), &main)
}

fn render_layout(sidebar: &str, main: &str) -> Html<String> {
    let html = INDEX_HTML
        .replace("{{ sidebar }}", sidebar)
        .replace("{{ main }}", main);
    Html(html)
}

fn render_model_select(selected: ModelId) -> String {
    let options: String = ModelId::ALL
        .iter()
        .map(|model| {
            let marker = if *model == selected { " selected" } else { "" };
            format!(
                "<option value=\"{0}\" data-progress=\"{1}\"{2}>{0}</option>",
                model,
                escape_html(&summarizing_message(*model)),
                marker
            )
        })
        .collect();

    format!(
        "<label for=\"model\">使用するモデルを選択</label>\n\
         <select id=\"model\" name=\"model\" form=\"run-form\">{}</select>\n",
        options
    )
}

fn render_form() -> String {
    format!(
        r#"<form id="run-form" method="post" action="/summarize" enctype="multipart/form-data">
  <label for="pdf">英語の論文(PDF)をアップロードしてください</label>
  <input id="pdf" type="file" name="pdf" accept=".pdf,application/pdf">
  <button type="submit">要約を実行</button>
</form>
<div id="progress"><div>{}</div><div id="progress-model"></div></div>
<script>
  document.getElementById("run-form").addEventListener("submit", function () {{
    var select = document.getElementById("model");
    document.getElementById("progress-model").textContent =
      select.options[select.selectedIndex].dataset.progress;
    document.getElementById("progress").style.display = "block";
  }});
</script>
"#,
        EXTRACTING_MESSAGE
    )
}

/// Markdown to HTML for display. Raw HTML in the reply is shown as text, never injected.
pub fn render_markdown(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, events);
    rendered
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Error => "error",
        NoticeLevel::Warning => "warning",
    };
    format!(
        "<div class=\"notice {}\" role=\"alert\">{}</div>\n",
        class,
        escape_html(&notice.message)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
