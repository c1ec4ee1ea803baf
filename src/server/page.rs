//! The single HTML page: download form plus an optional status message

use crate::extractor::options::FormatChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStatus {
    Error,
    Success,
}

impl NoticeStatus {
    /// CSS class on the message box
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeStatus::Error => "error",
            NoticeStatus::Success => "success",
        }
    }
}

/// Message shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub status: NoticeStatus,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: NoticeStatus::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: NoticeStatus::Success,
            message: message.into(),
        }
    }
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Video Downloader Pro</title>
    <style>
        body { font-family: Arial, sans-serif; text-align: center; padding: 20px; background: #ecf0f1; }
        h1 { color: #34495e; }
        .container { max-width: 700px; margin: 0 auto; }
        input[type="text"] { padding: 12px; width: 80%; border: 1px solid #bdc3c7; border-radius: 5px; }
        select { padding: 12px; margin: 10px; width: 50%; border-radius: 5px; }
        button { padding: 12px 30px; background: #3498db; color: white; border: none; border-radius: 5px; cursor: pointer; }
        button:hover { background: #2980b9; }
        .message { margin: 10px; padding: 10px; border-radius: 5px; }
        .error { background: #f9ebeb; color: #e74c3c; }
        .success { background: #e9f7ef; color: #27ae60; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Video Downloader Pro</h1>
        <p>Paste a video link to start the download</p>
        <form method="POST" action="/download">
            <input type="text" name="url" placeholder="Video or playlist URL" required><br>
            <select name="format">
"#;

const PAGE_FORM_END: &str = r#"            </select><br>
            <button type="submit">Download</button>
        </form>
"#;

const PAGE_TAIL: &str = r#"    </div>
</body>
</html>
"#;

pub fn render_page(notice: Option<&Notice>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(PAGE_HEAD);

    for choice in FormatChoice::ALL {
        html.push_str(&format!(
            "                <option value=\"{}\">{}</option>\n",
            choice.as_str(),
            escape_html(choice.label())
        ));
    }

    html.push_str(PAGE_FORM_END);

    if let Some(notice) = notice {
        html.push_str(&format!(
            "        <div class=\"message {}\">{}</div>\n",
            notice.status.css_class(),
            escape_html(&notice.message)
        ));
    }

    html.push_str(PAGE_TAIL);
    html
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
