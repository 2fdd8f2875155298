//! Server-rendered pages. Every interpolated value goes through `html_escape`.

mod lookup;
mod payment;
mod report;

pub use lookup::lookup_page;
pub use payment::{PaymentPrefill, payment_page};
pub use report::report_page;

use html_escape::encode_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.level {
            NoticeLevel::Info => "notice notice-info",
            NoticeLevel::Error => "notice notice-error",
        };
        format!(
            r#"<p class="{class}" role="status">{}</p>"#,
            encode_text(&self.message)
        )
    }
}

fn layout(title: &str, notice: Option<&Notice>, body: &str) -> String {
    let notice = notice.map(Notice::render).unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<header class="site-header">
<a class="brand" href="/formpage"><img src="/pics/RenuLogix-Logo.png" alt="RenuLogix"></a>
<nav><a href="/formpage">Find a report</a> <a href="/payment">Order a report</a></nav>
</header>
<main>
{notice}
{body}
</main>
<script src="/js/validation.js"></script>
</body>
</html>
"#,
        title = encode_text(title),
    )
}
