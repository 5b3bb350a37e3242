//! Turns the fetched articles into the newsletter email body.

use std::fmt::{self, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::article::Article;

pub const NEWSLETTER_TITLE: &str = "Daily Tech News";
pub const NO_NEWS_MESSAGE: &str = "No technology news available today. Please check back tomorrow!";

const DATE_FORMAT: &str = "%B %d, %Y";
const PUBLISHED_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// A rendered, self contained HTML newsletter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterDocument(String);

impl NewsletterDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NewsletterDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subject line for the newsletter sent on `today`
pub fn subject_line(today: NaiveDate) -> String {
    format!("🚀 {NEWSLETTER_TITLE} - {}", today.format(DATE_FORMAT))
}

/// Builds the newsletter for `today` with one block per article in the order given
pub fn render(articles: &[Article], today: NaiveDate) -> NewsletterDocument {
    let mut body = String::new();
    if articles.is_empty() {
        let _ = write!(
            body,
            r#"
            <div class="empty-notice">
                <p>{NO_NEWS_MESSAGE}</p>
            </div>
"#
        );
    } else {
        for (i, article) in articles.iter().enumerate() {
            write_article(&mut body, i + 1, article);
        }
    }

    NewsletterDocument(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{NEWSLETTER_TITLE}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', sans-serif;
            line-height: 1.6;
            color: #1f2937;
            background-color: #f3f4f6;
            margin: 0;
            padding: 20px;
        }}
        .container {{
            max-width: 760px;
            margin: 0 auto;
            background: #ffffff;
            border-radius: 12px;
            padding: 28px;
            box-shadow: 0 2px 8px rgba(15, 23, 42, 0.08);
        }}
        .header {{
            text-align: center;
            border-bottom: 3px solid #0ea5e9;
            padding-bottom: 18px;
            margin-bottom: 28px;
        }}
        .header h1 {{
            margin: 0;
            font-size: 30px;
            color: #0c4a6e;
        }}
        .header .date {{
            margin-top: 8px;
            font-size: 14px;
            color: #6b7280;
        }}
        .headline {{
            padding-bottom: 22px;
            margin-bottom: 22px;
            border-bottom: 1px solid #e5e7eb;
        }}
        .headline:last-of-type {{
            border-bottom: none;
        }}
        .headline-title {{
            font-size: 19px;
            font-weight: 700;
            margin-bottom: 8px;
        }}
        .headline-title a {{
            color: #0c4a6e;
            text-decoration: none;
        }}
        .headline-meta {{
            font-size: 13px;
            color: #6b7280;
            margin-bottom: 8px;
        }}
        .headline-meta .source {{
            color: #0284c7;
            font-weight: 600;
        }}
        .headline-summary {{
            color: #374151;
        }}
        .empty-notice {{
            text-align: center;
            color: #6b7280;
            padding: 36px;
            font-size: 16px;
        }}
        .footer {{
            text-align: center;
            margin-top: 36px;
            padding-top: 18px;
            border-top: 2px solid #e5e7eb;
            font-size: 12px;
            color: #9ca3af;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🚀 {NEWSLETTER_TITLE}</h1>
            <div class="date">{date}</div>
        </div>
{body}
        <div class="footer">
            <p>This is an automated daily newsletter powered by NewsAPI.org</p>
        </div>
    </div>
</body>
</html>
"#,
        date = today.format(DATE_FORMAT),
    ))
}

fn write_article(out: &mut String, number: usize, article: &Article) {
    let published = article
        .published_at()
        .and_then(format_published)
        .map(|p| format!(" &bull; {p}"))
        .unwrap_or_default();

    let _ = write!(
        out,
        r#"
            <div class="headline">
                <div class="headline-title">
                    <a href="{url}" target="_blank">{number}. {title}</a>
                </div>
                <div class="headline-meta">
                    <span class="source">{source}</span>{published}
                </div>
                <div class="headline-summary">
                    {description}
                </div>
            </div>
"#,
        url = html_escape(article.link()),
        title = html_escape(article.title()),
        source = html_escape(article.source_name()),
        description = html_escape(article.description()),
    );
}

/// Offset forms tried after RFC 3339, a trailing `Z` has already become `+00:00`
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Formats an ISO-8601 timestamp for display, `None` if it can't be parsed
///
/// Timestamps with an offset keep it, ones without are shown as is and a bare date is midnight.
fn format_published(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.format(PUBLISHED_FORMAT).to_string());
    }
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Some(parsed.format(PUBLISHED_FORMAT).to_string());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|parsed| parsed.format(PUBLISHED_FORMAT).to_string())
}

/// Simple HTML escaping for user content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
