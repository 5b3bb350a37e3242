use serde::Deserialize;

pub const DEFAULT_TITLE: &str = "No title";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_SOURCE: &str = "Unknown Source";
pub const PLACEHOLDER_URL: &str = "#";

/// One headline as received, every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,

    /// ISO-8601 as sent by the API, only parsed when rendering
    pub published_at: Option<String>,
}

impl Article {
    pub fn title(&self) -> &str {
        non_blank(&self.title).unwrap_or(DEFAULT_TITLE)
    }

    pub fn description(&self) -> &str {
        non_blank(&self.description).unwrap_or(DEFAULT_DESCRIPTION)
    }

    pub fn source_name(&self) -> &str {
        non_blank(&self.source_name).unwrap_or(DEFAULT_SOURCE)
    }

    /// Only http(s) links are used, anything else falls back to [`PLACEHOLDER_URL`]
    pub fn link(&self) -> &str {
        match non_blank(&self.url) {
            Some(url) if is_web_link(url) => url,
            _ => PLACEHOLDER_URL,
        }
    }

    pub fn published_at(&self) -> Option<&str> {
        non_blank(&self.published_at)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn is_web_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Shape of an article in the NewsAPI response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<WireSource>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSource {
    name: Option<String>,
}

impl From<WireArticle> for Article {
    fn from(value: WireArticle) -> Self {
        Self {
            title: value.title,
            description: value.description,
            url: value.url,
            source_name: value.source.and_then(|s| s.name),
            published_at: value.published_at,
        }
    }
}
