use std::time::Duration;

use anyhow::Context;
use log::{debug, error, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::{self, Runtime};

use crate::article::{Article, WireArticle};

/// Parameters sent along with every headlines request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub category: String,
    pub language: String,
    pub page_size: u8,
}

impl Default for HeadlineQuery {
    fn default() -> Self {
        Self {
            category: "technology".to_string(),
            language: "en".to_string(),
            page_size: 10,
        }
    }
}

/// Somewhere headlines come from
///
/// Implementations never fail, any problem is logged and results in no articles
pub trait NewsSource {
    fn fetch(&self, api_key: &str, query: &HeadlineQuery) -> Vec<Article>;
}

/// Client for the NewsAPI top headlines endpoint
pub struct NewsApi {
    rt: Runtime,
    client: reqwest::Client,
    endpoint: String,
}

impl NewsApi {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_client(endpoint, reqwest::Client::builder().timeout(timeout))
    }

    fn with_client(
        endpoint: impl Into<String>,
        client: reqwest::ClientBuilder,
    ) -> anyhow::Result<Self> {
        let rt = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create async runtime")?;
        let client = client
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build http client")?;
        Ok(Self {
            rt,
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn do_fetch(&self, api_key: &str, query: &HeadlineQuery) -> anyhow::Result<Vec<Article>> {
        let page_size = query.page_size.to_string();
        debug!("Requesting headlines from {} with {query:?}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("category", query.category.as_str()),
                ("language", query.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            // The url holds the api key so keep it out of the logs
            .map_err(reqwest::Error::without_url)
            .context("Failed to send headlines request")?
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .context("Headlines endpoint returned an error status")?;
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read headlines response body")?;
        parse_headlines(&body)
    }
}

impl NewsSource for NewsApi {
    fn fetch(&self, api_key: &str, query: &HeadlineQuery) -> Vec<Article> {
        match self.rt.block_on(self.do_fetch(api_key, query)) {
            Ok(articles) => articles,
            Err(e) => {
                error!("Error fetching news: {e:#}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinesEnvelope {
    status: Option<String>,
    message: Option<String>,
    articles: Option<Vec<Value>>,
}

/// Extracts the articles from a top headlines response body
///
/// A response reporting anything other than `"ok"` is logged and yields no articles. A body that
/// does not have the shape of a response envelope is an error.
pub fn parse_headlines(body: &str) -> anyhow::Result<Vec<Article>> {
    let envelope: HeadlinesEnvelope =
        serde_json::from_str(body).context("Failed to parse headlines response")?;

    if envelope.status.as_deref() != Some("ok") {
        error!(
            "API Error: {}",
            envelope.message.as_deref().unwrap_or("Unknown error")
        );
        return Ok(Vec::new());
    }

    let articles = envelope
        .articles
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(
            |(i, value)| match serde_json::from_value::<WireArticle>(value) {
                Ok(wire) => Some(Article::from(wire)),
                Err(e) => {
                    warn!("Skipping malformed article at position {i}: {e}");
                    None
                }
            },
        )
        .collect();
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    /// Mock headlines server driven by its own runtime, separate from the one inside `NewsApi`
    struct HeadlinesServer {
        rt: Runtime,
        server: MockServer,
    }

    impl HeadlinesServer {
        fn start() -> Self {
            let rt = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let server = rt.block_on(MockServer::start());
            Self { rt, server }
        }

        fn respond(&self, mock: Mock) {
            self.rt.block_on(mock.mount(&self.server));
        }

        fn url(&self) -> String {
            format!("{}/v2/top-headlines", self.server.uri())
        }
    }

    fn api(url: &str) -> NewsApi {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5));
        NewsApi::with_client(url, client).unwrap()
    }

    #[test]
    fn ok_response_yields_articles() {
        // Arrange
        let body = r#"{"status":"ok","totalResults":2,"articles":[
            {"source":{"id":null,"name":"X"},"title":"A","url":"http://a","publishedAt":"2024-01-01T00:00:00Z"},
            {"source":{"name":"Y"},"title":"B","description":"About B"}
        ]}"#;

        // Act
        let actual = parse_headlines(body).unwrap();

        // Assert
        assert_eq!(actual.len(), 2);
        assert_eq!(actual[0].title.as_deref(), Some("A"));
        assert_eq!(actual[0].source_name.as_deref(), Some("X"));
        assert_eq!(actual[1].description.as_deref(), Some("About B"));
        assert_eq!(actual[1].url, None);
    }

    #[test]
    fn error_status_yields_nothing() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#;
        assert!(parse_headlines(body).unwrap().is_empty());
    }

    #[test]
    fn missing_status_yields_nothing() {
        let body = r#"{"articles":[{"title":"A"}]}"#;
        assert!(parse_headlines(body).unwrap().is_empty());
    }

    #[test]
    fn missing_articles_key_yields_nothing() {
        assert!(parse_headlines(r#"{"status":"ok"}"#).unwrap().is_empty());
        assert!(parse_headlines(r#"{"status":"ok","articles":null}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_article_is_skipped() {
        let body = r#"{"status":"ok","articles":[{"title":42},{"title":"Kept"}]}"#;

        let actual = parse_headlines(body).unwrap();

        assert_eq!(actual.len(), 1);
        assert_eq!(actual[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_headlines("<html>Bad Gateway</html>").is_err());
    }

    #[test]
    fn fetch_sends_query_parameters() {
        // Arrange
        let server = HeadlinesServer::start();
        server.respond(
            Mock::given(method("GET"))
                .and(path("/v2/top-headlines"))
                .and(query_param("category", "technology"))
                .and(query_param("language", "en"))
                .and(query_param("pageSize", "10"))
                .and(query_param("apiKey", "secret-key"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    r#"{"status":"ok","articles":[{"title":"A","source":{"name":"X"}}]}"#,
                ))
                .expect(1),
        );

        // Act
        let actual = api(&server.url()).fetch("secret-key", &HeadlineQuery::default());

        // Assert
        assert_eq!(actual.len(), 1);
        assert_eq!(actual[0].source_name.as_deref(), Some("X"));
    }

    #[test]
    fn fetch_http_error_yields_nothing() {
        let server = HeadlinesServer::start();
        server.respond(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(401).set_body_string(
                    r#"{"status":"error","message":"Your API key is invalid"}"#,
                ))
                .expect(1),
        );

        let actual = api(&server.url()).fetch("bad-key", &HeadlineQuery::default());

        assert!(actual.is_empty());
    }

    #[test]
    fn fetch_api_error_yields_nothing() {
        let server = HeadlinesServer::start();
        server.respond(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    r#"{"status":"error","message":"You have made too many requests"}"#,
                ))
                .expect(1),
        );

        let actual = api(&server.url()).fetch("key", &HeadlineQuery::default());

        assert!(actual.is_empty());
    }

    #[test]
    fn fetch_unparsable_body_yields_nothing() {
        let server = HeadlinesServer::start();
        server.respond(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>")),
        );

        let actual = api(&server.url()).fetch("key", &HeadlineQuery::default());

        assert!(actual.is_empty());
    }

    #[test]
    fn fetch_connection_refused_yields_nothing() {
        // Unpooled so nothing listens on the port once the server is dropped
        let rt = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::builder().start());
        let url = format!("{}/v2/top-headlines", server.uri());
        drop(server);

        let actual = api(&url).fetch("key", &HeadlineQuery::default());

        assert!(actual.is_empty());
    }
}
