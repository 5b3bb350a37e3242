use std::{fmt, fs, path::Path};

use anyhow::Context;
use log::debug;
use serde::Deserialize;

use crate::{fetch::HeadlineQuery, Seconds};

pub const DEFAULT_HEADLINES_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

/// Names of the required values, in the order they are reported when missing
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const EMAIL_USERNAME: &str = "EMAIL_USERNAME";
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// Optional settings file, everything in it has a default
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub news: NewsSettings,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewsSettings {
    /// URL of the top headlines endpoint
    pub endpoint: String,
    pub category: String,
    pub language: String,
    pub page_size: u8,

    /// How long to wait for the headlines request before giving up
    pub timeout: Seconds,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HEADLINES_ENDPOINT.to_string(),
            category: "technology".to_string(),
            language: "en".to_string(),
            page_size: 10,
            timeout: 10.into(),
        }
    }
}

impl NewsSettings {
    pub fn query(&self) -> HeadlineQuery {
        HeadlineQuery {
            category: self.category.clone(),
            language: self.language.clone(),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmtpSettings {
    /// Submission port, STARTTLS is always used
    pub port: u16,

    /// Applies to each command of the SMTP session
    pub timeout: Seconds,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            port: 587,
            timeout: 30.into(),
        }
    }
}

impl Settings {
    pub fn load_from(config_path: &Path) -> anyhow::Result<Settings> {
        debug!("Loading Settings from: {config_path:?}");
        let file_contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
        let result = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
        Ok(result)
    }
}

/// Values for [`RunConfig`] as they were received, any of them may be absent
#[derive(Clone, Default)]
pub struct ConfigInputs {
    pub news_api_key: Option<String>,
    pub email_username: Option<String>,
    pub email_password: Option<String>,
    pub recipient_email: Option<String>,
}

/// Everything a run needs that has no sensible default
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub news_api_key: String,
    pub email_username: String,
    pub email_password: String,
    pub recipient_email: String,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("news_api_key", &"<redacted>")
            .field("email_username", &self.email_username)
            .field("email_password", &"<redacted>")
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}

impl TryFrom<ConfigInputs> for RunConfig {
    type Error = MissingConfig;

    fn try_from(inputs: ConfigInputs) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let news_api_key = require(inputs.news_api_key, NEWS_API_KEY);
        let email_username = require(inputs.email_username, EMAIL_USERNAME);
        let email_password = require(inputs.email_password, EMAIL_PASSWORD);
        let recipient_email = require(inputs.recipient_email, RECIPIENT_EMAIL);

        if !missing.is_empty() {
            return Err(MissingConfig(missing));
        }
        Ok(Self {
            news_api_key,
            email_username,
            email_password,
            recipient_email,
        })
    }
}

/// Lists every required value that was absent or blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConfig(pub Vec<&'static str>);

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing required environment variables: {}",
            self.0.join(", ")
        )
    }
}

impl std::error::Error for MissingConfig {}
