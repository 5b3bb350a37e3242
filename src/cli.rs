use std::{env, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::{ConfigInputs, EMAIL_PASSWORD, NEWS_API_KEY};

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = "Fetches today's technology headlines and emails them as an HTML newsletter.",
    after_help = "NEWS_API_KEY and EMAIL_PASSWORD are only read from the environment."
)]
pub struct Cli {
    /// Specify settings file to use
    ///
    /// If not specified the built in defaults are used
    #[arg(long = "config", short, value_name = "PATH")]
    pub config_filename: Option<String>,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write log output to this file (rolled over when it grows too large)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// API key for NewsAPI.org, never taken from the command line
    #[arg(skip = env::var(NEWS_API_KEY).ok())]
    pub news_api_key: Option<String>,

    /// Address the newsletter is sent from, also used as the SMTP login
    #[arg(long, env = "EMAIL_USERNAME", hide_env_values = true)]
    pub email_username: Option<String>,

    /// Password (or app password) for the SMTP login, never taken from the command line
    #[arg(skip = env::var(EMAIL_PASSWORD).ok())]
    pub email_password: Option<String>,

    /// Address the newsletter is delivered to
    #[arg(long, env = "RECIPIENT_EMAIL", hide_env_values = true)]
    pub recipient_email: Option<String>,
}

impl Cli {
    pub fn get_config_path(&self) -> Option<PathBuf> {
        self.config_filename.as_ref().map(PathBuf::from)
    }

    /// Raw credential values as received, validation happens in [`crate::config::RunConfig`]
    pub fn config_inputs(&self) -> ConfigInputs {
        ConfigInputs {
            news_api_key: self.news_api_key.clone(),
            email_username: self.email_username.clone(),
            email_password: self.email_password.clone(),
            recipient_email: self.recipient_email.clone(),
        }
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
