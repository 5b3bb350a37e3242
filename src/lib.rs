mod article;
mod cli;
mod config;
mod fetch;
mod logging;
mod notification;
mod pipeline;
mod render;
mod units;

use chrono::Local;
use log::debug;

pub use article::Article;
pub use cli::{Cli, LogLevel};
pub use config::{ConfigInputs, MissingConfig, NewsSettings, RunConfig, Settings, SmtpSettings};
pub use fetch::{parse_headlines, HeadlineQuery, NewsApi, NewsSource};
pub use logging::init_logging;
pub use notification::{
    deliver, submission_host, DeliveryRequest, Mailer, SenderCredentials, SmtpMailer,
};
pub use pipeline::{run_once, RunOutcome};
pub use render::{render, subject_line, NewsletterDocument};
pub use units::Seconds;

/// Sends today's newsletter using the real NewsAPI and SMTP clients
pub fn run(cli: Cli) -> anyhow::Result<RunOutcome> {
    let settings = match cli.get_config_path() {
        Some(path) => Settings::load_from(&path)?,
        None => Settings::default(),
    };
    debug!("Using settings: {settings:?}");

    let source = NewsApi::new(settings.news.endpoint.as_str(), settings.news.timeout.into())?;
    let mailer = SmtpMailer::new(&settings.smtp);
    Ok(run_once(
        cli.config_inputs(),
        &settings.news.query(),
        &source,
        &mailer,
        Local::now().date_naive(),
    ))
}
