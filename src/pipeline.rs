use std::process::ExitCode;

use chrono::NaiveDate;
use log::{error, info, warn};

use crate::{
    config::{ConfigInputs, MissingConfig, RunConfig},
    fetch::{HeadlineQuery, NewsSource},
    notification::{deliver, DeliveryRequest, Mailer, SenderCredentials},
    render::{render, subject_line},
};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered,
    MissingConfig(MissingConfig),
    DeliveryFailed,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Delivered)
    }

    /// Process exit status, 0 only when the newsletter went out
    pub fn code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(value: RunOutcome) -> Self {
        ExitCode::from(value.code())
    }
}

/// Runs config validation, fetch, render and delivery once, in that order
///
/// Nothing is fetched or sent unless every required value is present. An empty fetch still
/// results in a newsletter being sent.
pub fn run_once(
    inputs: ConfigInputs,
    query: &HeadlineQuery,
    source: &dyn NewsSource,
    mailer: &dyn Mailer,
    today: NaiveDate,
) -> RunOutcome {
    let config = match RunConfig::try_from(inputs) {
        Ok(config) => config,
        Err(missing) => {
            error!("{missing}");
            return RunOutcome::MissingConfig(missing);
        }
    };

    info!("Fetching technology news...");
    let articles = source.fetch(&config.news_api_key, query);
    if articles.is_empty() {
        warn!("No articles found, but continuing to send email...");
    } else {
        info!("Found {} articles", articles.len());
    }

    info!("Creating email content...");
    let request = DeliveryRequest {
        subject: subject_line(today),
        body: render(&articles, today),
        sender: SenderCredentials {
            address: config.email_username,
            secret: config.email_password,
        },
        recipient: config.recipient_email,
    };

    info!("Sending email to {}...", request.recipient);
    if deliver(mailer, &request) {
        info!("Daily tech news delivered successfully!");
        RunOutcome::Delivered
    } else {
        error!("Failed to deliver daily tech news");
        RunOutcome::DeliveryFailed
    }
}
