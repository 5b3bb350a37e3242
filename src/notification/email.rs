use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use log::debug;

use super::{DeliveryRequest, Mailer};
use crate::{config::SmtpSettings, Seconds};

pub const GMAIL_HOST: &str = "smtp.gmail.com";
pub const OUTLOOK_HOST: &str = "smtp-mail.outlook.com";
pub const YAHOO_HOST: &str = "smtp.mail.yahoo.com";

/// Used for every domain not in [`PROVIDER_HOSTS`]
pub const DEFAULT_HOST: &str = GMAIL_HOST;

/// Sender domain to submission host, a domain also matches its subdomains
const PROVIDER_HOSTS: &[(&str, &str)] = &[
    ("gmail.com", GMAIL_HOST),
    ("googlemail.com", GMAIL_HOST),
    ("outlook.com", OUTLOOK_HOST),
    ("hotmail.com", OUTLOOK_HOST),
    ("live.com", OUTLOOK_HOST),
    ("yahoo.com", YAHOO_HOST),
];

/// Picks the SMTP submission host based on the domain of the sender's address
pub fn submission_host(sender: &str) -> &'static str {
    let Some(domain) = sender_domain(sender) else {
        debug!("No domain found in {sender:?}, using default submission host");
        return DEFAULT_HOST;
    };
    PROVIDER_HOSTS
        .iter()
        .find(|&&(known, _)| {
            domain == known
                || domain
                    .strip_suffix(known)
                    .is_some_and(|rest| rest.ends_with('.'))
        })
        .map_or(DEFAULT_HOST, |&(_, host)| host)
}

/// Lowercased text after the last `@`
fn sender_domain(sender: &str) -> Option<String> {
    let (_, domain) = sender.trim().rsplit_once('@')?;
    let domain = domain
        .trim()
        .trim_end_matches(['>', '.'])
        .to_ascii_lowercase();
    (!domain.is_empty()).then_some(domain)
}

/// Sends mail through the sender's provider using STARTTLS on the submission port
pub struct SmtpMailer {
    port: u16,
    timeout: Seconds,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Self {
        Self {
            port: settings.port,
            timeout: settings.timeout,
        }
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, request: &DeliveryRequest) -> anyhow::Result<()> {
        let message = build_message(request)?;
        let host = submission_host(&request.sender.address);
        debug!("Submitting via {host}:{} with timeout {}", self.port, self.timeout);

        // Transport only lives for this call so the session is closed on every path out
        let transport = SmtpTransport::starttls_relay(host)
            .with_context(|| format!("Failed to create SMTP transport for {host}"))?
            .port(self.port)
            .credentials(Credentials::new(
                request.sender.address.clone(),
                request.sender.secret.clone(),
            ))
            .timeout(Some(self.timeout.into()))
            .build();

        transport
            .send(&message)
            .with_context(|| format!("Failed to send email via {host}"))?;
        Ok(())
    }
}

/// Single part `multipart/alternative` message carrying the HTML newsletter
fn build_message(request: &DeliveryRequest) -> anyhow::Result<Message> {
    let from: Mailbox = request
        .sender
        .address
        .parse()
        .context("Invalid sender email address")?;
    let to: Mailbox = request
        .recipient
        .parse()
        .context("Invalid recipient email address")?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(request.subject.as_str())
        .multipart(
            MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(request.body.as_str().to_owned()),
            ),
        )
        .context("Failed to build email message")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::{notification::SenderCredentials, render::render};

    #[rstest]
    #[case("user@outlook.com", OUTLOOK_HOST)]
    #[case("user@hotmail.com", OUTLOOK_HOST)]
    #[case("User@Outlook.COM", OUTLOOK_HOST)]
    #[case("user@yahoo.com", YAHOO_HOST)]
    #[case("user@mail.yahoo.com", YAHOO_HOST)]
    #[case("user@gmail.com", GMAIL_HOST)]
    #[case("user@example.org", DEFAULT_HOST)]
    #[case("user@notoutlook.com", DEFAULT_HOST)]
    #[case("\"x@outlook.com\"@example.org", DEFAULT_HOST)]
    #[case("Me <me@yahoo.com>", YAHOO_HOST)]
    #[case("no-at-sign", DEFAULT_HOST)]
    fn host_selection(#[case] sender: &str, #[case] expected: &str) {
        assert_eq!(submission_host(sender), expected);
    }

    fn request(sender: &str, recipient: &str) -> DeliveryRequest {
        DeliveryRequest {
            recipient: recipient.into(),
            subject: "Daily Tech News - January 01, 2024".into(),
            body: render(&[], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            sender: SenderCredentials {
                address: sender.into(),
                secret: "secret".into(),
            },
        }
    }

    #[test]
    fn message_is_single_html_alternative() {
        // Arrange
        let request = request("me@example.com", "you@example.com");

        // Act
        let message = build_message(&request).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        // Assert
        assert!(formatted.contains("From: me@example.com"));
        assert!(formatted.contains("To: you@example.com"));
        assert!(formatted.contains("multipart/alternative"));
        assert_eq!(formatted.matches("Content-Type: text/html").count(), 1);
        assert!(!formatted.contains("text/plain"));
    }

    #[rstest]
    #[case("not an address", "you@example.com")]
    #[case("me@example.com", "")]
    fn invalid_addresses_fail_before_connecting(#[case] sender: &str, #[case] recipient: &str) {
        let mailer = SmtpMailer::new(&SmtpSettings::default());

        let result = mailer.send(&request(sender, recipient));

        assert!(result.is_err());
    }
}
