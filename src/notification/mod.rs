mod email;

use std::fmt;

use log::{error, info};

use crate::render::NewsletterDocument;

pub use email::{submission_host, SmtpMailer};

/// Login used to submit mail, the address doubles as the sender
#[derive(Clone, PartialEq, Eq)]
pub struct SenderCredentials {
    pub address: String,
    pub secret: String,
}

impl fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Everything needed to send one newsletter
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub recipient: String,
    pub subject: String,
    pub body: NewsletterDocument,
    pub sender: SenderCredentials,
}

/// Something able to deliver a newsletter, one attempt per call
pub trait Mailer {
    fn send(&self, request: &DeliveryRequest) -> anyhow::Result<()>;
}

/// Attempts to deliver the request, any error is logged and reported as false
pub fn deliver(mailer: &dyn Mailer, request: &DeliveryRequest) -> bool {
    match mailer.send(request) {
        Ok(()) => {
            info!("Email sent successfully to {}", request.recipient);
            true
        }
        Err(e) => {
            error!("Error sending email: {e:#}");
            false
        }
    }
}
