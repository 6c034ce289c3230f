//! Test-email dispatch
//!
//! Thin collaborator over SMTP. The pipeline hands it final HTML and resolves
//! on the outcome; delivery rejections do not fail the build, since the HTML
//! was still correctly produced. They are logged and reported instead.

use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailTestConfig;

/// What happened to a dispatched test email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Accepted,
    TemporarilyFailed,
    PermanentlyFailed,
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Accepted => write!(f, "accepted"),
            DispatchOutcome::TemporarilyFailed => write!(f, "temporarily failed"),
            DispatchOutcome::PermanentlyFailed => write!(f, "permanently failed"),
        }
    }
}

/// Map an SMTP rejection to its outcome. Connection and protocol failures
/// are neither transient nor permanent rejections and return `None`; those
/// propagate to the caller.
fn rejection_outcome(is_transient: bool, is_permanent: bool) -> Option<DispatchOutcome> {
    if is_transient {
        Some(DispatchOutcome::TemporarilyFailed)
    } else if is_permanent {
        Some(DispatchOutcome::PermanentlyFailed)
    } else {
        None
    }
}

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailTestConfig,
}

impl Mailer {
    pub fn new(config: EmailTestConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.transport_url)
            .context("Invalid SMTP transport URL")?
            .build();
        Ok(Self { transport, config })
    }

    /// Send the built HTML (with a plain-text alternative) to the configured
    /// recipient. SMTP rejections map to the failure outcomes; transport
    /// construction and connection errors propagate.
    pub async fn send(&self, html: &str, text: &str) -> Result<DispatchOutcome> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .context("Invalid sender address")?;
        let to: Mailbox = self
            .config
            .to
            .parse()
            .context("Invalid recipient address")?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.config.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            ))
            .context("Failed to build test email")?;

        log::info!("Sending test email to {}", self.config.to);

        match self.transport.send(message).await {
            Ok(response) => {
                log::info!("Message was accepted ({})", response.code());
                Ok(DispatchOutcome::Accepted)
            }
            Err(error) => match rejection_outcome(error.is_transient(), error.is_permanent()) {
                Some(outcome) => {
                    log::warn!("Test email {outcome}: {error}");
                    Ok(outcome)
                }
                None => Err(error).context("SMTP transport failure"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(transport_url: &str) -> EmailTestConfig {
        EmailTestConfig {
            transport_url: transport_url.to_string(),
            from: "build@example.com".to_string(),
            to: "qa@example.com".to_string(),
            subject: "Email test".to_string(),
        }
    }

    #[test]
    fn transport_url_is_validated() {
        assert!(Mailer::new(config("smtp://localhost:2525")).is_ok());
        assert!(Mailer::new(config("not a url")).is_err());
    }

    #[test]
    fn rejection_severity_maps_to_a_non_fatal_outcome() {
        assert_eq!(
            rejection_outcome(true, false),
            Some(DispatchOutcome::TemporarilyFailed)
        );
        assert_eq!(
            rejection_outcome(false, true),
            Some(DispatchOutcome::PermanentlyFailed)
        );
        // Anything else is a transport failure, not a rejection.
        assert_eq!(rejection_outcome(false, false), None);
    }

    #[test]
    fn outcomes_render_like_the_log_lines() {
        assert_eq!(DispatchOutcome::Accepted.to_string(), "accepted");
        assert_eq!(
            DispatchOutcome::TemporarilyFailed.to_string(),
            "temporarily failed"
        );
    }
}
