//! Notification delivery.
//!
//! A [`Notification`] carries the new listings of one run together with the
//! rendered HTML report. Each [`Notifier`] delivers it somewhere: the
//! report file next to the history, and an email when recipients are
//! configured. Any delivery failure is a [`WatchError::Notification`].

use std::path::PathBuf;

use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use immo_ads_core::{HistoryKey, Listing};

use crate::config::{Config, SmtpConfig};
use crate::error::WatchError;
use crate::history_fs::search_file_path;
use crate::report::render_report;

/// New listings of one run, ready for delivery.
pub struct Notification<'a> {
    pub search_name: &'a str,
    pub key: &'a HistoryKey,
    /// Newest-first.
    pub listings: &'a [Listing],
    pub html: String,
}

impl<'a> Notification<'a> {
    pub fn new(search_name: &'a str, key: &'a HistoryKey, listings: &'a [Listing]) -> Self {
        let html = render_report(search_name, listings, Utc::now());
        Self {
            search_name,
            key,
            listings,
            html,
        }
    }
}

pub trait Notifier {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn notify(&self, notification: &Notification<'_>) -> Result<(), WatchError>;
}

/// Builds the notifiers a run should use: always the report file, plus
/// email when `config.smtp` is set.
pub fn notifiers_for(config: &Config) -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> =
        vec![Box::new(ReportFileNotifier::new(config.history.dir.clone()))];
    if let Some(smtp) = &config.smtp {
        notifiers.push(Box::new(EmailNotifier::new(
            smtp.clone(),
            config.search.recipients.clone(),
        )));
    }
    notifiers
}

// ── Report file ─────────────────────────────────────────────────────────

/// Writes the report to `<dir>/immo_ads-<key>.html`, replacing the previous
/// run's report.
pub struct ReportFileNotifier {
    dir: PathBuf,
}

impl ReportFileNotifier {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Notifier for ReportFileNotifier {
    fn name(&self) -> &str {
        "report-file"
    }

    fn notify(&self, notification: &Notification<'_>) -> Result<(), WatchError> {
        let path = search_file_path(&self.dir, notification.key, "html");
        std::fs::write(&path, &notification.html).map_err(|e| {
            WatchError::Notification(format!("cannot write {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "wrote report");
        Ok(())
    }
}

// ── Email ───────────────────────────────────────────────────────────────

/// Sends the report as an HTML email over SMTP with STARTTLS.
pub struct EmailNotifier {
    smtp: SmtpConfig,
    recipients: Vec<String>,
}

impl EmailNotifier {
    pub fn new(smtp: SmtpConfig, recipients: Vec<String>) -> Self {
        Self { smtp, recipients }
    }

    /// Builds the message: subject is the search name, body the report.
    pub fn build_message(&self, notification: &Notification<'_>) -> Result<Message, WatchError> {
        let from: Mailbox = parse_mailbox(&self.smtp.from)?;
        let mut builder = Message::builder()
            .from(from)
            .subject(notification.search_name)
            .header(ContentType::TEXT_HTML);
        for recipient in &self.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        builder
            .body(notification.html.clone())
            .map_err(|e| WatchError::Notification(format!("cannot build email: {}", e)))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, WatchError> {
    address
        .parse()
        .map_err(|e| WatchError::Notification(format!("invalid address '{}': {}", address, e)))
}

impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    fn notify(&self, notification: &Notification<'_>) -> Result<(), WatchError> {
        let message = self.build_message(notification)?;

        let mailer = SmtpTransport::starttls_relay(&self.smtp.hostname)
            .map_err(|e| WatchError::Notification(format!("SMTP setup failed: {}", e)))?
            .port(self.smtp.port)
            .credentials(Credentials::new(
                self.smtp.username.clone(),
                self.smtp.password.clone(),
            ))
            .build();

        mailer
            .send(&message)
            .map_err(|e| WatchError::Notification(format!("SMTP delivery failed: {}", e)))?;

        tracing::info!(
            recipients = self.recipients.len(),
            host = %self.smtp.hostname,
            "sent email"
        );
        Ok(())
    }
}
