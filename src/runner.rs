use lettre::message::Mailbox;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::email_options::EmailOptions;
use crate::error::write_chain;
use crate::mailer::{Mailer, Relay, Security, TestEmail};
use crate::report::{Attempt, RunOutcome, SendStatus};

pub const USAGE: &str = "Usage: email-tester [recipient]";
const CONFIGURATION_ERROR: &str = "There is a configuration error.";

/// Picks the recipient from the process arguments, skipping the program name.
/// Arguments that are not valid Unicode are converted lossily and left to the
/// address parser.
pub fn recipient_argument<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .nth(1)
        .map(|arg| arg.to_string_lossy().into_owned())
}

/// Checks an SMTP relay by sending one plain and one TLS test email.
pub struct TestRunner<M> {
    mailer: M,
    settings_path: PathBuf,
    hostname: String,
}

impl<M: Mailer> TestRunner<M> {
    pub fn new(mailer: M, settings_path: impl Into<PathBuf>, hostname: impl Into<String>) -> Self {
        TestRunner {
            mailer,
            settings_path: settings_path.into(),
            hostname: hostname.into(),
        }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Runs every step in order, writing diagnostics to `out`.
    ///
    /// Validation failures stop the run and are reported through the
    /// returned [`RunOutcome`]; only a failure to write `out` is an error.
    pub async fn run<W: Write>(&self, recipient: Option<&str>, out: &mut W) -> io::Result<RunOutcome> {
        let recipient = match recipient.map(str::trim) {
            Some(recipient) if !recipient.is_empty() => recipient,
            _ => {
                writeln!(out, "{USAGE}")?;
                return Ok(RunOutcome::Usage);
            }
        };

        let recipient: Mailbox = match recipient.parse() {
            Ok(recipient) => recipient,
            Err(err) => {
                writeln!(out, "Recipient email is invalid:")?;
                write_chain(out, &err)?;
                return Ok(RunOutcome::InvalidRecipient);
            }
        };

        let options = match EmailOptions::load(&self.settings_path) {
            Ok(options) => options,
            Err(err) => {
                info!(path = %self.settings_path.display(), error = %err, "unable to load settings");
                writeln!(out, "{CONFIGURATION_ERROR}")?;
                write_chain(out, &err)?;
                return Ok(RunOutcome::ConfigurationError);
            }
        };

        let missing = options.missing_fields();
        if !missing.is_empty() {
            debug!(?missing, "settings are incomplete");
            writeln!(out, "{CONFIGURATION_ERROR}")?;
            return Ok(RunOutcome::IncompleteConfiguration);
        }

        let sender: Mailbox = match options.sender_email.trim().parse() {
            Ok(sender) => sender,
            Err(err) => {
                writeln!(out, "The configured sender email is invalid:")?;
                write_chain(out, &err)?;
                return Ok(RunOutcome::InvalidSender);
            }
        };

        writeln!(out, "Attempting to send email...")?;
        let plain = self
            .attempt(&sender, &recipient, &options, Security::Plain, out)
            .await?;
        if plain.is_sent() {
            writeln!(out)?;
            writeln!(out, "Email successfully sent.")?;
        }

        writeln!(out)?;
        writeln!(out, "Attempting to send SSL email...")?;
        let tls = self
            .attempt(&sender, &recipient, &options, Security::Tls, out)
            .await?;
        if tls.is_sent() {
            writeln!(out)?;
            writeln!(out, "SSL email successfully sent.")?;
        }

        Ok(RunOutcome::Finished {
            attempts: vec![
                Attempt {
                    security: Security::Plain,
                    status: plain,
                },
                Attempt {
                    security: Security::Tls,
                    status: tls,
                },
            ],
        })
    }

    async fn attempt<W: Write>(
        &self,
        sender: &Mailbox,
        recipient: &Mailbox,
        options: &EmailOptions,
        security: Security,
        out: &mut W,
    ) -> io::Result<SendStatus> {
        let email = TestEmail::new(sender.clone(), recipient.clone(), &self.hostname, security);
        let relay = Relay {
            host: options.smtp_host.clone(),
            port: options.smtp_port,
            security,
        };

        info!(host = %relay.host, port = relay.port, ?security, "sending test email");
        match self.mailer.send(&email, &relay).await {
            Ok(()) => Ok(SendStatus::Sent),
            Err(err) => {
                info!(?security, error = %err, "test email failed");
                writeln!(out)?;
                writeln!(out, "Error sending email:")?;
                write_chain(out, &err)?;
                Ok(SendStatus::Failed {
                    error_message: err.to_string(),
                })
            }
        }
    }
}
