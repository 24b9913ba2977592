use std::process::ExitCode;

use email_tester::email_options::{settings_path, SETTINGS_ENV};
use email_tester::logging;
use email_tester::mailer::SmtpMailer;
use email_tester::runner::{recipient_argument, TestRunner};
use tracing::{debug, error, warn};

fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.into_string().unwrap_or_else(|name| {
            warn!(?name, "hostname is not valid UTF-8, using localhost");
            "localhost".to_string()
        }),
        Err(err) => {
            warn!(error = %err, "unable to read hostname, using localhost");
            "localhost".to_string()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let recipient = recipient_argument(std::env::args_os());
    let settings_path = settings_path(std::env::var_os(SETTINGS_ENV));

    let runner = TestRunner::new(SmtpMailer, settings_path, local_hostname());
    let mut stdout = std::io::stdout().lock();

    match runner.run(recipient.as_deref(), &mut stdout).await {
        Ok(outcome) => {
            debug!(?outcome, "run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "unable to write report");
            ExitCode::FAILURE
        }
    }
}
