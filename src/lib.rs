pub mod email_options;
pub mod error;
pub mod logging;
pub mod mailer;
pub mod report;
pub mod runner;
