use crate::mailer::Security;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Failed { error_message: String },
}

impl SendStatus {
    pub fn is_sent(&self) -> bool {
        match self {
            SendStatus::Sent => true,
            SendStatus::Failed { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub security: Security,
    pub status: SendStatus,
}

/// Where a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Usage,
    InvalidRecipient,
    ConfigurationError,
    IncompleteConfiguration,
    InvalidSender,
    /// Both send attempts were made, plain first.
    Finished { attempts: Vec<Attempt> },
}

impl RunOutcome {
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            RunOutcome::Finished { attempts } => attempts.as_slice(),
            _ => &[],
        }
    }

    pub fn all_sent(&self) -> bool {
        let attempts = self.attempts();
        !attempts.is_empty() && attempts.iter().all(|attempt| attempt.status.is_sent())
    }
}
