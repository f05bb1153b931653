//! The outbound-mail seam.
//!
//! The dispatcher talks to a [`Mailer`] trait object; the concrete HTTP
//! provider adapter lives in `infra::mail`. Sandbox detection is part of
//! the error contract here so the retry policy can be written and tested
//! without any knowledge of the provider's error text.

use async_trait::async_trait;
use thiserror::Error;

/// One outbound message: bcc carries the real recipients, `to` holds a
/// fixed placeholder so subscribers never see each other's addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgment for an accepted send.
#[derive(Debug, Clone, PartialEq)]
pub struct MailAck {
    pub provider_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    /// The provider is in a sandboxed tier and will only deliver to the
    /// verified owner address it reported.
    #[error("mail provider is sandboxed; only `{allowed}` may receive mail")]
    SandboxRestricted { allowed: String },
    #[error("mail provider rejected the send: {message}")]
    Provider { message: String },
    #[error("mail transport failed: {message}")]
    Transport { message: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<MailAck, MailError>;
}
