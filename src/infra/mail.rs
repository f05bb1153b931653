//! HTTP transactional-mail provider adapter.
//!
//! The provider returns human-readable error messages, and the one we care
//! about (the free-tier sandbox restriction) is only recognizable by its
//! text. That string matching is fenced off here, in one unit-testable
//! function, so the dispatch policy upstream never sees provider prose.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::mail::{MailAck, MailError, MailMessage, Mailer};

/// Sentence fragment the provider uses when a key is restricted to its
/// owner's verified address.
const SANDBOX_MARKER: &str = "only send testing emails to your own email address";

fn slice_is_empty(value: &&[String]) -> bool {
    value.is_empty()
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "slice_is_empty")]
    bcc: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Extract the allowed owner address from a sandbox-restriction message.
/// The provider quotes it in parentheses:
/// `You can only send testing emails to your own email address (you@example.com). ...`
pub fn parse_sandbox_restriction(message: &str) -> Option<String> {
    if !message.contains(SANDBOX_MARKER) {
        return None;
    }
    let start = message.find('(')? + 1;
    let end = message[start..].find(')')? + start;
    let allowed = message[start..end].trim();
    if allowed.is_empty() {
        return None;
    }
    Some(allowed.to_owned())
}

#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpMailer {
    /// `base_url` is the provider root, e.g. `https://api.resend.com`.
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<MailAck, MailError> {
        let body = SendRequest {
            from: &message.from,
            to: &message.to,
            bcc: &message.bcc,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| MailError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            let ack: SendResponse =
                response.json().await.map_err(|err| MailError::Transport {
                    message: err.to_string(),
                })?;
            debug!(provider_id = ?ack.id, "mail accepted by provider");
            return Ok(MailAck {
                provider_id: ack.id,
            });
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse {
                message: Some(message),
            }) => message,
            _ => format!("provider returned status {status}"),
        };

        if let Some(allowed) = parse_sandbox_restriction(&message) {
            return Err(MailError::SandboxRestricted { allowed });
        }

        Err(MailError::Provider { message })
    }
}

/// Stand-in used when no provider API key is configured: every dispatch
/// fails with a clear operator-facing message instead of a cryptic 401.
#[derive(Clone, Default)]
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _message: &MailMessage) -> Result<MailAck, MailError> {
        Err(MailError::Provider {
            message: "mail provider API key is not configured".to_owned(),
        })
    }
}
