// src/integrations/mailjet/client.rs
//
// Mailjet Send API v3.1 adapter.
//
// - One HTTP call per message, basic auth with the API key pair
// - Maps transport, status, and per-message errors to AppError::Notification
// - No retries; the queue records the failure and moves on

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::notifications::NotificationSink;

const DEFAULT_BASE_URL: &str = "https://api.mailjet.com";

/// Address messages are sent from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailjetSender {
    pub email: String,
    pub name: String,
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendRequest<'a> {
    messages: Vec<OutboundMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutboundMessage<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    text_part: &'a str,
    #[serde(rename = "HTMLPart")]
    html_part: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendResponse {
    #[serde(default)]
    messages: Vec<MessageResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageResult {
    status: String,
    #[serde(default)]
    errors: Vec<MessageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageError {
    error_message: String,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct MailjetClient {
    base_url: String,
    http_client: Client,
    api_key: String,
    api_secret: String,
    sender: MailjetSender,
}

impl MailjetClient {
    pub fn new(api_key: String, api_secret: String, sender: MailjetSender) -> AppResult<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
            api_key,
            api_secret,
            sender,
        })
    }

    /// Point the client at another host (sandbox or local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/v3.1/send", self.base_url.trim_end_matches('/'))
    }

    fn build_payload<'a>(&'a self, recipient: &'a str, subject: &'a str, body: &'a str) -> SendRequest<'a> {
        SendRequest {
            messages: vec![OutboundMessage {
                from: Address {
                    email: &self.sender.email,
                    name: Some(&self.sender.name),
                },
                to: vec![Address {
                    email: recipient,
                    name: None,
                }],
                subject,
                text_part: body,
                html_part: text_to_html(body),
            }],
        }
    }
}

#[async_trait]
impl NotificationSink for MailjetClient {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        let payload = self.build_payload(recipient, subject, body);

        let response = self
            .http_client
            .post(self.send_url())
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header(header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Mailjet request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Mailjet returned status {}: {}",
                status, detail
            )));
        }

        let parsed: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Notification(format!("Failed to parse Mailjet response: {}", e)))?;

        check_message_results(&parsed)?;

        log::debug!("Mailjet accepted message to {}", recipient);
        Ok(())
    }
}

fn check_message_results(response: &SendResponse) -> AppResult<()> {
    let failures: Vec<String> = response
        .messages
        .iter()
        .filter(|m| !m.status.eq_ignore_ascii_case("success"))
        .flat_map(|m| {
            if m.errors.is_empty() {
                vec![format!("status {}", m.status)]
            } else {
                m.errors.iter().map(|e| e.error_message.clone()).collect()
            }
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::Notification(format!(
            "Mailjet rejected message: {}",
            failures.join(", ")
        )))
    }
}

/// Minimal HTML rendition of a plain-text body
fn text_to_html(body: &str) -> String {
    let escaped = body
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    escaped.lines().collect::<Vec<_>>().join("<br>\n")
}
