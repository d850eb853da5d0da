use crate::error::NotifyError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TELEGRAM_API: &str = "https://api.telegram.org";

#[async_trait]
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Delivers reports through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: HttpClient,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: HttpClient::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// `None` unless both credentials are present; notification is then skipped.
    pub fn from_credentials(
        api_base: &str,
        bot_token: Option<&str>,
        chat_id: Option<&str>,
    ) -> Option<Self> {
        match (bot_token, chat_id) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some(Self::new(api_base, token, chat))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(30))
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();
        match body {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(ApiResponse {
                description: Some(description),
                ..
            }) => Err(NotifyError::Rejected(description)),
            _ => Err(NotifyError::Rejected(format!("status {}", status.as_u16()))),
        }
    }
}
