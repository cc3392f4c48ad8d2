//! Telegram Bot API wire types and a thin reqwest client.

pub mod webhook;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ChatId, UserId};

pub const CALLBACK_START_GAME: &str = "start_game";
pub const CALLBACK_ASK_QUESTION: &str = "ask_question";

// ========== Inbound update types ==========

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    /// Public profile link, falling back to the id-based deep link
    pub fn profile_link(&self) -> String {
        match &self.username {
            Some(username) => format!("https://t.me/{}", username),
            None => format!("tg://user?id={}", self.id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

// ========== Outbound request types ==========

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

fn single_button_keyboard(label: &str, callback_data: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton {
            text: label.to_string(),
            callback_data: callback_data.to_string(),
        }]],
    }
}

pub fn start_keyboard() -> InlineKeyboardMarkup {
    single_button_keyboard("Start game", CALLBACK_START_GAME)
}

pub fn ask_question_keyboard() -> InlineKeyboardMarkup {
    single_button_keyboard("Ask a question", CALLBACK_ASK_QUESTION)
}

pub fn next_question_keyboard() -> InlineKeyboardMarkup {
    single_button_keyboard("Next question", CALLBACK_ASK_QUESTION)
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: ChatId,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: ChatId,
    message_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
}

/// Envelope every Bot API response uses; `result` shape varies per method
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

/// The slice of a sent/edited message we care about
#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum BotApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegram rejected the call: {0}")]
    Api(String),
}

/// Thin client for the handful of Bot API methods the game needs
#[derive(Clone)]
pub struct BotApi {
    client: reqwest::Client,
    base_url: String,
}

impl BotApi {
    pub fn new(token: &str) -> Result<Self, BotApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://api.telegram.org/bot{}", token),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, BotApiError>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(BotApiError::Api(
                response
                    .description
                    .unwrap_or_else(|| format!("{} failed without description", method)),
            ));
        }
        response
            .result
            .ok_or_else(|| BotApiError::Api(format!("{} returned no result", method)))
    }

    /// Returns the id of the sent message so callers can edit it later.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64, BotApiError> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id,
                    text,
                    parse_mode: "HTML",
                    reply_markup,
                },
            )
            .await?;
        Ok(sent.message_id)
    }

    pub async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: i64,
        text: &str,
    ) -> Result<(), BotApiError> {
        let _: SentMessage = self
            .call(
                "editMessageText",
                &EditMessageTextRequest {
                    chat_id,
                    message_id,
                    text,
                    parse_mode: "HTML",
                },
            )
            .await?;
        Ok(())
    }

    /// Stop the client-side spinner on an inline button press
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), BotApiError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQueryRequest { callback_query_id },
            )
            .await?;
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str) -> Result<(), BotApiError> {
        let _: bool = self.call("setWebhook", &SetWebhookRequest { url }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parses_text_message() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 1,
                "chat": {"id": -100123},
                "from": {"id": 42, "first_name": "Ada", "username": "ada"},
                "text": "/start"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, -100123);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.from.unwrap().id, 42);
    }

    #[test]
    fn test_update_parses_callback_query() {
        let json = r#"{
            "update_id": 11,
            "callback_query": {
                "id": "cb1",
                "from": {"id": 42},
                "message": {"message_id": 2, "chat": {"id": 5}},
                "data": "ask_question"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let cb = update.callback_query.unwrap();
        assert_eq!(cb.data.as_deref(), Some(CALLBACK_ASK_QUESTION));
        assert_eq!(cb.message.unwrap().chat.id, 5);
    }

    #[test]
    fn test_user_name_and_link() {
        let user = User {
            id: 9,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            username: Some("ada".to_string()),
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.profile_link(), "https://t.me/ada");

        let anon = User {
            id: 9,
            first_name: None,
            last_name: None,
            username: None,
        };
        assert_eq!(anon.full_name(), "");
        assert_eq!(anon.profile_link(), "tg://user?id=9");
    }

    #[test]
    fn test_send_message_omits_absent_keyboard() {
        let request = SendMessageRequest {
            chat_id: 1,
            text: "hi",
            parse_mode: "HTML",
            reply_markup: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("reply_markup").is_none());

        let keyboard = start_keyboard();
        let request = SendMessageRequest {
            chat_id: 1,
            text: "hi",
            parse_mode: "HTML",
            reply_markup: Some(&keyboard),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            CALLBACK_START_GAME
        );
    }

    #[test]
    fn test_api_response_carries_sent_message_id() {
        let json = r#"{"ok": true, "result": {"message_id": 77, "date": 0}}"#;
        let response: ApiResponse<SentMessage> = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert_eq!(response.result.unwrap().message_id, 77);
    }

    #[test]
    fn test_api_response_error_keeps_description() {
        let json = r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
        let response: ApiResponse<SentMessage> = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: chat not found")
        );
    }
}
