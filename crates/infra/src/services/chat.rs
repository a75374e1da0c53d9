use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// Inline button rows attached to a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn callback(text: &str, callback_data: String) -> Self {
        Self {
            text: text.to_string(),
            callback_data,
        }
    }
}

/// Transport towards the chat platform. Sending returns the platform's
/// message id so the message can be edited in place later; edits and
/// acknowledgements may fail for stale messages and callers treat that
/// as non-fatal.
#[async_trait::async_trait]
pub trait IChatClient: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
        reply_to_message_id: Option<i64>,
    ) -> anyhow::Result<i64>;

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()>;

    async fn answer_callback(&self, callback_query_id: &str, toast: &str) -> anyhow::Result<()>;
}

// https://core.telegram.org/bots/api

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboard>,
}

#[derive(Debug, Serialize)]
struct EditMessageRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboard>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackRequest<'a> {
    callback_query_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    message_id: i64,
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("To build the http client");
        Self {
            http,
            base_url: format!("https://api.telegram.org/bot{}", bot_token),
        }
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let res = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?
            .json::<ApiResponse<T>>()
            .await?;

        if !res.ok {
            anyhow::bail!(
                "Chat platform rejected {}: {}",
                method,
                res.description.unwrap_or_else(|| "unknown error".into())
            );
        }
        res.result
            .ok_or_else(|| anyhow::anyhow!("Chat platform returned no result for {}", method))
    }
}

#[async_trait::async_trait]
impl IChatClient for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
        reply_to_message_id: Option<i64>,
    ) -> anyhow::Result<i64> {
        let message: MessageRef = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id,
                    text,
                    parse_mode: "HTML",
                    disable_web_page_preview: true,
                    reply_to_message_id,
                    reply_markup: keyboard,
                },
            )
            .await?;
        Ok(message.message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()> {
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageRequest {
                    chat_id,
                    message_id,
                    text,
                    parse_mode: "HTML",
                    disable_web_page_preview: true,
                    reply_markup: keyboard,
                },
            )
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str, toast: &str) -> anyhow::Result<()> {
        let _: serde_json::Value = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackRequest {
                    callback_query_id,
                    text: toast,
                },
            )
            .await?;
        Ok(())
    }
}

/// Recorded outbound call, for assertions in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundChatCall {
    Sent {
        chat_id: i64,
        message_id: i64,
        text: String,
        keyboard: Option<InlineKeyboard>,
        reply_to_message_id: Option<i64>,
    },
    Edited {
        chat_id: i64,
        message_id: i64,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Answered {
        callback_query_id: String,
        toast: String,
    },
}

/// Chat client that only records what it was asked to do. Message ids
/// are assigned from a counter so tests can follow edits.
pub struct InMemoryChatClient {
    calls: Mutex<Vec<OutboundChatCall>>,
    next_message_id: Mutex<i64>,
    fail_edits: Mutex<bool>,
}

impl InMemoryChatClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: Mutex::new(1),
            fail_edits: Mutex::new(false),
        }
    }

    /// Makes every subsequent edit fail, simulating messages the
    /// platform no longer lets the bot touch
    pub fn break_edits(&self) {
        *self.fail_edits.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<OutboundChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_messages(&self) -> Vec<OutboundChatCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, OutboundChatCall::Sent { .. }))
            .collect()
    }

    pub fn edited_messages(&self) -> Vec<OutboundChatCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, OutboundChatCall::Edited { .. }))
            .collect()
    }
}

impl Default for InMemoryChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IChatClient for InMemoryChatClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
        reply_to_message_id: Option<i64>,
    ) -> anyhow::Result<i64> {
        let message_id = {
            let mut next = self.next_message_id.lock().unwrap();
            let id = *next;
            *next += 1;
            id
        };
        self.calls.lock().unwrap().push(OutboundChatCall::Sent {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
            reply_to_message_id,
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()> {
        if *self.fail_edits.lock().unwrap() {
            anyhow::bail!("Message is too old to be edited");
        }
        self.calls.lock().unwrap().push(OutboundChatCall::Edited {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str, toast: &str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(OutboundChatCall::Answered {
            callback_query_id: callback_query_id.to_string(),
            toast: toast.to_string(),
        });
        Ok(())
    }
}
