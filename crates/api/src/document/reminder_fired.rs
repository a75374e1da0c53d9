use crate::document::views;
use crate::shared::usecase::{execute, UseCase};
use backoffice_bot_domain::{zoned, ID};
use backoffice_bot_infra::BotContext;
use std::future::Future;
use tracing::{debug, warn};

/// Runs when an armed reminder timer elapses. Rewrites the original
/// chat message and posts a fresh notification as a reply, so the
/// reminder is visible even in a busy group. Without a known message
/// a standalone notification with a jump hint is posted instead.
///
/// A reminder for a document that was completed in the meantime is
/// dropped silently.
#[derive(Debug)]
pub struct ReminderFiredUseCase {
    pub document_id: ID,
    /// Chat to notify when no message location is stored, captured
    /// when the reminder was armed
    pub fallback_chat_id: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for ReminderFiredUseCase {
    type Response = ();
    type Error = UseCaseError;

    const NAME: &'static str = "ReminderFired";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) => document,
            None => {
                warn!("Reminder fired for unknown document {}", self.document_id);
                return Ok(());
            }
        };
        if document.is_completed() {
            debug!("Dropping reminder for completed document {}", document.id);
            return Ok(());
        }

        let location = ctx
            .repos
            .message_locations
            .find_by_document(&document.id)
            .await;
        let location = match location {
            Some(location) => location,
            None => {
                self.notify_without_original(ctx).await;
                return Ok(());
            }
        };

        let sent_at = zoned(ctx.sys.get_timestamp_millis(), ctx.config.timezone);
        let (text, keyboard) = views::reminder_active_view(&document, sent_at);
        if let Err(e) = ctx
            .chat
            .edit_message(location.chat_id, location.message_id, &text, Some(keyboard))
            .await
        {
            // The original message is gone or too old; fall back to a
            // single standalone notification
            warn!(
                "Unable to rewrite message {} for reminder on document {}: {:?}",
                location.message_id, document.id, e
            );
            let (text, keyboard) = views::reminder_fallback_view(&document);
            if let Err(e) = ctx
                .chat
                .send_message(location.chat_id, &text, Some(keyboard), None)
                .await
            {
                warn!("Unable to post fallback reminder for document {}: {:?}", document.id, e);
            }
            return Ok(());
        }

        let (reply_text, reply_keyboard) = views::reminder_reply_view(&document);
        if let Err(e) = ctx
            .chat
            .send_message(
                location.chat_id,
                &reply_text,
                Some(reply_keyboard),
                Some(location.message_id),
            )
            .await
        {
            warn!("Unable to post reminder reply for document {}: {:?}", document.id, e);
        }

        Ok(())
    }
}

impl ReminderFiredUseCase {
    async fn notify_without_original(&mut self, ctx: &BotContext) {
        let chat_id = match self.fallback_chat_id {
            Some(chat_id) => chat_id,
            None => {
                warn!(
                    "No chat known for the reminder on document {}, dropping it",
                    self.document_id
                );
                return;
            }
        };
        let document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) => document,
            None => return,
        };
        let (text, keyboard) = views::reminder_fallback_view(&document);
        if let Err(e) = ctx.chat.send_message(chat_id, &text, Some(keyboard), None).await {
            warn!("Unable to post fallback reminder for document {}: {:?}", document.id, e);
        }
    }
}

/// The future handed to the reminder scheduler when a reminder is
/// armed. Runs the full use case once the timer elapses.
pub fn reminder_task(
    ctx: BotContext,
    document_id: ID,
    fallback_chat_id: Option<i64>,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = execute(
            ReminderFiredUseCase {
                document_id,
                fallback_chat_id,
            },
            &ctx,
        )
        .await;
    }
}
