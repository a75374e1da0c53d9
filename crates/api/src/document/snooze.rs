use crate::document::reminder_fired::reminder_task;
use crate::document::views;
use crate::shared::usecase::UseCase;
use backoffice_bot_domain::{Document, ID};
use backoffice_bot_infra::BotContext;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Re-arms a reminder a fixed number of hours from now, replacing any
/// timer already armed for the document.
#[derive(Debug)]
pub struct SnoozeUseCase {
    pub document_id: ID,
    pub hours: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    /// The document was completed in the meantime; a completed
    /// document never carries an active reminder
    AlreadyCompleted,
    /// Offset outside what the scheduler accepts
    UnschedulableTime,
}

#[async_trait::async_trait]
impl UseCase for SnoozeUseCase {
    type Response = Document;
    type Error = UseCaseError;

    const NAME: &'static str = "Snooze";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;
        if document.is_completed() {
            return Err(UseCaseError::AlreadyCompleted);
        }

        let location = ctx
            .repos
            .message_locations
            .find_by_document(&document.id)
            .await;
        let fallback_chat_id = location.as_ref().map(|l| l.chat_id);

        let armed = ctx.reminders.arm_in(
            document.id.clone(),
            self.hours * MILLIS_PER_HOUR,
            reminder_task(ctx.clone(), document.id.clone(), fallback_chat_id),
        );
        if !armed {
            return Err(UseCaseError::UnschedulableTime);
        }

        let (text, keyboard) = views::snooze_armed_view(&document, self.hours);
        super::rewrite_document_message(ctx, &document.id, &text, keyboard).await;

        Ok(document)
    }
}
