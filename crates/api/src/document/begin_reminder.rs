use crate::document::views;
use crate::shared::usecase::UseCase;
use backoffice_bot_domain::{Document, ID};
use backoffice_bot_infra::BotContext;

/// First step of the reminder dialog: turns the document message into
/// a weekday picker.
#[derive(Debug)]
pub struct BeginReminderUseCase {
    pub document_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait]
impl UseCase for BeginReminderUseCase {
    type Response = Document;
    type Error = UseCaseError;

    const NAME: &'static str = "BeginReminder";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;

        let (text, keyboard) = views::day_picker_view(&document);
        super::rewrite_document_message(ctx, &document.id, &text, keyboard).await;

        Ok(document)
    }
}
