use crate::document::views;
use crate::shared::usecase::UseCase;
use backoffice_bot_domain::{Document, ID};
use backoffice_bot_infra::BotContext;
use chrono::Weekday;

/// Second step of the reminder dialog: weekday chosen, show the hour
/// picker for that day.
#[derive(Debug)]
pub struct ChooseDayUseCase {
    pub document_id: ID,
    pub day: Weekday,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait]
impl UseCase for ChooseDayUseCase {
    type Response = Document;
    type Error = UseCaseError;

    const NAME: &'static str = "ChooseDay";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;

        let (text, keyboard) = views::hour_picker_view(&document, self.day);
        super::rewrite_document_message(ctx, &document.id, &text, keyboard).await;

        Ok(document)
    }
}
