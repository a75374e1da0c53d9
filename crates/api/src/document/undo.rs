use crate::document::views;
use crate::shared::usecase::{Subscriber, UseCase};
use backoffice_bot_domain::{Document, ID};
use backoffice_bot_infra::{AutomationEvent, BotContext};
use tracing::error;

/// Reverts a document back to pending. The automation system is told
/// to move the file back as well.
#[derive(Debug)]
pub struct UndoUseCase {
    pub document_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for UndoUseCase {
    type Response = Document;
    type Error = UseCaseError;

    const NAME: &'static str = "Undo";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let mut document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;

        document.revert();
        ctx.repos.documents.save(&document).await.map_err(|e| {
            error!("Unable to store revert of document {}: {:?}", document.id, e);
            UseCaseError::StorageError
        })?;
        // An undo also wipes any reminder that was still armed
        ctx.reminders.cancel(&document.id);

        let (text, keyboard) = views::pending_view(&document);
        super::rewrite_document_message(ctx, &document.id, &text, keyboard).await;

        Ok(document)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyAutomationOnReverted)]
    }
}

pub struct NotifyAutomationOnReverted;

#[async_trait::async_trait]
impl Subscriber<UndoUseCase> for NotifyAutomationOnReverted {
    async fn notify(&self, document: &Document, ctx: &BotContext) {
        let file_id = match &document.file_id {
            Some(file_id) => file_id.clone(),
            None => return,
        };
        ctx.automation
            .notify(AutomationEvent {
                action: document.reverted_action(),
                file_id,
                project_name: None,
            })
            .await;
    }
}
