use crate::document::views;
use crate::shared::usecase::{Subscriber, UseCase};
use backoffice_bot_domain::{format_day_and_date, zoned, Document, DocumentKind, ID};
use backoffice_bot_infra::{AutomationEvent, BotContext};
use tracing::{error, warn};

/// Marks a pending document as paid/done: persists the transition,
/// disarms any reminder and rewrites the chat message. The automation
/// webhook and the admin notification run as subscribers.
#[derive(Debug)]
pub struct MarkDoneUseCase {
    pub document_id: ID,
    /// Display name of the person who pressed the button
    pub actor: Option<String>,
}

#[derive(Debug)]
pub struct MarkedDone {
    pub document: Document,
    pub actor: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for MarkDoneUseCase {
    type Response = MarkedDone;
    type Error = UseCaseError;

    const NAME: &'static str = "MarkDone";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let mut document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;

        document.complete(ctx.sys.get_timestamp_millis());
        ctx.repos.documents.save(&document).await.map_err(|e| {
            error!("Unable to store completion of document {}: {:?}", document.id, e);
            UseCaseError::StorageError
        })?;
        // A completed document needs no reminder anymore
        ctx.reminders.cancel(&document.id);

        let (text, keyboard) = views::completed_view(&document, ctx.config.timezone);
        super::rewrite_document_message(ctx, &document.id, &text, keyboard).await;

        Ok(MarkedDone {
            document,
            actor: self.actor.clone(),
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(NotifyAutomationOnCompleted),
            Box::new(NotifyAdminOnCompleted),
        ]
    }
}

pub struct NotifyAutomationOnCompleted;

#[async_trait::async_trait]
impl Subscriber<MarkDoneUseCase> for NotifyAutomationOnCompleted {
    async fn notify(&self, e: &MarkedDone, ctx: &BotContext) {
        let document = &e.document;
        let file_id = match &document.file_id {
            Some(file_id) => file_id.clone(),
            None => return,
        };
        // Task completions carry the project so the automation system
        // can file the document in the right folder
        let project_name = match document.kind {
            DocumentKind::Task => document.project.clone(),
            DocumentKind::Payment => None,
        };
        ctx.automation
            .notify(AutomationEvent {
                action: document.completed_action(),
                file_id,
                project_name,
            })
            .await;
    }
}

pub struct NotifyAdminOnCompleted;

#[async_trait::async_trait]
impl Subscriber<MarkDoneUseCase> for NotifyAdminOnCompleted {
    async fn notify(&self, e: &MarkedDone, ctx: &BotContext) {
        let admin_chat_id = match ctx.config.admin_chat_id {
            Some(chat_id) => chat_id,
            None => return,
        };
        // Only payments are escalated to the admin
        if e.document.kind != DocumentKind::Payment {
            return;
        }

        let completed_label = e
            .document
            .completed_at
            .and_then(|ts| zoned(ts, ctx.config.timezone))
            .map(|at| format!("{} um {} Uhr", format_day_and_date(&at), at.format("%H:%M")))
            .unwrap_or_else(|| "-".to_string());
        let text = format!(
            "🔔 <b>ADMIN INFO: RECHNUNG BEZAHLT</b>\n\n👤 <b>Von:</b> {}\n📄 <b>Rechnung:</b> {}\n🏢 <b>Projekt:</b> {}\n⏰ <b>Zeit:</b> {}",
            e.actor.as_deref().unwrap_or("Unbekannt"),
            e.document.display_name(),
            e.document.project_label(),
            completed_label
        );
        if let Err(err) = ctx.chat.send_message(admin_chat_id, &text, None, None).await {
            warn!("Unable to notify the admin chat: {:?}", err);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::create_document::{CreateDocumentUseCase, NewDocumentPayload};
    use crate::shared::usecase::execute;
    use backoffice_bot_domain::AutomationAction;
    use backoffice_bot_infra::{InMemoryAutomationNotifier, InMemoryChatClient, OutboundChatCall};
    use std::sync::Arc;

    pub async fn stored_document(ctx: &BotContext, kind: DocumentKind) -> Document {
        let payload: NewDocumentPayload = serde_json::from_str(
            r#"{
                "name": "invoice_March_Project_Alpha_final_v2.pdf",
                "keyword": "Rechnung",
                "project": "Alpha",
                "fileId": "drive-1",
                "url": "https://drive.example.com/file/1"
            }"#,
        )
        .unwrap();
        execute(
            CreateDocumentUseCase {
                kind,
                payload,
                chat_id: -100,
            },
            ctx,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn it_completes_the_document_and_rewrites_the_message() {
        let mut ctx = BotContext::create_inmemory();
        let chat = Arc::new(InMemoryChatClient::new());
        ctx.chat = chat.clone();
        let document = stored_document(&ctx, DocumentKind::Payment).await;

        let res = execute(
            MarkDoneUseCase {
                document_id: document.id.clone(),
                actor: Some("lena".to_string()),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(res.document.is_completed());
        let stored = ctx.repos.documents.find(&document.id).await.unwrap();
        assert!(stored.is_completed());

        let edits = chat.edited_messages();
        assert_eq!(edits.len(), 1);
        match &edits[0] {
            OutboundChatCall::Edited { text, .. } => assert!(text.contains("RECHNUNG BEZAHLT")),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn it_reports_the_completion_to_the_automation_system() {
        let mut ctx = BotContext::create_inmemory();
        let automation = Arc::new(InMemoryAutomationNotifier::new());
        ctx.automation = automation.clone();
        let document = stored_document(&ctx, DocumentKind::Payment).await;

        execute(
            MarkDoneUseCase {
                document_id: document.id.clone(),
                actor: None,
            },
            &ctx,
        )
        .await
        .unwrap();

        let events = automation.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AutomationAction::MoveToPaid);
        assert_eq!(events[0].file_id, "drive-1");
        assert_eq!(events[0].project_name, None);
    }

    #[tokio::test]
    async fn task_completions_carry_the_project_name() {
        let mut ctx = BotContext::create_inmemory();
        let automation = Arc::new(InMemoryAutomationNotifier::new());
        ctx.automation = automation.clone();
        let document = stored_document(&ctx, DocumentKind::Task).await;

        execute(
            MarkDoneUseCase {
                document_id: document.id.clone(),
                actor: None,
            },
            &ctx,
        )
        .await
        .unwrap();

        let events = automation.events();
        assert_eq!(events[0].action, AutomationAction::MoveActionDone);
        assert_eq!(events[0].project_name.as_deref(), Some("Alpha"));
    }

    #[tokio::test]
    async fn it_disarms_a_pending_reminder() {
        let ctx = BotContext::create_inmemory();
        let document = stored_document(&ctx, DocumentKind::Payment).await;

        assert!(ctx
            .reminders
            .arm_in(document.id.clone(), 60_000, async {}));
        assert!(ctx.reminders.is_armed(&document.id));

        execute(
            MarkDoneUseCase {
                document_id: document.id.clone(),
                actor: None,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(!ctx.reminders.is_armed(&document.id));
    }

    #[tokio::test]
    async fn the_completion_persists_even_when_the_message_edit_fails() {
        let mut ctx = BotContext::create_inmemory();
        let chat = Arc::new(InMemoryChatClient::new());
        ctx.chat = chat.clone();
        let document = stored_document(&ctx, DocumentKind::Payment).await;
        chat.break_edits();

        let res = execute(
            MarkDoneUseCase {
                document_id: document.id.clone(),
                actor: None,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(res.document.is_completed());

        // The stored status is authoritative; the stale chat message
        // only costs a log line
        let stored = ctx.repos.documents.find(&document.id).await.unwrap();
        assert!(stored.is_completed());
        assert!(chat.edited_messages().is_empty());
    }

    #[tokio::test]
    async fn unknown_documents_are_reported_as_not_found() {
        let ctx = BotContext::create_inmemory();
        let res = execute(
            MarkDoneUseCase {
                document_id: ID::new(99),
                actor: None,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }
}
