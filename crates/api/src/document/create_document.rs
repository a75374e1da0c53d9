use crate::document::views;
use crate::shared::usecase::UseCase;
use backoffice_bot_domain::{Document, DocumentKind, MessageLocation, NewDocument};
use backoffice_bot_infra::BotContext;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Payload of a `/invoice_data:` or `/action_data:` command as the
/// automation system posts it into the group chat. Field names differ
/// slightly between the two commands, hence the aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocumentPayload {
    pub name: String,
    #[serde(default, alias = "keyword", alias = "actionType")]
    pub category: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default, alias = "deadline")]
    pub date: Option<String>,
    #[serde(default, rename = "fileId")]
    pub file_id: Option<String>,
    pub url: String,
}

impl NewDocumentPayload {
    fn into_attributes(self) -> Result<NewDocument, String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.url.trim().is_empty() {
            return Err("url must not be empty".to_string());
        }
        Ok(NewDocument {
            file_name: self.name,
            category: self.category.unwrap_or_else(|| "Unbekannt".to_string()),
            project: self.project,
            date: self.date,
            file_id: self.file_id,
            drive_url: self.url,
        })
    }
}

/// Stores a newly announced document and posts its interactive chat
/// message. The posted message id is remembered so later transitions
/// can rewrite the message in place.
#[derive(Debug)]
pub struct CreateDocumentUseCase {
    pub kind: DocumentKind,
    pub payload: NewDocumentPayload,
    pub chat_id: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidPayload(String),
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for CreateDocumentUseCase {
    type Response = Document;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateDocument";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let attributes = self
            .payload
            .clone()
            .into_attributes()
            .map_err(UseCaseError::InvalidPayload)?;

        let now = ctx.sys.get_timestamp_millis();
        let mut document = Document::new(self.kind, attributes, now);
        document.id = ctx.repos.documents.insert(&document).await.map_err(|e| {
            error!("Unable to store new document: {:?}", e);
            UseCaseError::StorageError
        })?;

        let (text, keyboard) = views::pending_view(&document);
        match ctx
            .chat
            .send_message(self.chat_id, &text, Some(keyboard), None)
            .await
        {
            Ok(message_id) => {
                let location = MessageLocation {
                    document_id: document.id.clone(),
                    message_id,
                    chat_id: self.chat_id,
                    updated_at: now,
                };
                if let Err(e) = ctx.repos.message_locations.upsert(&location).await {
                    warn!(
                        "Unable to remember message {} for document {}: {:?}",
                        message_id, document.id, e
                    );
                }
                info!("Posted message {} for document {}", message_id, document.id);
            }
            Err(e) => {
                // The document exists either way; reminders will fall
                // back to standalone notifications
                warn!("Unable to post message for document {}: {:?}", document.id, e);
            }
        }

        Ok(document)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use backoffice_bot_infra::{InMemoryChatClient, OutboundChatCall};
    use std::sync::Arc;

    fn invoice_payload() -> NewDocumentPayload {
        serde_json::from_str(
            r#"{
                "name": "invoice_March_Project_Alpha_final_v2.pdf",
                "keyword": "Rechnung",
                "project": "Alpha",
                "date": "01.03.2026",
                "fileId": "drive-1",
                "url": "https://drive.example.com/file/1"
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn it_stores_the_document_and_posts_an_interactive_message() {
        let mut ctx = BotContext::create_inmemory();
        let chat = Arc::new(InMemoryChatClient::new());
        ctx.chat = chat.clone();

        let document = execute(
            CreateDocumentUseCase {
                kind: DocumentKind::Payment,
                payload: invoice_payload(),
                chat_id: -100,
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(document.id.is_assigned());
        assert_eq!(
            ctx.repos.documents.find(&document.id).await,
            Some(document.clone())
        );

        let sent = chat.sent_messages();
        assert_eq!(sent.len(), 1);
        let message_id = match &sent[0] {
            OutboundChatCall::Sent {
                chat_id,
                message_id,
                text,
                keyboard,
                ..
            } => {
                assert_eq!(*chat_id, -100);
                assert!(text.contains("Neue Rechnung"));
                assert!(keyboard.is_some());
                *message_id
            }
            other => panic!("unexpected call {:?}", other),
        };

        let location = ctx
            .repos
            .message_locations
            .find_by_document(&document.id)
            .await
            .unwrap();
        assert_eq!(location.message_id, message_id);
        assert_eq!(location.chat_id, -100);
    }

    #[tokio::test]
    async fn it_rejects_payloads_without_a_name() {
        let ctx = BotContext::create_inmemory();
        let mut payload = invoice_payload();
        payload.name = "  ".to_string();

        let res = execute(
            CreateDocumentUseCase {
                kind: DocumentKind::Payment,
                payload,
                chat_id: -100,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::InvalidPayload(_))));
        assert!(ctx.repos.documents.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn aliases_cover_the_action_command_field_names() {
        let payload: NewDocumentPayload = serde_json::from_str(
            r#"{
                "name": "Q1_report.pdf",
                "actionType": "Freigabe",
                "deadline": "02.03.2026",
                "fileId": "drive-2",
                "url": "https://drive.example.com/file/2"
            }"#,
        )
        .unwrap();
        assert_eq!(payload.category.as_deref(), Some("Freigabe"));
        assert_eq!(payload.date.as_deref(), Some("02.03.2026"));
    }
}
