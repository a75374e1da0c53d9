use crate::error::BotError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use backoffice_bot_domain::{Document, DocumentKind, MessageLocation, ID};
use backoffice_bot_infra::BotContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "fileId")]
    pub file_id: String,
}

#[derive(Debug, Serialize)]
pub struct APIResponse {
    pub action_id: ID,
    pub message_id: i64,
    pub chat_id: i64,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub project: Option<String>,
}

pub async fn get_action_message_controller(
    ctx: web::Data<BotContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, BotError> {
    let usecase = GetActionMessageUseCase {
        file_id: body.0.file_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                action_id: res.document.id,
                message_id: res.location.message_id,
                chat_id: res.location.chat_id,
                file_name: res.document.file_name,
                project: res.document.project,
            })
        })
        .map_err(|e| match e {
            UseCaseError::ActionNotFound(file_id) => {
                BotError::NotFound(format!("No pending action for file {}", file_id))
            }
            UseCaseError::MessageNotFound(id) => {
                BotError::NotFound(format!("No chat message known for action {}", id))
            }
        })
}

/// Looks up the chat message of a pending task by its external file
/// id, so the automation system can address deadline warnings at it.
#[derive(Debug)]
pub struct GetActionMessageUseCase {
    pub file_id: String,
}

#[derive(Debug)]
pub struct ActionMessage {
    pub document: Document,
    pub location: MessageLocation,
}

#[derive(Debug)]
pub enum UseCaseError {
    ActionNotFound(String),
    MessageNotFound(ID),
}

#[async_trait::async_trait]
impl UseCase for GetActionMessageUseCase {
    type Response = ActionMessage;
    type Error = UseCaseError;

    const NAME: &'static str = "GetActionMessage";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = ctx
            .repos
            .documents
            .find_by_file_id(&self.file_id)
            .await
            .filter(|d| d.kind == DocumentKind::Task)
            .ok_or_else(|| UseCaseError::ActionNotFound(self.file_id.clone()))?;

        let location = ctx
            .repos
            .message_locations
            .find_by_document(&document.id)
            .await
            .ok_or_else(|| UseCaseError::MessageNotFound(document.id.clone()))?;

        Ok(ActionMessage { document, location })
    }
}
