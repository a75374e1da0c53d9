use crate::document::views::{self, DeadlineWarning};
use crate::error::BotError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use backoffice_bot_infra::BotContext;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    pub chat_id: i64,
    pub message_id: i64,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "actionType")]
    pub action_type: String,
    #[serde(default)]
    pub project: Option<String>,
    pub deadline: String,
    #[serde(rename = "daysUntil")]
    pub days_until: i64,
}

#[derive(Debug, Serialize)]
pub struct APIResponse {
    pub success: bool,
}

pub async fn send_deadline_warning_controller(
    ctx: web::Data<BotContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, BotError> {
    let body = body.0;
    let usecase = SendDeadlineWarningUseCase {
        chat_id: body.chat_id,
        message_id: body.message_id,
        warning: DeadlineWarning {
            file_name: body.file_name,
            action_type: body.action_type,
            project: body.project,
            deadline: body.deadline,
            days_until: body.days_until,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { success: true }))
        .map_err(|_| BotError::InternalError)
}

/// Posts a deadline warning as a reply to a task message. Driven
/// entirely by the automation system, which tracks the deadlines.
#[derive(Debug)]
pub struct SendDeadlineWarningUseCase {
    pub chat_id: i64,
    pub message_id: i64,
    pub warning: DeadlineWarning,
}

#[derive(Debug)]
pub enum UseCaseError {
    SendFailed,
}

#[async_trait::async_trait]
impl UseCase for SendDeadlineWarningUseCase {
    type Response = ();
    type Error = UseCaseError;

    const NAME: &'static str = "SendDeadlineWarning";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let text = views::deadline_warning_text(&self.warning);
        ctx.chat
            .send_message(self.chat_id, &text, None, Some(self.message_id))
            .await
            .map_err(|e| {
                error!("Unable to post deadline warning: {:?}", e);
                UseCaseError::SendFailed
            })?;
        Ok(())
    }
}
