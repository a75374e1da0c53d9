use crate::document::begin_reminder::BeginReminderUseCase;
use crate::document::choose_day::ChooseDayUseCase;
use crate::document::choose_hour::ChooseHourUseCase;
use crate::document::create_document::{CreateDocumentUseCase, NewDocumentPayload};
use crate::document::mark_done::MarkDoneUseCase;
use crate::document::snooze::SnoozeUseCase;
use crate::document::undo::UndoUseCase;
use crate::document::views;
use crate::document::{begin_reminder, choose_hour, mark_done, snooze, undo};
use crate::shared::usecase::execute;
use actix_web::{web, HttpRequest, HttpResponse};
use backoffice_bot_domain::{CallbackAction, DocumentKind};
use backoffice_bot_infra::BotContext;
use serde::Deserialize;
use tracing::warn;

// Incoming wire format of the chat platform, reduced to the fields the
// bot acts on. https://core.telegram.org/bots/api#update

#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: Option<Actor>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Actor {
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Actor {
    fn display_name(&self) -> Option<String> {
        self.username.clone().or_else(|| self.first_name.clone())
    }
}

const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Single entrypoint for everything the chat platform pushes at the
/// bot. Always answers 200 so the platform never re-delivers an update
/// the bot could not handle.
async fn receive_update_controller(
    http_req: HttpRequest,
    ctx: web::Data<BotContext>,
    body: web::Json<Update>,
) -> HttpResponse {
    if let Some(header) = http_req.headers().get(SECRET_TOKEN_HEADER) {
        if header.as_bytes() != ctx.config.webhook_secret_token.as_bytes() {
            warn!("Dropping update with a bad webhook secret token");
            return HttpResponse::Ok().body("OK");
        }
    }

    let update = body.0;
    if let Some(message) = update.message {
        handle_message(message, &ctx).await;
    } else if let Some(callback) = update.callback_query {
        handle_callback(callback, &ctx).await;
    }
    HttpResponse::Ok().body("OK")
}

/// New-document commands posted into the group chat by the automation
/// system. All other chatter is ignored.
async fn handle_message(message: IncomingMessage, ctx: &BotContext) {
    let text = match &message.text {
        Some(text) => text.trim(),
        None => return,
    };
    let (kind, raw_payload) = if let Some(rest) = text.strip_prefix("/invoice_data:") {
        (DocumentKind::Payment, rest)
    } else if let Some(rest) = text.strip_prefix("/action_data:") {
        (DocumentKind::Task, rest)
    } else {
        return;
    };

    let payload = match serde_json::from_str::<NewDocumentPayload>(raw_payload) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Malformed document payload: {:?}", e);
            report_intake_failure(ctx, message.chat.id, kind).await;
            return;
        }
    };

    let usecase = CreateDocumentUseCase {
        kind,
        payload,
        chat_id: message.chat.id,
    };
    if execute(usecase, ctx).await.is_err() {
        report_intake_failure(ctx, message.chat.id, kind).await;
    }
}

async fn report_intake_failure(ctx: &BotContext, chat_id: i64, kind: DocumentKind) {
    let text = match kind {
        DocumentKind::Payment => "❌ Fehler beim Verarbeiten der Rechnungsdaten",
        DocumentKind::Task => "❌ Fehler beim Verarbeiten der Action-Daten",
    };
    if let Err(e) = ctx.chat.send_message(chat_id, text, None, None).await {
        warn!("Unable to report intake failure: {:?}", e);
    }
}

const NOT_FOUND_TOAST: &str = "❌ Nicht gefunden";
const GENERIC_ERROR_TOAST: &str = "❌ Fehler, bitte erneut versuchen";

/// Button presses. Every press gets acknowledged with a short toast,
/// even when the underlying action failed.
async fn handle_callback(callback: CallbackQuery, ctx: &BotContext) {
    let toast = match &callback.data {
        Some(token) => match CallbackAction::parse(token) {
            Ok(action) => {
                let actor = callback.from.as_ref().and_then(Actor::display_name);
                dispatch_action(action, actor, ctx).await
            }
            Err(e) => {
                warn!("Unparseable callback token: {:?}", e);
                "❌ Unbekannte Aktion".to_string()
            }
        },
        None => "❌ Unbekannte Aktion".to_string(),
    };

    if let Err(e) = ctx.chat.answer_callback(&callback.id, &toast).await {
        warn!("Unable to acknowledge button press: {:?}", e);
    }
}

async fn dispatch_action(action: CallbackAction, actor: Option<String>, ctx: &BotContext) -> String {
    match action {
        CallbackAction::MarkDone(document_id) => {
            match execute(MarkDoneUseCase { document_id, actor }, ctx).await {
                Ok(res) => match res.document.kind {
                    DocumentKind::Payment => "✅ Als bezahlt markiert!".to_string(),
                    DocumentKind::Task => "✅ Als erledigt markiert!".to_string(),
                },
                Err(mark_done::UseCaseError::NotFound(_)) => NOT_FOUND_TOAST.to_string(),
                Err(_) => GENERIC_ERROR_TOAST.to_string(),
            }
        }
        CallbackAction::Undo(document_id) => {
            match execute(UndoUseCase { document_id }, ctx).await {
                Ok(_) => "🔄 Rückgängig gemacht!".to_string(),
                Err(undo::UseCaseError::NotFound(_)) => NOT_FOUND_TOAST.to_string(),
                Err(_) => GENERIC_ERROR_TOAST.to_string(),
            }
        }
        CallbackAction::BeginReminder(document_id) => {
            match execute(BeginReminderUseCase { document_id }, ctx).await {
                Ok(_) => "📅 Tag wählen".to_string(),
                Err(begin_reminder::UseCaseError::NotFound(_)) => NOT_FOUND_TOAST.to_string(),
            }
        }
        CallbackAction::ChooseDay(document_id, day) => {
            match execute(ChooseDayUseCase { document_id, day }, ctx).await {
                Ok(_) => "🕐 Uhrzeit wählen".to_string(),
                Err(_) => NOT_FOUND_TOAST.to_string(),
            }
        }
        CallbackAction::ChooseHour(document_id, day, hour) => {
            match execute(
                ChooseHourUseCase {
                    document_id,
                    day,
                    hour,
                },
                ctx,
            )
            .await
            {
                Ok(_) => "✅ Erinnerung gesetzt!".to_string(),
                Err(choose_hour::UseCaseError::NotFound(_)) => NOT_FOUND_TOAST.to_string(),
                Err(choose_hour::UseCaseError::UnschedulableTime) => {
                    "❌ Zeitpunkt nicht möglich".to_string()
                }
            }
        }
        CallbackAction::Snooze(document_id, hours) => {
            match execute(SnoozeUseCase { document_id, hours }, ctx).await {
                Ok(_) => format!("✅ Erinnerung in {}h gesetzt!", hours),
                Err(snooze::UseCaseError::NotFound(_)) => NOT_FOUND_TOAST.to_string(),
                Err(snooze::UseCaseError::AlreadyCompleted) => "✅ Bereits erledigt!".to_string(),
                Err(snooze::UseCaseError::UnschedulableTime) => {
                    "❌ Zeitpunkt nicht möglich".to_string()
                }
            }
        }
        CallbackAction::JumpToOriginal(document_id) => views::jump_hint(&document_id).to_string(),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::post().to(receive_update_controller));
}
