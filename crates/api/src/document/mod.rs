pub mod begin_reminder;
pub mod choose_day;
pub mod choose_hour;
pub mod create_document;
mod get_action_message;
pub mod mark_done;
pub mod reminder_fired;
mod send_deadline_warning;
pub mod snooze;
pub mod undo;
pub mod views;

use actix_web::web;
use backoffice_bot_domain::ID;
use backoffice_bot_infra::{BotContext, InlineKeyboard};
use tracing::warn;

/// Rewrites the stored chat message of a document in place. Missing
/// locations and stale messages are logged, never fatal.
pub(crate) async fn rewrite_document_message(
    ctx: &BotContext,
    document_id: &ID,
    text: &str,
    keyboard: InlineKeyboard,
) {
    match ctx
        .repos
        .message_locations
        .find_by_document(document_id)
        .await
    {
        Some(location) => {
            if let Err(e) = ctx
                .chat
                .edit_message(location.chat_id, location.message_id, text, Some(keyboard))
                .await
            {
                warn!("Unable to rewrite message for document {}: {:?}", document_id, e);
            }
        }
        None => warn!("No message known for document {}", document_id),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/get_action_message",
        web::post().to(get_action_message::get_action_message_controller),
    );
    cfg.route(
        "/api/send_deadline_warning",
        web::post().to(send_deadline_warning::send_deadline_warning_controller),
    );
}
