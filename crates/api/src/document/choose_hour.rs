use crate::document::reminder_fired::reminder_task;
use crate::document::views;
use crate::shared::usecase::UseCase;
use backoffice_bot_domain::{next_weekday_occurrence, zoned, Document, ID};
use backoffice_bot_infra::BotContext;
use chrono::{DateTime, Weekday};
use chrono_tz::Tz;
use tracing::warn;

/// Final step of the reminder dialog: resolves the chosen weekday and
/// hour to the next future occurrence, arms the timer and rewrites the
/// message to show the armed reminder.
#[derive(Debug)]
pub struct ChooseHourUseCase {
    pub document_id: ID,
    pub day: Weekday,
    pub hour: u32,
}

#[derive(Debug)]
pub struct ReminderArmed {
    pub document: Document,
    pub fire_at: DateTime<Tz>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    /// The slot resolves to a time the scheduler will not accept,
    /// e.g. inside a DST gap
    UnschedulableTime,
}

#[async_trait::async_trait]
impl UseCase for ChooseHourUseCase {
    type Response = ReminderArmed;
    type Error = UseCaseError;

    const NAME: &'static str = "ChooseHour";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let document = ctx
            .repos
            .documents
            .find(&self.document_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.document_id.clone()))?;

        let now = zoned(ctx.sys.get_timestamp_millis(), ctx.config.timezone)
            .ok_or(UseCaseError::UnschedulableTime)?;
        let fire_at = next_weekday_occurrence(now, self.day, self.hour)
            .ok_or(UseCaseError::UnschedulableTime)?;

        let location = ctx
            .repos
            .message_locations
            .find_by_document(&document.id)
            .await;
        let fallback_chat_id = location.as_ref().map(|l| l.chat_id);

        let armed = ctx.reminders.arm(
            document.id.clone(),
            fire_at.timestamp_millis(),
            reminder_task(ctx.clone(), document.id.clone(), fallback_chat_id),
        );
        if !armed {
            return Err(UseCaseError::UnschedulableTime);
        }

        let (text, keyboard) = views::reminder_armed_view(&document, &fire_at);
        match location {
            Some(location) => {
                if let Err(e) = ctx
                    .chat
                    .edit_message(location.chat_id, location.message_id, &text, Some(keyboard))
                    .await
                {
                    warn!("Unable to rewrite message for document {}: {:?}", document.id, e);
                }
            }
            None => warn!("No message known for document {}", document.id),
        }

        Ok(ReminderArmed { document, fire_at })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::create_document::{CreateDocumentUseCase, NewDocumentPayload};
    use crate::shared::usecase::execute;
    use backoffice_bot_domain::DocumentKind;
    use backoffice_bot_infra::{ISys, ReminderScheduler};
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;
    use std::sync::Arc;

    struct FrozenSys(i64);

    impl ISys for FrozenSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    /// Context whose clock and scheduler are frozen at the given
    /// instant
    fn context_at(now_millis: i64) -> BotContext {
        let mut ctx = BotContext::create_inmemory();
        let sys: Arc<dyn ISys> = Arc::new(FrozenSys(now_millis));
        ctx.reminders = Arc::new(ReminderScheduler::new(
            Arc::clone(&sys),
            ctx.config.reminder_max_lead_millis,
        ));
        ctx.sys = sys;
        ctx
    }

    async fn stored_document(ctx: &BotContext) -> Document {
        let payload: NewDocumentPayload = serde_json::from_str(
            r#"{
                "name": "invoice.pdf",
                "keyword": "Rechnung",
                "fileId": "drive-1",
                "url": "https://drive.example.com/file/1"
            }"#,
        )
        .unwrap();
        execute(
            CreateDocumentUseCase {
                kind: DocumentKind::Payment,
                payload,
                chat_id: -100,
            },
            ctx,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn it_arms_a_reminder_for_the_upcoming_slot() {
        // Monday 2026-03-02 11:00 Berlin
        let now = Berlin.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(now.timestamp_millis());
        let document = stored_document(&ctx).await;

        let res = execute(
            ChooseHourUseCase {
                document_id: document.id.clone(),
                day: Weekday::Thu,
                hour: 10,
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(
            res.fire_at,
            Berlin.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap()
        );
        assert!(ctx.reminders.is_armed(&document.id));
    }

    #[tokio::test]
    async fn an_elapsed_slot_on_the_same_day_lands_a_week_ahead() {
        let now = Berlin.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(now.timestamp_millis());
        let document = stored_document(&ctx).await;

        // Monday 11:00 asking for Monday 10:00
        let res = execute(
            ChooseHourUseCase {
                document_id: document.id.clone(),
                day: Weekday::Mon,
                hour: 10,
            },
            &ctx,
        )
        .await
        .unwrap();

        // Exactly seven days out, still within the scheduler ceiling
        assert_eq!(
            res.fire_at,
            Berlin.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap()
        );
        assert!(ctx.reminders.is_armed(&document.id));
    }

    #[tokio::test]
    async fn rearming_keeps_a_single_timer_per_document() {
        let now = Berlin.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(now.timestamp_millis());
        let document = stored_document(&ctx).await;

        for (day, hour) in [(Weekday::Thu, 10), (Weekday::Fri, 16)] {
            execute(
                ChooseHourUseCase {
                    document_id: document.id.clone(),
                    day,
                    hour,
                },
                &ctx,
            )
            .await
            .unwrap();
        }
        assert!(ctx.reminders.is_armed(&document.id));
    }
}
