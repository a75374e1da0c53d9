use super::IMessageLocationRepo;
use backoffice_bot_domain::{MessageLocation, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresMessageLocationRepo {
    pool: PgPool,
}

impl PostgresMessageLocationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MessageLocationRaw {
    document_id: i64,
    message_id: i64,
    chat_id: i64,
    updated_at: i64,
}

impl From<MessageLocationRaw> for MessageLocation {
    fn from(raw: MessageLocationRaw) -> Self {
        Self {
            document_id: ID::new(raw.document_id),
            message_id: raw.message_id,
            chat_id: raw.chat_id,
            updated_at: raw.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl IMessageLocationRepo for PostgresMessageLocationRepo {
    async fn upsert(&self, location: &MessageLocation) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO message_locations
            (document_id, message_id, chat_id, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (document_id) DO UPDATE
            SET message_id = $2, chat_id = $3, updated_at = $4
            "#,
        )
        .bind(location.document_id.inner())
        .bind(location.message_id)
        .bind(location.chat_id)
        .bind(location.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_document(&self, document_id: &ID) -> Option<MessageLocation> {
        sqlx::query_as::<_, MessageLocationRaw>(
            r#"
            SELECT document_id, message_id, chat_id, updated_at
            FROM message_locations
            WHERE document_id = $1
            "#,
        )
        .bind(document_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find message location for document: {} failed. DB returned error: {:?}",
                document_id, e
            );
        })
        .ok()?
        .map(|raw| raw.into())
    }
}
