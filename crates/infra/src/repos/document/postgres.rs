use super::IDocumentRepo;
use backoffice_bot_domain::{Document, DocumentKind, DocumentStatus, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresDocumentRepo {
    pool: PgPool,
}

impl PostgresDocumentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRaw {
    id: i64,
    kind: String,
    file_name: String,
    category: String,
    project: Option<String>,
    date: Option<String>,
    file_id: Option<String>,
    drive_url: String,
    status: String,
    created_at: i64,
    completed_at: Option<i64>,
}

impl TryFrom<DocumentRaw> for Document {
    type Error = anyhow::Error;

    fn try_from(raw: DocumentRaw) -> Result<Self, Self::Error> {
        Ok(Document {
            id: ID::new(raw.id),
            kind: raw.kind.parse::<DocumentKind>()?,
            file_name: raw.file_name,
            category: raw.category,
            project: raw.project,
            date: raw.date,
            file_id: raw.file_id,
            drive_url: raw.drive_url,
            status: raw.status.parse::<DocumentStatus>()?,
            created_at: raw.created_at,
            completed_at: raw.completed_at,
        })
    }
}

const SELECT_FIELDS: &str = r#"
    SELECT id, kind, file_name, category, project, "date", file_id,
           drive_url, status, created_at, completed_at
    FROM documents
"#;

#[async_trait::async_trait]
impl IDocumentRepo for PostgresDocumentRepo {
    async fn insert(&self, document: &Document) -> anyhow::Result<ID> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO documents
            (kind, file_name, category, project, "date", file_id, drive_url, status, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(document.kind.as_str())
        .bind(&document.file_name)
        .bind(&document.category)
        .bind(&document.project)
        .bind(&document.date)
        .bind(&document.file_id)
        .bind(&document.drive_url)
        .bind(document.status.as_str())
        .bind(document.created_at)
        .bind(document.completed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(ID::new(id))
    }

    async fn save(&self, document: &Document) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE documents
            SET status = $2, completed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(document.id.inner())
        .bind(document.status.as_str())
        .bind(document.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, document_id: &ID) -> Option<Document> {
        let raw = sqlx::query_as::<_, DocumentRaw>(&format!("{} WHERE id = $1", SELECT_FIELDS))
            .bind(document_id.inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Find document with id: {} failed. DB returned error: {:?}", document_id, e);
            })
            .ok()??;
        raw.try_into().ok()
    }

    async fn find_by_file_id(&self, file_id: &str) -> Option<Document> {
        let raw =
            sqlx::query_as::<_, DocumentRaw>(&format!("{} WHERE file_id = $1", SELECT_FIELDS))
                .bind(file_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!(
                        "Find document with file_id: {} failed. DB returned error: {:?}",
                        file_id, e
                    );
                })
                .ok()??;
        raw.try_into().ok()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Document>> {
        let raws = sqlx::query_as::<_, DocumentRaw>(SELECT_FIELDS)
            .fetch_all(&self.pool)
            .await?;
        Ok(raws
            .into_iter()
            .filter_map(|raw| raw.try_into().ok())
            .collect())
    }
}
