mod document;
mod message_location;
mod shared;

use document::{InMemoryDocumentRepo, PostgresDocumentRepo};
pub use document::IDocumentRepo;
use message_location::{InMemoryMessageLocationRepo, PostgresMessageLocationRepo};
pub use message_location::IMessageLocationRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub documents: Arc<dyn IDocumentRepo>,
    pub message_locations: Arc<dyn IMessageLocationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            documents: Arc::new(PostgresDocumentRepo::new(pool.clone())),
            message_locations: Arc::new(PostgresMessageLocationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            documents: Arc::new(InMemoryDocumentRepo::new()),
            message_locations: Arc::new(InMemoryMessageLocationRepo::new()),
        }
    }
}
