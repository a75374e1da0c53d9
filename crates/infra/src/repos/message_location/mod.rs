mod inmemory;
mod postgres;

pub use inmemory::InMemoryMessageLocationRepo;
pub use postgres::PostgresMessageLocationRepo;

use backoffice_bot_domain::{MessageLocation, ID};

#[async_trait::async_trait]
pub trait IMessageLocationRepo: Send + Sync {
    /// Saves the location of the message representing a document.
    /// A later save for the same document overwrites the earlier one.
    async fn upsert(&self, location: &MessageLocation) -> anyhow::Result<()>;
    async fn find_by_document(&self, document_id: &ID) -> Option<MessageLocation>;
}
