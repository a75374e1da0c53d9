mod inmemory;
mod postgres;

pub use inmemory::InMemoryDocumentRepo;
pub use postgres::PostgresDocumentRepo;

use backoffice_bot_domain::{Document, ID};

#[async_trait::async_trait]
pub trait IDocumentRepo: Send + Sync {
    /// Persists a new document and returns the id the store assigned
    async fn insert(&self, document: &Document) -> anyhow::Result<ID>;
    async fn save(&self, document: &Document) -> anyhow::Result<()>;
    async fn find(&self, document_id: &ID) -> Option<Document>;
    async fn find_by_file_id(&self, file_id: &str) -> Option<Document>;
    /// All stored documents, used for the warm start inventory
    async fn find_all(&self) -> anyhow::Result<Vec<Document>>;
}
