use super::IDocumentRepo;
use crate::repos::shared::inmemory_repo::*;
use backoffice_bot_domain::{Document, ID};
use std::sync::Mutex;

pub struct InMemoryDocumentRepo {
    documents: Mutex<Vec<Document>>,
    next_id: Mutex<i64>,
}

impl InMemoryDocumentRepo {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn assign_id(&self) -> ID {
        let mut next_id = self.next_id.lock().unwrap();
        let id = ID::new(*next_id);
        *next_id += 1;
        id
    }
}

#[async_trait::async_trait]
impl IDocumentRepo for InMemoryDocumentRepo {
    async fn insert(&self, document: &Document) -> anyhow::Result<ID> {
        let id = self.assign_id();
        let mut stored = document.clone();
        stored.id = id.clone();
        insert(&stored, &self.documents);
        Ok(id)
    }

    async fn save(&self, document: &Document) -> anyhow::Result<()> {
        save(document, &self.documents);
        Ok(())
    }

    async fn find(&self, document_id: &ID) -> Option<Document> {
        find(document_id, &self.documents)
    }

    async fn find_by_file_id(&self, file_id: &str) -> Option<Document> {
        find_by(&self.documents, |d| {
            d.file_id.as_deref() == Some(file_id)
        })
        .into_iter()
        .next()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Document>> {
        Ok(find_by(&self.documents, |_| true))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use backoffice_bot_domain::{DocumentKind, NewDocument};

    fn new_document(file_id: &str) -> Document {
        Document::new(
            DocumentKind::Payment,
            NewDocument {
                file_name: "invoice.pdf".into(),
                category: "invoice".into(),
                project: Some("Alpha".into()),
                date: Some("2026-03-01".into()),
                file_id: Some(file_id.into()),
                drive_url: "https://drive.example.com/file/1".into(),
            },
            0,
        )
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let repo = InMemoryDocumentRepo::new();
        let first = repo.insert(&new_document("a")).await.unwrap();
        let second = repo.insert(&new_document("b")).await.unwrap();
        assert_eq!(first, ID::new(1));
        assert_eq!(second, ID::new(2));

        let found = repo.find(&second).await.unwrap();
        assert_eq!(found.file_id.as_deref(), Some("b"));
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn save_overwrites_the_stored_document() {
        let repo = InMemoryDocumentRepo::new();
        let id = repo.insert(&new_document("a")).await.unwrap();
        let mut document = repo.find(&id).await.unwrap();
        document.complete(42);
        repo.save(&document).await.unwrap();

        let found = repo.find(&id).await.unwrap();
        assert!(found.is_completed());
        assert_eq!(found.completed_at, Some(42));
    }

    #[tokio::test]
    async fn find_by_file_id_matches_the_external_reference() {
        let repo = InMemoryDocumentRepo::new();
        repo.insert(&new_document("drive-1")).await.unwrap();
        assert!(repo.find_by_file_id("drive-1").await.is_some());
        assert!(repo.find_by_file_id("drive-2").await.is_none());
    }
}
