use super::IMessageLocationRepo;
use crate::repos::shared::inmemory_repo::*;
use backoffice_bot_domain::{MessageLocation, ID};
use std::sync::Mutex;

pub struct InMemoryMessageLocationRepo {
    locations: Mutex<Vec<MessageLocation>>,
}

impl InMemoryMessageLocationRepo {
    pub fn new() -> Self {
        Self {
            locations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMessageLocationRepo for InMemoryMessageLocationRepo {
    async fn upsert(&self, location: &MessageLocation) -> anyhow::Result<()> {
        upsert(location, &self.locations);
        Ok(())
    }

    async fn find_by_document(&self, document_id: &ID) -> Option<MessageLocation> {
        find(document_id, &self.locations)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn location(document_id: i64, message_id: i64) -> MessageLocation {
        MessageLocation {
            document_id: ID::new(document_id),
            message_id,
            chat_id: -100,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_the_location_for_the_same_document() {
        let repo = InMemoryMessageLocationRepo::new();
        repo.upsert(&location(1, 10)).await.unwrap();
        repo.upsert(&location(1, 20)).await.unwrap();

        let found = repo.find_by_document(&ID::new(1)).await.unwrap();
        assert_eq!(found.message_id, 20);
        assert!(repo.find_by_document(&ID::new(2)).await.is_none());
    }
}
