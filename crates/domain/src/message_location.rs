use crate::shared::entity::{Entity, ID};

/// Location of the chat message that represents a `Document`, so it
/// can later be edited in place. At most one location per document,
/// a later save overwrites the earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLocation {
    pub document_id: ID,
    pub message_id: i64,
    pub chat_id: i64,
    pub updated_at: i64,
}

impl Entity<ID> for MessageLocation {
    fn id(&self) -> ID {
        self.document_id.clone()
    }
}
