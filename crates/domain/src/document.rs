use crate::automation::AutomationAction;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Maximum display length for a file name before it gets shortened.
/// Storage always keeps the full name.
const DISPLAY_NAME_LIMIT: usize = 35;
const DISPLAY_NAME_TRUNCATED: usize = 32;

/// Payment documents track "paid / not paid", task documents track
/// "done / not done". The mechanics are identical, so both kinds share
/// the same entity with a `kind` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Payment,
    Task,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Task => "task",
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid document kind: {0}")]
pub struct InvalidDocumentKind(String);

impl FromStr for DocumentKind {
    type Err = InvalidDocumentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "task" => Ok(Self::Task),
            _ => Err(InvalidDocumentKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid document status: {0}")]
pub struct InvalidDocumentStatus(String);

impl FromStr for DocumentStatus {
    type Err = InvalidDocumentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidDocumentStatus(s.to_string())),
        }
    }
}

/// Attributes reported by the external automation system for a new
/// document, already validated at the transport boundary.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub category: String,
    pub project: Option<String>,
    pub date: Option<String>,
    pub file_id: Option<String>,
    pub drive_url: String,
}

/// An accounting artifact awaiting action in the group chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: ID,
    pub kind: DocumentKind,
    /// Full file name as reported, never truncated in storage
    pub file_name: String,
    /// Free text sub-type, e.g. the invoice keyword or action type
    pub category: String,
    pub project: Option<String>,
    /// Reference date for payments, deadline for tasks
    pub date: Option<String>,
    /// Opaque file reference in the external automation system
    pub file_id: Option<String>,
    /// Open/view link for the underlying file
    pub drive_url: String,
    pub status: DocumentStatus,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

impl Document {
    pub fn new(kind: DocumentKind, attributes: NewDocument, created_at: i64) -> Self {
        Self {
            id: Default::default(),
            kind,
            file_name: attributes.file_name,
            category: attributes.category,
            project: attributes.project,
            date: attributes.date,
            file_id: attributes.file_id,
            drive_url: attributes.drive_url,
            status: DocumentStatus::Pending,
            created_at,
            completed_at: None,
        }
    }

    /// File name as shown in chat messages: everything above 35 chars
    /// is cut to the first 32 chars plus an ellipsis.
    pub fn display_name(&self) -> String {
        if self.file_name.chars().count() > DISPLAY_NAME_LIMIT {
            let truncated: String = self.file_name.chars().take(DISPLAY_NAME_TRUNCATED).collect();
            format!("{}...", truncated)
        } else {
            self.file_name.clone()
        }
    }

    pub fn project_label(&self) -> &str {
        self.project.as_deref().unwrap_or("Unbekannt")
    }

    pub fn date_label(&self) -> &str {
        self.date.as_deref().unwrap_or("Keine Deadline")
    }

    pub fn is_completed(&self) -> bool {
        self.status == DocumentStatus::Completed
    }

    pub fn complete(&mut self, now: i64) {
        self.status = DocumentStatus::Completed;
        self.completed_at = Some(now);
    }

    pub fn revert(&mut self) {
        self.status = DocumentStatus::Pending;
        self.completed_at = None;
    }

    /// Automation action reported when this document is marked completed
    pub fn completed_action(&self) -> AutomationAction {
        match self.kind {
            DocumentKind::Payment => AutomationAction::MoveToPaid,
            DocumentKind::Task => AutomationAction::MoveActionDone,
        }
    }

    /// Automation action reported when a completed document is reverted
    pub fn reverted_action(&self) -> AutomationAction {
        match self.kind {
            DocumentKind::Payment => AutomationAction::MoveToInvoice,
            DocumentKind::Task => AutomationAction::MoveToActionRequired,
        }
    }
}

impl Entity<ID> for Document {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn document_with_name(file_name: &str) -> Document {
        Document::new(
            DocumentKind::Payment,
            NewDocument {
                file_name: file_name.to_string(),
                category: "invoice".to_string(),
                project: None,
                date: Some("2026-03-01".to_string()),
                file_id: Some("drive-file-1".to_string()),
                drive_url: "https://drive.example.com/file/1".to_string(),
            },
            0,
        )
    }

    #[test]
    fn it_truncates_long_file_names_for_display_only() {
        let name = "invoice_March_Project_Alpha_final_v2.pdf";
        assert!(name.len() > 35);
        let document = document_with_name(name);

        let displayed = document.display_name();
        assert_eq!(displayed, format!("{}...", &name[..32]));
        assert_eq!(displayed.chars().count(), 35);
        // Stored name keeps the full length
        assert_eq!(document.file_name, name);
    }

    #[test]
    fn it_keeps_short_file_names_untouched() {
        let document = document_with_name("invoice.pdf");
        assert_eq!(document.display_name(), "invoice.pdf");
    }

    #[test]
    fn completing_and_reverting_round_trips() {
        let mut document = document_with_name("invoice.pdf");
        assert_eq!(document.status, DocumentStatus::Pending);

        document.complete(1000);
        assert!(document.is_completed());
        assert_eq!(document.completed_at, Some(1000));

        document.revert();
        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(document.completed_at, None);
    }

    #[test]
    fn automation_actions_depend_on_kind() {
        let payment = document_with_name("invoice.pdf");
        assert_eq!(payment.completed_action(), AutomationAction::MoveToPaid);
        assert_eq!(payment.reverted_action(), AutomationAction::MoveToInvoice);

        let mut task = document_with_name("task.pdf");
        task.kind = DocumentKind::Task;
        assert_eq!(task.completed_action(), AutomationAction::MoveActionDone);
        assert_eq!(
            task.reverted_action(),
            AutomationAction::MoveToActionRequired
        );
    }
}
