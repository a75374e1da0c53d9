use serde::Serialize;

/// Action reported to the external spreadsheet-automation system when
/// a document crosses a terminal transition. The wire strings are the
/// contract with that system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationAction {
    MoveToPaid,
    MoveToInvoice,
    MoveActionDone,
    MoveToActionRequired,
}

impl AutomationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoveToPaid => "move_to_paid",
            Self::MoveToInvoice => "move_to_invoice",
            Self::MoveActionDone => "move_action_done",
            Self::MoveToActionRequired => "move_to_action_required",
        }
    }
}
